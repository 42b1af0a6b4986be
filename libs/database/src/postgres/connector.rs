use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Connect, retrying with exponential backoff while the server is unreachable.
///
/// `None` uses [`RetryConfig::default`]. Handy when the API and the database
/// start together under compose or Kubernetes. The last error is reported as
/// [`DatabaseError::ConnectionFailed`].
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<DatabaseConnection> {
    let options = config.into_connect_options();
    retry_with_backoff(
        || connect_with_options(options.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
    .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Apply all pending migrations of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!(app = app_name, "Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use sea_orm_migration::MigrationTrait;
    use std::time::Instant;

    struct EmptyMigrator;

    #[async_trait::async_trait]
    impl MigratorTrait for EmptyMigrator {
        fn migrations() -> Vec<Box<dyn MigrationTrait>> {
            vec![]
        }
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up_on_bad_url() {
        let mut config = PostgresConfig::new("postgresql://nobody@127.0.0.1:1/none");
        config.connect_timeout_secs = 1;
        config.acquire_timeout_secs = 1;
        config.min_connections = 0;
        let retry = RetryConfig::new()
            .with_max_retries(1)
            .with_initial_delay(10)
            .without_jitter();

        let start = Instant::now();
        let result = connect_from_config_with_retry(config, Some(retry)).await;

        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
        assert!(start.elapsed().as_secs() < 30);
    }

    #[tokio::test]
    async fn test_run_migrations_failure_is_migration_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("permission denied for schema public".into())])
            .append_query_errors([DbErr::Custom("permission denied for schema public".into())])
            .into_connection();

        let err = run_migrations::<EmptyMigrator>(&db, "embeddings_test")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MigrationError(_)));
        assert!(err.to_string().starts_with("Migration error:"));
    }
}
