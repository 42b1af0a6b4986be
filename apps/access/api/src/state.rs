//! Shared application state.
//!
//! Built once in `main` and handed to the routers that need it. Cloning is
//! cheap: the connection is an `Arc`-backed pool handle.

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: database::postgres::DatabaseConnection,
}
