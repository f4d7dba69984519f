//! Shared application state.

use mongodb::{Client, Database};

/// State handed to the route builders. Clones share the connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    pub db: Database,
}
