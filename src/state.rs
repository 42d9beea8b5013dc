use crate::config::Config;
use crate::db::{DbPool, SqliteLedger};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// The transaction source for this request.
    pub fn ledger(&self) -> SqliteLedger {
        SqliteLedger::new(self.db.clone())
    }
}
