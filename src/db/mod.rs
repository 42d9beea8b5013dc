pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use ledger::{Ledger, SqliteLedger};
pub use pool::{create_in_memory_pool, create_pool, DbPool};
