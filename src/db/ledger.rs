//! The transaction source behind every aggregate.
//!
//! Handlers fetch the ledger through [`Ledger`] and hand the snapshot to the
//! pure functions in [`crate::services::analytics`]. A failed fetch fails the
//! request; nothing is computed from a partial ledger.

use crate::db::queries::transactions;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewTransaction, Transaction};

pub trait Ledger {
    fn list(&self) -> AppResult<Vec<Transaction>>;
    fn get(&self, id: i64) -> AppResult<Transaction>;
    fn create(&self, transaction: &NewTransaction) -> AppResult<Transaction>;
    fn update(&self, id: i64, transaction: &NewTransaction) -> AppResult<Transaction>;
    /// Removes the entry and returns it as it was before deletion.
    fn delete(&self, id: i64) -> AppResult<Transaction>;
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Transaction {} not found", id))
}

/// [`Ledger`] backed by the SQLite connection pool.
#[derive(Clone)]
pub struct SqliteLedger {
    pool: DbPool,
}

impl SqliteLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Ledger for SqliteLedger {
    fn list(&self) -> AppResult<Vec<Transaction>> {
        let conn = self.pool.get()?;
        Ok(transactions::list_transactions(&conn)?)
    }

    fn get(&self, id: i64) -> AppResult<Transaction> {
        let conn = self.pool.get()?;
        transactions::get_transaction(&conn, id)?.ok_or_else(|| not_found(id))
    }

    fn create(&self, transaction: &NewTransaction) -> AppResult<Transaction> {
        let conn = self.pool.get()?;
        let id = transactions::create_transaction(&conn, transaction)?;
        transactions::get_transaction(&conn, id)?
            .ok_or_else(|| AppError::Internal(format!("Transaction {} vanished after insert", id)))
    }

    fn update(&self, id: i64, transaction: &NewTransaction) -> AppResult<Transaction> {
        let conn = self.pool.get()?;
        if !transactions::update_transaction(&conn, id, transaction)? {
            return Err(not_found(id));
        }
        transactions::get_transaction(&conn, id)?.ok_or_else(|| not_found(id))
    }

    fn delete(&self, id: i64) -> AppResult<Transaction> {
        let conn = self.pool.get()?;
        let existing = transactions::get_transaction(&conn, id)?.ok_or_else(|| not_found(id))?;
        transactions::delete_transaction(&conn, id)?;
        Ok(existing)
    }
}
