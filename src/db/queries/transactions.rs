use crate::models::transaction::{NewTransaction, Transaction, TransactionType};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

const SELECT_COLUMNS: &str = "SELECT id, date, description, amount_cents, transaction_type,
        category, is_essential, payment_method, created_at, updated_at
 FROM transactions";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let type_str: String = row.get(4)?;
    let transaction_type = TransactionType::parse(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown transaction type '{}'", type_str).into(),
        )
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        amount_cents: row.get(3)?,
        transaction_type,
        category: row.get(5)?,
        is_essential: row.get(6)?,
        payment_method: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// The whole ledger, newest first. A single unreadable row fails the call.
pub fn list_transactions(conn: &Connection) -> rusqlite::Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY date DESC, id DESC", SELECT_COLUMNS))?;

    let transactions = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = transactions.len(), "Listed transactions");
    Ok(transactions)
}

pub fn get_transaction(conn: &Connection, id: i64) -> rusqlite::Result<Option<Transaction>> {
    trace!(transaction_id = id, "Fetching transaction");
    conn.query_row(&format!("{} WHERE id = ?", SELECT_COLUMNS), [id], map_row)
        .optional()
}

pub fn create_transaction(conn: &Connection, transaction: &NewTransaction) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (date, description, amount_cents, transaction_type,
         category, is_essential, payment_method)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            transaction.date,
            transaction.description,
            transaction.amount_cents,
            transaction.transaction_type.as_str(),
            transaction.category,
            transaction.is_essential,
            transaction.payment_method,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        transaction_id = id,
        amount_cents = transaction.amount_cents,
        transaction_type = %transaction.transaction_type,
        "Created transaction"
    );
    Ok(id)
}

pub fn update_transaction(
    conn: &Connection,
    id: i64,
    transaction: &NewTransaction,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE transactions SET date = ?, description = ?, amount_cents = ?,
         transaction_type = ?, category = ?, is_essential = ?, payment_method = ?,
         updated_at = datetime('now')
         WHERE id = ?",
        params![
            transaction.date,
            transaction.description,
            transaction.amount_cents,
            transaction.transaction_type.as_str(),
            transaction.category,
            transaction.is_essential,
            transaction.payment_method,
            id,
        ],
    )?;
    if rows > 0 {
        debug!(transaction_id = id, "Updated transaction");
    }
    Ok(rows > 0)
}

pub fn delete_transaction(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM transactions WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(transaction_id = id, "Deleted transaction");
    }
    Ok(rows > 0)
}
