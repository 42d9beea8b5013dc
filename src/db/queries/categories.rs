use crate::models::category::{Category, NewCategory};
use crate::models::transaction::TransactionType;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

fn map_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    let type_str: String = row.get(2)?;
    let category_type = TransactionType::parse(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown category type '{}'", type_str).into(),
        )
    })?;

    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        category_type,
        color: row.get(3)?,
        icon: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn list_categories(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_type, color, icon, created_at, updated_at
         FROM categories
         ORDER BY name, category_type",
    )?;

    let categories = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(categories)
}

pub fn get_category(conn: &Connection, id: i64) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, category_type, color, icon, created_at, updated_at
         FROM categories WHERE id = ?",
        [id],
        map_row,
    )
    .optional()
}

pub fn create_category(conn: &Connection, category: &NewCategory) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO categories (name, category_type, color, icon) VALUES (?, ?, ?, ?)",
        params![
            category.name,
            category.category_type.as_str(),
            category.color,
            category.icon
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(category_id = id, name = %category.name, "Created category");
    Ok(id)
}

pub fn update_category(
    conn: &Connection,
    id: i64,
    category: &NewCategory,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE categories SET name = ?, category_type = ?, color = ?, icon = ?,
         updated_at = datetime('now') WHERE id = ?",
        params![
            category.name,
            category.category_type.as_str(),
            category.color,
            category.icon,
            id
        ],
    )?;
    if rows > 0 {
        debug!(category_id = id, name = %category.name, "Updated category");
    }
    Ok(rows > 0)
}

pub fn delete_category(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM categories WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(category_id = id, "Deleted category");
    }
    Ok(rows > 0)
}
