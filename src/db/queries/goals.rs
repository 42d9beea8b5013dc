use crate::models::goal::{Goal, NewGoal};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

fn map_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_cents: row.get(2)?,
        current_cents: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        deadline: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Goals ordered by nearest deadline first.
pub fn list_goals(conn: &Connection) -> rusqlite::Result<Vec<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, target_cents, current_cents, icon, color, deadline,
                created_at, updated_at
         FROM goals
         ORDER BY deadline, id",
    )?;

    let goals = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(goals)
}

pub fn get_goal(conn: &Connection, id: i64) -> rusqlite::Result<Option<Goal>> {
    conn.query_row(
        "SELECT id, name, target_cents, current_cents, icon, color, deadline,
                created_at, updated_at
         FROM goals WHERE id = ?",
        [id],
        map_row,
    )
    .optional()
}

pub fn create_goal(conn: &Connection, goal: &NewGoal) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO goals (name, target_cents, current_cents, icon, color, deadline)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            goal.name,
            goal.target_cents,
            goal.current_cents,
            goal.icon,
            goal.color,
            goal.deadline
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(goal_id = id, name = %goal.name, "Created goal");
    Ok(id)
}

pub fn update_goal(conn: &Connection, id: i64, goal: &NewGoal) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE goals SET name = ?, target_cents = ?, current_cents = ?, icon = ?,
         color = ?, deadline = ?, updated_at = datetime('now') WHERE id = ?",
        params![
            goal.name,
            goal.target_cents,
            goal.current_cents,
            goal.icon,
            goal.color,
            goal.deadline,
            id
        ],
    )?;
    if rows > 0 {
        debug!(goal_id = id, "Updated goal");
    }
    Ok(rows > 0)
}

pub fn delete_goal(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM goals WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(goal_id = id, "Deleted goal");
    }
    Ok(rows > 0)
}
