//! Todo statements over a [`Db`]. Each function issues exactly one SQL statement.

use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::driver::Db;
use crate::models::{Todo, TodoInput};

/// Returns every stored todo in storage order. Rows that fail to decode are
/// logged and left out rather than failing the whole listing.
pub fn list_todos(db: &Db) -> Result<Vec<Todo>> {
    let mut stmt = db
        .conn()
        .prepare("SELECT id, title, completed FROM todos")
        .context("preparing todo listing")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Todo {
                id: row.get(0)?,
                title: row.get(1)?,
                completed: row.get(2)?,
            })
        })
        .context("listing todos")?;

    let mut todos = Vec::new();
    for row in rows {
        match row {
            Ok(todo) => todos.push(todo),
            Err(err) => tracing::warn!(error = %err, "skipping undecodable todo row"),
        }
    }
    Ok(todos)
}

/// Inserts a todo and returns the id assigned by the store.
pub fn insert_todo(db: &Db, input: &TodoInput) -> Result<i64> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO todos(title, completed) VALUES(?1, ?2)",
        params![input.title, input.completed],
    )
    .context("inserting todo")?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites title and completed for `id`. Returns the number of rows touched,
/// which is zero when no such todo exists.
pub fn update_todo(db: &Db, id: i64, input: &TodoInput) -> Result<usize> {
    let changed = db
        .conn()
        .execute(
            "UPDATE todos SET title = ?1, completed = ?2 WHERE id = ?3",
            params![input.title, input.completed, id],
        )
        .context("updating todo")?;
    Ok(changed)
}

pub fn delete_todo(db: &Db, id: i64) -> Result<usize> {
    let changed = db
        .conn()
        .execute("DELETE FROM todos WHERE id = ?1", params![id])
        .context("deleting todo")?;
    Ok(changed)
}
