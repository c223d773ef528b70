use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        completed BOOLEAN
    );
"#;

/// Owned handle to the todo database. Opening always ensures the schema exists.
pub struct Db {
    handle: Connection,
}
impl Db {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let handle = Connection::open(path)
            .with_context(|| format!("opening database at {}", path.display()))?;
        Self::with_connection(handle)
    }
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let handle = Connection::open_in_memory().context("opening in-memory database")?;
        Self::with_connection(handle)
    }

    fn with_connection(handle: Connection) -> Result<Self> {
        let db = Self { handle };
        db.init_schema()?;
        Ok(db)
    }

    // create-if-absent, safe to run on every open
    fn init_schema(&self) -> Result<()> {
        self.handle
            .execute_batch(SCHEMA)
            .context("creating todos table")?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.handle
    }
}

// Required Debug implementation for `Db`
impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("path", &self.handle.path())
            .finish()
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Result<(String, Db)> {
        let tick = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_nanos();
        let path = std::env::temp_dir()
            .join(format!("test_db_{}.sqlite", tick))
            .to_string_lossy()
            .into_owned();
        let db = Db::new(&path)?;
        Ok((path, db))
    }
    fn teardown((path, db): (String, Db)) -> Result<()> {
        // close the connection before removing the file
        drop(db);
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn table_count(db: &Db) -> Result<i64> {
        let count = db.conn().query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'todos'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    #[test]
    fn test_new_creates_table() -> Result<()> {
        let (path, db) = setup()?;
        assert_eq!(table_count(&db)?, 1);
        teardown((path, db))?;
        Ok(())
    }

    #[test]
    fn test_in_memory_creates_table() -> Result<()> {
        let db = Db::in_memory()?;
        assert_eq!(table_count(&db)?, 1);
        Ok(())
    }

    #[test]
    fn test_reopen_keeps_rows() -> Result<()> {
        let (path, db) = setup()?;
        db.conn().execute(
            "INSERT INTO todos(title, completed) VALUES('persisted', 1)",
            [],
        )?;
        drop(db);

        let db = Db::new(&path)?;
        let title: String =
            db.conn()
                .query_row("SELECT title FROM todos WHERE id = 1", [], |row| row.get(0))?;
        assert_eq!(title, "persisted");
        teardown((path, db))?;
        Ok(())
    }

    #[test]
    fn test_init_schema_is_idempotent() -> Result<()> {
        let (path, db) = setup()?;
        db.init_schema()?;
        db.init_schema()?;
        assert_eq!(table_count(&db)?, 1);
        teardown((path, db))?;
        Ok(())
    }

    #[test]
    fn test_open_fails_in_missing_directory() {
        let path = std::env::temp_dir()
            .join("todo_sqlite_missing_dir")
            .join("nested")
            .join("todos.db");
        assert!(Db::new(path).is_err());
    }
}
