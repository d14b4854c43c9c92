//! Product table storage handle
//!
//! `Database` knows where the product table lives; every `session()` is a
//! connection of its own, closed when dropped on every exit path. Sessions
//! do not queue behind one another:
//! - file databases run in WAL mode with a busy timeout, so readers never
//!   wait for a writer and writers wait for each other inside SQLite
//! - in-memory databases are a uniquely named shared cache kept alive by an
//!   anchor connection; table locks are waited out via unlock notification

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use super::errors::InventoryResult;

/// Location string used for in-memory databases
pub const IN_MEMORY: &str = ":memory:";

/// How long a session waits on another session's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS products (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT    NOT NULL,
    sku      TEXT    NOT NULL UNIQUE,
    price    REAL    NOT NULL,
    quantity INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_products_name ON products (name);
";

static NEXT_MEMORY_ID: AtomicU64 = AtomicU64::new(0);

enum Target {
    File(PathBuf),
    /// `file:` URI of a shared-cache in-memory database
    Memory(String),
}

impl Target {
    fn connect(&self) -> rusqlite::Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = match self {
            Target::File(path) => Connection::open_with_flags(path, flags)?,
            Target::Memory(uri) => Connection::open_with_flags(uri, flags)?,
        };
        connection.busy_timeout(BUSY_TIMEOUT)?;
        Ok(connection)
    }
}

/// One unit of work on the product table, backed by its own connection.
pub struct Session {
    connection: Connection,
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.connection
    }
}

/// Injected storage handle for the product table.
pub struct Database {
    target: Target,
    location: String,
    /// Keeps an in-memory database alive between sessions. Never queried.
    _anchor: Option<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) a database file and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Storage` if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: &Path) -> InventoryResult<Self> {
        let target = Target::File(path.to_path_buf());
        let connection = target.connect()?;
        // journal_mode answers with the mode actually in effect.
        connection.pragma_update_and_check(None, "journal_mode", "wal", |row| {
            row.get::<_, String>(0)
        })?;
        connection.execute_batch(SCHEMA)?;

        Ok(Self {
            target,
            location: path.display().to_string(),
            _anchor: None,
        })
    }

    /// Opens a private in-memory database, used by tests.
    ///
    /// Each call yields a distinct database, shared by all of its sessions.
    pub fn open_in_memory() -> InventoryResult<Self> {
        let uri = format!(
            "file:retail-inventory-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            NEXT_MEMORY_ID.fetch_add(1, Ordering::Relaxed)
        );
        let target = Target::Memory(uri);
        let anchor = target.connect()?;
        anchor.execute_batch(SCHEMA)?;

        Ok(Self {
            target,
            location: IN_MEMORY.to_string(),
            _anchor: Some(Mutex::new(anchor)),
        })
    }

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Storage` if no connection can be opened.
    pub fn session(&self) -> InventoryResult<Session> {
        Ok(Session {
            connection: self.target.connect()?,
        })
    }

    /// File path, or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;
    use tempfile::TempDir;

    const INSERT_A: &str =
        "INSERT INTO products (name, sku, price, quantity) VALUES ('A', 'A-1', 1.0, 1)";
    const INSERT_B: &str =
        "INSERT INTO products (name, sku, price, quantity) VALUES ('B', 'B-1', 2.0, 2)";

    fn count(session: &Session) -> i64 {
        session
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .unwrap()
    }

    fn name_of(session: &Session, id: i64) -> String {
        session
            .query_row("SELECT name FROM products WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .unwrap()
    }

    /// Two sessions are held at once, each reading its own row.
    fn assert_sessions_overlap(db: &Database) {
        let seed = db.session().unwrap();
        seed.execute(INSERT_A, []).unwrap();
        seed.execute(INSERT_B, []).unwrap();
        drop(seed);

        let opened = Barrier::new(2);
        let read = Barrier::new(2);

        thread::scope(|scope| {
            scope.spawn(|| {
                let session = db.session().unwrap();
                assert_eq!(name_of(&session, 1), "A");
                opened.wait();
                read.wait();
                drop(session);
            });
            scope.spawn(|| {
                opened.wait();
                let session = db.session().unwrap();
                assert_eq!(name_of(&session, 2), "B");
                read.wait();
            });
        });
    }

    #[test]
    fn test_open_in_memory_creates_table() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(count(&db.session().unwrap()), 0);
        assert_eq!(db.location(), IN_MEMORY);
    }

    #[test]
    fn test_in_memory_rows_outlive_sessions() {
        let db = Database::open_in_memory().unwrap();
        db.session().unwrap().execute(INSERT_A, []).unwrap();
        assert_eq!(count(&db.session().unwrap()), 1);
    }

    #[test]
    fn test_in_memory_databases_are_isolated() {
        let first = Database::open_in_memory().unwrap();
        let second = Database::open_in_memory().unwrap();

        first.session().unwrap().execute(INSERT_A, []).unwrap();
        assert_eq!(count(&second.session().unwrap()), 0);
    }

    #[test]
    fn test_write_visible_to_open_session() {
        let db = Database::open_in_memory().unwrap();
        let reader = db.session().unwrap();
        let writer = db.session().unwrap();

        writer.execute(INSERT_A, []).unwrap();
        assert_eq!(count(&reader), 1);
    }

    #[test]
    fn test_in_memory_sessions_overlap() {
        let db = Database::open_in_memory().unwrap();
        assert_sessions_overlap(&db);
    }

    #[test]
    fn test_file_sessions_overlap() {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(&tmp.path().join("inventory.db")).unwrap();
        assert_sessions_overlap(&db);
    }

    #[test]
    fn test_open_file_uses_wal() {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(&tmp.path().join("inventory.db")).unwrap();
        let mode: String = db
            .session()
            .unwrap()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn test_open_file_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("inventory.db");

        {
            let db = Database::open(&path).unwrap();
            db.session().unwrap().execute(INSERT_A, []).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(count(&db.session().unwrap()), 1);
    }

    #[test]
    fn test_sku_unique_constraint() {
        let db = Database::open_in_memory().unwrap();
        let session = db.session().unwrap();
        session.execute(INSERT_A, []).unwrap();
        assert!(session.execute(INSERT_A, []).is_err());
    }
}
