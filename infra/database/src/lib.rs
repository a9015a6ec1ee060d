//! # Database
//!
//! SQLite storage for AutoIMS via [rusqlite](https://docs.rs/rusqlite).
//!
//! [`Database`] is a cheap, cloneable handle around a single connection.
//! Work runs on Tokio's blocking pool through [`Database::call`], so handlers
//! never block the async workers. Schema changes are [`Migration`]s owned by
//! the feature slices and applied once at startup.
//!
//! ```rust,no_run
//! use autoims_database::{Database, DatabaseError, Migration};
//!
//! const NOTES: Migration = Migration::new("notes", "0001", "CREATE TABLE notes (body TEXT);");
//!
//! # async fn run() -> Result<(), DatabaseError> {
//! let db = Database::builder().path("autoims.db").migrations([NOTES]).init().await?;
//! let count = db
//!     .call(|conn| {
//!         conn.query_row("SELECT COUNT(*) FROM notes", [], |r| r.get::<_, i64>(0))
//!             .map_err(DatabaseError::from)
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod changes;
mod error;
mod migrations;
mod query;

pub use changes::Changes;
pub use error::{ConstraintViolation, DatabaseError, DatabaseErrorExt};
pub use migrations::{AppliedMigration, Migration, MigrationReport};
pub use query::{fetch_all, parse_column};

use migrations::MigrationRunner;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const MAX_OPEN_ATTEMPTS: u32 = 3;
const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(200);
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(":memory:"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub struct DatabaseInner {
    conn: Mutex<Connection>,
    location: Location,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(location = %self.location, "SQLite connection closed");
    }
}

/// Shared SQLite handle.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.inner.location
    }

    /// Runs `f` with exclusive access to the connection on the blocking pool.
    ///
    /// The closure's own error type comes back unchanged; a panicked or
    /// cancelled task surfaces as [`DatabaseError::Internal`] converted into `E`.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or the join failure described above.
    pub async fn call<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DatabaseError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut conn = inner.conn.lock();
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            E::from(DatabaseError::Internal {
                message: e.to_string().into(),
                context: Some("Blocking database task failed".into()),
            })
        })?
    }
}

/// Configures and opens a [`Database`].
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct DatabaseBuilder {
    location: Option<Location>,
    busy_timeout: Duration,
    migrations: Vec<Migration>,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self { location: None, busy_timeout: DEFAULT_BUSY_TIMEOUT, migrations: Vec::new() }
    }
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(Location::File(path.into()));
        self
    }

    /// Private in-memory database; its data dies with the handle.
    pub fn in_memory(mut self) -> Self {
        self.location = Some(Location::Memory);
        self
    }

    pub const fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Appends migrations; they run in the order given.
    pub fn migrations(mut self, migrations: impl IntoIterator<Item = Migration>) -> Self {
        self.migrations.extend(migrations);
        self
    }

    /// Opens the connection, configures it and applies pending migrations.
    ///
    /// Opening is retried up to three times with exponential backoff starting
    /// at 200 ms, which covers a file still locked by a previous process.
    ///
    /// # Errors
    ///
    /// * [`DatabaseError::Validation`] when no location was configured.
    /// * [`DatabaseError::Connection`] when the file cannot be opened.
    /// * [`DatabaseError::Sqlite`] / [`DatabaseError::Migration`] when setup fails.
    #[instrument(skip(self), fields(location = ?self.location, migrations = self.migrations.len()))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let location = self.location.ok_or(DatabaseError::Validation {
            message: "Database path is required".into(),
            context: None,
        })?;

        let mut delay = INITIAL_RETRY_DELAY;
        let mut attempt = 1;
        let mut conn = loop {
            match open_connection(&location, self.busy_timeout) {
                Ok(conn) => break conn,
                Err(err) if attempt < MAX_OPEN_ATTEMPTS => {
                    warn!(attempt, ?delay, error = %err, "Database not ready, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                },
                Err(err) => return Err(err),
            }
        };

        let version = rusqlite::version();
        info!(%location, %version, "SQLite connection established");

        let report = MigrationRunner::new(&mut conn).run(&self.migrations)?;
        for skipped in &report.skipped {
            debug!(slice = %skipped.slice, version = %skipped.version, "Migration already applied");
        }
        for applied in &report.applied {
            info!(slice = %applied.slice, version = %applied.version, "Applied migration");
        }

        Ok(Database { inner: Arc::new(DatabaseInner { conn: Mutex::new(conn), location }) })
    }
}

fn open_connection(location: &Location, busy_timeout: Duration) -> Result<Connection, DatabaseError> {
    let conn = match location {
        Location::Memory => Connection::open_in_memory(),
        Location::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Connection {
                    message: e.to_string().into(),
                    context: Some(format!("Creating {}", parent.display()).into()),
                })?;
            }
            Connection::open(path)
        },
    }
    .map_err(|e| DatabaseError::Connection {
        message: e.to_string().into(),
        context: Some(location.to_string().into()),
    })?;

    conn.busy_timeout(busy_timeout).context("Setting busy timeout")?;
    conn.pragma_update(None, "foreign_keys", true).context("Enabling foreign keys")?;
    if matches!(location, Location::File(_)) {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .context("Enabling WAL")?;
    }

    Ok(conn)
}
