use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

const BOOKKEEPING: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    slice      TEXT NOT NULL,
    version    TEXT NOT NULL,
    checksum   TEXT NOT NULL,
    applied_at TEXT NOT NULL,
    PRIMARY KEY (slice, version)
)";

/// A schema script owned by a feature slice.
///
/// Versions are compared as strings, so zero-pad them (`"0001"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Hex SHA-256 of the script.
    #[must_use]
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.script.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn key(&self) -> (String, String) {
        (self.slice.to_owned(), self.version.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub slice: String,
    pub version: String,
}

impl From<&Migration> for AppliedMigration {
    fn from(m: &Migration) -> Self {
        Self { slice: m.slice.to_owned(), version: m.version.to_owned() }
    }
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

pub(crate) struct MigrationRunner<'c> {
    conn: &'c mut Connection,
}

impl<'c> MigrationRunner<'c> {
    pub(crate) const fn new(conn: &'c mut Connection) -> Self {
        Self { conn }
    }

    /// Applies pending migrations in the given order, each in its own transaction.
    pub(crate) fn run(mut self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        self.conn.execute_batch(BOOKKEEPING).context("Creating migration bookkeeping")?;
        let applied = self.applied_checksums()?;
        let mut report = MigrationReport::default();

        for migration in migrations {
            let checksum = migration.checksum();
            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, existing, &checksum)?;
                report.skipped.push(migration.into());
                continue;
            }

            let label = format!("Applying {}:{}", migration.slice, migration.version);
            let tx = self.conn.transaction().context(label.clone())?;
            tx.execute_batch(migration.script).context(label.clone())?;
            tx.execute(
                "INSERT INTO _migrations (slice, version, checksum, applied_at) VALUES (?1, ?2, ?3, ?4)",
                (migration.slice, migration.version, &checksum, chrono::Utc::now()),
            )
            .context(label.clone())?;
            tx.commit().context(label)?;

            report.applied.push(migration.into());
        }

        Ok(report)
    }

    fn applied_checksums(&self) -> Result<FxHashMap<(String, String), String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT slice, version, checksum FROM _migrations")
            .context("Loading applied migrations")?;
        let rows = stmt.query_map([], |row| {
            Ok(((row.get::<_, String>(0)?, row.get::<_, String>(1)?), row.get::<_, String>(2)?))
        })?;
        rows.collect::<Result<_, _>>().context("Parsing applied migrations")
    }
}

fn ensure_checksum_match(
    migration: &Migration,
    existing: &str,
    checksum: &str,
) -> Result<(), DatabaseError> {
    if existing == checksum {
        return Ok(());
    }
    Err(DatabaseError::Migration {
        message: format!(
            "Checksum mismatch for {}:{} (recorded {existing}, found {checksum})",
            migration.slice, migration.version
        )
        .into(),
        context: Some("Migration already applied with different content".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES_V1: Migration =
        Migration::new("notes", "0001", "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);");
    const NOTES_V2: Migration =
        Migration::new("notes", "0002", "ALTER TABLE notes ADD COLUMN pinned INTEGER DEFAULT 0;");

    #[test]
    fn applies_then_skips() {
        let mut conn = Connection::open_in_memory().expect("open");

        let first = MigrationRunner::new(&mut conn).run(&[NOTES_V1]).expect("first run");
        assert_eq!(first.applied.len(), 1);
        assert!(first.skipped.is_empty());

        let second = MigrationRunner::new(&mut conn).run(&[NOTES_V1, NOTES_V2]).expect("second run");
        assert_eq!(second.skipped, vec![AppliedMigration::from(&NOTES_V1)]);
        assert_eq!(second.applied, vec![AppliedMigration::from(&NOTES_V2)]);
    }

    #[test]
    fn edited_script_is_rejected() {
        let mut conn = Connection::open_in_memory().expect("open");
        MigrationRunner::new(&mut conn).run(&[NOTES_V1]).expect("first run");

        let edited = Migration::new("notes", "0001", "CREATE TABLE notes (id INTEGER PRIMARY KEY);");
        let err = MigrationRunner::new(&mut conn).run(&[edited]).expect_err("mismatch");
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }

    #[test]
    fn failing_script_rolls_back() {
        let mut conn = Connection::open_in_memory().expect("open");
        let broken = Migration::new("broken", "0001", "CREATE TABLE ok (id INTEGER); SELEC nope;");

        assert!(MigrationRunner::new(&mut conn).run(&[broken]).is_err());

        let exists: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE name = 'ok'", [], |r| r.get(0))
            .expect("count");
        assert_eq!(exists, 0);
    }

    #[test]
    fn checksum_is_stable_hex() {
        assert_eq!(NOTES_V1.checksum(), NOTES_V1.checksum());
        assert_eq!(NOTES_V1.checksum().len(), 64);
        assert_ne!(NOTES_V1.checksum(), NOTES_V2.checksum());
    }
}
