use autoims_database::*;

const PARTS: Migration = Migration::new(
    "parts",
    "0001",
    "CREATE TABLE parts (
        part_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        part_code TEXT NOT NULL UNIQUE
    );
    CREATE TABLE usages (
        usage_id INTEGER PRIMARY KEY AUTOINCREMENT,
        part_id  INTEGER NOT NULL REFERENCES parts(part_id)
    );",
);

#[tokio::test]
async fn in_memory_database_runs_migrations_and_calls() {
    let db = Database::builder().in_memory().migrations([PARTS]).init().await.expect("open");
    assert_eq!(db.location(), &Location::Memory);

    let inserted = db
        .call(|conn| {
            conn.execute("INSERT INTO parts (part_code) VALUES (?1)", ["BRK-001"])
                .map_err(DatabaseError::from)
        })
        .await
        .expect("insert");
    assert_eq!(inserted, 1);
}

#[tokio::test]
async fn unique_and_foreign_key_violations_are_classified() {
    let db = Database::builder().in_memory().migrations([PARTS]).init().await.expect("open");

    let err = db
        .call(|conn| {
            conn.execute("INSERT INTO parts (part_code) VALUES ('OIL-5W30')", [])?;
            conn.execute("INSERT INTO parts (part_code) VALUES ('OIL-5W30')", [])?;
            Ok::<_, DatabaseError>(())
        })
        .await
        .expect_err("duplicate code");
    assert!(err.is_unique_violation());
    assert!(!err.is_foreign_key_violation());

    let err = db
        .call(|conn| {
            conn.execute("INSERT INTO usages (part_id) VALUES (9999)", [])?;
            Ok::<_, DatabaseError>(())
        })
        .await
        .expect_err("dangling part");
    assert!(err.is_foreign_key_violation());
}

#[tokio::test]
async fn file_database_keeps_migration_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("autoims.db");

    {
        let db = Database::builder().path(&path).migrations([PARTS]).init().await.expect("first open");
        db.call(|conn| {
            conn.execute("INSERT INTO parts (part_code) VALUES ('FLT-01')", [])
                .map_err(DatabaseError::from)
        })
        .await
        .expect("insert");
    }

    let db = Database::builder().path(&path).migrations([PARTS]).init().await.expect("reopen");
    let count: i64 = db
        .call(|conn| {
            conn.query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
                .map_err(DatabaseError::from)
        })
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn missing_location_fails_validation() {
    let err = Database::builder().init().await.expect_err("no location");
    assert!(matches!(err, DatabaseError::Validation { .. }));
}
