use rusqlite::Connection;
use tracing::{debug, info};

use crate::{Error, Result};

/// Schema steps, applied in order; step `i` brings the store to version `i + 1`
const MIGRATIONS: &[&str] = &[
    // v1: base tables
    r#"
    CREATE TABLE play_time(
        date_time TEXT,
        duration INT,
        game_id TEXT
    );

    CREATE TABLE overall_time(
        game_id TEXT PRIMARY KEY,
        duration INT
    );

    CREATE TABLE game_dict(
        game_id TEXT PRIMARY KEY,
        name TEXT
    );
    "#,
    // v2
    r#"
    CREATE INDEX play_time_date_time_epoch_idx
        ON play_time(STRFTIME('%s', date_time));

    CREATE INDEX play_time_game_id_idx
        ON play_time(game_id);

    CREATE INDEX overall_time_game_id_idx
        ON overall_time(game_id);
    "#,
    // v3: import marker
    "ALTER TABLE play_time ADD COLUMN migrated TEXT;",
    // v4
    r#"
    DROP INDEX play_time_date_time_epoch_idx;

    CREATE INDEX play_time_date_time_epoch_idx
        ON play_time(STRFTIME('%s', date_time));
    "#,
    // v5: file checksums; no longer used, kept so existing stores share the version numbering
    r#"
    CREATE TABLE game_file_checksum(
        checksum_id INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id TEXT NOT NULL,
        checksum TEXT NOT NULL,
        algorithm TEXT NOT NULL,
        chunk_size INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (game_id) REFERENCES game_dict(game_id),
        UNIQUE (game_id, checksum, algorithm)
    );
    "#,
    // v6: plain date_time indexes serve both range and per-year lookups
    r#"
    DROP INDEX IF EXISTS overall_time_game_id_idx;
    DROP INDEX IF EXISTS play_time_game_id_idx;
    DROP INDEX IF EXISTS play_time_date_time_epoch_idx;

    CREATE INDEX IF NOT EXISTS play_time_date_time_idx
        ON play_time(date_time);

    CREATE INDEX IF NOT EXISTS play_time_game_id_date_time_idx
        ON play_time(game_id, date_time);
    "#,
];

pub const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    ensure_migration_table(conn)?;

    let current_version = get_schema_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(Error::Internal(format!(
            "Database schema version ({}) is newer than supported version ({}). Please update the \
             plugin.",
            current_version, SCHEMA_VERSION
        )));
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        apply_migration(conn, version).map_err(|e| {
            Error::Internal(format!("Failed to apply migration {}: {}", version, e))
        })?;
    }

    if current_version < SCHEMA_VERSION {
        info!(from = current_version, to = SCHEMA_VERSION, "schema migrated");
    }

    Ok(())
}

fn ensure_migration_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migration (
            id INTEGER PRIMARY KEY
        )",
        [],
    )?;
    Ok(())
}

pub(crate) fn get_schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row("SELECT COALESCE(MAX(id), 0) FROM migration", [], |row| {
        row.get(0)
    })?;
    Ok(version)
}

fn apply_migration(conn: &mut Connection, version: i32) -> Result<()> {
    let sql = usize::try_from(version - 1)
        .ok()
        .and_then(|index| MIGRATIONS.get(index))
        .ok_or_else(|| Error::Internal(format!("Unknown migration version: {}", version)))?;

    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.execute("INSERT INTO migration (id) VALUES (?1)", [version])?;
    tx.commit()?;

    debug!(version, "applied migration");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    const EXPECTED_TABLES: &[&str] = &[
        "play_time",
        "overall_time",
        "game_dict",
        "game_file_checksum",
        "migration",
    ];

    #[test]
    fn test_full_migration_sequence() {
        let mut conn = Connection::open_in_memory().unwrap();

        run_migrations(&mut conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);

        for &table_name in EXPECTED_TABLES {
            assert!(
                table_exists(&conn, table_name),
                "Table '{}' should exist after migrations",
                table_name
            );
        }

        assert!(column_exists(&conn, "play_time", "migrated"));
    }

    #[test]
    fn test_migration_idempotency() {
        let mut conn = Connection::open_in_memory().unwrap();

        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_resume_from_partial_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_migration_table(&conn).unwrap();

        for v in 1..=3 {
            apply_migration(&mut conn, v).unwrap();
        }
        assert_eq!(get_schema_version(&conn).unwrap(), 3);
        assert!(!table_exists(&conn, "game_file_checksum"));

        run_migrations(&mut conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(table_exists(&conn, "game_file_checksum"));
    }

    #[test]
    fn test_future_schema_version_error() {
        let mut conn = Connection::open_in_memory().unwrap();

        conn.execute("CREATE TABLE migration (id INTEGER PRIMARY KEY)", [])
            .unwrap();
        conn.execute(
            "INSERT INTO migration (id) VALUES (?1)",
            [SCHEMA_VERSION + 100],
        )
        .unwrap();

        let error_msg = run_migrations(&mut conn).unwrap_err().to_string();

        assert!(
            error_msg.contains("newer than supported"),
            "Error should mention version incompatibility, got: {}",
            error_msg
        );
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_migration_table(&conn).unwrap();

        assert!(apply_migration(&mut conn, SCHEMA_VERSION + 1).is_err());
        assert!(apply_migration(&mut conn, 0).is_err());
    }

    fn table_exists(conn: &Connection, table_name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master
             WHERE type = 'table' AND name = ?1",
            [table_name],
            |row| row.get(0),
        )
        .unwrap_or(false)
    }

    fn column_exists(conn: &Connection, table_name: &str, column_name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info(?1)
             WHERE name = ?2",
            [table_name, column_name],
            |row| row.get(0),
        )
        .unwrap_or(false)
    }
}
