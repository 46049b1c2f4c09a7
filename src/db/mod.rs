pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Open (or create) the facility database at the given path, with schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL lets concurrent readers proceed while an import is writing
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
pub fn open_memory_database() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Result of [`check_database_health`].
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub schema_version: u32,
    pub integrity_ok: bool,
    pub integrity_details: String,
    pub clinic_count: u64,
    pub clinics_with_coordinates: u64,
    pub hospital_count: u64,
    pub dataset_imported_at: Option<String>,
}

/// Run `PRAGMA integrity_check` and collect row counts for both registries.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    let integrity_ok = integrity_details == "ok";

    let clinic_count: i64 = conn.query_row("SELECT COUNT(*) FROM clinics", [], |row| row.get(0))?;
    let clinics_with_coordinates: i64 = conn.query_row(
        "SELECT COUNT(*) FROM clinics WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
        [],
        |row| row.get(0),
    )?;
    let hospital_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM hospital_referrals", [], |row| row.get(0))?;

    Ok(HealthReport {
        schema_version,
        integrity_ok,
        integrity_details,
        clinic_count: clinic_count as u64,
        clinics_with_coordinates: clinics_with_coordinates as u64,
        hospital_count: hospital_count as u64,
        dataset_imported_at: migrations::get_meta(conn, "dataset_imported_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_database_is_migrated() {
        let conn = open_memory_database().unwrap();
        assert_eq!(
            migrations::get_schema_version(&conn).unwrap(),
            migrations::CURRENT_SCHEMA_VERSION
        );
    }

    #[test]
    fn health_report_counts_rows() {
        let conn = open_memory_database().unwrap();
        conn.execute_batch(
            "INSERT INTO clinics (clinic_name, latitude, longitude) VALUES ('A', -1.28, 36.82);
             INSERT INTO clinics (clinic_name) VALUES ('B');
             INSERT INTO hospital_referrals (code, facility_name) VALUES ('13023', 'Kenyatta');",
        )
        .unwrap();

        let report = check_database_health(&conn).unwrap();
        assert!(report.integrity_ok);
        assert_eq!(report.clinic_count, 2);
        assert_eq!(report.clinics_with_coordinates, 1);
        assert_eq!(report.hospital_count, 1);
        assert!(report.dataset_imported_at.is_none());
    }
}
