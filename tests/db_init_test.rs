use kliniki::db::{check_database_health, open_database};
use kliniki::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};

#[test]
fn open_database_creates_parent_dirs_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("facilities.db");

    let conn = open_database(&path).unwrap();
    assert!(path.exists());
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

    let journal: String = conn
        .query_row("PRAGMA journal_mode", [], |r| r.get(0))
        .unwrap();
    assert_eq!(journal.to_lowercase(), "wal");
}

#[test]
fn full_schema_creates_all_tables_and_indexes() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_database(dir.path().join("facilities.db")).unwrap();

    let tables: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    for expected in ["clinics", "hospital_referrals", "schema_meta"] {
        assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
    }

    let indexes: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    for expected in ["idx_clinics_latitude", "idx_hospitals_name"] {
        assert!(indexes.iter().any(|i| i == expected), "missing index {expected}");
    }
}

#[test]
fn reopening_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("facilities.db");
    {
        let conn = open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO clinics (clinic_name, latitude, longitude) VALUES ('Reopened', -1.3, 36.8)",
            [],
        )
        .unwrap();
    }

    let conn = open_database(&path).unwrap();
    let report = check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.clinic_count, 1);
    assert_eq!(report.clinics_with_coordinates, 1);
}

#[test]
fn coordinate_pair_constraint_rejects_half_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_database(dir.path().join("facilities.db")).unwrap();
    let result = conn.execute(
        "INSERT INTO clinics (clinic_name, latitude) VALUES ('Half', -1.3)",
        [],
    );
    assert!(result.is_err());
}
