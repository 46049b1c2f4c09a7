use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use serde::Serialize;
use std::collections::BTreeMap;

use super::region::contains_pattern;
use crate::error::Result;

/// Bucket for rows whose grouping column is NULL or blank.
pub const UNKNOWN: &str = "Unknown";

/// Response from get_healthcare_statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county_filter: Option<String>,
    pub hospitals: HospitalStats,
    pub clinics: ClinicStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HospitalStats {
    pub total: u64,
    pub by_county: BTreeMap<String, u64>,
    pub by_facility_type: BTreeMap<String, u64>,
    pub by_keph_level: BTreeMap<String, u64>,
    pub by_owner: BTreeMap<String, u64>,
    pub by_operational_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClinicStats {
    pub total: u64,
    pub with_coordinates: u64,
    pub without_coordinates: u64,
    pub by_source_country: BTreeMap<String, u64>,
}

/// Compute registry statistics.
///
/// If `county` is provided (and not blank), hospital counts are restricted to
/// counties containing it. Clinic counts are never filtered: the clinic
/// registry has no county column.
pub fn registry_stats(conn: &Connection, county: Option<&str>) -> Result<RegistryStats> {
    let county = county.map(str::trim).filter(|c| !c.is_empty());
    let (where_clause, params) = county_filter(county);

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM hospital_referrals {where_clause}"),
        params_from_iter(params.iter()),
        |row| row.get(0),
    )?;

    let hospitals = HospitalStats {
        total: total as u64,
        by_county: count_by(conn, "hospital_referrals", "county", where_clause, &params)?,
        by_facility_type: count_by(
            conn,
            "hospital_referrals",
            "facility_type",
            where_clause,
            &params,
        )?,
        by_keph_level: count_by(conn, "hospital_referrals", "keph_level", where_clause, &params)?,
        by_owner: count_by(conn, "hospital_referrals", "owner", where_clause, &params)?,
        by_operational_status: count_by(
            conn,
            "hospital_referrals",
            "operational_status",
            where_clause,
            &params,
        )?,
    };

    Ok(RegistryStats {
        county_filter: county.map(str::to_string),
        hospitals,
        clinics: clinic_stats(conn)?,
    })
}

fn county_filter(county: Option<&str>) -> (&'static str, Vec<Value>) {
    match county {
        Some(c) => (
            "WHERE county LIKE ?1 ESCAPE '\\'",
            vec![Value::Text(contains_pattern(c))],
        ),
        None => ("", Vec::new()),
    }
}

/// Group counts by a column, folding NULL and blank values into [`UNKNOWN`].
fn count_by(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
    where_clause: &str,
    params: &[Value],
) -> Result<BTreeMap<String, u64>> {
    let sql = format!(
        "SELECT COALESCE(NULLIF(TRIM({column}), ''), '{UNKNOWN}'), COUNT(*) \
         FROM {table} {where_clause} GROUP BY 1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut map = BTreeMap::new();
    for (key, count) in rows {
        *map.entry(key).or_insert(0) += count as u64;
    }
    Ok(map)
}

fn clinic_stats(conn: &Connection) -> Result<ClinicStats> {
    let (total, placed): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COUNT(latitude) FROM clinics",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(ClinicStats {
        total: total as u64,
        with_coordinates: placed as u64,
        without_coordinates: (total - placed) as u64,
        by_source_country: count_by(conn, "clinics", "source_country", "", &[])?,
    })
}
