//! Administrative-hierarchy hospital registry: row mapping and upsert.

use rusqlite::{params, Connection, Row};
use serde::Deserialize;

use super::types::{non_blank, Hospital};
use crate::error::{Result, ValidationError};

/// Column list matching [`hospital_from_row`].
pub(crate) const HOSPITAL_COLUMNS: &str = "code, facility_name, county, sub_county, constituency, \
     ward, facility_type, keph_level, owner, beds, cots, operational_status";

/// One facility as it appears in an import snapshot.
///
/// Accepts the snake_case table names and the headers of the national
/// facility directory export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HospitalInput {
    #[serde(alias = "Code")]
    pub code: String,
    #[serde(alias = "facility_name", alias = "Name")]
    pub name: String,
    #[serde(alias = "County")]
    pub county: Option<String>,
    #[serde(alias = "Sub County")]
    pub sub_county: Option<String>,
    #[serde(alias = "Constituency")]
    pub constituency: Option<String>,
    #[serde(alias = "Ward")]
    pub ward: Option<String>,
    #[serde(alias = "Facility type")]
    pub facility_type: Option<String>,
    #[serde(alias = "Keph level")]
    pub keph_level: Option<String>,
    #[serde(alias = "Owner")]
    pub owner: Option<String>,
    #[serde(alias = "Beds")]
    pub beds: Option<u32>,
    #[serde(alias = "Cots")]
    pub cots: Option<u32>,
    #[serde(alias = "Operational status")]
    pub operational_status: Option<String>,
}

/// Map a row selected with [`HOSPITAL_COLUMNS`].
pub(crate) fn hospital_from_row(row: &Row<'_>) -> rusqlite::Result<Hospital> {
    let beds: Option<i64> = row.get(9)?;
    let cots: Option<i64> = row.get(10)?;
    Ok(Hospital {
        code: row.get(0)?,
        name: row.get(1)?,
        county: non_blank(row.get(2)?),
        sub_county: non_blank(row.get(3)?),
        constituency: non_blank(row.get(4)?),
        ward: non_blank(row.get(5)?),
        facility_type: non_blank(row.get(6)?),
        keph_level: non_blank(row.get(7)?),
        owner: non_blank(row.get(8)?),
        beds: beds.and_then(|n| u32::try_from(n).ok()),
        cots: cots.and_then(|n| u32::try_from(n).ok()),
        operational_status: non_blank(row.get(11)?),
    })
}

/// Insert or replace a facility by code. Returns `true` when a row with the
/// same code already existed.
pub fn upsert_hospital(conn: &Connection, input: &HospitalInput) -> Result<bool> {
    let code = input.code.trim();
    if code.is_empty() {
        return Err(ValidationError::Empty { field: "code" }.into());
    }
    let existed: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM hospital_referrals WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO hospital_referrals (code, facility_name, county, sub_county, \
         constituency, ward, facility_type, keph_level, owner, beds, cots, operational_status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            code,
            input.name.trim(),
            non_blank(input.county.clone()),
            non_blank(input.sub_county.clone()),
            non_blank(input.constituency.clone()),
            non_blank(input.ward.clone()),
            non_blank(input.facility_type.clone()),
            non_blank(input.keph_level.clone()),
            non_blank(input.owner.clone()),
            input.beds.map(i64::from),
            input.cots.map(i64::from),
            non_blank(input.operational_status.clone()),
        ],
    )?;

    Ok(existed)
}
