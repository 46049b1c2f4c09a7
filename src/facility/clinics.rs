//! Coordinate-indexed clinic registry: row mapping, bulk insert, and the
//! latitude-band candidate fetch used by proximity search.

use rusqlite::{params, Connection, Row};
use serde::Deserialize;

use super::types::{non_blank, Clinic, Coordinates};
use crate::error::Result;

/// Column list matching [`clinic_from_row`].
pub(crate) const CLINIC_COLUMNS: &str = "id, clinic_name, services, category, location, phone, \
     phone_combined, email_combined, website, google_link, latitude, longitude, source_country";

/// One clinic as it appears in an import snapshot.
///
/// Accepts both the snake_case table names and the spreadsheet headers of the
/// scraped clinic dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClinicInput {
    #[serde(alias = "clinic_name", alias = "Clinic Name")]
    pub name: String,
    #[serde(alias = "Services")]
    pub services: Option<String>,
    #[serde(alias = "Category")]
    pub category: Option<String>,
    #[serde(alias = "Location")]
    pub location: Option<String>,
    #[serde(alias = "Phone")]
    pub phone: Option<String>,
    #[serde(alias = "Phone_Combined")]
    pub phone_combined: Option<String>,
    #[serde(alias = "Email_Combined")]
    pub email_combined: Option<String>,
    #[serde(alias = "Website")]
    pub website: Option<String>,
    #[serde(alias = "Google Link")]
    pub google_link: Option<String>,
    #[serde(alias = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(alias = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(alias = "source_co")]
    pub source_country: Option<String>,
}

/// Result of [`insert_clinic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicInsert {
    pub id: i64,
    /// The input carried a half pair or out-of-range coordinates, so the clinic
    /// was stored unplaced.
    pub coordinates_dropped: bool,
}

/// Map a row selected with [`CLINIC_COLUMNS`].
pub(crate) fn clinic_from_row(row: &Row<'_>) -> rusqlite::Result<Clinic> {
    let latitude: Option<f64> = row.get(10)?;
    let longitude: Option<f64> = row.get(11)?;
    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
        _ => None,
    };

    Ok(Clinic {
        id: row.get(0)?,
        name: row.get(1)?,
        services: non_blank(row.get(2)?),
        category: non_blank(row.get(3)?),
        location: non_blank(row.get(4)?),
        phone: non_blank(row.get(5)?),
        phone_combined: non_blank(row.get(6)?),
        email_combined: non_blank(row.get(7)?),
        website: non_blank(row.get(8)?),
        google_link: non_blank(row.get(9)?),
        coordinates,
        source_country: non_blank(row.get(12)?),
    })
}

/// Insert one clinic. Blank strings are stored as NULL; coordinates are kept
/// only when both halves are present and valid.
pub fn insert_clinic(conn: &Connection, input: &ClinicInput) -> Result<ClinicInsert> {
    let coordinates = match (input.latitude, input.longitude) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
        _ => None,
    };
    let coordinates_dropped =
        coordinates.is_none() && (input.latitude.is_some() || input.longitude.is_some());

    conn.execute(
        "INSERT INTO clinics (clinic_name, services, category, location, phone, phone_combined, \
         email_combined, website, google_link, latitude, longitude, source_country) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            input.name.trim(),
            non_blank(input.services.clone()),
            non_blank(input.category.clone()),
            non_blank(input.location.clone()),
            non_blank(input.phone.clone()),
            non_blank(input.phone_combined.clone()),
            non_blank(input.email_combined.clone()),
            non_blank(input.website.clone()),
            non_blank(input.google_link.clone()),
            coordinates.map(|c| c.latitude),
            coordinates.map(|c| c.longitude),
            non_blank(input.source_country.clone()),
        ],
    )?;

    Ok(ClinicInsert {
        id: conn.last_insert_rowid(),
        coordinates_dropped,
    })
}

/// Fetch placed clinics whose latitude lies in `[min_lat, max_lat]`, by id.
///
/// Unplaced clinics never appear here.
pub fn fetch_in_latitude_band(
    conn: &Connection,
    min_lat: f64,
    max_lat: f64,
) -> Result<Vec<Clinic>> {
    let sql = format!(
        "SELECT {CLINIC_COLUMNS} FROM clinics \
         WHERE latitude IS NOT NULL AND longitude IS NOT NULL \
         AND latitude BETWEEN ?1 AND ?2 \
         ORDER BY id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let clinics = stmt
        .query_map(params![min_lat, max_lat], clinic_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(clinics)
}
