//! Facility record types for both registries.
//!
//! [`Clinic`] is a row of the coordinate-indexed registry and [`Hospital`] a
//! row of the administrative-hierarchy registry. The two are never merged:
//! they share no key and their schemas only partly overlap.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Rejects NaN and anything outside `[-90, 90]` × `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A clinic from the coordinate-indexed registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clinic {
    pub id: i64,
    pub name: String,
    pub services: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub phone_combined: Option<String>,
    pub email_combined: Option<String>,
    pub website: Option<String>,
    pub google_link: Option<String>,
    /// Both halves present or the clinic is unplaced.
    pub coordinates: Option<Coordinates>,
    pub source_country: Option<String>,
}

/// A facility from the administrative-hierarchy registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hospital {
    pub code: String,
    pub name: String,
    pub county: Option<String>,
    pub sub_county: Option<String>,
    pub constituency: Option<String>,
    pub ward: Option<String>,
    pub facility_type: Option<String>,
    pub keph_level: Option<String>,
    pub owner: Option<String>,
    pub beds: Option<u32>,
    pub cots: Option<u32>,
    pub operational_status: Option<String>,
}

/// The four nested administrative levels, most specific last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminLevel {
    County,
    SubCounty,
    Constituency,
    Ward,
}

impl AdminLevel {
    pub const ALL: [AdminLevel; 4] = [
        AdminLevel::County,
        AdminLevel::Constituency,
        AdminLevel::SubCounty,
        AdminLevel::Ward,
    ];

    /// Column name in `hospital_referrals`.
    pub fn column(&self) -> &'static str {
        match self {
            Self::County => "county",
            Self::SubCounty => "sub_county",
            Self::Constituency => "constituency",
            Self::Ward => "ward",
        }
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Whether a successful search found anything.
///
/// `NoResults` is a normal outcome, distinct from a data store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Found,
    NoResults,
}

impl SearchStatus {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            Self::NoResults
        } else {
            Self::Found
        }
    }
}

/// Trim a value and map blank strings to `None`; NULL and `""` both mean unknown.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}
