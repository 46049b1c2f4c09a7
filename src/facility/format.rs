//! Uniform projection of both registries into [`FacilityRecord`].

use serde::Serialize;

use super::proximity::NearbyClinic;
use super::types::Hospital;

/// Placeholder for unknown text fields.
pub const MISSING: &str = "N/A";

/// One facility as returned to the agent, whichever registry it came from.
///
/// Text fields are always present (`"N/A"` when unknown). Fields that only
/// make sense for one registry are omitted for the other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    pub location: String,
    pub category: String,
    pub services: String,
    pub contact: String,
    pub website: String,
    pub map_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keph_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operational_status: Option<String>,
}

fn or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Join the non-empty parts, or `None` when there are none.
fn join_present<'a>(parts: impl IntoIterator<Item = Option<&'a str>>, sep: &str) -> Option<String> {
    let parts: Vec<&str> = parts.into_iter().flatten().collect();
    (!parts.is_empty()).then(|| parts.join(sep))
}

impl FacilityRecord {
    pub fn from_nearby(hit: &NearbyClinic) -> Self {
        let clinic = &hit.clinic;
        let phones = clinic.phone_combined.as_deref().or(clinic.phone.as_deref());
        let contact = join_present([phones, clinic.email_combined.as_deref()], " | ");

        Self {
            code: None,
            name: clinic.name.clone(),
            location: or_missing(clinic.location.as_deref()),
            category: or_missing(clinic.category.as_deref()),
            services: or_missing(clinic.services.as_deref()),
            contact: or_missing(contact.as_deref()),
            website: or_missing(clinic.website.as_deref()),
            map_link: or_missing(clinic.google_link.as_deref()),
            latitude: clinic.coordinates.map(|c| c.latitude),
            longitude: clinic.coordinates.map(|c| c.longitude),
            distance_km: Some(round_km(hit.distance_km)),
            keph_level: None,
            owner: None,
            capacity: None,
            operational_status: None,
        }
    }

    pub fn from_hospital(hospital: &Hospital) -> Self {
        Self {
            code: Some(hospital.code.clone()),
            name: hospital.name.clone(),
            location: or_missing(location_summary(hospital).as_deref()),
            category: or_missing(hospital.facility_type.as_deref()),
            services: MISSING.to_string(),
            contact: MISSING.to_string(),
            website: MISSING.to_string(),
            map_link: MISSING.to_string(),
            latitude: None,
            longitude: None,
            distance_km: None,
            keph_level: Some(or_missing(hospital.keph_level.as_deref())),
            owner: Some(or_missing(hospital.owner.as_deref())),
            capacity: Some(or_missing(capacity(hospital).as_deref())),
            operational_status: Some(or_missing(hospital.operational_status.as_deref())),
        }
    }
}

/// Most specific level first, repeated names collapsed
/// ("Kibra, Nairobi" rather than "Kibra, Kibra, Kibra, Nairobi").
fn location_summary(hospital: &Hospital) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for level in [
        &hospital.ward,
        &hospital.sub_county,
        &hospital.constituency,
        &hospital.county,
    ] {
        if let Some(name) = level.as_deref() {
            if !parts.iter().any(|p| p.eq_ignore_ascii_case(name)) {
                parts.push(name);
            }
        }
    }
    join_present(parts.into_iter().map(Some), ", ")
}

fn capacity(hospital: &Hospital) -> Option<String> {
    let beds = hospital.beds.map(|n| format!("{n} beds"));
    let cots = hospital.cots.map(|n| format!("{n} cots"));
    join_present([beds.as_deref(), cots.as_deref()], ", ")
}
