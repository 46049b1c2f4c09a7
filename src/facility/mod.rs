pub mod clinics;
pub mod format;
pub mod hospitals;
pub mod proximity;
pub mod region;
pub mod stats;
pub mod types;

use rusqlite::Connection;

use crate::error::Result;
use format::FacilityRecord;
use proximity::{NearbyClinic, ProximityQuery};
use region::RegionFilter;
use types::Hospital;

/// A registry that can be searched with its own query type.
///
/// The clinic and hospital registries share this seam but nothing else: each
/// has its own query, its own hit type, and its own ranking.
pub trait FacilityLookup {
    type Query;
    type Hit;

    fn lookup(&self, conn: &Connection, query: &Self::Query) -> Result<Vec<Self::Hit>>;

    /// Project a hit into the uniform record.
    fn record(hit: &Self::Hit) -> FacilityRecord;
}

/// Coordinate-indexed clinics, ranked by great-circle distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClinicRegistry;

impl FacilityLookup for ClinicRegistry {
    type Query = ProximityQuery;
    type Hit = NearbyClinic;

    fn lookup(&self, conn: &Connection, query: &ProximityQuery) -> Result<Vec<NearbyClinic>> {
        proximity::find_nearby(conn, query)
    }

    fn record(hit: &NearbyClinic) -> FacilityRecord {
        FacilityRecord::from_nearby(hit)
    }
}

/// Administrative-hierarchy hospitals, ordered by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct HospitalRegistry;

impl FacilityLookup for HospitalRegistry {
    type Query = RegionFilter;
    type Hit = Hospital;

    fn lookup(&self, conn: &Connection, query: &RegionFilter) -> Result<Vec<Hospital>> {
        region::search_by_region(conn, query)
    }

    fn record(hit: &Hospital) -> FacilityRecord {
        FacilityRecord::from_hospital(hit)
    }
}

/// Run a lookup and project every hit.
pub fn lookup_records<L: FacilityLookup>(
    registry: &L,
    conn: &Connection,
    query: &L::Query,
) -> Result<Vec<FacilityRecord>> {
    Ok(registry
        .lookup(conn, query)?
        .iter()
        .map(L::record)
        .collect())
}
