//! MCP `search_hospital_referrals` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kliniki::facility::region::RegionFilter;

/// Parameters for the `search_hospital_referrals` MCP tool.
///
/// The most specific administrative level wins: ward, then constituency, then
/// sub_county, then county. `location` is only used when none of them is set.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchHospitalReferralsParams {
    #[schemars(
        description = "Generic place name matched against county, constituency, sub-county and ward. Ignored when a specific level is given."
    )]
    pub location: Option<String>,

    #[schemars(description = "County name, e.g. 'Nairobi'")]
    pub county: Option<String>,

    #[schemars(description = "Sub-county name")]
    pub sub_county: Option<String>,

    #[schemars(description = "Constituency name")]
    pub constituency: Option<String>,

    #[schemars(description = "Ward name (most specific level)")]
    pub ward: Option<String>,

    #[schemars(description = "Part of the facility name")]
    pub facility_name: Option<String>,

    #[schemars(description = "Facility type, e.g. 'Hospital', 'Health Centre', 'Dispensary'")]
    pub facility_type: Option<String>,

    #[schemars(description = "KEPH level, e.g. 'Level 4' (1 = community, 6 = national referral)")]
    pub keph_level: Option<String>,

    #[schemars(description = "Owner, e.g. 'Ministry of Health', 'Private Practice', 'Faith Based'")]
    pub owner: Option<String>,

    /// Maximum number of results. Defaults to 10.
    #[schemars(description = "Maximum number of results to return. Defaults to 10.")]
    pub limit: Option<usize>,
}

impl From<SearchHospitalReferralsParams> for RegionFilter {
    fn from(p: SearchHospitalReferralsParams) -> Self {
        RegionFilter {
            county: p.county,
            sub_county: p.sub_county,
            constituency: p.constituency,
            ward: p.ward,
            location: p.location,
            facility_name: p.facility_name,
            facility_type: p.facility_type,
            keph_level: p.keph_level,
            owner: p.owner,
            limit: p.limit,
        }
    }
}
