//! MCP `find_nearby_clinics` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `find_nearby_clinics` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindNearbyClinicsParams {
    #[schemars(description = "Latitude of the search origin in decimal degrees (-90 to 90)")]
    pub latitude: f64,

    #[schemars(description = "Longitude of the search origin in decimal degrees (-180 to 180)")]
    pub longitude: f64,

    /// Search radius in km, clamped to 1–50. Defaults to 20.
    #[schemars(
        description = "Search radius in km (1-50, default 20). If nothing is found at 20, retry with 50."
    )]
    pub radius_km: Option<f64>,
}
