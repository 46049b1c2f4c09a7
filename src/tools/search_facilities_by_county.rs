//! MCP `search_facilities_by_county` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `search_facilities_by_county` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchFacilitiesByCountyParams {
    #[schemars(description = "County name, e.g. 'Kiambu'")]
    pub county: String,

    #[schemars(description = "Optional facility type filter, e.g. 'Hospital'")]
    pub facility_type: Option<String>,

    /// Maximum number of results. Defaults to 50.
    #[schemars(description = "Maximum number of results to return. Defaults to 50.")]
    pub limit: Option<usize>,
}
