//! MCP `get_healthcare_statistics` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `get_healthcare_statistics` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HealthcareStatisticsParams {
    /// Optional county to restrict facility counts to.
    #[schemars(description = "Optional county to restrict hospital statistics to")]
    pub county: Option<String>,
}
