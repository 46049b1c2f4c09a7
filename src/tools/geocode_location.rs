//! MCP `geocode_location` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `geocode_location` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GeocodeLocationParams {
    /// Free-text place description, e.g. "Westlands" or "near Kenyatta Market".
    #[schemars(
        description = "Free-text place name or description, e.g. 'Westlands' or 'Kisumu town'. The default country is appended when none is mentioned."
    )]
    pub location: String,
}
