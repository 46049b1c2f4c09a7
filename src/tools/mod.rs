pub mod find_nearby_clinics;
pub mod geocode_location;
pub mod healthcare_statistics;
pub mod search_facilities_by_county;
pub mod search_hospital_referrals;

use find_nearby_clinics::FindNearbyClinicsParams;
use geocode_location::GeocodeLocationParams;
use healthcare_statistics::HealthcareStatisticsParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_facilities_by_county::SearchFacilitiesByCountyParams;
use search_hospital_referrals::SearchHospitalReferralsParams;
use serde::Serialize;
use std::sync::Arc;

use kliniki::error::LocateError;
use kliniki::facility::region::RegionFilter;
use kliniki::service::LocationSearchService;

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}

fn tool_error(tool: &'static str, err: LocateError) -> String {
    if err.is_validation() {
        tracing::info!(tool, error = %err, "rejected tool input");
    } else {
        tracing::error!(tool, error = %err, "tool failed");
    }
    err.to_string()
}

/// The Kliniki MCP tool handler. Holds the shared search service and exposes
/// all MCP tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct KlinikiTools {
    tool_router: ToolRouter<Self>,
    service: Arc<LocationSearchService>,
}

#[tool_router]
impl KlinikiTools {
    pub fn new(service: Arc<LocationSearchService>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service,
        }
    }

    /// Resolve a free-text location to coordinates.
    #[tool(description = "Convert a place name or description into latitude/longitude. On failure returns success=false with a reason (NOT_FOUND, SERVICE_TIMEOUT, SERVICE_ERROR); ask the user for a nearby landmark or town instead.")]
    async fn geocode_location(
        &self,
        Parameters(params): Parameters<GeocodeLocationParams>,
    ) -> Result<String, String> {
        let result = self.service.geocode(&params.location).await;
        to_json(&result)
    }

    /// Clinics near a point, nearest first.
    #[tool(description = "Find up to 10 clinics within radius_km (default 20, max 50) of a latitude/longitude, sorted by distance. If status is no_results, retry once with radius_km=50.")]
    async fn find_nearby_clinics(
        &self,
        Parameters(params): Parameters<FindNearbyClinicsParams>,
    ) -> Result<String, String> {
        let response = self
            .service
            .find_nearby(params.latitude, params.longitude, params.radius_km)
            .await
            .map_err(|e| tool_error("find_nearby_clinics", e))?;
        to_json(&response)
    }

    /// Hospitals by administrative area and attributes.
    #[tool(description = "Search the hospital referral registry by county, sub_county, constituency, ward or a generic location, optionally filtered by facility name, type, KEPH level and owner. The most specific area given wins.")]
    async fn search_hospital_referrals(
        &self,
        Parameters(params): Parameters<SearchHospitalReferralsParams>,
    ) -> Result<String, String> {
        let response = self
            .service
            .search_by_region(RegionFilter::from(params))
            .await
            .map_err(|e| tool_error("search_hospital_referrals", e))?;
        to_json(&response)
    }

    /// All facilities in one county.
    #[tool(description = "List facilities in a county (default limit 50), optionally of one facility type.")]
    async fn search_facilities_by_county(
        &self,
        Parameters(params): Parameters<SearchFacilitiesByCountyParams>,
    ) -> Result<String, String> {
        let response = self
            .service
            .facilities_in_county(&params.county, params.facility_type, params.limit)
            .await
            .map_err(|e| tool_error("search_facilities_by_county", e))?;
        to_json(&response)
    }

    /// Registry statistics.
    #[tool(description = "Get facility registry statistics: hospital counts by county, type, KEPH level, owner and status, plus clinic coverage. Optionally restricted to one county.")]
    async fn get_healthcare_statistics(
        &self,
        Parameters(params): Parameters<HealthcareStatisticsParams>,
    ) -> Result<String, String> {
        let stats = self
            .service
            .statistics(params.county)
            .await
            .map_err(|e| tool_error("get_healthcare_statistics", e))?;
        to_json(&stats)
    }
}

#[tool_handler]
impl ServerHandler for KlinikiTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Kliniki finds healthcare facilities. Use geocode_location to turn a place \
                 into coordinates, then find_nearby_clinics; use search_hospital_referrals \
                 for referrals by county, constituency or ward."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
