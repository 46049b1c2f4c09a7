use anyhow::Result;

use kliniki::config::KlinikiConfig;

/// Find clinics around a point from the terminal.
pub async fn nearby(
    config: &KlinikiConfig,
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
) -> Result<()> {
    let service = crate::server::build_service(config)?;
    let response = service.find_nearby(latitude, longitude, radius_km).await?;

    if response.results.is_empty() {
        println!("No clinics within {} km.", response.radius_km);
        if let Some(suggested) = response.suggested_radius_km {
            println!("Try again with --radius {suggested}.");
        }
        return Ok(());
    }

    println!(
        "Found {} clinic(s) within {} km of ({latitude}, {longitude})\n",
        response.total, response.radius_km
    );
    super::print_records(&response.results);

    Ok(())
}
