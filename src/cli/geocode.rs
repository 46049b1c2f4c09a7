use anyhow::Result;

use kliniki::config::KlinikiConfig;
use kliniki::geocode::{create_geocoder, GeocoderAdapter};

/// Resolve a location from the terminal.
pub async fn geocode(config: &KlinikiConfig, location: &str) -> Result<()> {
    let provider = create_geocoder(&config.geocoder)?;
    let adapter = GeocoderAdapter::new(provider, &config.geocoder);

    let result = adapter.geocode(location).await;
    match (result.latitude, result.longitude) {
        (Some(lat), Some(lon)) if result.success => {
            println!("{}", result.address.as_deref().unwrap_or(location));
            println!("  Latitude:  {lat:.6}");
            println!("  Longitude: {lon:.6}");
        }
        _ => {
            let reason = result
                .reason
                .map(|r| format!("{r:?}"))
                .unwrap_or_else(|| "Unknown".into());
            println!("Could not resolve '{location}' ({reason})");
            if let Some(ref error) = result.error {
                println!("  {error}");
            }
        }
    }

    Ok(())
}
