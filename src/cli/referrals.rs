use anyhow::Result;

use kliniki::config::KlinikiConfig;
use kliniki::facility::region::RegionFilter;

/// Search the hospital registry from the terminal.
pub async fn referrals(config: &KlinikiConfig, filter: RegionFilter) -> Result<()> {
    let service = crate::server::build_service(config)?;
    let response = service.search_by_region(filter).await?;

    if response.results.is_empty() {
        println!("No facilities found.");
        return Ok(());
    }

    println!("Found {} facility(ies)\n", response.total);
    super::print_records(&response.results);

    Ok(())
}
