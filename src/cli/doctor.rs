//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use kliniki::config::KlinikiConfig;
use kliniki::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &KlinikiConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `kliniki import <snapshot.json>` to create and load it.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let conn = db::open_database(&db_path)
        .context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn)
        .context("failed to run health check")?;

    println!("Kliniki Health Report");
    println!("=====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!(
        "Dataset imported:  {}",
        report.dataset_imported_at.as_deref().unwrap_or("(never)")
    );
    println!();
    println!("Geocoder:");
    println!("  Provider:        {}", config.geocoder.provider);
    println!("  Endpoint:        {}", config.geocoder.endpoint());
    println!("  Timeout:         {}s", config.geocoder.timeout().as_secs());
    if config.geocoder.provider == "google" && config.geocoder.api_key.is_none() {
        println!("  WARNING: google provider needs geocoder.api_key or KLINIKI_GEOCODER_KEY.");
    }
    println!();
    println!("Row counts:");
    println!("  Clinics:         {}", report.clinic_count);
    println!("    placed:        {}", report.clinics_with_coordinates);
    println!("  Hospitals:       {}", report.hospital_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  Re-import the registry snapshot into a fresh database:");
        println!("     KLINIKI_DB=/tmp/facilities.db kliniki import snapshot.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
