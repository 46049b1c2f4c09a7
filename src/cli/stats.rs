use anyhow::Result;
use std::collections::BTreeMap;

use kliniki::config::KlinikiConfig;

fn print_counts(title: &str, counts: &BTreeMap<String, u64>) {
    println!("{title}:");
    let mut rows: Vec<_> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (key, count) in rows {
        println!("  {:<32} {}", key, count);
    }
    println!();
}

/// Display registry statistics in the terminal.
pub fn stats(config: &KlinikiConfig, county: Option<&str>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = kliniki::db::open_database(&db_path)?;

    let stats = kliniki::facility::stats::registry_stats(&conn, county)?;

    println!("Facility Statistics");
    println!("{}", "=".repeat(40));
    if let Some(ref c) = stats.county_filter {
        println!("  County filter:       {c}");
    }
    println!("  Hospitals:           {}", stats.hospitals.total);
    println!("  Clinics:             {}", stats.clinics.total);
    println!("    with coordinates:  {}", stats.clinics.with_coordinates);
    println!("    without:           {}", stats.clinics.without_coordinates);
    println!();

    print_counts("By County", &stats.hospitals.by_county);
    print_counts("By Facility Type", &stats.hospitals.by_facility_type);
    print_counts("By KEPH Level", &stats.hospitals.by_keph_level);
    print_counts("By Owner", &stats.hospitals.by_owner);
    print_counts("By Operational Status", &stats.hospitals.by_operational_status);
    print_counts("Clinics By Source Country", &stats.clinics.by_source_country);

    Ok(())
}
