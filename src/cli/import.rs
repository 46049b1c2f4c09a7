use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use kliniki::config::KlinikiConfig;
use kliniki::import::{import_snapshot, ImportMode, Snapshot};

/// Import a registry snapshot from a JSON file.
pub fn import(config: &KlinikiConfig, file: &Path, replace: bool) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let snapshot: Snapshot =
        serde_json::from_str(&json).context("failed to parse import JSON")?;

    let db_path = config.resolved_db_path();
    let mut conn = kliniki::db::open_database(&db_path)?;

    println!(
        "Importing {} clinics and {} hospitals{}...",
        snapshot.clinics.len(),
        snapshot.hospitals.len(),
        if replace { " (replacing existing rows)" } else { "" }
    );

    let pb = ProgressBar::new(snapshot.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .context("invalid progress template")?
            .progress_chars("##-"),
    );

    let mode = if replace {
        ImportMode::Replace
    } else {
        ImportMode::Append
    };
    let summary = import_snapshot(&mut conn, &snapshot, mode, || pb.inc(1))
        .context("import failed, no rows were written")?;
    pb.finish_and_clear();

    println!("Import complete:");
    println!("  Clinics imported:    {}", summary.clinics_imported);
    println!("    without location:  {}", summary.clinics_unplaced);
    if summary.clinics_skipped > 0 {
        println!("  Clinics skipped:     {} (blank name)", summary.clinics_skipped);
    }
    println!("  Hospitals inserted:  {}", summary.hospitals_inserted);
    println!("  Hospitals updated:   {}", summary.hospitals_replaced);
    if summary.hospitals_skipped > 0 {
        println!("  Hospitals skipped:   {} (blank code)", summary.hospitals_skipped);
    }

    Ok(())
}
