//! Bulk load of a curated registry snapshot.
//!
//! A snapshot is one JSON document holding both registries:
//! `{ "clinics": [...], "hospitals": [...] }`. The whole snapshot is applied
//! in a single transaction, so a failed import leaves the database untouched.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::migrations::set_meta;
use crate::error::{LocateError, Result};
use crate::facility::clinics::{insert_clinic, ClinicInput};
use crate::facility::hospitals::{upsert_hospital, HospitalInput};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub clinics: Vec<ClinicInput>,
    pub hospitals: Vec<HospitalInput>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.clinics.len() + self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Add clinics and upsert hospitals by code.
    Append,
    /// Empty both registries first.
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub clinics_imported: u64,
    /// Imported without coordinates (half pair or out of range).
    pub clinics_unplaced: u64,
    /// Skipped for a blank name.
    pub clinics_skipped: u64,
    pub hospitals_inserted: u64,
    pub hospitals_replaced: u64,
    /// Skipped for a blank code.
    pub hospitals_skipped: u64,
}

/// Apply a snapshot. `on_row` is called once per input row, for progress.
pub fn import_snapshot(
    conn: &mut Connection,
    snapshot: &Snapshot,
    mode: ImportMode,
    mut on_row: impl FnMut(),
) -> Result<ImportSummary> {
    let tx = conn.transaction()?;
    let mut summary = ImportSummary::default();

    if mode == ImportMode::Replace {
        let clinics = tx.execute("DELETE FROM clinics", [])?;
        let hospitals = tx.execute("DELETE FROM hospital_referrals", [])?;
        tracing::info!(clinics, hospitals, "cleared registries before import");
    }

    for clinic in &snapshot.clinics {
        on_row();
        if clinic.name.trim().is_empty() {
            summary.clinics_skipped += 1;
            continue;
        }
        let inserted = insert_clinic(&tx, clinic)?;
        summary.clinics_imported += 1;
        if inserted.coordinates_dropped {
            tracing::debug!(name = %clinic.name, "clinic coordinates dropped");
        }
        if inserted.coordinates_dropped || clinic.latitude.is_none() || clinic.longitude.is_none() {
            summary.clinics_unplaced += 1;
        }
    }

    for hospital in &snapshot.hospitals {
        on_row();
        match upsert_hospital(&tx, hospital) {
            Ok(true) => summary.hospitals_replaced += 1,
            Ok(false) => summary.hospitals_inserted += 1,
            Err(LocateError::Validation(e)) => {
                tracing::warn!(name = %hospital.name, error = %e, "hospital skipped");
                summary.hospitals_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    set_meta(&tx, "dataset_imported_at", &chrono::Utc::now().to_rfc3339())?;
    tx.commit()?;

    tracing::info!(
        clinics = summary.clinics_imported,
        unplaced = summary.clinics_unplaced,
        hospitals = summary.hospitals_inserted + summary.hospitals_replaced,
        "snapshot imported"
    );
    Ok(summary)
}
