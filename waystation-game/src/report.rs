//! Dossier export: a read-only summary of the final state.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ContentCatalog;
use crate::state::GameState;

/// The export action is gated behind the time threshold.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("dossier export is still locked")]
pub struct ExportLocked;

/// One completed station's contribution to the dossier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationReport {
    pub station_id: String,
    pub title: String,
    pub completed_at: u64,
    pub failed_attempts: u32,
    pub reflection: String,
}

/// Read-only snapshot consumed by the report rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DossierSummary {
    pub seed: String,
    pub clearance_level: u32,
    pub xp_earned_total: u32,
    pub total_active_time: u64,
    pub stations: Vec<StationReport>,
    pub tools: Vec<String>,
    pub integrity: i32,
}

/// Assemble the dossier from the current snapshot.
///
/// Stations appear in catalog order; only completed visits contribute.
///
/// # Errors
///
/// Returns `ExportLocked` until the tick scheduler has flipped the
/// export flag.
pub fn dossier(state: &GameState, catalog: &ContentCatalog) -> Result<DossierSummary, ExportLocked> {
    if !state.export_unlocked {
        return Err(ExportLocked);
    }
    let mut stations = Vec::new();
    for station in &catalog.stations {
        let Some(progress) = state.station_progress.get(&station.id) else {
            continue;
        };
        let Some(completed_at) = progress.completed_at else {
            continue;
        };
        stations.push(StationReport {
            station_id: station.id.clone(),
            title: station.title.clone(),
            completed_at,
            failed_attempts: progress.failed_attempts,
            reflection: progress.draft.clone().unwrap_or_default(),
        });
    }
    let mut tools: Vec<String> = state.earned_tools.iter().cloned().collect();
    tools.sort();
    Ok(DossierSummary {
        seed: state.seed.clone(),
        clearance_level: state.clearance_level,
        xp_earned_total: state.xp_earned_total,
        total_active_time: state.total_active_time,
        stations,
        tools,
        integrity: state.resources.integrity,
    })
}
