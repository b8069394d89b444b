//! Fog-of-war discovery graph.

use crate::constants::LOG_DISCOVERY;
use crate::content::Station;
use crate::state::GameState;

/// Whether a station's identity is revealed to the map layer.
/// Pure function of `discovered_nodes`.
#[must_use]
pub fn is_discovered(state: &GameState, station_id: &str) -> bool {
    state.discovered_nodes.contains(station_id)
}

/// Union a completed station's neighbors into the discovered set.
///
/// Idempotent and order-independent; returns the newly revealed
/// identifiers for the UI feed.
pub fn reveal_neighbors(state: &mut GameState, station: &Station) -> Vec<String> {
    let mut revealed = Vec::new();
    for neighbor in &station.neighbors {
        if state.discovered_nodes.insert(neighbor.clone()) {
            revealed.push(neighbor.clone());
        }
    }
    if !revealed.is_empty() {
        state.push_log_detail(LOG_DISCOVERY, Some(revealed.join(",")));
    }
    revealed
}
