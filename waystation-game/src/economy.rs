//! Resource economy: entry costs, completion rewards, clearance math.

use crate::constants::{
    COMPLETION_FUEL_RECOVERY, COMPLETION_RATION_RECOVERY, FUEL_CELL_COST_FACTOR, FUEL_CELL_ID,
    FUEL_MAX, MRE_PACK_ID, MRE_PACK_RATION_DISCOUNT, PIP_BOY_ID, PIP_BOY_XP_MULTIPLIER,
    XP_PER_CLEARANCE_LEVEL,
};
use crate::content::Station;
use crate::state::GameState;

/// Effective resource cost of entering a station after upgrade modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCost {
    pub fuel: i32,
    pub rations: i32,
}

/// Compute the entry cost for a station under the current upgrade set.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn effective_entry_cost(station: &Station, state: &GameState) -> EntryCost {
    let fuel = if state.has_upgrade(FUEL_CELL_ID) {
        (station.fuel_cost as f32 * FUEL_CELL_COST_FACTOR).ceil() as i32
    } else {
        station.fuel_cost
    };
    let rations = if state.has_upgrade(MRE_PACK_ID) {
        (station.ration_cost - MRE_PACK_RATION_DISCOUNT).max(0)
    } else {
        station.ration_cost
    };
    EntryCost { fuel, rations }
}

/// Whether the current resources cover a station's entry cost.
#[must_use]
pub fn entry_allowed(station: &Station, state: &GameState) -> bool {
    let cost = effective_entry_cost(station, state);
    state.resources.fuel >= cost.fuel && state.resources.rations >= cost.rations
}

/// Experience granted on completing a station under the current upgrades.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn completion_xp(station: &Station, state: &GameState) -> u32 {
    if state.has_upgrade(PIP_BOY_ID) {
        (station.base_xp as f32 * PIP_BOY_XP_MULTIPLIER).floor() as u32
    } else {
        station.base_xp
    }
}

/// Apply completion rewards: xp (ratcheting clearance) plus fixed
/// ration and fuel recovery, fuel capped at the ceiling.
pub fn apply_completion_rewards(state: &mut GameState, station: &Station) -> u32 {
    let gained = completion_xp(station, state);
    state.award_xp(gained);
    state.resources.rations += COMPLETION_RATION_RECOVERY;
    state.resources.fuel = (state.resources.fuel + COMPLETION_FUEL_RECOVERY).min(FUEL_MAX);
    state.resources.clamp();
    gained
}

/// Clearance tier for a cumulative xp total.
#[must_use]
pub fn clearance_for_xp(total_xp: u32) -> u32 {
    total_xp / XP_PER_CLEARANCE_LEVEL + 1
}
