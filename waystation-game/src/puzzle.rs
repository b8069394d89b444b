//! Puzzle interrupt protocol: Idle -> Presented -> resolved back to Idle.

use thiserror::Error;

use crate::constants::{
    FUEL_MAX, LOG_PUZZLE_PRESENTED, LOG_PUZZLE_SKIPPED, LOG_PUZZLE_SOLVED,
    PUZZLE_SKIP_INTEGRITY_PENALTY,
};
use crate::content::{ContentCatalog, PuzzleReward};
use crate::state::GameState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("no puzzle is presented")]
    NoPuzzleActive,
    #[error("puzzle {0} is not in the catalog")]
    UnknownPuzzle(String),
}

/// Result of submitting an answer to the presented puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleOutcome {
    /// Answer matched; reward applied, protocol back to Idle.
    Solved { reward: PuzzleReward },
    /// Wrong answer; the puzzle stays presented, no global penalty.
    Retry,
}

/// Raise a puzzle interrupt. Only the tick scheduler calls this, and
/// only while no other puzzle is outstanding.
pub(crate) fn present(state: &mut GameState, puzzle_id: &str) {
    debug_assert!(state.active_puzzle.is_none());
    state.active_puzzle = Some(puzzle_id.to_string());
    state.push_log_detail(LOG_PUZZLE_PRESENTED, Some(puzzle_id.to_string()));
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Submit an answer to the presented puzzle. Comparison is trimmed and
/// case-insensitive. Reward deltas are clamped to each resource's
/// valid range.
///
/// # Errors
///
/// `NoPuzzleActive` when nothing is presented; `UnknownPuzzle` if the
/// catalog no longer carries the active puzzle.
pub fn submit(
    state: &mut GameState,
    catalog: &ContentCatalog,
    answer: &str,
) -> Result<PuzzleOutcome, PuzzleError> {
    let puzzle_id = state
        .active_puzzle
        .clone()
        .ok_or(PuzzleError::NoPuzzleActive)?;
    let puzzle = catalog
        .puzzle(&puzzle_id)
        .ok_or_else(|| PuzzleError::UnknownPuzzle(puzzle_id.clone()))?;

    if normalize(answer) != normalize(&puzzle.solution) {
        return Ok(PuzzleOutcome::Retry);
    }

    let reward = puzzle.reward;
    state.award_xp(reward.xp);
    state.resources.fuel = (state.resources.fuel + reward.fuel).min(FUEL_MAX);
    state.resources.rations += reward.rations;
    state.resources.integrity += reward.integrity;
    state.resources.clamp();
    state.active_puzzle = None;
    state.push_log_detail(LOG_PUZZLE_SOLVED, Some(puzzle_id));
    Ok(PuzzleOutcome::Solved { reward })
}

/// Explicitly skip the presented puzzle: fixed integrity penalty
/// (floored at zero), protocol back to Idle.
///
/// # Errors
///
/// `NoPuzzleActive` when nothing is presented.
pub fn skip(state: &mut GameState) -> Result<(), PuzzleError> {
    let puzzle_id = state
        .active_puzzle
        .take()
        .ok_or(PuzzleError::NoPuzzleActive)?;
    state.apply_integrity_penalty(PUZZLE_SKIP_INTEGRITY_PENALTY);
    state.push_log_detail(LOG_PUZZLE_SKIPPED, Some(puzzle_id));
    Ok(())
}
