//! Fixed-period tick driver: active-time accrual, checkpoint cadence,
//! export unlock, and the randomized puzzle interrupt roll.
//!
//! The shell fires `tick` once per second while the session is active.
//! Elapsed real time while the app is closed is never credited; there
//! is no missed-tick replay.

use rand::Rng;

use crate::constants::{
    CHECKPOINT_INTERVAL_SECS, EXPORT_UNLOCK_SECS, LOG_EXPORT_UNLOCKED, PUZZLE_TICK_CHANCE,
};
use crate::content::ContentCatalog;
use crate::puzzle;
use crate::state::{GameState, Stage};

/// What a single tick decided; the session store acts on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Periodic checkpoint is due this tick.
    pub checkpoint_due: bool,
    /// The export threshold was crossed on this tick.
    pub export_unlocked: bool,
    /// A puzzle interrupt was raised this tick.
    pub puzzle_presented: Option<String>,
}

/// Advance the session clock by one second and evaluate the tick rules.
///
/// Visibility is an explicit input: the interrupt roll only happens when
/// the dashboard is on screen and no puzzle is already outstanding.
pub fn tick(
    state: &mut GameState,
    catalog: &ContentCatalog,
    dashboard_visible: bool,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    state.total_active_time += 1;
    outcome.checkpoint_due = state.total_active_time % CHECKPOINT_INTERVAL_SECS == 0;

    if !state.export_unlocked && state.total_active_time >= EXPORT_UNLOCK_SECS {
        state.export_unlocked = true;
        state.stage = Stage::FinalSynthesis;
        state.push_log(LOG_EXPORT_UNLOCKED);
        outcome.export_unlocked = true;
    }

    if dashboard_visible && state.active_puzzle.is_none() && !catalog.puzzles.is_empty() {
        let picked = state.rng.as_mut().and_then(|rng| {
            if rng.random::<f32>() < PUZZLE_TICK_CHANCE {
                let idx = rng.random_range(0..catalog.puzzles.len());
                Some(catalog.puzzles[idx].id.clone())
            } else {
                None
            }
        });
        if let Some(puzzle_id) = picked {
            puzzle::present(state, &puzzle_id);
            outcome.puzzle_presented = Some(puzzle_id);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Puzzle, PuzzleReward};

    fn puzzle_catalog() -> ContentCatalog {
        ContentCatalog::from_parts(
            Vec::new(),
            vec![Puzzle {
                id: "pz-1".to_string(),
                prompt: "p".to_string(),
                solution: "s".to_string(),
                reward: PuzzleReward::default(),
            }],
            Vec::new(),
        )
    }

    #[test]
    fn each_tick_adds_exactly_one_second() {
        let mut state = GameState::default().with_seed("abc-123");
        let catalog = ContentCatalog::empty();
        for expected in 1..=25 {
            tick(&mut state, &catalog, false);
            assert_eq!(state.total_active_time, expected);
        }
    }

    #[test]
    fn checkpoint_due_every_ten_seconds() {
        let mut state = GameState::default().with_seed("abc-123");
        let catalog = ContentCatalog::empty();
        let mut due_at = Vec::new();
        for _ in 0..30 {
            let outcome = tick(&mut state, &catalog, false);
            if outcome.checkpoint_due {
                due_at.push(state.total_active_time);
            }
        }
        assert_eq!(due_at, vec![10, 20, 30]);
    }

    #[test]
    fn export_unlocks_once_at_threshold() {
        let mut state = GameState::default().with_seed("abc-123");
        state.total_active_time = EXPORT_UNLOCK_SECS - 1;
        let catalog = ContentCatalog::empty();
        let outcome = tick(&mut state, &catalog, false);
        assert!(outcome.export_unlocked);
        assert!(state.export_unlocked);
        assert_eq!(state.stage, Stage::FinalSynthesis);

        let again = tick(&mut state, &catalog, false);
        assert!(!again.export_unlocked, "flag flips exactly once");
        assert!(state.export_unlocked, "flag never clears");
    }

    #[test]
    fn no_interrupt_roll_while_dashboard_hidden() {
        let mut state = GameState::default().with_seed("abc-123");
        let catalog = puzzle_catalog();
        for _ in 0..20_000 {
            let outcome = tick(&mut state, &catalog, false);
            assert!(outcome.puzzle_presented.is_none());
        }
        assert!(state.active_puzzle.is_none());
    }

    #[test]
    fn no_second_interrupt_while_one_is_outstanding() {
        let mut state = GameState::default().with_seed("abc-123");
        let catalog = puzzle_catalog();
        state.active_puzzle = Some("pz-1".to_string());
        for _ in 0..20_000 {
            let outcome = tick(&mut state, &catalog, true);
            assert!(outcome.puzzle_presented.is_none());
        }
    }

    #[test]
    fn interrupt_eventually_fires_on_dashboard() {
        let mut state = GameState::default().with_seed("abc-123");
        let catalog = puzzle_catalog();
        let mut fired = false;
        // p = 0.0005 per tick; 100k ticks miss with probability ~2e-22.
        for _ in 0..100_000 {
            let outcome = tick(&mut state, &catalog, true);
            if let Some(id) = outcome.puzzle_presented {
                assert_eq!(id, "pz-1");
                fired = true;
                break;
            }
        }
        assert!(fired, "interrupt never fired across 100k ticks");
        assert_eq!(state.active_puzzle.as_deref(), Some("pz-1"));
    }

    #[test]
    fn time_never_decreases() {
        let mut state = GameState::default().with_seed("abc-123");
        let catalog = puzzle_catalog();
        let mut last = 0;
        for i in 0..500 {
            tick(&mut state, &catalog, i % 2 == 0);
            assert!(state.total_active_time > last);
            last = state.total_active_time;
        }
    }
}
