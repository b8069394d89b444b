//! Waystation Game Engine
//!
//! Platform-agnostic session and progression logic for the Waystation
//! educational exploration game. This crate provides the authoritative
//! game-state machine without UI or platform-specific dependencies:
//! rendering, lesson content, audio, and report layout consume the
//! state and operations exposed here.

pub mod constants;
pub mod content;
pub mod economy;
pub mod map;
pub mod puzzle;
pub mod report;
pub mod seed;
pub mod session;
pub mod shop;
pub mod state;
pub mod ticker;
pub mod visit;

// Re-export commonly used types
pub use content::{ContentCatalog, Puzzle, PuzzleReward, Question, Station, Upgrade};
pub use economy::{EntryCost, clearance_for_xp, completion_xp, effective_entry_cost, entry_allowed};
pub use map::{is_discovered, reveal_neighbors};
pub use puzzle::{PuzzleError, PuzzleOutcome};
pub use report::{DossierSummary, ExportLocked, StationReport};
pub use seed::{generate_seed, rng_from_seed, shuffle};
pub use session::{
    MemoryStorage, SaveStorage, SessionError, SessionOrigin, SessionStore, initial_discovery,
};
pub use shop::PurchaseError;
pub use state::{GameState, LogEntry, Resources, Stage, StationProgress};
pub use ticker::{TickOutcome, tick};
pub use visit::{AnswerOutcome, CompletionSummary, VisitError, VisitPhase, VisitState};

/// Trait for the external audio/feedback collaborator.
///
/// Every method is fire-and-forget: implementations must return
/// quickly and must never block core logic, even when the underlying
/// sink is unavailable.
pub trait FeedbackSink {
    fn confirm(&self) {}
    fn error(&self) {}
    fn navigate(&self) {}
    fn scan(&self) {}
}

/// Feedback sink that drops every signal (headless shells and tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingFeedback {
        events: Rc<RefCell<Vec<&'static str>>>,
    }

    impl FeedbackSink for RecordingFeedback {
        fn confirm(&self) {
            self.events.borrow_mut().push("confirm");
        }
        fn error(&self) {
            self.events.borrow_mut().push("error");
        }
        fn navigate(&self) {
            self.events.borrow_mut().push("navigate");
        }
    }

    #[test]
    fn feedback_signals_follow_operations() {
        let catalog = ContentCatalog::from_parts(
            vec![Station {
                id: "s1".to_string(),
                title: "One".to_string(),
                core_idea: String::new(),
                neighbors: Vec::new(),
                fuel_cost: 5,
                ration_cost: 1,
                base_xp: 100,
                reward_tool: None,
                benefit_from_tool: None,
                questions: Vec::new(),
                synthesis_prompt: String::new(),
                map_x: 0.0,
                map_y: 0.0,
            }],
            Vec::new(),
            Vec::new(),
        );
        let feedback = RecordingFeedback::default();
        let mut store = SessionStore::create_with_seed(
            MemoryStorage::new(),
            feedback.clone(),
            &catalog,
            "abc-123",
        );
        store.begin_visit(&catalog, "s1").unwrap();
        store.finish_reading(&catalog).unwrap();
        store
            .submit_synthesis(&catalog, "A reflection that is long enough.")
            .unwrap();
        let _ = store.begin_visit(&catalog, "missing");
        assert_eq!(
            feedback.events.borrow().as_slice(),
            ["navigate", "confirm", "error"]
        );
    }
}
