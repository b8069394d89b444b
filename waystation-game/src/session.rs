//! Session store: owns the authoritative snapshot and serializes every
//! transition against it. Persistence is a side effect of transitions;
//! failures are logged, never raised to the player.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;

use crate::constants::{
    CHECKPOINT_INTERVAL_SECS, INITIAL_DISCOVERY_COUNT, LOG_SAVE_FAILED, LOG_SESSION_STARTED,
    LOG_UPGRADE_REFUSED,
};
use crate::content::ContentCatalog;
use crate::puzzle::{self, PuzzleError, PuzzleOutcome};
use crate::report::{self, DossierSummary, ExportLocked};
use crate::seed;
use crate::shop::{self, PurchaseError};
use crate::state::GameState;
use crate::ticker::{self, TickOutcome};
use crate::visit::{self, AnswerOutcome, CompletionSummary, VisitError};
use crate::FeedbackSink;

/// Trait for abstracting the persisted snapshot slot.
/// Platform-specific implementations should provide this; the storage
/// key is fixed by the shell (one slot per browsing context).
pub trait SaveStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write the serialized snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, raw: &str) -> Result<(), Self::Error>;

    /// Read the serialized snapshot, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    fn load(&self) -> Result<Option<String>, Self::Error>;

    /// Remove the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    fn delete(&self) -> Result<(), Self::Error>;
}

/// In-memory storage, shared by clone (useful for tests and the
/// headless shell).
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load the slot with raw content (corrupt-save tests).
    #[must_use]
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(raw.to_string()))),
        }
    }

    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SaveStorage for MemoryStorage {
    type Error = std::convert::Infallible;

    fn save(&self, raw: &str) -> Result<(), Self::Error> {
        *self.slot.borrow_mut() = Some(raw.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, Self::Error> {
        Ok(self.slot.borrow().clone())
    }

    fn delete(&self) -> Result<(), Self::Error> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// Session loading failures. None of these are fatal: the caller falls
/// back to `create_session`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no saved session")]
    NotFound,
    #[error("saved session failed to parse: {0}")]
    CorruptSave(String),
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

/// How the current session came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Resumed,
    Fresh,
    /// The persisted snapshot was malformed and has been discarded.
    RecoveredFromCorrupt,
}

/// The two initial nodes revealed at session creation: the first two
/// positions of the seeded shuffle over all station identifiers.
#[must_use]
pub fn initial_discovery(seed_code: &str, catalog: &ContentCatalog) -> HashSet<String> {
    let mut rng = seed::rng_from_seed(seed_code);
    let shuffled = seed::shuffle(&catalog.station_ids(), &mut rng);
    shuffled
        .into_iter()
        .take(INITIAL_DISCOVERY_COUNT)
        .collect()
}

/// Owns the single `GameState` and the persistence side effects.
pub struct SessionStore<S: SaveStorage, F: FeedbackSink> {
    storage: S,
    feedback: F,
    state: GameState,
    last_persisted_at: u64,
}

impl<S: SaveStorage, F: FeedbackSink> SessionStore<S, F> {
    /// Create a fresh session with a generated seed code and persist it.
    pub fn create_session(storage: S, feedback: F, catalog: &ContentCatalog, entropy: u64) -> Self {
        let seed_code = seed::generate_seed(entropy);
        Self::create_with_seed(storage, feedback, catalog, &seed_code)
    }

    /// Create a fresh session from an explicit seed string
    /// (reproducible runs and tests).
    pub fn create_with_seed(
        storage: S,
        feedback: F,
        catalog: &ContentCatalog,
        seed_code: &str,
    ) -> Self {
        let mut state = GameState::default().with_seed(seed_code);
        state.discovered_nodes = initial_discovery(seed_code, catalog);
        state.push_log(LOG_SESSION_STARTED);
        let mut store = Self {
            storage,
            feedback,
            state,
            last_persisted_at: 0,
        };
        store.persist();
        store
    }

    /// Resume from the persisted snapshot, falling back to a fresh
    /// session when it is absent or malformed. A malformed snapshot is
    /// treated as absent, never as a fatal error.
    pub fn load_or_create(
        storage: S,
        feedback: F,
        catalog: &ContentCatalog,
        entropy: u64,
    ) -> (Self, SessionOrigin) {
        match Self::try_load(&storage) {
            Ok(state) => {
                let last_persisted_at = state.total_active_time;
                (
                    Self {
                        storage,
                        feedback,
                        state,
                        last_persisted_at,
                    },
                    SessionOrigin::Resumed,
                )
            }
            Err(SessionError::NotFound) => (
                Self::create_session(storage, feedback, catalog, entropy),
                SessionOrigin::Fresh,
            ),
            Err(err) => {
                log::warn!("discarding unusable save: {err}");
                (
                    Self::create_session(storage, feedback, catalog, entropy),
                    SessionOrigin::RecoveredFromCorrupt,
                )
            }
        }
    }

    /// Deserialize the persisted snapshot without constructing a store.
    ///
    /// # Errors
    ///
    /// `NotFound` when the slot is empty, `CorruptSave` when it fails to
    /// parse, `Storage` when the backend itself fails.
    pub fn try_load(storage: &S) -> Result<GameState, SessionError> {
        let raw = storage
            .load()
            .map_err(|e| SessionError::Storage(anyhow::Error::new(e)))?
            .ok_or(SessionError::NotFound)?;
        let state: GameState = serde_json::from_str(&raw)
            .map_err(|e| SessionError::CorruptSave(e.to_string()))?;
        Ok(state.rehydrate())
    }

    /// Borrow the authoritative snapshot (read-only rendering boundary).
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the store, returning the snapshot.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Replace the snapshot wholesale and persist on cadence.
    /// `force` persists immediately (user-initiated completions and
    /// purchases); otherwise a write happens only once per checkpoint
    /// interval of elapsed play time.
    pub fn commit(&mut self, next: GameState, force: bool) {
        self.state = next;
        let elapsed = self
            .state
            .total_active_time
            .saturating_sub(self.last_persisted_at);
        if force || elapsed >= CHECKPOINT_INTERVAL_SECS {
            self.persist();
        }
    }

    /// Advance the session clock by one second.
    pub fn tick(&mut self, catalog: &ContentCatalog, dashboard_visible: bool) -> TickOutcome {
        let outcome = ticker::tick(&mut self.state, catalog, dashboard_visible);
        if outcome.puzzle_presented.is_some() {
            self.feedback.scan();
        }
        if outcome.checkpoint_due {
            self.persist();
        }
        outcome
    }

    /// Start a station visit.
    ///
    /// # Errors
    ///
    /// Propagates `VisitError`; the snapshot is unchanged apart from the
    /// refusal event on the trail.
    pub fn begin_visit(
        &mut self,
        catalog: &ContentCatalog,
        station_id: &str,
    ) -> Result<(), VisitError> {
        match visit::begin_visit(&mut self.state, catalog, station_id) {
            Ok(()) => {
                self.feedback.navigate();
                Ok(())
            }
            Err(err) => {
                self.feedback.error();
                Err(err)
            }
        }
    }

    /// Leave the Reading phase.
    ///
    /// # Errors
    ///
    /// Propagates `VisitError`.
    pub fn finish_reading(&mut self, catalog: &ContentCatalog) -> Result<(), VisitError> {
        visit::finish_reading(&mut self.state, catalog)
    }

    /// Answer the current verification question.
    ///
    /// # Errors
    ///
    /// Propagates `VisitError`.
    pub fn answer_question(
        &mut self,
        catalog: &ContentCatalog,
        choice: usize,
    ) -> Result<AnswerOutcome, VisitError> {
        let outcome = visit::answer_question(&mut self.state, catalog, choice)?;
        match outcome {
            AnswerOutcome::Incorrect => self.feedback.error(),
            _ => self.feedback.confirm(),
        }
        Ok(outcome)
    }

    /// Stash the in-progress reflection.
    ///
    /// # Errors
    ///
    /// Propagates `VisitError`.
    pub fn save_draft(&mut self, text: &str) -> Result<(), VisitError> {
        visit::save_draft(&mut self.state, text)
    }

    /// Submit the reflection; completion persists immediately.
    ///
    /// # Errors
    ///
    /// Propagates `VisitError`.
    pub fn submit_synthesis(
        &mut self,
        catalog: &ContentCatalog,
        text: &str,
    ) -> Result<CompletionSummary, VisitError> {
        match visit::submit_synthesis(&mut self.state, catalog, text) {
            Ok(summary) => {
                self.feedback.confirm();
                self.persist();
                Ok(summary)
            }
            Err(err) => {
                self.feedback.error();
                Err(err)
            }
        }
    }

    /// Abandon the current visit. Entry costs stay spent.
    ///
    /// # Errors
    ///
    /// Propagates `VisitError`.
    pub fn cancel_visit(&mut self) -> Result<(), VisitError> {
        visit::cancel_visit(&mut self.state)?;
        self.feedback.navigate();
        Ok(())
    }

    /// Buy an upgrade; a successful purchase persists immediately.
    ///
    /// # Errors
    ///
    /// Propagates `PurchaseError`; a refusal is recorded on the trail
    /// and leaves the rest of the snapshot untouched.
    pub fn purchase_upgrade(
        &mut self,
        catalog: &ContentCatalog,
        upgrade_id: &str,
    ) -> Result<(), PurchaseError> {
        match shop::purchase(&mut self.state, catalog, upgrade_id) {
            Ok(()) => {
                self.feedback.confirm();
                self.persist();
                Ok(())
            }
            Err(err) => {
                self.state
                    .push_log_detail(LOG_UPGRADE_REFUSED, Some(upgrade_id.to_string()));
                self.feedback.error();
                Err(err)
            }
        }
    }

    /// Submit an answer to the presented puzzle. Resolution persists.
    ///
    /// # Errors
    ///
    /// Propagates `PuzzleError`.
    pub fn submit_puzzle(
        &mut self,
        catalog: &ContentCatalog,
        answer: &str,
    ) -> Result<PuzzleOutcome, PuzzleError> {
        let outcome = puzzle::submit(&mut self.state, catalog, answer)?;
        match outcome {
            PuzzleOutcome::Solved { .. } => {
                self.feedback.confirm();
                self.persist();
            }
            PuzzleOutcome::Retry => self.feedback.error(),
        }
        Ok(outcome)
    }

    /// Skip the presented puzzle, taking the integrity penalty.
    ///
    /// # Errors
    ///
    /// Propagates `PuzzleError`.
    pub fn skip_puzzle(&mut self) -> Result<(), PuzzleError> {
        puzzle::skip(&mut self.state)?;
        self.feedback.navigate();
        self.persist();
        Ok(())
    }

    /// Destructive post-collapse reset; the shell confirms with the
    /// player first. Persists immediately.
    pub fn reset_after_collapse(&mut self, catalog: &ContentCatalog) {
        let initial = initial_discovery(&self.state.seed, catalog);
        self.state.reset_after_collapse(initial);
        self.feedback.navigate();
        self.persist();
    }

    /// Assemble the dossier for the export screen.
    ///
    /// # Errors
    ///
    /// `ExportLocked` until the time gate has opened.
    pub fn dossier(&self, catalog: &ContentCatalog) -> Result<DossierSummary, ExportLocked> {
        report::dossier(&self.state, catalog)
    }

    /// Write the snapshot. Failures are non-fatal: the in-memory state
    /// stays authoritative and the error lands on the event trail.
    fn persist(&mut self) {
        match serde_json::to_string(&self.state) {
            Ok(raw) => {
                if let Err(err) = self.storage.save(&raw) {
                    log::warn!("snapshot write failed: {err}");
                    self.state
                        .push_log_detail(LOG_SAVE_FAILED, Some(err.to_string()));
                } else {
                    self.last_persisted_at = self.state.total_active_time;
                }
            }
            Err(err) => {
                log::warn!("snapshot serialization failed: {err}");
                self.state
                    .push_log_detail(LOG_SAVE_FAILED, Some(err.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Station;
    use crate::NullFeedback;

    fn station(id: &str, neighbors: &[&str]) -> Station {
        Station {
            id: id.to_string(),
            title: id.to_string(),
            core_idea: String::new(),
            neighbors: neighbors.iter().map(|s| (*s).to_string()).collect(),
            fuel_cost: 5,
            ration_cost: 1,
            base_xp: 100,
            reward_tool: None,
            benefit_from_tool: None,
            questions: Vec::new(),
            synthesis_prompt: String::new(),
            map_x: 0.0,
            map_y: 0.0,
        }
    }

    fn catalog() -> ContentCatalog {
        ContentCatalog::from_parts(
            vec![
                station("s1", &["s2"]),
                station("s2", &["s3"]),
                station("s3", &["s1"]),
                station("s4", &[]),
            ],
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn fresh_session_matches_documented_defaults() {
        let catalog = catalog();
        let store =
            SessionStore::create_with_seed(MemoryStorage::new(), NullFeedback, &catalog, "abc-123");
        let state = store.state();
        assert_eq!(state.discovered_nodes.len(), 2);
        assert_eq!(state.xp, 0);
        assert_eq!(state.clearance_level, 1);
        assert_eq!(state.resources.integrity, 100);
        assert_eq!(state.resources.fuel, 100);
        assert_eq!(state.resources.rations, 20);
        assert_eq!(state.log.len(), 1);
        assert_eq!(state.log[0].kind, LOG_SESSION_STARTED);
    }

    #[test]
    fn initial_discovery_is_the_shuffles_first_two() {
        let catalog = catalog();
        let mut rng = seed::rng_from_seed("abc-123");
        let shuffled = seed::shuffle(&catalog.station_ids(), &mut rng);
        let expected: HashSet<String> = shuffled.into_iter().take(2).collect();
        assert_eq!(initial_discovery("abc-123", &catalog), expected);
    }

    #[test]
    fn creation_persists_immediately() {
        let catalog = catalog();
        let storage = MemoryStorage::new();
        let store = SessionStore::create_with_seed(
            storage.clone(),
            NullFeedback,
            &catalog,
            "abc-123",
        );
        let raw = storage.raw().expect("snapshot written at creation");
        let restored: GameState = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored.seed, store.state().seed);
    }

    #[test]
    fn load_or_create_resumes_a_saved_session() {
        let catalog = catalog();
        let storage = MemoryStorage::new();
        {
            let mut store = SessionStore::create_with_seed(
                storage.clone(),
                NullFeedback,
                &catalog,
                "abc-123",
            );
            let target = first_discovered(store.state()).to_string();
            store.begin_visit(&catalog, &target).unwrap();
            store.finish_reading(&catalog).unwrap();
            store
                .submit_synthesis(&catalog, "A sufficiently long reflection.")
                .unwrap();
        }
        let (resumed, origin) =
            SessionStore::load_or_create(storage, NullFeedback, &catalog, 7);
        assert_eq!(origin, SessionOrigin::Resumed);
        assert_eq!(resumed.state().seed, "abc-123");
        assert_eq!(resumed.state().station_progress.len(), 1);
        assert!(resumed.state().rng.is_some(), "rng rehydrated on load");
    }

    fn first_discovered(state: &GameState) -> &str {
        let mut ids: Vec<&String> = state.discovered_nodes.iter().collect();
        ids.sort();
        ids[0]
    }

    #[test]
    fn corrupt_save_falls_back_to_fresh_session() {
        let catalog = catalog();
        let storage = MemoryStorage::with_raw("{ not json ]");
        let (store, origin) =
            SessionStore::load_or_create(storage, NullFeedback, &catalog, 99);
        assert_eq!(origin, SessionOrigin::RecoveredFromCorrupt);
        assert_eq!(store.state().xp, 0);
        assert_eq!(store.state().discovered_nodes.len(), 2);
    }

    #[test]
    fn missing_save_reports_not_found() {
        let storage = MemoryStorage::new();
        let err = SessionStore::<MemoryStorage, NullFeedback>::try_load(&storage).unwrap_err();
        assert!(matches!(err, SessionError::NotFound));
    }

    #[test]
    fn tick_checkpoints_every_ten_seconds() {
        let catalog = catalog();
        let storage = MemoryStorage::new();
        let mut store = SessionStore::create_with_seed(
            storage.clone(),
            NullFeedback,
            &catalog,
            "abc-123",
        );
        for _ in 0..9 {
            store.tick(&catalog, false);
        }
        let before: GameState = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert_eq!(before.total_active_time, 0, "no checkpoint before 10s");
        store.tick(&catalog, false);
        let after: GameState = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert_eq!(after.total_active_time, 10);
    }

    #[test]
    fn commit_without_force_respects_cadence() {
        let catalog = catalog();
        let storage = MemoryStorage::new();
        let mut store = SessionStore::create_with_seed(
            storage.clone(),
            NullFeedback,
            &catalog,
            "abc-123",
        );
        let mut next = store.state().clone();
        next.total_active_time = 3;
        next.xp = 1;
        store.commit(next, false);
        let persisted: GameState = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert_eq!(persisted.xp, 0, "cadence not reached, no write");

        let mut forced = store.state().clone();
        forced.xp = 2;
        store.commit(forced, true);
        let persisted: GameState = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert_eq!(persisted.xp, 2);
    }

    #[test]
    fn reset_after_collapse_restores_defaults_and_persists() {
        let catalog = catalog();
        let storage = MemoryStorage::new();
        let mut store = SessionStore::create_with_seed(
            storage.clone(),
            NullFeedback,
            &catalog,
            "abc-123",
        );
        let initial = store.state().discovered_nodes.clone();
        let visited = first_discovered(store.state()).to_string();
        store.begin_visit(&catalog, &visited).unwrap();
        store.finish_reading(&catalog).unwrap();
        store
            .submit_synthesis(&catalog, "A sufficiently long reflection.")
            .unwrap();
        assert!(store.state().discovered_nodes.len() >= 2);

        store.reset_after_collapse(&catalog);
        assert_eq!(store.state().discovered_nodes, initial);
        assert_eq!(store.state().resources.integrity, 100);
        assert!(store.state().station_progress.is_empty());
        let persisted: GameState = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert!(persisted.station_progress.is_empty());
    }
}
