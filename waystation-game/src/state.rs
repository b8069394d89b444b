use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::constants::{
    FUEL_MAX, INTEGRITY_MAX, LOG_INTEGRITY_COLLAPSE, LOG_RETAINED, STARTING_FUEL,
    STARTING_INTEGRITY, STARTING_RATIONS, XP_PER_CLEARANCE_LEVEL,
};
use crate::seed;
use crate::visit::VisitState;

/// Coarse progress phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Orientation,
    #[default]
    FieldResearch,
    FinalSynthesis,
}

/// Spendable stability and travel resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub integrity: i32, // 0..100
    pub fuel: i32,      // 0..100
    pub rations: i32,   // >= 0
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            integrity: STARTING_INTEGRITY,
            fuel: STARTING_FUEL,
            rations: STARTING_RATIONS,
        }
    }
}

impl Resources {
    pub fn clamp(&mut self) {
        self.integrity = self.integrity.clamp(0, INTEGRITY_MAX);
        self.fuel = self.fuel.clamp(0, FUEL_MAX);
        self.rations = self.rations.max(0);
    }
}

/// Per-station visit bookkeeping. Entries are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StationProgress {
    pub started_at: u64,
    #[serde(default)]
    pub completed_at: Option<u64>,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default)]
    pub draft: Option<String>,
}

/// One entry in the bounded event trail. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: u64,
    pub kind: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Single authoritative game-state snapshot.
///
/// All transitions are read-modify-replace against one owned value;
/// the session store is the only writer of the persisted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub seed: String,
    pub stage: Stage,
    #[serde(default)]
    pub total_active_time: u64,
    pub discovered_nodes: HashSet<String>,
    #[serde(default)]
    pub current_visit: Option<VisitState>,
    #[serde(default)]
    pub station_progress: HashMap<String, StationProgress>,
    #[serde(default)]
    pub earned_tools: HashSet<String>,
    #[serde(default)]
    pub xp: u32,
    /// Cumulative xp ever gained; never reduced by spending.
    #[serde(default)]
    pub xp_earned_total: u32,
    #[serde(default = "default_clearance")]
    pub clearance_level: u32,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub unlocked_upgrades: HashSet<String>,
    /// One-way flag flipped when the dossier export threshold is crossed.
    #[serde(default)]
    pub export_unlocked: bool,
    /// One-way flag set the first time integrity reaches zero.
    #[serde(default)]
    pub integrity_collapsed: bool,
    #[serde(default)]
    pub active_puzzle: Option<String>,
    pub log: VecDeque<LogEntry>,
    #[serde(skip)]
    pub rng: Option<ChaCha20Rng>,
}

fn default_clearance() -> u32 {
    1
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            seed: String::new(),
            stage: Stage::default(),
            total_active_time: 0,
            discovered_nodes: HashSet::new(),
            current_visit: None,
            station_progress: HashMap::new(),
            earned_tools: HashSet::new(),
            xp: 0,
            xp_earned_total: 0,
            clearance_level: 1,
            resources: Resources::default(),
            unlocked_upgrades: HashSet::new(),
            export_unlocked: false,
            integrity_collapsed: false,
            active_puzzle: None,
            log: VecDeque::with_capacity(LOG_RETAINED),
            rng: None,
        }
    }
}

impl GameState {
    /// Attach the session seed and its derived RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: &str) -> Self {
        self.seed = seed.to_string();
        self.rng = Some(seed::rng_from_seed(seed));
        self
    }

    /// Rebuild skip-serialized fields after deserialization.
    #[must_use]
    pub fn rehydrate(mut self) -> Self {
        self.rng = Some(seed::rng_from_seed(&self.seed));
        self
    }

    /// Station currently being visited, if any.
    #[must_use]
    pub fn current_station(&self) -> Option<&str> {
        self.current_visit.as_ref().map(|v| v.station_id.as_str())
    }

    #[must_use]
    pub fn has_upgrade(&self, id: &str) -> bool {
        self.unlocked_upgrades.contains(id)
    }

    #[must_use]
    pub fn is_station_completed(&self, id: &str) -> bool {
        self.station_progress
            .get(id)
            .is_some_and(|p| p.completed_at.is_some())
    }

    /// Append an event to the trail, evicting the oldest entry once the
    /// retention bound is hit.
    pub fn push_log(&mut self, kind: &str) {
        self.push_log_detail(kind, None);
    }

    pub fn push_log_detail(&mut self, kind: &str, detail: Option<String>) {
        while self.log.len() >= LOG_RETAINED {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            at: self.total_active_time,
            kind: kind.to_string(),
            detail,
        });
    }

    /// Award xp and ratchet the clearance level.
    ///
    /// Clearance derives from cumulative gained xp; later spending never
    /// demotes it.
    pub fn award_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(amount);
        self.xp_earned_total = self.xp_earned_total.saturating_add(amount);
        let derived = crate::economy::clearance_for_xp(self.xp_earned_total);
        self.clearance_level = self.clearance_level.max(derived);
    }

    /// Deduct xp for a purchase. Returns false (and changes nothing)
    /// when the balance is short.
    pub fn spend_xp(&mut self, amount: u32) -> bool {
        match self.xp.checked_sub(amount) {
            Some(rest) => {
                self.xp = rest;
                true
            }
            None => false,
        }
    }

    /// Deduct integrity, clamping at the zero floor, and record the
    /// first collapse.
    pub fn apply_integrity_penalty(&mut self, amount: i32) {
        self.resources.integrity -= amount;
        self.resources.clamp();
        if self.resources.integrity == 0 && !self.integrity_collapsed {
            self.integrity_collapsed = true;
            self.push_log(LOG_INTEGRITY_COLLAPSE);
        }
    }

    /// Whether the current run has hit the terminal integrity state.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.integrity_collapsed
    }

    /// Restore default resources and discard exploration progress after
    /// an integrity collapse. Destructive: the shell must confirm with
    /// the player before calling this. The seed and event trail survive.
    pub fn reset_after_collapse(&mut self, initial_discovery: HashSet<String>) {
        self.resources = Resources::default();
        self.discovered_nodes = initial_discovery;
        self.station_progress.clear();
        self.earned_tools.clear();
        self.unlocked_upgrades.clear();
        self.current_visit = None;
        self.active_puzzle = None;
        self.xp = 0;
        self.xp_earned_total = 0;
        self.clearance_level = 1;
        self.stage = Stage::FieldResearch;
        self.integrity_collapsed = false;
        self.push_log(crate::constants::LOG_SESSION_RESET);
    }

    /// Derived clearance for a cumulative xp total (display helper).
    #[must_use]
    pub fn clearance_floor(&self) -> u32 {
        self.xp_earned_total / XP_PER_CLEARANCE_LEVEL + 1
    }
}
