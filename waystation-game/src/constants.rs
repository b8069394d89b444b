//! Centralized balance and tuning constants for Waystation game logic.
//!
//! These values define the deterministic math for the core progression
//! engine. Keeping them together ensures that gameplay can only be
//! adjusted via code changes reviewed in version control, rather than
//! through external JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_SESSION_STARTED: &str = "log.session.started";
pub(crate) const LOG_SESSION_RESET: &str = "log.session.reset";
pub(crate) const LOG_SAVE_FAILED: &str = "log.save.failed";
pub(crate) const LOG_STATION_ENTERED: &str = "log.station.entered";
pub(crate) const LOG_STATION_REFUSED: &str = "log.station.refused";
pub(crate) const LOG_STATION_COMPLETED: &str = "log.station.completed";
pub(crate) const LOG_STATION_CANCELLED: &str = "log.station.cancelled";
pub(crate) const LOG_ANOMALY: &str = "log.station.anomaly";
pub(crate) const LOG_DISCOVERY: &str = "log.map.discovery";
pub(crate) const LOG_UPGRADE_PURCHASED: &str = "log.upgrade.purchased";
pub(crate) const LOG_UPGRADE_REFUSED: &str = "log.upgrade.refused";
pub(crate) const LOG_PUZZLE_PRESENTED: &str = "log.puzzle.presented";
pub(crate) const LOG_PUZZLE_SOLVED: &str = "log.puzzle.solved";
pub(crate) const LOG_PUZZLE_SKIPPED: &str = "log.puzzle.skipped";
pub(crate) const LOG_EXPORT_UNLOCKED: &str = "log.export.unlocked";
pub(crate) const LOG_INTEGRITY_COLLAPSE: &str = "log.integrity.collapse";

// Event trail --------------------------------------------------------------
pub(crate) const LOG_RETAINED: usize = 16;

// Session defaults ---------------------------------------------------------
pub(crate) const STARTING_INTEGRITY: i32 = 100;
pub(crate) const STARTING_FUEL: i32 = 100;
pub(crate) const STARTING_RATIONS: i32 = 20;
pub(crate) const INITIAL_DISCOVERY_COUNT: usize = 2;

// Resource bounds ----------------------------------------------------------
pub(crate) const INTEGRITY_MAX: i32 = 100;
pub(crate) const FUEL_MAX: i32 = 100;

// Economy tuning -----------------------------------------------------------
pub(crate) const FUEL_CELL_ID: &str = "fuel_cell";
pub(crate) const MRE_PACK_ID: &str = "mre_pack";
pub(crate) const PIP_BOY_ID: &str = "pip_boy";
pub(crate) const FUEL_CELL_COST_FACTOR: f32 = 0.5;
pub(crate) const MRE_PACK_RATION_DISCOUNT: i32 = 1;
pub(crate) const PIP_BOY_XP_MULTIPLIER: f32 = 1.15;
pub(crate) const COMPLETION_RATION_RECOVERY: i32 = 2;
pub(crate) const COMPLETION_FUEL_RECOVERY: i32 = 10;
pub(crate) const XP_PER_CLEARANCE_LEVEL: u32 = 1_000;

// Tick scheduler -----------------------------------------------------------
pub(crate) const CHECKPOINT_INTERVAL_SECS: u64 = 10;
pub(crate) const EXPORT_UNLOCK_SECS: u64 = 3_000;
pub(crate) const PUZZLE_TICK_CHANCE: f32 = 0.000_5;

// Station visit tuning -----------------------------------------------------
pub(crate) const WRONG_ANSWER_INTEGRITY_PENALTY: i32 = 5;
pub(crate) const SYNTHESIS_MIN_CHARS: usize = 15;

// Puzzle interrupt tuning --------------------------------------------------
pub(crate) const PUZZLE_SKIP_INTEGRITY_PENALTY: i32 = 10;
