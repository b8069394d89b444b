//! Station visit sub-flow: Reading -> Verification -> Synthesis -> Complete.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    LOG_ANOMALY, LOG_STATION_CANCELLED, LOG_STATION_COMPLETED, LOG_STATION_ENTERED,
    LOG_STATION_REFUSED, SYNTHESIS_MIN_CHARS, WRONG_ANSWER_INTEGRITY_PENALTY,
};
use crate::content::ContentCatalog;
use crate::state::{GameState, StationProgress};
use crate::{economy, map};

/// Phase of an in-progress visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitPhase {
    Reading,
    Verification,
    Synthesis,
}

/// In-progress visit, persisted with the snapshot so a reload resumes
/// where the player left off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitState {
    pub station_id: String,
    pub phase: VisitPhase,
    #[serde(default)]
    pub question_index: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisitError {
    #[error("station {0} is not in the catalog")]
    UnknownStation(String),
    #[error("a visit is already in progress")]
    VisitInProgress,
    #[error("station already completed")]
    AlreadyCompleted,
    #[error("insufficient resources: need {fuel} fuel and {rations} rations")]
    InsufficientResources { fuel: i32, rations: i32 },
    #[error("no visit in progress")]
    NoVisit,
    #[error("operation not valid in the current phase")]
    WrongPhase,
    #[error("reflection too short: minimum {min} characters")]
    ReflectionTooShort { min: usize },
}

/// Result of answering a verification question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct; the index of the next question to present.
    Correct { next_question: usize },
    /// Correct on the last question; the visit moved to Synthesis.
    AdvancedToSynthesis,
    /// Incorrect; the same question stays up. Integrity took the hit.
    Incorrect,
}

/// What a completed visit granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    pub station_id: String,
    pub xp_gained: u32,
    pub tool: Option<String>,
    pub revealed: Vec<String>,
}

/// Start a visit: checks the entry gate, deducts costs, and opens the
/// Reading phase. Refusal deducts nothing; the refusal is recorded on
/// the event trail.
///
/// # Errors
///
/// Returns a `VisitError` naming the refusal reason; resources and
/// progress are unchanged on any error.
pub fn begin_visit(
    state: &mut GameState,
    catalog: &ContentCatalog,
    station_id: &str,
) -> Result<(), VisitError> {
    if state.current_visit.is_some() {
        return Err(VisitError::VisitInProgress);
    }
    let station = catalog
        .station(station_id)
        .ok_or_else(|| VisitError::UnknownStation(station_id.to_string()))?;
    if state.is_station_completed(station_id) {
        return Err(VisitError::AlreadyCompleted);
    }
    let cost = economy::effective_entry_cost(station, state);
    if !economy::entry_allowed(station, state) {
        state.push_log_detail(LOG_STATION_REFUSED, Some(station_id.to_string()));
        return Err(VisitError::InsufficientResources {
            fuel: cost.fuel,
            rations: cost.rations,
        });
    }

    state.resources.fuel -= cost.fuel;
    state.resources.rations -= cost.rations;
    state.resources.clamp();

    let started_at = state.total_active_time;
    state
        .station_progress
        .entry(station_id.to_string())
        .or_insert_with(|| StationProgress {
            started_at,
            ..StationProgress::default()
        });
    state.current_visit = Some(VisitState {
        station_id: station_id.to_string(),
        phase: VisitPhase::Reading,
        question_index: 0,
    });
    state.push_log_detail(LOG_STATION_ENTERED, Some(station_id.to_string()));
    Ok(())
}

/// Player finished the reading: move to Verification, or straight to
/// Synthesis when the station carries no questions.
///
/// # Errors
///
/// `NoVisit` without an open visit, `WrongPhase` outside Reading.
pub fn finish_reading(state: &mut GameState, catalog: &ContentCatalog) -> Result<(), VisitError> {
    let visit = state.current_visit.as_mut().ok_or(VisitError::NoVisit)?;
    if visit.phase != VisitPhase::Reading {
        return Err(VisitError::WrongPhase);
    }
    let has_questions = catalog
        .station(&visit.station_id)
        .is_some_and(|s| !s.questions.is_empty());
    visit.phase = if has_questions {
        VisitPhase::Verification
    } else {
        VisitPhase::Synthesis
    };
    visit.question_index = 0;
    Ok(())
}

/// Answer the current verification question.
///
/// A wrong answer keeps the question up, costs integrity, bumps the
/// failure counter, and logs an anomaly event. Retries are unlimited.
///
/// # Errors
///
/// `NoVisit` / `WrongPhase` when there is no verification underway;
/// `UnknownStation` if the catalog no longer carries the station.
pub fn answer_question(
    state: &mut GameState,
    catalog: &ContentCatalog,
    choice: usize,
) -> Result<AnswerOutcome, VisitError> {
    let visit = state.current_visit.as_ref().ok_or(VisitError::NoVisit)?;
    if visit.phase != VisitPhase::Verification {
        return Err(VisitError::WrongPhase);
    }
    let station_id = visit.station_id.clone();
    let question_index = visit.question_index;
    let station = catalog
        .station(&station_id)
        .ok_or_else(|| VisitError::UnknownStation(station_id.clone()))?;
    let Some(question) = station.questions.get(question_index) else {
        return Err(VisitError::WrongPhase);
    };

    if choice == question.answer {
        let last = question_index + 1 >= station.questions.len();
        let visit = state.current_visit.as_mut().ok_or(VisitError::NoVisit)?;
        if last {
            visit.phase = VisitPhase::Synthesis;
            Ok(AnswerOutcome::AdvancedToSynthesis)
        } else {
            visit.question_index += 1;
            Ok(AnswerOutcome::Correct {
                next_question: question_index + 1,
            })
        }
    } else {
        if let Some(progress) = state.station_progress.get_mut(&station_id) {
            progress.failed_attempts += 1;
        }
        state.apply_integrity_penalty(WRONG_ANSWER_INTEGRITY_PENALTY);
        state.push_log_detail(LOG_ANOMALY, Some(station_id));
        Ok(AnswerOutcome::Incorrect)
    }
}

/// Stash the in-progress reflection so a reload keeps it.
///
/// # Errors
///
/// `NoVisit` without an open visit, `WrongPhase` outside Synthesis.
pub fn save_draft(state: &mut GameState, text: &str) -> Result<(), VisitError> {
    let visit = state.current_visit.as_ref().ok_or(VisitError::NoVisit)?;
    if visit.phase != VisitPhase::Synthesis {
        return Err(VisitError::WrongPhase);
    }
    let station_id = visit.station_id.clone();
    if let Some(progress) = state.station_progress.get_mut(&station_id) {
        progress.draft = Some(text.to_string());
    }
    Ok(())
}

/// Submit the reflection and complete the visit: commits rewards,
/// reveals neighbors, and stamps `completed_at` exactly once.
///
/// # Errors
///
/// `ReflectionTooShort` below the minimum length; `NoVisit` /
/// `WrongPhase` when no synthesis is underway.
pub fn submit_synthesis(
    state: &mut GameState,
    catalog: &ContentCatalog,
    text: &str,
) -> Result<CompletionSummary, VisitError> {
    let visit = state.current_visit.as_ref().ok_or(VisitError::NoVisit)?;
    if visit.phase != VisitPhase::Synthesis {
        return Err(VisitError::WrongPhase);
    }
    if text.trim().chars().count() < SYNTHESIS_MIN_CHARS {
        return Err(VisitError::ReflectionTooShort {
            min: SYNTHESIS_MIN_CHARS,
        });
    }
    let station_id = visit.station_id.clone();
    let station = catalog
        .station(&station_id)
        .ok_or_else(|| VisitError::UnknownStation(station_id.clone()))?;

    let xp_gained = economy::apply_completion_rewards(state, station);
    let revealed = map::reveal_neighbors(state, station);

    let tool = station.reward_tool.clone();
    if let Some(tool_name) = &tool {
        state.earned_tools.insert(tool_name.clone());
    }

    let completed_at = state.total_active_time;
    if let Some(progress) = state.station_progress.get_mut(&station_id) {
        progress.draft = Some(text.to_string());
        if progress.completed_at.is_none() {
            progress.completed_at = Some(completed_at);
        }
    }

    state.current_visit = None;
    state.push_log_detail(LOG_STATION_COMPLETED, Some(station_id.clone()));

    Ok(CompletionSummary {
        station_id,
        xp_gained,
        tool,
        revealed,
    })
}

/// Abandon the visit before completion. Entry costs are not refunded;
/// in-progress answers and the draft are discarded, while the failure
/// counters stay in `station_progress`.
///
/// # Errors
///
/// `NoVisit` when nothing is in progress.
pub fn cancel_visit(state: &mut GameState) -> Result<(), VisitError> {
    let visit = state.current_visit.take().ok_or(VisitError::NoVisit)?;
    if let Some(progress) = state.station_progress.get_mut(&visit.station_id) {
        progress.draft = None;
    }
    state.push_log_detail(LOG_STATION_CANCELLED, Some(visit.station_id));
    Ok(())
}
