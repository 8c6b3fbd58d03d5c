//! Pipeline state tracking.
//!
//! The orchestrator moves through a small set of phases with an explicit
//! legal-transition table; the state snapshot carries step progress and the
//! failure cause when a run halts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discrete phases of a pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelinePhase {
    /// Workspace binding and component creation/retrieval.
    Setup,

    /// Plan steps executing in order.
    Running,

    /// All steps done, session teardown in flight.
    Disposing,

    /// Run finished, session disposed.
    Completed,

    /// Run halted at a failing call.
    Failed,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePhase::Setup => "setup",
            PipelinePhase::Running => "running",
            PipelinePhase::Disposing => "disposing",
            PipelinePhase::Completed => "completed",
            PipelinePhase::Failed => "failed",
        }
    }

    /// Legal phase transitions FROM this phase.
    pub fn valid_next_phases(&self) -> Vec<PipelinePhase> {
        match self {
            PipelinePhase::Setup => vec![PipelinePhase::Running, PipelinePhase::Failed],
            PipelinePhase::Running => vec![PipelinePhase::Disposing, PipelinePhase::Failed],
            PipelinePhase::Disposing => vec![PipelinePhase::Completed, PipelinePhase::Failed],
            PipelinePhase::Completed => vec![],
            PipelinePhase::Failed => vec![],
        }
    }

    pub fn can_transition_to(&self, next: PipelinePhase) -> bool {
        self.valid_next_phases().contains(&next)
    }
}

/// Execution state snapshot for one orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// Current phase.
    pub phase: PipelinePhase,

    /// Steps completed so far.
    pub steps_done: usize,

    /// Total steps in the plan.
    pub steps_total: usize,

    /// Run start timestamp.
    pub started_at: DateTime<Utc>,

    /// Last phase or progress update.
    pub updated_at: DateTime<Utc>,

    /// Failure cause, set when the phase is Failed.
    pub error: Option<String>,
}

impl PipelineState {
    pub fn new(steps_total: usize) -> Self {
        let now = Utc::now();
        PipelineState {
            phase: PipelinePhase::Setup,
            steps_done: 0,
            steps_total,
            started_at: now,
            updated_at: now,
            error: None,
        }
    }

    /// Attempt a phase transition, rejecting illegal ones.
    pub fn transition_to(&mut self, next: PipelinePhase) -> Result<(), String> {
        if !self.phase.can_transition_to(next) {
            return Err(format!(
                "Invalid pipeline transition: {} -> {}",
                self.phase.as_str(),
                next.as_str()
            ));
        }
        self.phase = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record one completed step.
    pub fn record_step_done(&mut self) {
        self.steps_done = (self.steps_done + 1).min(self.steps_total);
        self.updated_at = Utc::now();
    }

    /// Record a failure and move to the Failed phase.
    pub fn record_error(&mut self, error: String) {
        self.error = Some(error);
        self.phase = PipelinePhase::Failed;
        self.updated_at = Utc::now();
    }

    /// Progress percentage over plan steps (0-100).
    pub fn progress_percent(&self) -> u32 {
        if self.steps_total == 0 {
            return 100;
        }
        ((self.steps_done * 100) / self.steps_total) as u32
    }
}
