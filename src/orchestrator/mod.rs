//! Build orchestration: strict-order interpretation of a build plan against
//! a toolchain client session.
//!
//! The sequence is fixed by the plan: bind the workspace, create (or reuse)
//! the component, retrieve it by name, execute every step in order, dispose
//! the session. Fully synchronous, no retries, no rollback of cfg-file
//! mutations. The first failing call halts the run and the session is
//! deliberately left undisposed, matching the toolchain's unhandled-failure
//! behavior.

pub mod plan;
pub mod state;

pub use plan::{BuildPlan, Step};
pub use state::{PipelinePhase, PipelineState};

use crate::client::{HlsClient, HlsComponent};
use crate::error::BuildError;
use crate::models::BuildReport;

/// Drives one build plan to completion over a client session.
pub struct Orchestrator<C: HlsClient> {
    client: C,
    state: PipelineState,
}

impl<C: HlsClient> Orchestrator<C> {
    pub fn new(client: C) -> Self {
        Orchestrator {
            client,
            state: PipelineState::new(0),
        }
    }

    /// Execute the plan in strict order, consuming the session.
    ///
    /// On success the session has been disposed exactly once. On failure the
    /// error of the halting call propagates and the session is dropped
    /// without `dispose`.
    pub fn execute(mut self, plan: &BuildPlan) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::new(plan.workspace.clone(), &plan.component.name);
        self.state = PipelineState::new(plan.steps.len());

        log::info!(
            "Starting pipeline: component '{}' in {} ({} steps)",
            plan.component.name,
            plan.workspace.display(),
            plan.steps.len()
        );

        if let Err(e) = self.setup(plan) {
            self.state.record_error(e.to_string());
            return Err(e);
        }

        self.state
            .transition_to(PipelinePhase::Running)
            .map_err(BuildError::InvalidTransition)?;

        let mut component = match self.client.get_component(&plan.component.name) {
            Ok(component) => component,
            Err(e) => {
                self.state.record_error(e.to_string());
                return Err(e.into());
            }
        };

        for (index, step) in plan.steps.iter().enumerate() {
            log::info!(
                "Step {}/{}: {}",
                index + 1,
                plan.steps.len(),
                step
            );
            let result = match step {
                Step::Run { operation } => component.run(*operation),
                Step::RemoveCfgFiles { cfg_files } => component.remove_cfg_files(cfg_files),
                Step::AddCfgFiles { cfg_files } => component.add_cfg_files(cfg_files),
            };
            let status = match result {
                Ok(status) => status,
                Err(source) => {
                    let err = BuildError::StepFailed {
                        index,
                        step: step.to_string(),
                        source,
                    };
                    self.state.record_error(err.to_string());
                    log::error!(
                        "Pipeline halted at {}% ({}): session left undisposed",
                        self.state.progress_percent(),
                        err
                    );
                    return Err(err);
                }
            };
            report.record(status);
            self.state.record_step_done();
        }

        self.state
            .transition_to(PipelinePhase::Disposing)
            .map_err(BuildError::InvalidTransition)?;

        self.client.dispose().map_err(BuildError::Client)?;

        self.state
            .transition_to(PipelinePhase::Completed)
            .map_err(BuildError::InvalidTransition)?;
        report.finish();

        log::info!(
            "Pipeline completed: {} call(s) recorded for '{}'",
            report.statuses.len(),
            plan.component.name
        );
        Ok(report)
    }

    fn setup(&mut self, plan: &BuildPlan) -> Result<(), BuildError> {
        self.client.set_workspace(&plan.workspace)?;
        // The created handle is discarded; operations go through the handle
        // retrieved by name, so create-or-reuse and retrieval stay separate
        // client calls.
        let _ = self.client.create_hls_component(&plan.component)?;
        Ok(())
    }
}
