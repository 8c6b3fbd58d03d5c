//! Declarative build plans.
//!
//! The operation sequence is data, not code: a plan is an ordered list of
//! steps the orchestrator interprets literally. Consecutive duplicate steps
//! are legitimate input (the toolchain treats repeated operations as
//! re-validation) and are never collapsed.

use crate::error::BuildError;
use crate::models::{ComponentSpec, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Workspace directory used when none is given on the command line.
pub const DEFAULT_WORKSPACE: &str = "fitness_function";

/// Component name used when none is given on the command line.
pub const DEFAULT_COMPONENT: &str = "fitness_hls";

/// Configuration file attached to the standard component.
pub const DEFAULT_CFG_FILE: &str = "hls_config.cfg";

/// Template the standard component is created from.
pub const DEFAULT_TEMPLATE: &str = "empty_hls_component";

/// One step of a build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Run a build operation on the component.
    Run { operation: Operation },
    /// Detach configuration files from the component.
    RemoveCfgFiles { cfg_files: Vec<String> },
    /// Attach configuration files to the component.
    AddCfgFiles { cfg_files: Vec<String> },
}

impl Step {
    pub fn run(operation: Operation) -> Step {
        Step::Run { operation }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Run { operation } => write!(f, "run({})", operation),
            Step::RemoveCfgFiles { .. } => f.write_str("remove_cfg_files"),
            Step::AddCfgFiles { .. } => f.write_str("add_cfg_files"),
        }
    }
}

/// A full orchestration: workspace, component, and the ordered steps to
/// execute against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Workspace directory the session binds to.
    pub workspace: PathBuf,

    /// Component to create (or reuse) and operate on.
    pub component: ComponentSpec,

    /// Steps in execution order.
    pub steps: Vec<Step>,
}

impl BuildPlan {
    /// The canonical fixed sequence: C simulation, two synthesis passes, a
    /// cfg-file detach/re-attach, three more synthesis passes, two
    /// co-simulations, then package, implementation, and a final package.
    pub fn standard(workspace: &Path, component_name: &str) -> BuildPlan {
        let cfg_files = vec![DEFAULT_CFG_FILE.to_string()];
        BuildPlan {
            workspace: workspace.to_path_buf(),
            component: ComponentSpec::new(component_name, cfg_files.clone(), DEFAULT_TEMPLATE),
            steps: vec![
                Step::run(Operation::CSimulation),
                Step::run(Operation::Synthesis),
                Step::run(Operation::Synthesis),
                Step::RemoveCfgFiles {
                    cfg_files: cfg_files.clone(),
                },
                Step::AddCfgFiles { cfg_files },
                Step::run(Operation::Synthesis),
                Step::run(Operation::Synthesis),
                Step::run(Operation::Synthesis),
                Step::run(Operation::CoSimulation),
                Step::run(Operation::CoSimulation),
                Step::run(Operation::Package),
                Step::run(Operation::Implementation),
                Step::run(Operation::Package),
            ],
        }
    }

    /// Load a plan from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<BuildPlan, BuildError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BuildError::PlanFile(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| BuildError::PlanFile(format!("{}: {}", path.display(), e)))
    }

    /// Render the plan as pretty JSON.
    pub fn to_json(&self) -> Result<String, BuildError> {
        serde_json::to_string_pretty(self).map_err(|e| BuildError::PlanFile(e.to_string()))
    }
}
