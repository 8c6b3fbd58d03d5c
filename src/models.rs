//! Core data types for hlsbuild.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Build stage requested of a component.
///
/// The variants carry the exact names the external toolchain accepts. The
/// same operation may be requested multiple times in sequence; the driver
/// never deduplicates consecutive requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "C_SIMULATION")]
    CSimulation,
    #[serde(rename = "SYNTHESIS")]
    Synthesis,
    #[serde(rename = "CO_SIMULATION")]
    CoSimulation,
    #[serde(rename = "PACKAGE")]
    Package,
    #[serde(rename = "IMPLEMENTATION")]
    Implementation,
}

impl Operation {
    /// Wire name understood by the toolchain client.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CSimulation => "C_SIMULATION",
            Operation::Synthesis => "SYNTHESIS",
            Operation::CoSimulation => "CO_SIMULATION",
            Operation::Package => "PACKAGE",
            Operation::Implementation => "IMPLEMENTATION",
        }
    }

    /// All operations in canonical flow order.
    pub fn all() -> [Operation; 5] {
        [
            Operation::CSimulation,
            Operation::Synthesis,
            Operation::CoSimulation,
            Operation::Package,
            Operation::Implementation,
        ]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C_SIMULATION" => Ok(Operation::CSimulation),
            "SYNTHESIS" => Ok(Operation::Synthesis),
            "CO_SIMULATION" => Ok(Operation::CoSimulation),
            "PACKAGE" => Ok(Operation::Package),
            "IMPLEMENTATION" => Ok(Operation::Implementation),
            _ => Err(format!("Unknown operation: {}", s)),
        }
    }
}

/// Description of a component to create or reuse in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Component name; doubles as the component directory name.
    pub name: String,

    /// Configuration files associated with the component, in order.
    pub cfg_files: Vec<String>,

    /// Template identifier the component is seeded from.
    pub template: String,
}

impl ComponentSpec {
    pub fn new(name: &str, cfg_files: Vec<String>, template: &str) -> Self {
        ComponentSpec {
            name: name.to_string(),
            cfg_files,
            template: template.to_string(),
        }
    }
}

/// Status returned by a single client call (`run` or a cfg-file mutation).
///
/// The orchestrator records these into the report but branches only on
/// error vs. success, matching the toolchain's own scripting front end
/// where returned statuses are assigned and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatus {
    /// Call label, e.g. "run(SYNTHESIS)" or "add_cfg_files".
    pub call: String,

    /// Whether the tool reported success.
    pub success: bool,

    /// Exit code of the underlying tool process, when one was spawned.
    pub exit_code: Option<i32>,

    /// Wall time spent in the call.
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,

    /// Captured tool log, when the call produced one.
    pub log_file: Option<PathBuf>,
}

impl RunStatus {
    /// Status for a call that completed without spawning the tool.
    pub fn local(call: &str) -> Self {
        RunStatus {
            call: call.to_string(),
            success: true,
            exit_code: None,
            elapsed: Duration::ZERO,
            log_file: None,
        }
    }
}

/// Serialize `Duration` as fractional seconds for report readability.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs_f64().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::from_secs_f64(secs))
    }
}

/// Ordered record of an entire orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Workspace directory the run was bound to.
    pub workspace: PathBuf,

    /// Component the operations were run against.
    pub component: String,

    /// Run start timestamp.
    pub started_at: DateTime<Utc>,

    /// Run end timestamp, set when the pipeline completes.
    pub finished_at: Option<DateTime<Utc>>,

    /// Per-call statuses in execution order.
    pub statuses: Vec<RunStatus>,
}

impl BuildReport {
    pub fn new(workspace: PathBuf, component: &str) -> Self {
        BuildReport {
            workspace,
            component: component.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            statuses: Vec::new(),
        }
    }

    /// Append a call status in execution order.
    pub fn record(&mut self, status: RunStatus) {
        self.statuses.push(status);
    }

    /// Mark the run finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}
