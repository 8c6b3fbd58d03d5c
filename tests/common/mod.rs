//! Shared test double: a recording client for call-sequence verification.

use hlsbuild::client::{HlsClient, HlsComponent};
use hlsbuild::error::ClientError;
use hlsbuild::models::{ComponentSpec, Operation, RunStatus};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// One observed client call, with the arguments that matter to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetWorkspace(String),
    CreateHlsComponent {
        name: String,
        cfg_files: Vec<String>,
        template: String,
    },
    GetComponent(String),
    Run(Operation),
    RemoveCfgFiles(Vec<String>),
    AddCfgFiles(Vec<String>),
    Dispose,
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Records every call; optionally fails at the n-th occurrence of a call.
pub struct MockClient {
    calls: CallLog,
    fail_on: Option<(Call, usize)>,
}

impl MockClient {
    pub fn new(calls: CallLog) -> Self {
        MockClient {
            calls,
            fail_on: None,
        }
    }

    /// Fail when `call` is observed for the `occurrence`-th time (1-based).
    pub fn failing_at(calls: CallLog, call: Call, occurrence: usize) -> Self {
        MockClient {
            calls,
            fail_on: Some((call, occurrence)),
        }
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        record_call(&self.calls, &self.fail_on, call)
    }
}

fn record_call(
    calls: &CallLog,
    fail_on: &Option<(Call, usize)>,
    call: Call,
) -> Result<(), ClientError> {
    let mut log = calls.lock().unwrap();
    log.push(call.clone());
    if let Some((target, occurrence)) = fail_on {
        if call == *target {
            let seen = log.iter().filter(|c| *c == target).count();
            if seen == *occurrence {
                return Err(ClientError::OperationFailed {
                    operation: format!("{:?}", call),
                    code: Some(1),
                });
            }
        }
    }
    Ok(())
}

impl HlsClient for MockClient {
    type Component = MockComponent;

    fn set_workspace(&mut self, path: &Path) -> Result<(), ClientError> {
        self.record(Call::SetWorkspace(path.display().to_string()))
    }

    fn create_hls_component(
        &mut self,
        spec: &ComponentSpec,
    ) -> Result<Self::Component, ClientError> {
        self.record(Call::CreateHlsComponent {
            name: spec.name.clone(),
            cfg_files: spec.cfg_files.clone(),
            template: spec.template.clone(),
        })?;
        Ok(MockComponent {
            name: spec.name.clone(),
            calls: self.calls.clone(),
            fail_on: self.fail_on.clone(),
        })
    }

    fn get_component(&mut self, name: &str) -> Result<Self::Component, ClientError> {
        self.record(Call::GetComponent(name.to_string()))?;
        Ok(MockComponent {
            name: name.to_string(),
            calls: self.calls.clone(),
            fail_on: self.fail_on.clone(),
        })
    }

    fn dispose(self) -> Result<(), ClientError> {
        record_call(&self.calls, &self.fail_on, Call::Dispose)
    }
}

pub struct MockComponent {
    name: String,
    calls: CallLog,
    fail_on: Option<(Call, usize)>,
}

impl MockComponent {
    fn record(&self, call: Call) -> Result<RunStatus, ClientError> {
        let label = match &call {
            Call::Run(op) => format!("run({})", op),
            Call::RemoveCfgFiles(_) => "remove_cfg_files".to_string(),
            Call::AddCfgFiles(_) => "add_cfg_files".to_string(),
            other => format!("{:?}", other),
        };
        record_call(&self.calls, &self.fail_on, call)?;
        Ok(RunStatus::local(&label))
    }
}

impl HlsComponent for MockComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, operation: Operation) -> Result<RunStatus, ClientError> {
        self.record(Call::Run(operation))
    }

    fn remove_cfg_files(&mut self, cfg_files: &[String]) -> Result<RunStatus, ClientError> {
        self.record(Call::RemoveCfgFiles(cfg_files.to_vec()))
    }

    fn add_cfg_files(&mut self, cfg_files: &[String]) -> Result<RunStatus, ClientError> {
        self.record(Call::AddCfgFiles(cfg_files.to_vec()))
    }
}
