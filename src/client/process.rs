//! Subprocess-backed toolchain client.
//!
//! Drives the vendor's unified command-line flow: `v++ -c --mode hls` for
//! synthesis and `vitis-run --mode hls` for the other stages. Each operation
//! is one blocking tool invocation with captured output; there is no retry
//! and no recovery, a failed invocation surfaces as an error and ends the
//! run.

use crate::client::journal::{script_list, Journal};
use crate::client::tool;
use crate::client::{HlsClient, HlsComponent};
use crate::config::{self, HlsConfig};
use crate::error::ClientError;
use crate::models::{ComponentSpec, Operation, RunStatus};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

const RUN_TOOL: &str = "vitis-run";
const COMPILE_TOOL: &str = "v++";
const METADATA_FILE: &str = "component.json";

/// Environment hook: when set, tool invocations are logged and skipped.
pub const DRY_RUN_ENV: &str = "HLSBUILD_DRY_RUN";

/// On-disk component metadata, kept next to the component's build outputs so
/// `get_component` can rehydrate a handle by name alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ComponentMeta {
    name: String,
    template: String,
    cfg_files: Vec<String>,
}

/// Session against the installed toolchain.
pub struct VitisClient {
    workspace: Option<PathBuf>,
    tool_dir: Option<PathBuf>,
    dry_run: bool,
    journal: Journal,
}

impl VitisClient {
    pub fn new() -> Self {
        VitisClient {
            workspace: None,
            tool_dir: None,
            dry_run: std::env::var_os(DRY_RUN_ENV).is_some(),
            journal: Journal::disabled(),
        }
    }

    /// Use an explicit toolchain install directory instead of environment
    /// lookup.
    pub fn with_tool_dir(mut self, tool_dir: Option<PathBuf>) -> Self {
        self.tool_dir = tool_dir;
        self
    }

    /// Force dry-run mode on or off, overriding the environment hook.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn workspace(&self) -> Result<&Path, ClientError> {
        self.workspace.as_deref().ok_or(ClientError::WorkspaceNotSet)
    }

    fn component_handle(&self, dir: PathBuf, meta: ComponentMeta) -> VitisComponent {
        VitisComponent {
            dir,
            meta,
            tool_dir: self.tool_dir.clone(),
            dry_run: self.dry_run,
            journal: self.journal.clone(),
            run_seq: 0,
        }
    }
}

impl Default for VitisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HlsClient for VitisClient {
    type Component = VitisComponent;

    fn set_workspace(&mut self, path: &Path) -> Result<(), ClientError> {
        fs::create_dir_all(path)?;
        self.journal = Journal::create(path);
        self.journal
            .record(&format!("client.set_workspace(path=\"{}\")", path.display()));
        self.workspace = Some(path.to_path_buf());
        log::info!("Workspace bound: {}", path.display());
        Ok(())
    }

    fn create_hls_component(
        &mut self,
        spec: &ComponentSpec,
    ) -> Result<Self::Component, ClientError> {
        tool::validate_component_name(&spec.name)?;
        let workspace = self.workspace()?;
        let dir = workspace.join(&spec.name);
        let meta_path = dir.join(METADATA_FILE);

        self.journal.record(&format!(
            "comp = client.create_hls_component(name = \"{}\",cfg_file = {},template = \"{}\")",
            spec.name,
            script_list(&spec.cfg_files),
            spec.template
        ));

        let meta = if meta_path.exists() {
            // Create-or-reuse: an existing component keeps its stored
            // metadata, including any cfg-set mutations from earlier runs.
            let meta: ComponentMeta = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
            log::info!("Reusing existing component '{}'", spec.name);
            meta
        } else {
            fs::create_dir_all(dir.join("logs"))?;
            for cfg in &spec.cfg_files {
                let cfg_path = dir.join(cfg);
                if !cfg_path.exists() {
                    config::save_cfg_file(&HlsConfig::from_template(&spec.template), &cfg_path)?;
                }
            }
            let meta = ComponentMeta {
                name: spec.name.clone(),
                template: spec.template.clone(),
                cfg_files: spec.cfg_files.clone(),
            };
            fs::write(&meta_path, serde_json::to_string_pretty(&meta)?)?;
            log::info!(
                "Created component '{}' from template '{}'",
                spec.name,
                spec.template
            );
            meta
        };

        Ok(self.component_handle(dir, meta))
    }

    fn get_component(&mut self, name: &str) -> Result<Self::Component, ClientError> {
        tool::validate_component_name(name)?;
        let workspace = self.workspace()?;
        let dir = workspace.join(name);
        let meta_path = dir.join(METADATA_FILE);

        self.journal
            .record(&format!("comp = client.get_component(name=\"{}\")", name));

        if !meta_path.exists() {
            return Err(ClientError::ComponentNotFound(name.to_string()));
        }
        let meta: ComponentMeta = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
        Ok(self.component_handle(dir, meta))
    }

    fn dispose(self) -> Result<(), ClientError> {
        self.journal.record("vitis.dispose()");
        log::info!("Client session disposed");
        Ok(())
    }
}

/// Handle to an on-disk component.
pub struct VitisComponent {
    dir: PathBuf,
    meta: ComponentMeta,
    tool_dir: Option<PathBuf>,
    dry_run: bool,
    journal: Journal,
    run_seq: u32,
}

impl VitisComponent {
    fn save_meta(&self) -> Result<(), ClientError> {
        let meta_path = self.dir.join(METADATA_FILE);
        fs::write(&meta_path, serde_json::to_string_pretty(&self.meta)?)?;
        Ok(())
    }

    /// Tool and stage arguments for one operation.
    fn stage_command(&self, operation: Operation, cfg: &str) -> (&'static str, Vec<String>) {
        let (tool, mut args) = match operation {
            // Synthesis goes through the compiler driver; everything else
            // through the runner with a stage flag.
            Operation::Synthesis => (
                COMPILE_TOOL,
                vec!["-c".to_string(), "--mode".to_string(), "hls".to_string()],
            ),
            Operation::CSimulation => (RUN_TOOL, Self::runner_args("--csim")),
            Operation::CoSimulation => (RUN_TOOL, Self::runner_args("--cosim")),
            Operation::Package => (RUN_TOOL, Self::runner_args("--package")),
            Operation::Implementation => (RUN_TOOL, Self::runner_args("--impl")),
        };
        args.push("--config".to_string());
        args.push(cfg.to_string());
        args.push("--work_dir".to_string());
        args.push("build".to_string());
        (tool, args)
    }

    fn runner_args(stage: &str) -> Vec<String> {
        vec!["--mode".to_string(), "hls".to_string(), stage.to_string()]
    }
}

impl HlsComponent for VitisComponent {
    fn name(&self) -> &str {
        &self.meta.name
    }

    fn run(&mut self, operation: Operation) -> Result<RunStatus, ClientError> {
        let started = Instant::now();
        self.journal
            .record(&format!("comp.run(operation=\"{}\")", operation));

        let cfg = self
            .meta
            .cfg_files
            .first()
            .cloned()
            .ok_or_else(|| ClientError::NoCfgFiles(self.meta.name.clone()))?;

        self.run_seq += 1;
        let log_file = self.dir.join("logs").join(format!(
            "{}_{}.log",
            operation.as_str().to_lowercase(),
            self.run_seq
        ));

        let (tool, args) = self.stage_command(operation, &cfg);

        if self.dry_run {
            let rendered = format!("# DRY RUN\n{} {}\n", tool, args.join(" "));
            fs::write(&log_file, rendered)?;
            log::info!("[dry-run] {} {} ({})", tool, args.join(" "), operation);
            return Ok(RunStatus {
                call: format!("run({})", operation),
                success: true,
                exit_code: None,
                elapsed: started.elapsed(),
                log_file: Some(log_file),
            });
        }

        let tool_path = tool::find_tool(tool, self.tool_dir.as_deref())?;
        log::info!(
            "Running {} for component '{}': {} {}",
            operation,
            self.meta.name,
            tool_path.display(),
            args.join(" ")
        );

        let output = Command::new(&tool_path)
            .args(&args)
            .current_dir(&self.dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ClientError::ToolLaunchFailed {
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            captured.push_str(&stderr);
        }
        fs::write(&log_file, &captured)?;

        let error_marker = tool::scan_log_for_errors(&captured);
        if !output.status.success() || error_marker.is_some() {
            if let Some(marker) = &error_marker {
                log::error!("{} reported: {}", operation, marker);
            }
            log::error!(
                "{} failed for component '{}' (exit {:?}), log: {}",
                operation,
                self.meta.name,
                output.status.code(),
                log_file.display()
            );
            return Err(ClientError::OperationFailed {
                operation: operation.to_string(),
                code: output.status.code(),
            });
        }

        log::info!(
            "{} finished for component '{}' in {:.1}s",
            operation,
            self.meta.name,
            started.elapsed().as_secs_f64()
        );

        Ok(RunStatus {
            call: format!("run({})", operation),
            success: true,
            exit_code: output.status.code(),
            elapsed: started.elapsed(),
            log_file: Some(log_file),
        })
    }

    fn remove_cfg_files(&mut self, cfg_files: &[String]) -> Result<RunStatus, ClientError> {
        let started = Instant::now();
        self.journal.record(&format!(
            "status = comp.remove_cfg_files(cfg_files={})",
            script_list(cfg_files)
        ));

        for cfg in cfg_files {
            config::validate_cfg_path(Path::new(cfg))?;
            let pos = self
                .meta
                .cfg_files
                .iter()
                .position(|attached| attached == cfg)
                .ok_or_else(|| ClientError::CfgFileNotAttached(cfg.clone()))?;
            self.meta.cfg_files.remove(pos);
        }
        self.save_meta()?;

        log::info!(
            "Detached {} cfg file(s) from '{}'",
            cfg_files.len(),
            self.meta.name
        );
        Ok(RunStatus {
            call: "remove_cfg_files".to_string(),
            success: true,
            exit_code: None,
            elapsed: started.elapsed(),
            log_file: None,
        })
    }

    fn add_cfg_files(&mut self, cfg_files: &[String]) -> Result<RunStatus, ClientError> {
        let started = Instant::now();
        self.journal.record(&format!(
            "status = comp.add_cfg_files(cfg_files={})",
            script_list(cfg_files)
        ));

        for cfg in cfg_files {
            config::validate_cfg_path(Path::new(cfg))?;
            if self.meta.cfg_files.iter().any(|attached| attached == cfg) {
                return Err(ClientError::CfgFileAlreadyAttached(cfg.clone()));
            }
            // Re-attaching a file that survived an earlier detach keeps its
            // contents; only a genuinely new file is seeded.
            let cfg_path = self.dir.join(cfg);
            if !cfg_path.exists() {
                config::save_cfg_file(&HlsConfig::from_template(&self.meta.template), &cfg_path)?;
            }
            self.meta.cfg_files.push(cfg.clone());
        }
        self.save_meta()?;

        log::info!(
            "Attached {} cfg file(s) to '{}'",
            cfg_files.len(),
            self.meta.name
        );
        Ok(RunStatus {
            call: "add_cfg_files".to_string(),
            success: true,
            exit_code: None,
            elapsed: started.elapsed(),
            log_file: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec() -> ComponentSpec {
        ComponentSpec::new(
            "fitness_hls",
            vec!["hls_config.cfg".to_string()],
            "empty_hls_component",
        )
    }

    fn bound_client(workspace: &Path) -> VitisClient {
        let mut client = VitisClient::new().with_dry_run(true);
        client.set_workspace(workspace).unwrap();
        client
    }

    #[test]
    fn test_create_seeds_cfg_and_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());

        let comp = client.create_hls_component(&spec()).unwrap();
        assert_eq!(comp.name(), "fitness_hls");

        let comp_dir = temp_dir.path().join("fitness_hls");
        assert!(comp_dir.join("hls_config.cfg").exists());
        assert!(comp_dir.join(METADATA_FILE).exists());
        assert!(comp_dir.join("logs").is_dir());

        let seeded = config::load_cfg_file(&comp_dir.join("hls_config.cfg")).unwrap();
        assert_eq!(seeded, HlsConfig::default());
    }

    #[test]
    fn test_create_without_workspace_fails() {
        let mut client = VitisClient::new().with_dry_run(true);
        assert!(matches!(
            client.create_hls_component(&spec()),
            Err(ClientError::WorkspaceNotSet)
        ));
    }

    #[test]
    fn test_create_reuses_existing_component() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());

        let mut comp = client.create_hls_component(&spec()).unwrap();
        comp.remove_cfg_files(&["hls_config.cfg".to_string()]).unwrap();

        // A second create must pick up the mutated cfg set, not reset it.
        let again = client.create_hls_component(&spec()).unwrap();
        assert!(again.meta.cfg_files.is_empty());
    }

    #[test]
    fn test_get_component_rehydrates() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        client.create_hls_component(&spec()).unwrap();

        let comp = client.get_component("fitness_hls").unwrap();
        assert_eq!(comp.name(), "fitness_hls");
        assert_eq!(comp.meta.cfg_files, vec!["hls_config.cfg"]);
        assert_eq!(comp.meta.template, "empty_hls_component");
    }

    #[test]
    fn test_get_unknown_component() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        assert!(matches!(
            client.get_component("missing"),
            Err(ClientError::ComponentNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_component_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        let bad = ComponentSpec::new("bad name", vec![], "empty_hls_component");
        assert!(matches!(
            client.create_hls_component(&bad),
            Err(ClientError::InvalidComponentName(_))
        ));
    }

    #[test]
    fn test_remove_then_add_cfg_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        let mut comp = client.create_hls_component(&spec()).unwrap();

        let files = vec!["hls_config.cfg".to_string()];
        comp.remove_cfg_files(&files).unwrap();
        assert!(comp.meta.cfg_files.is_empty());
        // Detach leaves the file itself in place.
        assert!(comp.dir.join("hls_config.cfg").exists());

        comp.add_cfg_files(&files).unwrap();
        assert_eq!(comp.meta.cfg_files, files);
    }

    #[test]
    fn test_remove_unattached_cfg_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        let mut comp = client.create_hls_component(&spec()).unwrap();
        assert!(matches!(
            comp.remove_cfg_files(&["other.cfg".to_string()]),
            Err(ClientError::CfgFileNotAttached(_))
        ));
    }

    #[test]
    fn test_add_duplicate_cfg_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        let mut comp = client.create_hls_component(&spec()).unwrap();
        assert!(matches!(
            comp.add_cfg_files(&["hls_config.cfg".to_string()]),
            Err(ClientError::CfgFileAlreadyAttached(_))
        ));
    }

    #[test]
    fn test_dry_run_operation_writes_log() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        let mut comp = client.create_hls_component(&spec()).unwrap();

        let status = comp.run(Operation::Synthesis).unwrap();
        assert!(status.success);
        assert_eq!(status.call, "run(SYNTHESIS)");

        let log_file = status.log_file.unwrap();
        let content = std::fs::read_to_string(log_file).unwrap();
        assert!(content.contains("v++ -c --mode hls"));
        assert!(content.contains("--config hls_config.cfg"));
    }

    #[test]
    fn test_run_without_cfg_files_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        let mut comp = client.create_hls_component(&spec()).unwrap();
        comp.remove_cfg_files(&["hls_config.cfg".to_string()]).unwrap();
        assert!(matches!(
            comp.run(Operation::CSimulation),
            Err(ClientError::NoCfgFiles(_))
        ));
    }

    #[test]
    fn test_journal_records_session_calls() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = bound_client(temp_dir.path());
        let mut comp = client.create_hls_component(&spec()).unwrap();
        comp.run(Operation::CSimulation).unwrap();
        let journal_path = client.journal.path().unwrap().to_path_buf();
        client.dispose().unwrap();

        let journal = std::fs::read_to_string(journal_path).unwrap();
        assert!(journal.contains("client.set_workspace(path="));
        assert!(journal.contains(
            "comp = client.create_hls_component(name = \"fitness_hls\",cfg_file = [\"hls_config.cfg\"],template = \"empty_hls_component\")"
        ));
        assert!(journal.contains("comp.run(operation=\"C_SIMULATION\")"));
        assert!(journal.trim_end().ends_with("vitis.dispose()"));
    }
}
