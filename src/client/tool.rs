//! Vendor executable discovery and tool-output inspection.

use crate::error::ClientError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Component names become directory names and subprocess arguments, so they
/// are validated before any filesystem or command use.
static COMPONENT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid regex"));

/// Error lines in tool logs, e.g. "ERROR: [HLS 200-70] Synthesis failed".
static TOOL_ERROR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ERROR: \[[^\]]+\].*$").expect("valid regex"));

/// Validate a component name against the allowed identifier shape.
pub fn validate_component_name(name: &str) -> Result<(), ClientError> {
    if COMPONENT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ClientError::InvalidComponentName(name.to_string()))
    }
}

/// Locate a vendor executable.
///
/// Lookup order: an explicit tool directory, then `$XILINX_VITIS/bin`, then
/// the directories on `$PATH`.
pub fn find_tool(tool: &str, tool_dir: Option<&Path>) -> Result<PathBuf, ClientError> {
    if let Some(dir) = tool_dir {
        let candidate = dir.join("bin").join(tool);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
        let candidate = dir.join(tool);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }

    if let Ok(install) = std::env::var("XILINX_VITIS") {
        let candidate = Path::new(&install).join("bin").join(tool);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }

    let path_var = std::env::var("PATH").unwrap_or_default();
    for dir in path_var.split(':').filter(|p| !p.is_empty()) {
        let candidate = Path::new(dir).join(tool);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }

    Err(ClientError::ToolNotFound(tool.to_string()))
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

/// Scan captured tool output for an error marker.
///
/// The tool can exit zero while still reporting a flow error in its log, so
/// the exit status alone is not trusted.
pub fn scan_log_for_errors(output: &str) -> Option<String> {
    TOOL_ERROR_RE
        .find(output)
        .map(|m| m.as_str().trim().to_string())
}
