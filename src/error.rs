//! Unified error type hierarchy for hlsbuild
//!
//! Provides structured error handling with ClientError, ConfigError, and
//! BuildError.

use std::io;
use thiserror::Error;

/// Toolchain client session and component errors.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Session has no workspace bound; call set_workspace first")]
    WorkspaceNotSet,

    #[error("Component not found in workspace: {0}")]
    ComponentNotFound(String),

    #[error("Invalid component name: {0}")]
    InvalidComponentName(String),

    #[error("Tool executable not found: {0}")]
    ToolNotFound(String),

    #[error("Tool '{tool}' failed to launch: {reason}")]
    ToolLaunchFailed { tool: String, reason: String },

    #[error("Operation {operation} failed with exit code {code:?}")]
    OperationFailed { operation: String, code: Option<i32> },

    #[error("Config file not associated with component: {0}")]
    CfgFileNotAttached(String),

    #[error("Config file already associated with component: {0}")]
    CfgFileAlreadyAttached(String),

    #[error("Component '{0}' has no configuration files attached")]
    NoCfgFiles(String),

    #[error("Component configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid component metadata: {0}")]
    InvalidMetadata(#[from] serde_json::Error),

    #[error("IO error during client operation: {0}")]
    IoError(#[from] io::Error),
}

/// Component configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid cfg syntax at line {line}: {reason}")]
    InvalidSyntax { line: usize, reason: String },

    #[error("Invalid JSON in settings: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Build pipeline execution errors.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Workspace setup failed: {0}")]
    WorkspaceFailed(String),

    #[error("Step {index} ({step}) failed: {source}")]
    StepFailed {
        index: usize,
        step: String,
        #[source]
        source: ClientError,
    },

    #[error("Invalid pipeline transition: {0}")]
    InvalidTransition(String),

    #[error("Plan file error: {0}")]
    PlanFile(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Top-level result type for operations that may fail.
/// Use this as the return type for the binary's fallible entry points.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
