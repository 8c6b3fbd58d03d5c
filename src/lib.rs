//! hlsbuild
//!
//! Driver for the AMD unified HLS command-line flow. A build is described as
//! a declarative plan (component plus ordered steps) and interpreted in
//! strict program order against a toolchain client session: C simulation,
//! synthesis, co-simulation, packaging, and implementation runs, with
//! configuration-file mutations between steps.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Core data structures and types
//! - **config**: Component cfg files and per-user settings
//! - **client**: Toolchain client contract and the subprocess-backed session
//! - **orchestrator**: Plan interpretation and pipeline state
//! - **log_collector**: Logging pipeline

pub mod error;
pub mod models;

pub mod config;

pub mod client;

pub mod orchestrator;

pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use error::{BuildError, ClientError, ConfigError, Result};

pub use models::{BuildReport, ComponentSpec, Operation, RunStatus};

pub use client::{HlsClient, HlsComponent, VitisClient};

pub use orchestrator::{BuildPlan, Orchestrator, PipelinePhase, PipelineState, Step};

pub use log_collector::BuildLogger;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
