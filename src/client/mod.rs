//! Toolchain client interface.
//!
//! The external HLS toolchain is an opaque collaborator reached through a
//! narrow client contract: bind a workspace, create or reuse a named
//! component, retrieve a handle to it, run build operations against the
//! handle, and mutate the component's configuration-file set. The contract is
//! expressed as traits so the orchestrator can be driven against the real
//! subprocess-backed client or a recording test double.

pub mod journal;
pub mod process;
pub mod tool;

pub use journal::Journal;
pub use process::{VitisClient, VitisComponent};

use crate::error::ClientError;
use crate::models::{ComponentSpec, Operation, RunStatus};
use std::path::Path;

/// Session with the external toolchain.
///
/// A session is bound to a workspace before any component work happens and
/// is disposed exactly once; `dispose` takes the session by value so a
/// disposed session cannot be used again.
pub trait HlsClient {
    type Component: HlsComponent;

    /// Bind the session to a workspace directory, creating it if needed.
    fn set_workspace(&mut self, path: &Path) -> Result<(), ClientError>;

    /// Create a component from a template, or reuse one that already exists
    /// under the bound workspace.
    fn create_hls_component(
        &mut self,
        spec: &ComponentSpec,
    ) -> Result<Self::Component, ClientError>;

    /// Retrieve a handle to a component by name.
    fn get_component(&mut self, name: &str) -> Result<Self::Component, ClientError>;

    /// Tear down the session.
    fn dispose(self) -> Result<(), ClientError>;
}

/// Handle to a named component within a session.
pub trait HlsComponent {
    /// Component name.
    fn name(&self) -> &str;

    /// Run a build operation to completion. Blocking; no retry.
    fn run(&mut self, operation: Operation) -> Result<RunStatus, ClientError>;

    /// Detach configuration files from the component.
    fn remove_cfg_files(&mut self, cfg_files: &[String]) -> Result<RunStatus, ClientError>;

    /// Attach configuration files to the component.
    fn add_cfg_files(&mut self, cfg_files: &[String]) -> Result<RunStatus, ClientError>;
}
