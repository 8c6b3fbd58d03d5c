//! Session journal.
//!
//! Every client call is appended, in the toolchain's own scripting syntax,
//! to a journal file under the workspace so a run can be replayed through
//! the vendor's scripting front end. Journal writes are best-effort; a
//! failure degrades to a logged warning and never fails the build.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appender for the workspace journal.
#[derive(Debug, Clone)]
pub struct Journal {
    path: Option<PathBuf>,
}

impl Journal {
    /// Open a journal for a workspace, writing the session preamble.
    ///
    /// The journal lives at `<workspace>/_ide/workspace_journal_<pid>.py`.
    pub fn create(workspace: &Path) -> Journal {
        let dir = workspace.join("_ide");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("Journal disabled, cannot create {}: {}", dir.display(), e);
            return Journal { path: None };
        }

        let path = dir.join(format!("workspace_journal_{}.py", std::process::id()));
        let journal = Journal { path: Some(path) };
        journal.append_raw(&format!("# {}", Local::now().format("%Y-%m-%dT%H:%M:%S%.6f")));
        journal.append_raw("import vitis");
        journal.append_raw("");
        journal.append_raw("client = vitis.create_client()");
        journal
    }

    /// A journal that records nothing.
    pub fn disabled() -> Journal {
        Journal { path: None }
    }

    /// Path of the journal file, when journaling is active.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one client call line.
    pub fn record(&self, line: &str) {
        self.append_raw(line);
        self.append_raw("");
    }

    fn append_raw(&self, line: &str) {
        let Some(path) = &self.path else { return };
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| writeln!(f, "{}", line));
        if let Err(e) = result {
            log::warn!("Journal write failed for {}: {}", path.display(), e);
        }
    }
}

/// Render a string list as the scripting front end writes one.
pub fn script_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("\"{}\"", s)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_journal_preamble_and_records() {
        let temp_dir = TempDir::new().unwrap();
        let journal = Journal::create(temp_dir.path());

        journal.record("client.set_workspace(path=\"fitness_function\")");
        journal.record("comp.run(operation=\"SYNTHESIS\")");

        let content = std::fs::read_to_string(journal.path().unwrap()).unwrap();
        assert!(content.starts_with("# "));
        assert!(content.contains("import vitis"));
        assert!(content.contains("client = vitis.create_client()"));
        let set_ws = content.find("client.set_workspace").unwrap();
        let run = content.find("comp.run").unwrap();
        assert!(set_ws < run);
    }

    #[test]
    fn test_disabled_journal_is_silent() {
        let journal = Journal::disabled();
        journal.record("comp.run(operation=\"PACKAGE\")");
        assert!(journal.path().is_none());
    }

    #[test]
    fn test_script_list_rendering() {
        assert_eq!(
            script_list(&["hls_config.cfg".to_string()]),
            "[\"hls_config.cfg\"]"
        );
        assert_eq!(
            script_list(&["a.cfg".to_string(), "b.cfg".to_string()]),
            "[\"a.cfg\", \"b.cfg\"]"
        );
    }
}
