//! Component configuration management.
//!
//! The HLS flow configures a component through a `.cfg` text file of
//! `key=value` lines grouped under optional `[section]` headers. This module
//! models that file, parses and writes it, and manages the small per-user
//! settings file for tool defaults.

pub mod settings;

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default device part used when a template does not pin one.
pub const DEFAULT_PART: &str = "xc7z020-clg400-1";

/// Default clock period for new components.
pub const DEFAULT_CLOCK: &str = "10ns";

/// Parsed component configuration.
///
/// Known keys of the `[hls]` section are lifted into fields; everything else
/// is preserved verbatim in `extra` under its `section.key` qualified name so
/// a parse/write cycle never drops tool options this driver does not model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HlsConfig {
    /// Target device part.
    pub part: String,

    /// Top-level function to synthesize.
    pub top: Option<String>,

    /// Design source files, in order.
    pub syn_files: Vec<String>,

    /// Testbench files, in order.
    pub tb_files: Vec<String>,

    /// Clock period, e.g. "10ns".
    pub clock: String,

    /// Flow target the tool should package for.
    pub flow_target: String,

    /// Unrecognized options, keyed as "section.key".
    pub extra: BTreeMap<String, String>,
}

impl Default for HlsConfig {
    fn default() -> Self {
        HlsConfig {
            part: DEFAULT_PART.to_string(),
            top: None,
            syn_files: Vec::new(),
            tb_files: Vec::new(),
            clock: DEFAULT_CLOCK.to_string(),
            flow_target: "vitis".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl HlsConfig {
    /// Seed a configuration for a named component template.
    ///
    /// The empty template carries only part, clock, and flow target; the
    /// tool fills in sources once the user adds them.
    pub fn from_template(template: &str) -> Self {
        let mut config = HlsConfig::default();
        if template != "empty_hls_component" && !template.is_empty() {
            // Unknown templates still get a usable seed; the tool validates
            // template names itself on first run.
            config
                .extra
                .insert("hls.template".to_string(), template.to_string());
        }
        config
    }

    /// Parse a configuration from cfg text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = HlsConfig {
            part: String::new(),
            top: None,
            syn_files: Vec::new(),
            tb_files: Vec::new(),
            clock: String::new(),
            flow_target: String::new(),
            extra: BTreeMap::new(),
        };
        let mut section = String::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let lineno = idx + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                if !line.ends_with(']') || line.len() < 3 {
                    return Err(ConfigError::InvalidSyntax {
                        line: lineno,
                        reason: format!("malformed section header '{}'", line),
                    });
                }
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::InvalidSyntax {
                line: lineno,
                reason: format!("expected key=value, got '{}'", line),
            })?;
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                return Err(ConfigError::InvalidSyntax {
                    line: lineno,
                    reason: "empty key".to_string(),
                });
            }

            match (section.as_str(), key) {
                ("", "part") => config.part = value.to_string(),
                ("hls", "syn.top") => config.top = Some(value.to_string()),
                ("hls", "syn.file") => config.syn_files.push(value.to_string()),
                ("hls", "tb.file") => config.tb_files.push(value.to_string()),
                ("hls", "clock") => config.clock = value.to_string(),
                ("hls", "flow_target") => config.flow_target = value.to_string(),
                _ => {
                    let qualified = if section.is_empty() {
                        key.to_string()
                    } else {
                        format!("{}.{}", section, key)
                    };
                    config.extra.insert(qualified, value.to_string());
                }
            }
        }

        if config.part.is_empty() {
            config.part = DEFAULT_PART.to_string();
        }
        if config.clock.is_empty() {
            config.clock = DEFAULT_CLOCK.to_string();
        }
        if config.flow_target.is_empty() {
            config.flow_target = "vitis".to_string();
        }

        Ok(config)
    }

    /// Render the configuration as cfg text.
    ///
    /// Top-level keys come first, then the `[hls]` section, then any other
    /// sections carried in `extra`, so a parse of the output reconstructs
    /// the same configuration.
    pub fn to_cfg_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("part={}\n", self.part));
        for (key, value) in self.extra.iter().filter(|(k, _)| !k.contains('.')) {
            out.push_str(&format!("{}={}\n", key, value));
        }

        out.push_str("\n[hls]\n");
        if let Some(top) = &self.top {
            out.push_str(&format!("syn.top={}\n", top));
        }
        for file in &self.syn_files {
            out.push_str(&format!("syn.file={}\n", file));
        }
        for file in &self.tb_files {
            out.push_str(&format!("tb.file={}\n", file));
        }
        out.push_str(&format!("clock={}\n", self.clock));
        out.push_str(&format!("flow_target={}\n", self.flow_target));
        for (qualified, value) in &self.extra {
            if let Some(key) = qualified.strip_prefix("hls.") {
                out.push_str(&format!("{}={}\n", key, value));
            }
        }

        // Remaining sections; BTreeMap order keeps a section's keys together.
        let mut last_section = String::new();
        for (qualified, value) in &self.extra {
            let Some((section, key)) = qualified.split_once('.') else {
                continue;
            };
            if section == "hls" {
                continue;
            }
            if section != last_section {
                out.push_str(&format!("\n[{}]\n", section));
                last_section = section.to_string();
            }
            out.push_str(&format!("{}={}\n", key, value));
        }
        out
    }
}

/// Load a component configuration from a cfg file.
pub fn load_cfg_file(path: &Path) -> Result<HlsConfig, ConfigError> {
    validate_cfg_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::IoError(e)
        }
    })?;

    HlsConfig::parse(&content)
}

/// Write a component configuration to a cfg file.
///
/// The write goes through a temporary file in the target directory and is
/// persisted with a rename, so a crashed run never leaves a truncated cfg.
pub fn save_cfg_file(config: &HlsConfig, path: &Path) -> Result<(), ConfigError> {
    validate_cfg_path(path)?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir).map_err(ConfigError::IoError)?;
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
        .map_err(ConfigError::IoError)?;
    tmp.write_all(config.to_cfg_text().as_bytes())
        .map_err(ConfigError::IoError)?;
    tmp.persist(path)
        .map_err(|e| ConfigError::IoError(e.error))?;

    Ok(())
}

/// Validate a cfg path (.cfg extension required).
pub fn validate_cfg_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "cfg" => {}
        Some(ext) => {
            return Err(ConfigError::ValidationFailed(format!(
                "Configuration file must have .cfg extension, got .{}",
                ext.to_string_lossy()
            )))
        }
        None => {
            return Err(ConfigError::ValidationFailed(
                "Configuration file must have .cfg extension".to_string(),
            ))
        }
    }

    if path.to_str().is_none() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path contains invalid characters".to_string(),
        ));
    }

    Ok(())
}
