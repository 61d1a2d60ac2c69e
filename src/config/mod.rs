//! Configuration file management
//!
//! Loads the TOML settings file (library location and option defaults)
//! and TOML job files (option values for one run).
//! Default config path: ~/.config/ttfautohint/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_ENV;
use crate::error::Error;
use crate::native::Library;
use crate::options::{lookup, DefaultValue, OptionKind, OptionValue, Options, REGISTRY};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Native library settings
    pub library: LibraryConfig,
    /// Option values applied under every job
    pub defaults: toml::Table,
}

/// Native library settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Path to libttfautohint (empty = search default names)
    pub path: String,
}

impl Config {
    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. TTFAUTOHINT_CONFIG environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/ttfautohint/config.toml
        default_config_path().filter(|p| p.exists())
    }

    /// Load configuration with priority:
    /// 1. TTFAUTOHINT_CONFIG environment variable
    /// 2. ~/.config/ttfautohint/config.toml (user config)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        // Reject bad defaults at load time rather than on the first job
        values_from_table(&config.defaults, None)?;
        let per_job: Vec<String> = config
            .defaults
            .keys()
            .filter(|k| lookup(k).is_some_and(|spec| is_per_job(spec.kind)))
            .map(|k| format!("'{}'", k))
            .collect();
        if !per_job.is_empty() {
            return Err(Error::Config(format!(
                "[defaults] cannot set inputs or outputs: {}",
                per_job.join(", ")
            ))
            .into());
        }
        Ok(config)
    }

    /// Open the configured native library
    pub fn open_library(&self) -> crate::Result<Library> {
        if self.library.path.is_empty() {
            Library::open_default()
        } else {
            Library::open(&self.library.path)
        }
    }

    /// Options for a job table, with `[defaults]` underneath
    ///
    /// Relative paths in the job are resolved against `base_dir`.
    pub fn job_options(&self, job: &toml::Table, base_dir: Option<&Path>) -> crate::Result<Options> {
        let mut values = values_from_table(&self.defaults, None)?;
        values.extend(values_from_table(job, base_dir)?);
        Options::from_values(values)
    }

    /// Load a job file and build its options
    pub fn load_job(&self, path: &Path) -> Result<Options> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file: {}", path.display()))?;
        let job: toml::Table = toml::from_str(&content)
            .with_context(|| format!("Failed to parse job file: {}", path.display()))?;
        let options = self
            .job_options(&job, path.parent())
            .with_context(|| format!("Invalid job file: {}", path.display()))?;
        Ok(options)
    }

    /// Commented settings template listing every option and its default
    pub fn template() -> String {
        let mut lines = vec![
            "# ttfautohint settings".to_string(),
            String::new(),
            "[library]".to_string(),
            "# path = \"\"    # libttfautohint path (empty = search default names)".to_string(),
            String::new(),
            "# Option values applied to every job".to_string(),
            "[defaults]".to_string(),
        ];
        for spec in REGISTRY {
            let line = match spec.default {
                DefaultValue::Bool(v) => format!("# {} = {}", spec.name, v),
                DefaultValue::UInt(v) => format!("# {} = {}", spec.name, v),
                DefaultValue::Int(v) => format!("# {} = {}", spec.name, v),
                DefaultValue::Text(v) => format!("# {} = \"{}\"", spec.name, v),
                DefaultValue::Absent if is_per_job(spec.kind) => continue,
                DefaultValue::Absent => format!("# {}    (unset)", spec.name),
            };
            lines.push(line);
        }
        lines.push(String::new());
        lines.join("\n")
    }

    /// Write the template to the default config path
    pub fn write_template() -> Result<PathBuf> {
        let config_path =
            default_config_path().ok_or_else(|| anyhow::anyhow!("Config directory not found"))?;
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&config_path, Self::template())
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
        Ok(config_path)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ttfautohint").join("config.toml"))
}

/// Inputs and outputs, which belong to a single job
fn is_per_job(kind: OptionKind) -> bool {
    matches!(
        kind,
        OptionKind::FileSource | OptionKind::Buffer | OptionKind::Destination
    )
}

/// Convert a TOML table of option values
///
/// Keys are checked against the registry first so that an unknown key
/// is reported as unknown regardless of its value.
pub fn values_from_table(
    table: &toml::Table,
    base_dir: Option<&Path>,
) -> crate::Result<Vec<(String, OptionValue)>> {
    let mut unknown: Vec<String> = table
        .keys()
        .filter(|k| lookup(k).is_none())
        .cloned()
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        return Err(Error::UnknownOptions(unknown));
    }

    table
        .iter()
        .map(|(key, value)| Ok((key.clone(), value_from_toml(key, value, base_dir)?)))
        .collect()
}

fn value_from_toml(key: &str, value: &toml::Value, base_dir: Option<&Path>) -> crate::Result<OptionValue> {
    let kind = lookup(key).map(|s| s.kind);
    let type_error = |found: &'static str| Error::Type {
        field: key.to_string(),
        expected: kind.map_or("value", OptionKind::expected),
        found,
    };

    match value {
        toml::Value::Boolean(v) => Ok(OptionValue::Bool(*v)),
        toml::Value::Integer(v) => Ok(OptionValue::Int(*v)),
        toml::Value::String(s) => match kind {
            Some(OptionKind::FileSource | OptionKind::Destination) => {
                let path = PathBuf::from(s);
                Ok(OptionValue::Path(match base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                }))
            }
            _ => Ok(OptionValue::Text(s.clone())),
        },
        // Byte buffers are written as arrays of integers 0..=255
        toml::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                toml::Value::Integer(b) => u8::try_from(*b).ok(),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()
            .map(OptionValue::Bytes)
            .ok_or_else(|| type_error("array")),
        other => Err(type_error(other.type_str())),
    }
}
