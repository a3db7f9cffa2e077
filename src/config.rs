use serde::Deserialize;
use std::path::{Path, PathBuf};

/// On-disk configuration loaded from metrics-iptables.toml. Every field is
/// optional; absent fields fall back to the defaults below.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub bin: PathBuf,
    pub ftype: String,
    pub scheme: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            bin: PathBuf::from("/usr/sbin/xtables-legacy-multi"),
            ftype: "iptables".to_string(),
            scheme: String::new(),
        }
    }
}

/// Resolved check configuration: file values overridden by CLI flags.
/// Built once at startup and passed by reference from there on.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub bin: PathBuf,
    pub ftype: String,
    pub scheme: String,
}

/// Configuration errors. All of them degrade the check to a warning before
/// any external process is spawned.
#[derive(Debug)]
pub enum ConfigError {
    /// No metric namespace prefix was supplied.
    SchemeMissing,
    /// The config file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SchemeMissing => write!(f, "scheme is required"),
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config file {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::SchemeMissing => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Load the config file, or defaults when it does not exist.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(FileConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

impl CheckConfig {
    /// Overlay CLI flags onto file values. A flag that was not given leaves
    /// the file value (or default) in place.
    pub fn resolve(
        file: FileConfig,
        bin: Option<PathBuf>,
        ftype: Option<String>,
        scheme: Option<String>,
    ) -> Self {
        Self {
            bin: bin.unwrap_or(file.bin),
            ftype: ftype.unwrap_or(file.ftype),
            scheme: scheme.unwrap_or(file.scheme),
        }
    }

    /// Check that everything needed to emit metrics is present. Runs before
    /// the listing command is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheme.is_empty() {
            return Err(ConfigError::SchemeMissing);
        }
        Ok(())
    }
}
