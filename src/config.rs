//! Build configuration file and resolved build options

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

/// Compiler invoked when neither the config file nor the CLI names one.
pub const DEFAULT_COMPILER: &str = "tsc";

/// On-disk build configuration (`--config <file>`, JSON).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Compiler executable.
    pub compiler: Option<String>,
    /// Arguments passed to the compiler.
    #[serde(default)]
    pub args: Vec<String>,
    /// Content of the generated `tsconfig.json`; none is written when absent.
    pub compiler_options: Option<Value>,
    #[serde(default)]
    pub keep_capsule: bool,
    /// Copy dependency directories into the capsule (default true).
    pub build_dependencies: Option<bool>,
}

impl BuildConfig {
    /// Read and parse a JSON build config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved options for one build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub compiler: String,
    pub args: Vec<String>,
    pub compiler_config: Option<Value>,
    /// Leave the capsule on disk after the build.
    pub keep_capsule: bool,
    pub build_dependencies: bool,
    /// Parent directory for capsules; system temp when `None`.
    pub capsule_root: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_COMPILER.to_string(),
            args: Vec::new(),
            compiler_config: None,
            keep_capsule: false,
            build_dependencies: true,
            capsule_root: None,
        }
    }
}

impl From<BuildConfig> for BuildOptions {
    fn from(config: BuildConfig) -> Self {
        let defaults = Self::default();
        Self {
            compiler: config.compiler.unwrap_or(defaults.compiler),
            args: config.args,
            compiler_config: config.compiler_options,
            keep_capsule: config.keep_capsule,
            build_dependencies: config.build_dependencies.unwrap_or(defaults.build_dependencies),
            capsule_root: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
