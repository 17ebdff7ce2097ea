//! External compiler invocation and its generated configuration

pub mod config;
pub mod runner;

use std::path::PathBuf;

pub use config::{write_compiler_config, COMPILER_CONFIG_FILE};
pub use runner::{run_compiler_in_dir, CompilerOutput};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot spawn compiler '{program}' in {}: {source}", dir.display())]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("compiler '{program}' exited with {}: {}", code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()), stderr.trim())]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("invalid compiler config {}: {error}", path.display())]
    Config { path: PathBuf, error: String },
    #[error("cannot write compiler config {}: {source}", path.display())]
    WriteConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
