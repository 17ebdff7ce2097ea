//! External compiler subprocess

use std::path::{Path, PathBuf};
use std::process::Command;

use super::CompileError;

/// Captured output of a successful compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `program args...` with `dir` as the child's working directory.
///
/// The calling process keeps its own current directory. A spawn failure or
/// a non-zero exit is an error.
pub fn run_compiler_in_dir(
    dir: &Path,
    program: &str,
    args: &[String],
) -> Result<CompilerOutput, CompileError> {
    tracing::debug!(program, ?args, dir = %dir.display(), "spawning compiler");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| CompileError::Spawn {
            program: program.to_string(),
            dir: PathBuf::from(dir),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(CompileError::Failed {
            program: program.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    if !stdout.is_empty() {
        tracing::debug!(target: "capsule_dist::compiler", "{}", stdout.trim_end());
    }

    Ok(CompilerOutput { stdout, stderr })
}
