//! Artifact assembly from a compiled working directory
//!
//! Given a capsule whose `dist` directory has been populated by the
//! external compiler, produce the compiled artifacts, the passthrough
//! artifacts (non-source files re-based under `dist`), and the relative path
//! of the compiled entry point.

pub mod collect;
pub mod entry;
pub mod policy;

use std::path::{Path, PathBuf};

use crate::artifact::Artifact;

pub use collect::{collect_compiled, collect_passthrough, drop_shadowed};
pub use entry::{find_main_file, is_source_file};
pub use policy::{AllNonDist, DependencyFilesOnly, ExclusionPolicy};

/// Name of the compiler output directory inside a working directory.
pub const DIST_DIR: &str = "dist";

/// Outputs of a single assembly pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub compiled: Vec<Artifact>,
    pub passthrough: Vec<Artifact>,
    /// Relative path of the compiled entry point, empty when unresolved.
    pub main_file: String,
}

impl Assembly {
    /// Compiled artifacts followed by passthrough artifacts.
    pub fn into_dists(self) -> (Vec<Artifact>, String) {
        let mut dists = self.compiled;
        dists.extend(self.passthrough);
        (dists, self.main_file)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("cannot list {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file escapes the working directory: {}", path.display())]
    OutsideWorkingDir { path: PathBuf },
}

impl AssembleError {
    /// Path the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            AssembleError::List { path, .. }
            | AssembleError::Read { path, .. }
            | AssembleError::OutsideWorkingDir { path } => path,
        }
    }
}

/// Assemble the outputs of an already-compiled working directory.
///
/// Both collections must succeed; there is no partial result. A passthrough
/// file whose re-based path collides with a compiled artifact is dropped, so
/// the two sets never share a path. An entry point with no compiled
/// counterpart yields an empty `main_file`.
pub fn assemble(
    working_dir: &Path,
    entry_point: &str,
    policy: &dyn ExclusionPolicy,
) -> Result<Assembly, AssembleError> {
    let compiled = collect_compiled(working_dir)?;
    let mut passthrough = collect_passthrough(working_dir, policy)?;
    drop_shadowed(&compiled, &mut passthrough);
    let main_file = find_main_file(&working_dir.join(DIST_DIR), entry_point, &compiled);

    tracing::debug!(
        compiled = compiled.len(),
        passthrough = passthrough.len(),
        main_file = %main_file,
        "assembled {}",
        working_dir.display()
    );

    Ok(Assembly {
        compiled,
        passthrough,
        main_file,
    })
}
