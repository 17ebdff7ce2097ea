//! Capsule isolation: a disposable working directory per build
//!
//! The host orchestrator owns dependency resolution and capsule creation.
//! This module models that contract as the [`Isolator`] and [`Capsule`]
//! traits and ships [`DirectoryIsolator`], which copies a component source
//! directory into a fresh temporary capsule.

pub mod local;

use std::path::{Path, PathBuf};

pub use local::{DirectoryIsolator, TempCapsule};

/// Parameters passed to the host's isolate call.
#[derive(Debug, Clone, Default)]
pub struct IsolateRequest {
    /// Parent directory for the capsule; the system temp dir when `None`.
    pub target_root: Option<PathBuf>,
    pub should_build_dependencies: bool,
}

/// The component being built, as described by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    /// Declared entry point, relative to the component root.
    pub main_file: String,
    /// Component files relative to the component root.
    pub files: Vec<PathBuf>,
    /// Custom dependency names from `package.json`.
    pub dependencies: Vec<String>,
}

/// A working directory owned by one build.
pub trait Capsule: std::fmt::Debug {
    fn path(&self) -> &Path;

    /// Remove the capsule from disk.
    fn destroy(self: Box<Self>) -> Result<(), IsolateError>;

    /// Leave the capsule on disk for inspection and return its path.
    fn keep(self: Box<Self>) -> PathBuf;
}

#[derive(Debug)]
pub struct Isolated {
    pub component: Component,
    pub capsule: Box<dyn Capsule>,
}

pub trait Isolator {
    fn isolate(&self, request: &IsolateRequest) -> Result<Isolated, IsolateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IsolateError {
    #[error("cannot create capsule directory: {source}")]
    Create {
        #[source]
        source: std::io::Error,
    },
    #[error("cannot copy {} into capsule: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot walk component directory: {source}")]
    Walk {
        #[source]
        source: walkdir::Error,
    },
    #[error("invalid package manifest {}: {error}", path.display())]
    Manifest { path: PathBuf, error: String },
    #[error("component '{name}' declares no main file")]
    MissingMain { name: String },
    #[error("cannot remove capsule {}: {source}", path.display())]
    Destroy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
