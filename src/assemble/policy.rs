//! Exclusion policies for passthrough collection

use std::fs;
use std::path::{Component, Path};

/// Decides whether a passthrough candidate is left out of the outputs.
///
/// `path` is relative to the working directory.
pub trait ExclusionPolicy: Sync {
    fn excludes(&self, path: &Path, metadata: &fs::Metadata) -> bool;
}

impl<F> ExclusionPolicy for F
where
    F: Fn(&Path, &fs::Metadata) -> bool + Sync,
{
    fn excludes(&self, path: &Path, metadata: &fs::Metadata) -> bool {
        self(path, metadata)
    }
}

/// Default policy: only files inside a dependency directory pass, and
/// nothing under `dist` or a `.dependencies` segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyFilesOnly;

impl ExclusionPolicy for DependencyFilesOnly {
    fn excludes(&self, path: &Path, _metadata: &fs::Metadata) -> bool {
        !has_segment(path, |s| s == "node_modules")
            || has_segment(path, |s| s == "dist")
            || has_segment(path, |s| s.contains(".dependencies"))
    }
}

/// Every non-source file passes except those under `dist` or `.dependencies`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllNonDist;

impl ExclusionPolicy for AllNonDist {
    fn excludes(&self, path: &Path, _metadata: &fs::Metadata) -> bool {
        has_segment(path, |s| s == "dist") || has_segment(path, |s| s.contains(".dependencies"))
    }
}

fn has_segment(path: &Path, pred: impl Fn(&str) -> bool) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_str().is_some_and(&pred),
        _ => false,
    })
}
