//! Recursive file listing and parallel reads

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::entry::is_source_file;
use super::policy::ExclusionPolicy;
use super::{AssembleError, DIST_DIR};
use crate::artifact::Artifact;

/// Collect every file under `<working_dir>/dist` as compiled artifacts.
pub fn collect_compiled(working_dir: &Path) -> Result<Vec<Artifact>, AssembleError> {
    let dist_root = working_dir.join(DIST_DIR);
    let files = list_files(&dist_root, false, |_, _| true)?;
    let contents = read_all(&files)?;

    Ok(files
        .into_iter()
        .zip(contents)
        .map(|(path, bytes)| Artifact::new(path, bytes, dist_root.clone()))
        .collect())
}

/// Collect non-source files from the working directory, re-based under `dist`.
///
/// The top-level `dist` directory is never walked, so no compiled file is
/// read twice. A re-based path can still land on a compiled artifact; see
/// [`drop_shadowed`].
pub fn collect_passthrough(
    working_dir: &Path,
    policy: &dyn ExclusionPolicy,
) -> Result<Vec<Artifact>, AssembleError> {
    let dist_root = working_dir.join(DIST_DIR);
    let files = list_files(working_dir, true, |rel, meta| {
        !is_source_file(rel) && !policy.excludes(rel, meta)
    })?;
    let contents = read_all(&files)?;

    let mut artifacts = Vec::with_capacity(files.len());
    for (path, bytes) in files.into_iter().zip(contents) {
        let rel = path
            .strip_prefix(working_dir)
            .map_err(|_| AssembleError::OutsideWorkingDir { path: path.clone() })?;
        artifacts.push(Artifact::new(dist_root.join(rel), bytes, dist_root.clone()));
    }
    Ok(artifacts)
}

/// Remove passthrough artifacts whose re-based path is already a compiled
/// artifact. Compiled output wins.
pub fn drop_shadowed(compiled: &[Artifact], passthrough: &mut Vec<Artifact>) {
    let compiled: HashSet<&Path> = compiled.iter().map(Artifact::path).collect();
    passthrough.retain(|artifact| {
        let shadowed = compiled.contains(artifact.path());
        if shadowed {
            tracing::debug!(
                path = %artifact.path().display(),
                "passthrough shadowed by compiled output"
            );
        }
        !shadowed
    });
}

/// List regular files under `root` in file-name order.
///
/// `keep` sees each file's path relative to `root`. With `prune_dist` the
/// top-level `dist` directory is not descended into. Symlinks and special
/// files are skipped.
fn list_files(
    root: &Path,
    prune_dist: bool,
    keep: impl Fn(&Path, &fs::Metadata) -> bool,
) -> Result<Vec<PathBuf>, AssembleError> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(prune_dist && e.depth() == 1 && e.file_type().is_dir() && e.file_name() == DIST_DIR)
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| AssembleError::List {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            if !entry.file_type().is_dir() {
                tracing::debug!(path = %entry.path().display(), "skipping non-regular file");
            }
            continue;
        }

        let metadata = entry.metadata().map_err(|e| AssembleError::List {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if keep(rel, &metadata) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Read all files concurrently; any failure fails the whole batch.
fn read_all(files: &[PathBuf]) -> Result<Vec<Vec<u8>>, AssembleError> {
    files
        .par_iter()
        .map(|path| {
            fs::read(path).map_err(|source| AssembleError::Read {
                path: path.clone(),
                source,
            })
        })
        .collect()
}
