//! Entry-point resolution among compiled outputs

use std::path::Path;

use crate::artifact::Artifact;

/// Extensions of source files that the external compiler transforms.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Extension of the compiled script emitted for a source file.
pub const OUTPUT_EXTENSION: &str = ".js";

/// Whether `path` carries a source extension and needs compiling.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e))
}

/// Strip a trailing source extension (`.ts`, `.tsx`) from an entry point.
pub fn strip_source_extension(entry_point: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| {
            entry_point
                .strip_suffix(*ext)
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(entry_point)
}

/// Find the compiled artifact for `entry_point` and return its relative path.
///
/// Each `.js` artifact under `dist_root` is reduced to its dist-relative
/// name without extension; the first one that is a suffix of the entry
/// point's extension-less name wins. Suffix matching tolerates differing
/// roots between the source and dist trees, so `a/index.ts` and
/// `b/index.ts` can both claim `dist/index.js`.
///
/// Returns an empty string when nothing matches.
pub fn find_main_file(dist_root: &Path, entry_point: &str, compiled: &[Artifact]) -> String {
    let entry_point = entry_point.replace('\\', "/");
    let source_name = strip_source_extension(&entry_point);

    compiled
        .iter()
        .find(|artifact| {
            let Ok(rel) = artifact.path().strip_prefix(dist_root) else {
                return false;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            match rel.strip_suffix(OUTPUT_EXTENSION) {
                Some(candidate) => source_name.ends_with(candidate),
                None => false,
            }
        })
        .map(Artifact::relative)
        .unwrap_or_default()
}
