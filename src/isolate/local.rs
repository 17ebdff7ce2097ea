//! Local isolation: copy a component directory into a temporary capsule

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::TempDir;
use walkdir::WalkDir;

use super::{Capsule, Component, IsolateError, IsolateRequest, Isolated, Isolator};

const PACKAGE_MANIFEST: &str = "package.json";
const DEPENDENCY_DIR: &str = "node_modules";

/// Top-level entries never copied into a capsule.
const SKIPPED_ROOTS: &[&str] = &["dist", ".git"];

/// Subset of `package.json` read during isolation.
#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    main: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
}

/// Capsule backed by a temporary directory.
#[derive(Debug)]
pub struct TempCapsule {
    dir: TempDir,
}

impl Capsule for TempCapsule {
    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn destroy(self: Box<Self>) -> Result<(), IsolateError> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| IsolateError::Destroy { path, source })
    }

    fn keep(self: Box<Self>) -> PathBuf {
        self.dir.keep()
    }
}

/// Isolates a component by copying its source directory into a new capsule.
///
/// `node_modules` is copied only when the request asks for dependencies.
#[derive(Debug, Clone)]
pub struct DirectoryIsolator {
    source_dir: PathBuf,
    name: Option<String>,
    main_file: Option<String>,
}

impl DirectoryIsolator {
    /// Isolate the component rooted at `source_dir`.
    pub fn new<P: AsRef<Path>>(source_dir: P) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            name: None,
            main_file: None,
        }
    }

    /// Override the component name (defaults to `package.json` name, then
    /// the directory name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the entry point (defaults to `package.json` main).
    pub fn with_main_file(mut self, main_file: impl Into<String>) -> Self {
        self.main_file = Some(main_file.into());
        self
    }

    fn read_manifest(dir: &Path) -> Result<PackageManifest, IsolateError> {
        let path = dir.join(PACKAGE_MANIFEST);
        if !path.exists() {
            return Ok(PackageManifest::default());
        }
        let text = fs::read_to_string(&path).map_err(|e| IsolateError::Manifest {
            path: path.clone(),
            error: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| IsolateError::Manifest {
            path,
            error: e.to_string(),
        })
    }

    /// Copy the component tree into `capsule_dir`; returns the component's
    /// own files (dependency directories excluded).
    fn copy_tree(
        &self,
        capsule_dir: &Path,
        with_dependencies: bool,
    ) -> Result<Vec<PathBuf>, IsolateError> {
        let source_dir = canonical(&self.source_dir)?;
        let capsule_dir = canonical(capsule_dir)?;

        let walker = WalkDir::new(&source_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // a capsule rooted inside the component must not copy itself
                if e.path() == capsule_dir {
                    return false;
                }
                if e.depth() != 1 {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                let name: &str = &name;
                !SKIPPED_ROOTS.contains(&name)
                    && (with_dependencies || name != DEPENDENCY_DIR)
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| IsolateError::Walk { source })?;
            let Ok(rel) = entry.path().strip_prefix(&source_dir) else {
                continue;
            };
            let dest = capsule_dir.join(rel);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest).map_err(|source| IsolateError::Copy {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
            } else if entry.file_type().is_file() {
                fs::copy(entry.path(), &dest).map_err(|source| IsolateError::Copy {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
                if !rel.starts_with(DEPENDENCY_DIR) {
                    files.push(rel.to_path_buf());
                }
            } else {
                tracing::debug!(path = %entry.path().display(), "not copying non-regular file");
            }
        }

        Ok(files)
    }
}

fn canonical(path: &Path) -> Result<PathBuf, IsolateError> {
    fs::canonicalize(path).map_err(|source| IsolateError::Copy {
        path: path.to_path_buf(),
        source,
    })
}

impl Isolator for DirectoryIsolator {
    fn isolate(&self, request: &IsolateRequest) -> Result<Isolated, IsolateError> {
        let manifest = Self::read_manifest(&self.source_dir)?;

        let name = self
            .name
            .clone()
            .or(manifest.name)
            .or_else(|| {
                self.source_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "component".to_string());
        let main_file = self
            .main_file
            .clone()
            .or(manifest.main)
            .ok_or_else(|| IsolateError::MissingMain { name: name.clone() })?;

        let mut builder = tempfile::Builder::new();
        builder.prefix("capsule-");
        let dir = match &request.target_root {
            Some(root) => {
                fs::create_dir_all(root).map_err(|source| IsolateError::Create { source })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|source| IsolateError::Create { source })?;

        let files = self.copy_tree(dir.path(), request.should_build_dependencies)?;

        Ok(Isolated {
            component: Component {
                name,
                main_file,
                files,
                dependencies: manifest.dependencies.into_keys().collect(),
            },
            capsule: Box::new(TempCapsule { dir }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_dir() -> anyhow::Result<TempDir> {
        let tmp = TempDir::new()?;
        let base = tmp.path();
        fs::write(
            base.join("package.json"),
            r#"{"name": "test-component", "main": "src/index.ts", "dependencies": {"lit": "^3", "tslib": "^2"}}"#,
        )?;
        fs::create_dir_all(base.join("src"))?;
        fs::write(base.join("src/index.ts"), "export const x = 1;")?;
        fs::write(base.join("src/style.css"), ":host {}")?;
        fs::create_dir_all(base.join("dist"))?;
        fs::write(base.join("dist/stale.js"), "")?;
        fs::create_dir_all(base.join("node_modules/lit"))?;
        fs::write(base.join("node_modules/lit/package.json"), "{}")?;
        Ok(tmp)
    }

    #[test]
    fn copies_component_into_capsule() -> anyhow::Result<()> {
        let src = component_dir()?;
        let root = TempDir::new()?;
        let request = IsolateRequest {
            target_root: Some(root.path().to_path_buf()),
            should_build_dependencies: true,
        };

        let isolated = DirectoryIsolator::new(src.path()).isolate(&request)?;
        let cap = isolated.capsule.path().to_path_buf();

        assert!(cap.starts_with(root.path()));
        assert!(cap.join("src/index.ts").exists());
        assert!(cap.join("node_modules/lit/package.json").exists());
        assert!(!cap.join("dist").exists());

        assert_eq!(isolated.component.name, "test-component");
        assert_eq!(isolated.component.main_file, "src/index.ts");
        assert_eq!(isolated.component.dependencies, vec!["lit", "tslib"]);
        assert_eq!(
            isolated.component.files,
            vec![
                PathBuf::from("package.json"),
                PathBuf::from("src/index.ts"),
                PathBuf::from("src/style.css"),
            ]
        );

        isolated.capsule.destroy()?;
        assert!(!cap.exists());
        Ok(())
    }

    #[test]
    fn dependencies_skipped_when_not_requested() -> anyhow::Result<()> {
        let src = component_dir()?;
        let isolated = DirectoryIsolator::new(src.path()).isolate(&IsolateRequest::default())?;
        assert!(!isolated.capsule.path().join("node_modules").exists());
        isolated.capsule.destroy()?;
        Ok(())
    }

    #[test]
    fn overrides_take_precedence() -> anyhow::Result<()> {
        let src = component_dir()?;
        let isolated = DirectoryIsolator::new(src.path())
            .with_name("renamed")
            .with_main_file("src/other.ts")
            .isolate(&IsolateRequest::default())?;
        assert_eq!(isolated.component.name, "renamed");
        assert_eq!(isolated.component.main_file, "src/other.ts");
        isolated.capsule.destroy()?;
        Ok(())
    }

    #[test]
    fn missing_main_is_refused() -> anyhow::Result<()> {
        let src = TempDir::new()?;
        fs::write(src.path().join("a.js"), "")?;
        let result = DirectoryIsolator::new(src.path()).isolate(&IsolateRequest::default());
        assert!(matches!(result, Err(IsolateError::MissingMain { .. })));
        Ok(())
    }

    #[test]
    fn invalid_manifest_is_refused() -> anyhow::Result<()> {
        let src = TempDir::new()?;
        fs::write(src.path().join("package.json"), "{not json")?;
        let result = DirectoryIsolator::new(src.path())
            .with_main_file("index.ts")
            .isolate(&IsolateRequest::default());
        assert!(matches!(result, Err(IsolateError::Manifest { .. })));
        Ok(())
    }

    #[test]
    fn capsule_root_inside_component_is_not_copied() -> anyhow::Result<()> {
        let src = component_dir()?;
        let request = IsolateRequest {
            target_root: Some(src.path().join("capsules")),
            should_build_dependencies: false,
        };

        let isolated = DirectoryIsolator::new(src.path()).isolate(&request)?;
        let cap = isolated.capsule.path().to_path_buf();
        let cap_name = cap.file_name().unwrap().to_owned();

        assert!(cap.join("src/index.ts").exists());
        assert!(!cap.join("capsules").join(&cap_name).exists());
        assert!(isolated
            .component
            .files
            .iter()
            .all(|f| !f.starts_with("capsules")));

        isolated.capsule.destroy()?;
        Ok(())
    }

    #[test]
    fn kept_capsule_survives() -> anyhow::Result<()> {
        let src = component_dir()?;
        let isolated = DirectoryIsolator::new(src.path()).isolate(&IsolateRequest::default())?;
        let kept = isolated.capsule.keep();
        assert!(kept.join("src/index.ts").exists());
        fs::remove_dir_all(kept)?;
        Ok(())
    }
}
