//! Build report and dist materialisation

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;

pub const REPORT_VERSION: &str = "capsule-dist.v0";

/// One artifact in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistEntry {
    pub path: String,
    pub relative: String,
    pub base: String,
    pub bytes_hash: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents_b64: Option<String>,
}

impl DistEntry {
    /// Describe `artifact`, embedding its bytes as base64 when `embed` is set.
    pub fn from_artifact(artifact: &Artifact, embed: bool) -> Self {
        Self {
            path: artifact.path().display().to_string(),
            relative: artifact.relative(),
            base: artifact.base().display().to_string(),
            bytes_hash: artifact.bytes_hash(),
            size: artifact.size(),
            contents_b64: embed
                .then(|| base64::engine::general_purpose::STANDARD.encode(artifact.contents())),
        }
    }
}

/// Report printed on stdout after `build` and `assemble`.
///
/// `mainFile` is omitted entirely when compilation was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistReport {
    pub version: String,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule_dir: Option<String>,
    #[serde(rename = "mainFile", skip_serializing_if = "Option::is_none")]
    pub main_file: Option<String>,
    pub dists: Vec<DistEntry>,
}

impl DistReport {
    /// Build a report over `dists`; `main_file` is `None` when compilation was skipped.
    pub fn new(dists: &[Artifact], main_file: Option<String>, embed: bool) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            created: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            component: None,
            dependencies: Vec::new(),
            capsule_dir: None,
            main_file,
            dists: dists
                .iter()
                .map(|a| DistEntry::from_artifact(a, embed))
                .collect(),
        }
    }

    /// Name the built component.
    pub fn with_component(mut self, name: impl Into<String>) -> Self {
        self.component = Some(name.into());
        self
    }

    /// Record the component's custom dependency names.
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Record the kept capsule directory, if any.
    pub fn with_capsule_dir(mut self, dir: Option<&Path>) -> Self {
        self.capsule_dir = dir.map(|d| d.display().to_string());
        self
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("dist report serialization cannot fail")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("output directory already exists and is non-empty: {}", path.display())]
    NotEmpty { path: PathBuf },
    #[error("duplicate dist path '{relative}' from {} sources", sources.len())]
    DuplicatePath {
        relative: String,
        sources: Vec<PathBuf>,
    },
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write every artifact to `out_dir/<relative>`.
///
/// Refuses an existing non-empty `out_dir` and artifacts sharing a relative
/// path; nothing is written in either case. Returns the number of files written.
pub fn write_dists(artifacts: &[Artifact], out_dir: &Path) -> Result<usize, OutputError> {
    check_unique_relatives(artifacts)?;

    if out_dir.exists() {
        let mut entries = fs::read_dir(out_dir).map_err(|source| OutputError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;
        if entries.next().is_some() {
            return Err(OutputError::NotEmpty {
                path: out_dir.to_path_buf(),
            });
        }
    }

    for artifact in artifacts {
        let dest = out_dir.join(artifact.relative());
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&dest, artifact.contents()).map_err(|source| OutputError::Io {
            path: dest.clone(),
            source,
        })?;
    }

    tracing::debug!(count = artifacts.len(), out = %out_dir.display(), "wrote dists");
    Ok(artifacts.len())
}

fn check_unique_relatives(artifacts: &[Artifact]) -> Result<(), OutputError> {
    let mut by_relative: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for artifact in artifacts {
        by_relative
            .entry(artifact.relative())
            .or_default()
            .push(artifact.path().to_path_buf());
    }
    match by_relative.into_iter().find(|(_, sources)| sources.len() > 1) {
        Some((relative, sources)) => Err(OutputError::DuplicatePath { relative, sources }),
        None => Ok(()),
    }
}
