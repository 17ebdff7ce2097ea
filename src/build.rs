//! End-to-end compiler action: isolate, compile, assemble, clean up

use std::path::{Path, PathBuf};

use crate::artifact::Artifact;
use crate::assemble::{self, is_source_file, AssembleError, ExclusionPolicy};
use crate::compile::{self, CompileError};
use crate::config::BuildOptions;
use crate::isolate::{Capsule, Component, IsolateError, IsolateRequest, Isolated, Isolator};

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub component: String,
    /// Custom dependency names declared by the component.
    pub dependencies: Vec<String>,
    /// Compiled artifacts followed by passthrough artifacts.
    pub dists: Vec<Artifact>,
    /// `None` when compilation was skipped; otherwise the resolved entry
    /// point, possibly empty.
    pub main_file: Option<String>,
    /// Capsule left on disk when `keep_capsule` was set.
    pub kept_capsule: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Isolate(#[from] IsolateError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Build one component.
///
/// Steps:
/// 1. Isolate the component into a capsule
/// 2. Write the compiler config when one is configured
/// 3. Skip the compiler when no file needs compiling; collect passthrough only
/// 4. Otherwise run the compiler and assemble compiled + passthrough outputs
/// 5. Destroy the capsule unless it is kept
///
/// The capsule is cleaned up on failure as well; the first error wins.
pub fn execute_build(
    isolator: &dyn Isolator,
    options: &BuildOptions,
    policy: &dyn ExclusionPolicy,
) -> Result<BuildResult, BuildError> {
    let request = IsolateRequest {
        target_root: options.capsule_root.clone(),
        should_build_dependencies: options.build_dependencies,
    };
    let Isolated { component, capsule } = isolator.isolate(&request)?;
    tracing::info!(
        "building {} on directory {}",
        component.name,
        capsule.path().display()
    );

    let outcome = compile_and_assemble(&component, capsule.path(), options, policy);
    let kept = release(capsule, options.keep_capsule);
    let (dists, main_file) = outcome?;

    Ok(BuildResult {
        component: component.name,
        dependencies: component.dependencies,
        dists,
        main_file,
        kept_capsule: kept?,
    })
}

fn compile_and_assemble(
    component: &Component,
    working_dir: &Path,
    options: &BuildOptions,
    policy: &dyn ExclusionPolicy,
) -> Result<(Vec<Artifact>, Option<String>), BuildError> {
    if let Some(config) = &options.compiler_config {
        compile::write_compiler_config(working_dir, config)?;
    }

    if !needs_compilation(&component.files) {
        tracing::info!("{}: nothing to compile, collecting files as-is", component.name);
        let dists = assemble::collect_passthrough(working_dir, policy)?;
        return Ok((dists, None));
    }

    compile::run_compiler_in_dir(working_dir, &options.compiler, &options.args)?;
    let (dists, main_file) =
        assemble::assemble(working_dir, &component.main_file, policy)?.into_dists();
    if main_file.is_empty() {
        tracing::warn!(
            "{}: no compiled output matches main file {}",
            component.name,
            component.main_file
        );
    }

    Ok((dists, Some(main_file)))
}

/// Whether any component file carries a source extension.
pub fn needs_compilation(files: &[PathBuf]) -> bool {
    files.iter().any(|f| is_source_file(f))
}

fn release(capsule: Box<dyn Capsule>, keep: bool) -> Result<Option<PathBuf>, BuildError> {
    if keep {
        let path = capsule.keep();
        tracing::info!("keeping capsule at {}", path.display());
        Ok(Some(path))
    } else {
        capsule.destroy()?;
        Ok(None)
    }
}
