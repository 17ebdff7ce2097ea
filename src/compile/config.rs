//! Generated compiler configuration (`tsconfig.json`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::CompileError;
use crate::assemble::DIST_DIR;

pub const COMPILER_CONFIG_FILE: &str = "tsconfig.json";

/// Write `content` as the compiler config inside `dir`, with
/// `compilerOptions.outDir` forced to `dist`.
///
/// Returns the written path. The file is indented with four spaces.
pub fn write_compiler_config(dir: &Path, content: &Value) -> Result<PathBuf, CompileError> {
    let path = dir.join(COMPILER_CONFIG_FILE);
    let config = with_dist_out_dir(content)?;
    let bytes = to_four_space_json(&config).map_err(|e| CompileError::Config {
        path: path.clone(),
        error: e.to_string(),
    })?;

    fs::write(&path, bytes).map_err(|source| CompileError::WriteConfig {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote compiler config");

    Ok(path)
}

/// Copy of `content` with `compilerOptions.outDir = "dist"`.
pub fn with_dist_out_dir(content: &Value) -> Result<Value, CompileError> {
    let mut config = content.clone();
    let Value::Object(root) = &mut config else {
        return Err(CompileError::Config {
            path: PathBuf::from(COMPILER_CONFIG_FILE),
            error: "compiler config must be a JSON object".to_string(),
        });
    };

    let options = root
        .entry("compilerOptions")
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(options) = options else {
        return Err(CompileError::Config {
            path: PathBuf::from(COMPILER_CONFIG_FILE),
            error: "compilerOptions must be a JSON object".to_string(),
        });
    };
    options.insert("outDir".to_string(), Value::String(DIST_DIR.to_string()));

    Ok(config)
}

fn to_four_space_json(value: &Value) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
