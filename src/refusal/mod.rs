//! Refusals: every failure surfaces as one JSON envelope on stdout

pub mod codes;
pub mod envelope;

use serde_json::json;

pub use codes::RefusalCode;
pub use envelope::{RefusalDetail, RefusalEnvelope};

use crate::assemble::AssembleError;
use crate::build::BuildError;
use crate::compile::CompileError;
use crate::config::ConfigError;
use crate::isolate::IsolateError;
use crate::output::OutputError;

/// Map a failure to its refusal envelope.
pub trait ToRefusal {
    fn to_refusal(&self) -> RefusalEnvelope;
}

impl ToRefusal for AssembleError {
    fn to_refusal(&self) -> RefusalEnvelope {
        RefusalEnvelope::new(
            RefusalCode::Io,
            Some(self.to_string()),
            Some(json!({ "path": self.path().display().to_string() })),
        )
    }
}

impl ToRefusal for CompileError {
    fn to_refusal(&self) -> RefusalEnvelope {
        match self {
            CompileError::Failed { program, code, .. } => RefusalEnvelope::new(
                RefusalCode::Compile,
                Some(self.to_string()),
                Some(json!({ "program": program, "exit_code": code })),
            ),
            CompileError::Spawn { program, .. } => RefusalEnvelope::new(
                RefusalCode::Compile,
                Some(self.to_string()),
                Some(json!({ "program": program })),
            ),
            CompileError::Config { path, .. } => RefusalEnvelope::new(
                RefusalCode::Config,
                Some(self.to_string()),
                Some(json!({ "path": path.display().to_string() })),
            ),
            CompileError::WriteConfig { path, .. } => RefusalEnvelope::new(
                RefusalCode::Io,
                Some(self.to_string()),
                Some(json!({ "path": path.display().to_string() })),
            ),
        }
    }
}

impl ToRefusal for IsolateError {
    fn to_refusal(&self) -> RefusalEnvelope {
        RefusalEnvelope::new(RefusalCode::Isolate, Some(self.to_string()), None)
    }
}

impl ToRefusal for BuildError {
    fn to_refusal(&self) -> RefusalEnvelope {
        match self {
            BuildError::Isolate(e) => e.to_refusal(),
            BuildError::Compile(e) => e.to_refusal(),
            BuildError::Assemble(e) => e.to_refusal(),
        }
    }
}

impl ToRefusal for OutputError {
    fn to_refusal(&self) -> RefusalEnvelope {
        let detail = match self {
            OutputError::NotEmpty { path } | OutputError::Io { path, .. } => {
                json!({ "path": path.display().to_string() })
            }
            OutputError::DuplicatePath { relative, sources } => json!({
                "relative": relative,
                "sources": sources.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            }),
        };
        RefusalEnvelope::new(RefusalCode::Io, Some(self.to_string()), Some(detail))
    }
}

impl ToRefusal for ConfigError {
    fn to_refusal(&self) -> RefusalEnvelope {
        RefusalEnvelope::new(RefusalCode::Config, Some(self.to_string()), None)
    }
}
