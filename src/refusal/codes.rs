//! Refusal codes

use std::fmt;

use serde::{Deserialize, Serialize};

/// Refusal codes for capsule-dist operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefusalCode {
    /// The isolation step could not produce a working directory
    #[serde(rename = "E_ISOLATE")]
    Isolate,

    /// The external compiler could not be spawned or exited non-zero
    #[serde(rename = "E_COMPILE")]
    Compile,

    /// Cannot list, read, or write a file
    #[serde(rename = "E_IO")]
    Io,

    /// Invalid build configuration or compiler config
    #[serde(rename = "E_CONFIG")]
    Config,
}

impl RefusalCode {
    /// Stable code string as it appears in the envelope
    pub fn as_str(&self) -> &'static str {
        match self {
            RefusalCode::Isolate => "E_ISOLATE",
            RefusalCode::Compile => "E_COMPILE",
            RefusalCode::Io => "E_IO",
            RefusalCode::Config => "E_CONFIG",
        }
    }

    /// Message used when the error gives none
    pub fn default_message(&self) -> &'static str {
        match self {
            RefusalCode::Isolate => "Cannot isolate component",
            RefusalCode::Compile => "Compiler failed",
            RefusalCode::Io => "IO operation failed",
            RefusalCode::Config => "Invalid configuration",
        }
    }

    /// Suggested next action
    pub fn next_command(&self) -> Option<String> {
        match self {
            RefusalCode::Isolate => {
                Some("Check the component directory and its main file".to_string())
            }
            RefusalCode::Compile => {
                Some("Re-run with --keep-capsule -v and inspect the capsule".to_string())
            }
            RefusalCode::Io => Some("Check paths/permissions".to_string()),
            RefusalCode::Config => None,
        }
    }
}

impl fmt::Display for RefusalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
