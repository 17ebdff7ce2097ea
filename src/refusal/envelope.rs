use serde::{Deserialize, Serialize};

use super::RefusalCode;
use crate::output::REPORT_VERSION;

/// Detail payload within a refusal envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefusalDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    pub next_command: Option<String>,
}

/// The full refusal envelope emitted on stdout (exit 2).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefusalEnvelope {
    pub version: String,
    pub outcome: String,
    pub refusal: RefusalDetail,
}

impl RefusalEnvelope {
    /// Build a refusal envelope from a code, optional message override, and optional detail.
    pub fn new(
        code: RefusalCode,
        message: Option<String>,
        detail: Option<serde_json::Value>,
    ) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            outcome: "REFUSAL".to_string(),
            refusal: RefusalDetail {
                code: code.as_str().to_string(),
                message: message.unwrap_or_else(|| code.default_message().to_string()),
                detail,
                next_command: code.next_command(),
            },
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("refusal envelope serialization cannot fail")
    }
}
