use serde_json::{json, Value};

/// Return the JSON Schema for the capsule-dist.v0 report and refusal envelope.
pub fn report_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "capsule-dist.v0",
        "title": "capsule-dist.v0 report and refusal schema",
        "definitions": {
            "report": {
                "type": "object",
                "required": ["version", "created", "dists"],
                "properties": {
                    "version": { "type": "string", "const": "capsule-dist.v0" },
                    "created": { "type": "string", "format": "date-time" },
                    "component": { "type": "string" },
                    "dependencies": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Custom dependency names declared by the component"
                    },
                    "capsule_dir": { "type": "string" },
                    "mainFile": {
                        "type": "string",
                        "description": "Relative path of the compiled entry point; empty when unresolved, absent when compilation was skipped"
                    },
                    "dists": {
                        "type": "array",
                        "items": { "$ref": "#/definitions/dist" }
                    }
                },
                "additionalProperties": false
            },
            "dist": {
                "type": "object",
                "required": ["path", "relative", "base", "bytes_hash", "size"],
                "properties": {
                    "path": { "type": "string" },
                    "relative": { "type": "string" },
                    "base": { "type": "string" },
                    "bytes_hash": {
                        "type": "string",
                        "pattern": "^sha256:[a-f0-9]{64}$"
                    },
                    "size": { "type": "integer", "minimum": 0 },
                    "contents_b64": { "type": "string", "contentEncoding": "base64" }
                },
                "additionalProperties": false
            },
            "refusal": {
                "type": "object",
                "required": ["version", "outcome", "refusal"],
                "properties": {
                    "version": { "type": "string", "const": "capsule-dist.v0" },
                    "outcome": { "type": "string", "const": "REFUSAL" },
                    "refusal": {
                        "type": "object",
                        "required": ["code", "message", "next_command"],
                        "properties": {
                            "code": {
                                "type": "string",
                                "enum": ["E_ISOLATE", "E_COMPILE", "E_IO", "E_CONFIG"]
                            },
                            "message": { "type": "string" },
                            "detail": { "type": "object" },
                            "next_command": { "type": ["string", "null"] }
                        }
                    }
                },
                "additionalProperties": false
            }
        }
    })
}
