use serde_json::{json, Value};

/// Return the compiled-in operator manifest for `--describe`.
pub fn operator_json() -> Value {
    json!({
        "name": "capsule-dist",
        "schema_version": "operator.v0",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Compile an isolated component capsule and assemble its dist artifacts, locating the compiled entry point.",
        "output_mode": "report",
        "subcommands": {
            "build": {
                "description": "Isolate a component, run the compiler, and assemble its dists",
                "output_mode": "report",
                "exit_codes": {
                    "0": "BUILT",
                    "2": "REFUSAL"
                }
            },
            "assemble": {
                "description": "Assemble dists from an already-compiled working directory",
                "output_mode": "report",
                "exit_codes": {
                    "0": "ASSEMBLED",
                    "2": "REFUSAL"
                }
            }
        },
        "refusal_codes": {
            "E_ISOLATE": "Component could not be isolated into a capsule",
            "E_COMPILE": "Compiler could not be spawned or exited non-zero",
            "E_IO": "Cannot list, read, or write a file (including a missing dist directory)",
            "E_CONFIG": "Invalid build config or compiler config"
        },
        "global_flags": ["--describe", "--schema", "--version", "--verbose"]
    })
}
