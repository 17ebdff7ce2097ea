use std::fs;
use std::path::Path;
use std::process::Command;

use capsule_dist::artifact::Artifact;
use capsule_dist::assemble::{assemble, AllNonDist, DependencyFilesOnly};

fn capsule_dist_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_capsule-dist"))
}

fn write(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A capsule after the compiler has run: sources, dist outputs, and a
/// dependency tree with its own dist and `.dependencies` folders.
fn compiled_capsule() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let cap = tmp.path();
    write(cap, "package.json", r#"{"name":"button"}"#);
    write(cap, "src/index.ts", "export * from './button';");
    write(cap, "src/button.tsx", "export const Button = 1;");
    write(cap, "src/button.css", ".btn {}");
    write(cap, "dist/src/index.js", "export * from './button';");
    write(cap, "dist/src/button.js", "export const Button = 1;");
    write(cap, "dist/src/button.d.ts", "export declare const Button: number;");
    write(cap, "node_modules/tslib/package.json", r#"{"name":"tslib"}"#);
    write(cap, "node_modules/tslib/tslib.js", "var tslib;");
    write(cap, "node_modules/tslib/dist/tslib.es6.js", "export {};");
    write(cap, "node_modules/.dependencies/shared/util.js", "module.exports = {};");
    tmp
}

fn rels(artifacts: &[Artifact]) -> Vec<String> {
    artifacts.iter().map(Artifact::relative).collect()
}

// ---------------------------------------------------------------------------
// Library-level properties
// ---------------------------------------------------------------------------

#[test]
fn one_compiled_artifact_per_dist_file_with_identical_bytes() {
    let tmp = compiled_capsule();
    let assembly = assemble(tmp.path(), "src/index.ts", &DependencyFilesOnly).unwrap();

    assert_eq!(
        rels(&assembly.compiled),
        vec!["src/button.d.ts", "src/button.js", "src/index.js"]
    );
    for artifact in &assembly.compiled {
        let on_disk = fs::read(artifact.path()).unwrap();
        assert_eq!(artifact.contents(), on_disk.as_slice());
    }
}

#[test]
fn default_passthrough_excludes_dependencies_and_dist_segments() {
    let tmp = compiled_capsule();
    let assembly = assemble(tmp.path(), "src/index.ts", &DependencyFilesOnly).unwrap();

    assert_eq!(
        rels(&assembly.passthrough),
        vec![
            "node_modules/tslib/package.json",
            "node_modules/tslib/tslib.js"
        ]
    );
    for artifact in &assembly.passthrough {
        let rel = artifact.relative();
        assert!(!rel.contains(".dependencies"));
        assert!(!rel.split('/').any(|s| s == "dist"));
        assert_eq!(artifact.base(), tmp.path().join("dist"));
    }
}

#[test]
fn nested_entry_point_resolves_to_compiled_script() {
    let tmp = compiled_capsule();
    let assembly = assemble(tmp.path(), "src/index.ts", &DependencyFilesOnly).unwrap();
    assert_eq!(assembly.main_file, "src/index.js");
}

#[test]
fn unmatched_entry_point_is_empty() {
    let tmp = compiled_capsule();
    let assembly = assemble(tmp.path(), "src/missing.ts", &DependencyFilesOnly).unwrap();
    assert_eq!(assembly.main_file, "");
}

#[test]
fn compiled_and_passthrough_never_share_a_path() {
    let tmp = compiled_capsule();
    let assembly = assemble(tmp.path(), "src/index.ts", &AllNonDist).unwrap();

    for p in &assembly.passthrough {
        assert!(
            assembly.compiled.iter().all(|c| c.path() != p.path()),
            "{} appears in both sets",
            p.path().display()
        );
    }
}

#[test]
fn permissive_policy_passes_component_assets() {
    let tmp = compiled_capsule();
    let assembly = assemble(tmp.path(), "src/index.ts", &AllNonDist).unwrap();

    let passthrough = rels(&assembly.passthrough);
    assert!(passthrough.contains(&"src/button.css".to_string()));
    assert!(passthrough.contains(&"package.json".to_string()));
    assert!(!passthrough.iter().any(|r| r.ends_with(".ts") || r.ends_with(".tsx")));
}

#[test]
fn missing_dist_fails_whole_assembly() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "README.md", "# no dist");
    assert!(assemble(tmp.path(), "index.ts", &AllNonDist).is_err());
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[test]
fn readme_scenario_via_cli() {
    let tmp = tempfile::tempdir().unwrap();
    let cap = tmp.path().join("cap1");
    write(&cap, "dist/index.js", "console.log(1)");
    write(&cap, "README.md", "# cap1");

    let output = capsule_dist_cmd()
        .args([
            "assemble",
            cap.to_str().unwrap(),
            "--main",
            "index.ts",
            "--passthrough",
            "all",
            "--embed",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "assemble failed: {:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["version"], "capsule-dist.v0");
    assert_eq!(report["mainFile"], "index.js");

    let dists = report["dists"].as_array().unwrap();
    assert_eq!(dists.len(), 2);
    assert_eq!(dists[0]["path"], cap.join("dist/index.js").display().to_string());
    assert_eq!(dists[0]["relative"], "index.js");
    assert_eq!(dists[0]["contents_b64"], "Y29uc29sZS5sb2coMSk=");
    assert_eq!(dists[1]["relative"], "README.md");
    assert_eq!(dists[1]["path"], cap.join("dist/README.md").display().to_string());
}

#[test]
fn assemble_out_materialises_dists() {
    let tmp = compiled_capsule();
    let out = tempfile::tempdir().unwrap();
    let out_dir = out.path().join("dist_out");

    let output = capsule_dist_cmd()
        .args([
            "assemble",
            tmp.path().to_str().unwrap(),
            "--main",
            "src/index.ts",
            "--out",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "assemble failed: {:?}", output);

    assert_eq!(
        fs::read_to_string(out_dir.join("src/index.js")).unwrap(),
        "export * from './button';"
    );
    assert!(out_dir.join("node_modules/tslib/tslib.js").exists());
    assert!(!out_dir.join("src/index.ts").exists());
}

#[test]
fn compiled_output_wins_over_same_named_passthrough() {
    let tmp = tempfile::tempdir().unwrap();
    let cap = tmp.path().join("cap");
    write(&cap, "dist/util.js", "COMPILED");
    write(&cap, "util.js", "SOURCE-JS");
    let out_dir = tmp.path().join("out");

    let output = capsule_dist_cmd()
        .args([
            "assemble",
            cap.to_str().unwrap(),
            "--main",
            "util.ts",
            "--passthrough",
            "all",
            "--out",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "assemble failed: {:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rels: Vec<&str> = report["dists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["relative"].as_str().unwrap())
        .collect();
    assert_eq!(rels, vec!["util.js"]);
    assert_eq!(fs::read_to_string(out_dir.join("util.js")).unwrap(), "COMPILED");
}

#[test]
fn assemble_without_dist_refuses_with_e_io() {
    let tmp = tempfile::tempdir().unwrap();

    let output = capsule_dist_cmd()
        .args(["assemble", tmp.path().to_str().unwrap(), "--main", "index.ts"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let envelope: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(envelope["outcome"], "REFUSAL");
    assert_eq!(envelope["refusal"]["code"], "E_IO");
}
