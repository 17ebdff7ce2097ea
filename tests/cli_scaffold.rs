use std::process::Command;

fn capsule_dist_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_capsule-dist"))
}

#[test]
fn version_flag_exits_0() {
    let output = capsule_dist_cmd().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("capsule-dist "));
}

#[test]
fn help_flag_exits_0() {
    let output = capsule_dist_cmd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("build"));
    assert!(stdout.contains("assemble"));
}

#[test]
fn describe_short_circuits_before_validation() {
    let output = capsule_dist_cmd().arg("--describe").output().unwrap();
    assert!(output.status.success());
    let op: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(op["name"], "capsule-dist");
}

#[test]
fn schema_short_circuits_before_validation() {
    let output = capsule_dist_cmd().arg("--schema").output().unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["$id"], "capsule-dist.v0");
}

#[test]
fn no_command_exits_2() {
    let output = capsule_dist_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn assemble_requires_main() {
    let output = capsule_dist_cmd()
        .args(["assemble", "some_dir"])
        .output()
        .unwrap();
    // clap usage error
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_passthrough_policy_is_rejected() {
    let output = capsule_dist_cmd()
        .args(["assemble", "some_dir", "--main", "index.ts", "--passthrough", "everything"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dependencies"));
}
