use assert_cmd::Command;
use predicates::prelude::*;

fn fast_config_json() -> &'static str {
    r#"{
        "mount_side": "front",
        "scan_count": 2,
        "success_threshold": 2,
        "sample_pause_ms": 0,
        "first_scan_timeout_ms": 100
    }"#
}

#[test]
fn simulated_run_succeeds_and_prints_the_banner() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("run.json");
    std::fs::write(&config_path, fast_config_json()).unwrap();

    Command::cargo_bin("laser-calib")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .args(["--seed", "7", "--miss-rate", "0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCEEDED"))
        .stdout(predicate::str::contains("checkerboard points"));
}

#[test]
fn report_file_carries_the_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("run.json");
    let report_path = dir.path().join("report.json");
    std::fs::write(&config_path, fast_config_json()).unwrap();

    Command::cargo_bin("laser-calib")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("--report")
        .arg(&report_path)
        .args(["--seed", "3", "--miss-rate", "0.0"])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["outcome"], "succeeded");
    assert_eq!(report["success_count"], 2);
}

#[test]
fn unknown_mount_side_in_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("run.json");
    std::fs::write(&config_path, r#"{ "mount_side": "sideways" }"#).unwrap();

    Command::cargo_bin("laser-calib")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn unknown_mount_side_flag_is_fatal() {
    Command::cargo_bin("laser-calib")
        .unwrap()
        .args(["--mount-side", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("front"));
}
