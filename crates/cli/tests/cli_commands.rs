use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use hostdiff_core::db::{SnapshotDb, StoreLayout};
use predicates::prelude::*;
use tempfile::tempdir;

const SNAP_A: &str = r#"{
    "timestamp": "2025-09-10T03:00:00Z",
    "ip": "125.199.235.74",
    "services": [
        {"port": 80, "protocol": "HTTP", "status": 200,
         "software": {"vendor": "microsoft", "product": "internet_information_services", "version": "8.5"}}
    ],
    "service_count": 1
}"#;

const SNAP_B: &str = r#"{
    "timestamp": "2025-09-15T08:49:45Z",
    "ip": "125.199.235.74",
    "services": [
        {"port": 80, "protocol": "HTTP", "status": 301,
         "software": {"vendor": "microsoft", "product": "internet_information_services", "version": "8.5"}},
        {"port": 443, "protocol": "HTTPS", "status": 200,
         "vulnerabilities": ["CVE-2023-99999"]}
    ],
    "service_count": 2
}"#;

fn init(root: &Path) {
    cargo_bin_cmd!("host-diff").arg("init").arg("--root").arg(root).assert().success();
}

fn upload(root: &Path, file: &Path) {
    cargo_bin_cmd!("host-diff")
        .arg("upload")
        .arg("--root")
        .arg(root)
        .arg("--file")
        .arg(file)
        .assert()
        .success();
}

#[test]
fn init_uses_current_dir_when_root_not_provided() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    cargo_bin_cmd!("host-diff")
        .current_dir(root)
        .env_remove("HOSTDIFF_ROOT")
        .arg("init")
        .arg("--name")
        .arg("TestStore")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: TestStore"));

    let layout = StoreLayout::new(root);
    assert!(layout.config_path.exists());
    assert!(layout.db_path.exists());
    assert!(layout.snapshots_dir.is_dir());
}

#[test]
fn status_fails_when_config_missing() {
    let dir = tempdir().expect("tempdir");
    cargo_bin_cmd!("host-diff")
        .arg("status")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read store config"));
}

#[test]
fn upload_then_diff_stored_snapshots() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);

    let a = root.join("a.json");
    let b = root.join("b.json");
    fs::write(&a, SNAP_A).unwrap();
    fs::write(&b, SNAP_B).unwrap();
    upload(root, &a);
    upload(root, &b);

    let db = SnapshotDb::open(&StoreLayout::new(root).db_path).expect("open db");
    assert_eq!(db.list_hosts().unwrap(), vec!["125.199.235.74"]);
    assert_eq!(
        db.list_timestamps("125.199.235.74").unwrap(),
        vec!["2025-09-10T03:00:00Z", "2025-09-15T08:49:45Z"]
    );

    let output = cargo_bin_cmd!("host-diff")
        .arg("diff")
        .arg("--root")
        .arg(root)
        .arg("--ip")
        .arg("125.199.235.74")
        .arg("--from")
        .arg("2025-09-10T03:00:00Z")
        .arg("--to")
        .arg("2025-09-15T08:49:45Z")
        .arg("--format")
        .arg("json")
        .output()
        .expect("run diff");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(value["ip"], "125.199.235.74");
    assert_eq!(
        value["diff"]["services_added"],
        serde_json::json!([{"port": 443, "protocol": "HTTPS"}])
    );
    assert_eq!(value["diff"]["services_removed"], serde_json::json!([]));
    assert_eq!(
        value["diff"]["services_modified"][0]["changes"]["status"],
        serde_json::json!({"from": 200, "to": 301})
    );
}

#[test]
fn upload_uses_filename_fallback() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);

    let file = root.join("host_10.0.0.1_2025-09-10T03-00-00Z.json");
    fs::write(&file, r#"{"services": [{"port": 22, "protocol": "SSH"}]}"#).unwrap();

    cargo_bin_cmd!("host-diff")
        .arg("upload")
        .arg("--root")
        .arg(root)
        .arg("--file")
        .arg(&file)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ip\": \"10.0.0.1\""))
        .stdout(predicate::str::contains("\"timestamp\": \"2025-09-10T03:00:00Z\""));

    cargo_bin_cmd!("host-diff")
        .arg("snapshots")
        .arg("--root")
        .arg(root)
        .arg("--ip")
        .arg("10.0.0.1")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-09-10T03:00:00Z"));
}

#[test]
fn upload_rejects_invalid_json_and_missing_identity() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);

    let bad = root.join("bad.json");
    fs::write(&bad, "not json").unwrap();
    cargo_bin_cmd!("host-diff")
        .arg("upload")
        .arg("--root")
        .arg(root)
        .arg("--file")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));

    let anon = root.join("scan.json");
    fs::write(&anon, r#"{"services": []}"#).unwrap();
    cargo_bin_cmd!("host-diff")
        .arg("upload")
        .arg("--root")
        .arg(root)
        .arg("--file")
        .arg(&anon)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing 'ip' or 'timestamp'"));
}

#[test]
fn diff_fails_for_unknown_snapshot() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);

    cargo_bin_cmd!("host-diff")
        .arg("diff")
        .arg("--root")
        .arg(root)
        .arg("--ip")
        .arg("192.0.2.1")
        .arg("--from")
        .arg("a")
        .arg("--to")
        .arg("b")
        .assert()
        .failure()
        .stderr(predicate::str::contains("One or both snapshots not found"));
}

#[test]
fn diff_files_prints_text_report() {
    let dir = tempdir().expect("tempdir");
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    fs::write(&a, SNAP_A).unwrap();
    fs::write(&b, SNAP_B).unwrap();

    cargo_bin_cmd!("host-diff")
        .arg("diff-files")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("+ 443/HTTPS"))
        .stdout(predicate::str::contains("~ 80/HTTP"))
        .stdout(predicate::str::contains("status: 200 -> 301"));
}

#[test]
fn diff_files_yaml_output() {
    let dir = tempdir().expect("tempdir");
    let a = dir.path().join("a.json");
    fs::write(&a, SNAP_A).unwrap();

    cargo_bin_cmd!("host-diff")
        .arg("diff-files")
        .arg(&a)
        .arg(&a)
        .arg("--format")
        .arg("yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains("services_added: []"));
}

#[test]
fn hosts_and_status_json() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);
    let a = root.join("a.json");
    fs::write(&a, SNAP_A).unwrap();
    upload(root, &a);

    let output = cargo_bin_cmd!("host-diff")
        .arg("hosts")
        .arg("--root")
        .arg(root)
        .arg("--json")
        .output()
        .unwrap();
    let hosts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hosts, serde_json::json!({"hosts": ["125.199.235.74"]}));

    let output = cargo_bin_cmd!("host-diff")
        .arg("status")
        .arg("--root")
        .arg(root)
        .arg("--json")
        .output()
        .unwrap();
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["status"], "ok");
    assert_eq!(status["stats"], serde_json::json!({"hosts": 1, "snapshots": 1}));
}

#[test]
fn show_prints_stored_document() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);
    let a = root.join("a.json");
    fs::write(&a, SNAP_A).unwrap();
    upload(root, &a);

    cargo_bin_cmd!("host-diff")
        .arg("show")
        .arg("--root")
        .arg(root)
        .arg("--ip")
        .arg("125.199.235.74")
        .arg("--timestamp")
        .arg("2025-09-10T03:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("internet_information_services"));

    cargo_bin_cmd!("host-diff")
        .arg("show")
        .arg("--root")
        .arg(root)
        .arg("--ip")
        .arg("125.199.235.74")
        .arg("--timestamp")
        .arg("1999-01-01T00:00:00Z")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snapshot not found"));
}
