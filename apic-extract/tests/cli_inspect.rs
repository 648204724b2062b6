use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn apic() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("apic-extract"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn describe_prints_counts() {
    apic()
        .arg("describe")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "total_count=1 nodes=21 max_depth=3 top_level_children=6",
        ))
        .stdout(predicate::str::contains("- fvBD: 2"))
        .stdout(predicate::str::contains("- fvAEPg: 2"));
}

#[test]
fn describe_json_reports_class_counts() {
    let output = apic()
        .arg("describe")
        .arg(fixture("fixtures/tn-scenario.json"))
        .arg("--format")
        .arg("json")
        .output()
        .expect("run describe");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("describe emits JSON");
    assert_eq!(summary["class_counts"]["fvBD"], 2);
    assert_eq!(summary["class_counts"]["fvAp"], 1);
    assert_eq!(summary["top_level_children"], 3);
}

#[test]
fn list_preview_follows_config_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("apic.toml");
    fs::write(&config, "[list]\npreview_limit = 2\n").expect("write config");

    apic()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[0] fvCtx name=VRF_PROD"))
        .stdout(predicate::str::contains("[1] fvBD name=BD_484"))
        .stdout(predicate::str::contains("[2]").not())
        .stdout(predicate::str::contains("... (4 more)"));
}

#[test]
fn list_all_shows_every_child() {
    apic()
        .arg("list")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .arg("--all")
        .assert()
        .success()
        .stdout(predicate::str::contains("[5] vzBrCP name=CT_WEB_DB"))
        .stdout(predicate::str::contains("more)").not());
}

#[test]
fn inspect_limits_depth() {
    apic()
        .arg("inspect")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .arg("--depth")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 fvTenant Datacenter1"))
        .stdout(predicate::str::contains("  0.5 vzBrCP CT_WEB_DB"))
        .stdout(predicate::str::contains("0.5.0").not());
}

#[test]
fn find_by_class_lists_paths() {
    apic()
        .arg("find")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .arg("--class")
        .arg("fvBD")
        .assert()
        .success()
        .stdout(predicate::str::contains("matched=2"))
        .stdout(predicate::str::contains("0.1 fvBD name=BD_484"))
        .stdout(predicate::str::contains("0.3 fvBD name=BD_721"));
}

#[test]
fn find_by_name_across_depths_as_json() {
    let output = apic()
        .arg("find")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .arg("--name")
        .arg("EPG_DB,FLT_SQL")
        .arg("--format")
        .arg("json")
        .output()
        .expect("run find");
    assert!(output.status.success());

    let found: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    let paths: Vec<&str> = found
        .as_array()
        .expect("array")
        .iter()
        .map(|entry| entry["path"].as_str().expect("path string"))
        .collect();
    assert_eq!(paths, vec!["0.2.1", "0.4"]);
}

#[test]
fn find_without_selection_fails() {
    apic()
        .arg("find")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to find"));
}

#[test]
fn malformed_export_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = dir.path().join("broken.json");
    fs::write(&broken, r#"{"totalCount": "1", "imdata": [{"fvTenant": {"attributes": {"name": 5}}}]}"#)
        .expect("write broken export");

    apic()
        .arg("describe")
        .arg(&broken)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}
