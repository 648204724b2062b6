use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use serde_json::Value;

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

fn tenant_children(export: &Value) -> Vec<String> {
    export["imdata"][0]["fvTenant"]["children"]
        .as_array()
        .map(|children| {
            children
                .iter()
                .map(|child| {
                    let (class, body) = child.as_object().expect("object").iter().next().expect("class key");
                    format!("{class}:{}", body["attributes"]["name"].as_str().unwrap_or(""))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn extract_positions_in_document_order() {
    let output = apic()
        .arg("extract")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .arg("--positions")
        .arg("3,1")
        .output()
        .expect("run extract");
    assert!(output.status.success());

    let export: Value = serde_json::from_slice(&output.stdout).expect("extract emits JSON");
    assert_eq!(export["totalCount"], "1");
    assert_eq!(
        export["imdata"][0]["fvTenant"]["attributes"]["name"],
        "Datacenter1"
    );
    assert_eq!(
        tenant_children(&export),
        vec!["fvBD:BD_484".to_string(), "fvBD:BD_721".to_string()]
    );
    assert_eq!(
        export["imdata"][0]["fvTenant"]["children"][0]["fvBD"]["children"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
}

#[test]
fn extract_nested_path_keeps_ancestor_chain() {
    let output = apic()
        .arg("extract")
        .arg(fixture("fixtures/tn-datacenter.json"))
        .arg("--path")
        .arg("0.2.1")
        .output()
        .expect("run extract");
    assert!(output.status.success());

    let export: Value = serde_json::from_slice(&output.stdout).expect("JSON");
    let ap = &export["imdata"][0]["fvTenant"]["children"][0]["fvAp"];
    assert_eq!(ap["attributes"]["name"], "AP_SHOP");
    let epgs = ap["children"].as_array().expect("ap keeps matched child");
    assert_eq!(epgs.len(), 1);
    assert_eq!(epgs[0]["fvAEPg"]["attributes"]["name"], "EPG_DB");
    assert_eq!(epgs[0]["fvAEPg"]["children"].as_array().map(Vec::len), Some(2));
}

#[test]
fn extract_with_status_marks_copy_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("tn.json");
    fs::copy(fixture("fixtures/tn-scenario.json"), &source).expect("copy fixture");
    let before = fs::read(&source).expect("read source");
    let out = dir.path().join("bds.json");

    apic()
        .arg("extract")
        .arg(&source)
        .arg("--class")
        .arg("fvBD")
        .arg("--set-status")
        .arg("created")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let export: Value = serde_json::from_slice(&fs::read(&out).expect("read output")).expect("JSON");
    let children = export["imdata"][0]["fvTenant"]["children"].as_array().expect("children");
    assert_eq!(children.len(), 2);
    for child in children {
        assert_eq!(child["fvBD"]["attributes"]["status"], "created");
    }
    assert!(export["imdata"][0]["fvTenant"]["attributes"]["status"].is_null());
    assert_eq!(fs::read(&source).expect("reread source"), before);
}

#[test]
fn extract_out_of_range_position_fails() {
    apic()
        .arg("extract")
        .arg(fixture("fixtures/tn-scenario.json"))
        .arg("--position")
        .arg("3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("position 3 is out of range (valid range 0..3)"));
}

#[test]
fn extract_unknown_class_yields_empty_export() {
    let output = apic()
        .arg("extract")
        .arg(fixture("fixtures/tn-scenario.json"))
        .arg("--class")
        .arg("fvCtx")
        .output()
        .expect("run extract");
    assert!(output.status.success());

    let export: Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(export["totalCount"], "0");
    assert_eq!(export["imdata"].as_array().map(Vec::len), Some(0));
}

#[test]
fn extract_refuses_to_overwrite_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("tn.json");
    fs::copy(fixture("fixtures/tn-scenario.json"), &source).expect("copy fixture");

    apic()
        .arg("extract")
        .arg(&source)
        .arg("--position")
        .arg("0")
        .arg("--output")
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source export"));
}

#[test]
fn extract_without_selection_fails() {
    apic()
        .arg("extract")
        .arg(fixture("fixtures/tn-scenario.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to extract"));
}
