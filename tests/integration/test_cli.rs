use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ARTICLE: &str = r#"{
  "name": "article",
  "supports": ["App\\Entity\\Article"],
  "initialMarking": "draft",
  "places": {"draft": {}, "review": {}, "done": {}, "orphan": {}},
  "transitions": {
    "submit": {"from": "draft", "to": "review", "label": "Submit"},
    "approve": {"from": "review", "to": "done", "guard": "is_granted('ROLE_EDITOR')"}
  }
}"#;

const BROKEN: &str = r#"
pimcore:
  workflows:
    Broken:
      supports: [App\Entity\Article]
      initial_markings: [draft]
      places: [draft]
      transitions:
        go:
          from: draft
          to: missing
"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("article.json"), ARTICLE).unwrap();
    fs::write(dir.path().join("broken.yaml"), BROKEN).unwrap();
    dir
}

fn designer(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("workflow-designer").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").env("WFD_LOG_LEVEL", "error");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = workspace();
    designer(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKFLOW COMMANDS"))
        .stdout(predicate::str::contains("publish"));
}

#[test]
fn test_validate_reports_warnings_and_succeeds() {
    let dir = workspace();
    designer(dir.path())
        .args(["validate", "article.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Place \"orphan\" is not reachable"))
        .stdout(predicate::str::contains("Workflow \"article\" is valid"));
}

#[test]
fn test_validate_fails_on_errors() {
    let dir = workspace();
    designer(dir.path())
        .args(["validate", "broken.yaml", "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("WFD-LINT-001"))
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn test_analyze_lists_unreachable_places() {
    let dir = workspace();
    designer(dir.path())
        .args(["analyze", "article.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reachable: draft, review, done"))
        .stdout(predicate::str::contains("Unreachable: orphan"))
        .stdout(predicate::str::contains("Cycles: (none)"));
}

#[test]
fn test_paths_respects_max_depth() {
    let dir = workspace();
    designer(dir.path())
        .args(["paths", "article.json", "--max-depth", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft --submit--> review ..."));
}

#[test]
fn test_simulate_applies_transitions_in_order() {
    let dir = workspace();
    designer(dir.path())
        .args(["simulate", "article.json", "--apply", "submit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft --submit--> review"))
        .stdout(predicate::str::contains("[guard: is_granted('ROLE_EDITOR')]"));

    designer(dir.path())
        .args(["simulate", "article.json", "--apply", "approve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Transition \"approve\" cannot be applied from place \"draft\". Expected: review",
        ));
}

#[test]
fn test_export_to_stdout_and_file() {
    let dir = workspace();
    designer(dir.path())
        .args(["export", "article.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pimcore:"));

    designer(dir.path())
        .args(["export", "article.json", "--format", "json", "--output", "out/article.json"])
        .assert()
        .success();
    let exported = fs::read_to_string(dir.path().join("out").join("article.json")).unwrap();
    assert!(exported.contains("\"initialMarking\": \"draft\""));
}

#[test]
fn test_publish_writes_yaml_and_backs_up_previous() {
    let dir = workspace();
    designer(dir.path())
        .args(["publish", "article.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Published workflow \"article\""));
    let target = dir.path().join("config").join("workflows").join("article.yaml");
    assert!(target.exists());

    designer(dir.path())
        .args(["publish", "article.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backed up previous version"));
    let backups = fs::read_dir(dir.path().join("var").join("workflow_designer").join("backups"))
        .unwrap()
        .count();
    assert_eq!(backups, 1);

    designer(dir.path())
        .args(["diff", "article.json", "config/workflows/article.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_publish_refuses_invalid_workflow() {
    let dir = workspace();
    designer(dir.path())
        .args(["publish", "broken.yaml", "--publish-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has validation errors"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = workspace();
    fs::write(dir.path().join("flow.xml"), "<workflow/>").unwrap();
    designer(dir.path())
        .args(["analyze", "flow.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: xml"));
}
