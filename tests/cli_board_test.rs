//! Integration tests for backlog board commands via CLI.
//!
//! - `spm board add` saves the item before grooming and survives failures
//! - grooming responses patch the item but keep its id
//! - `spm board list/show/rm` read and rewrite the persisted backlog

mod common;

use common::{StubServer, TestEnv};
use predicates::prelude::*;

const GROOMED: &str = r#"{
    "id": "server-id",
    "title": "Login page",
    "description": "",
    "type": "feature",
    "status": "backlog",
    "quality_score": 90,
    "quality_issues": [{"issue_type": "vague", "suggestion": "Name the login providers"}],
    "refined_description": "Users sign in with email or SSO"
}"#;

// === Add Tests ===

#[test]
fn test_add_without_assistant_keeps_ungroomed_item() {
    let env = TestEnv::new();

    env.spm()
        .args(["board", "add", "Login page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"enrichment\":\"failed\""))
        .stdout(predicate::str::contains("\"title\":\"Login page\""))
        .stdout(predicate::str::contains("quality_score").not());

    let list = env.json(&["board", "list"]);
    assert_eq!(list["count"], 1);
    assert_eq!(list["items"][0]["status"], "backlog");
    assert_eq!(list["items"][0]["type"], "feature");
    assert!(env.backlog_path().exists());
}

#[test]
fn test_add_with_assistant_patches_item() {
    let server = StubServer::start(&[("/groom", 200, GROOMED)]);
    let env = TestEnv::with_server(&server);

    let added = env.json(&["board", "add", "Login page"]);
    assert_eq!(added["enrichment"], "enriched");
    assert_eq!(added["item"]["quality_score"], 90);
    assert_eq!(
        added["item"]["refined_description"],
        "Users sign in with email or SSO"
    );
    let id = added["item"]["id"].as_str().unwrap().to_string();
    assert_ne!(id, "server-id");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].path.ends_with("/api/groom"));
    assert!(requests[0].body.contains(&format!("\"id\":\"{}\"", id)));
    assert!(!requests[0].body.contains("quality_score"));

    let list = env.json(&["board", "list"]);
    assert_eq!(list["items"][0]["id"], id.as_str());
    assert_eq!(list["items"][0]["quality_issues"][0]["issue_type"], "vague");
}

#[test]
fn test_add_with_server_error_keeps_item() {
    let server = StubServer::start(&[("/groom", 500, r#"{"detail":"boom"}"#)]);
    let env = TestEnv::with_server(&server);

    let added = env.json(&["board", "add", "Flaky"]);
    assert_eq!(added["enrichment"], "failed");
    assert_eq!(env.json(&["board", "list"])["count"], 1);
}

#[test]
fn test_add_blank_title_fails() {
    let env = TestEnv::new();

    env.spm()
        .args(["board", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""));
    assert!(!env.backlog_path().exists());
}

#[test]
fn test_add_human() {
    let env = TestEnv::new();

    env.spm()
        .args(["board", "add", "Dark mode", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added saved without grooming"))
        .stdout(predicate::str::contains("Dark mode (feature, backlog)"));
}

// === List / Show Tests ===

#[test]
fn test_list_empty() {
    let env = TestEnv::new();

    let list = env.json(&["board", "list"]);
    assert_eq!(list["count"], 0);

    env.spm()
        .args(["board", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backlog is empty."));
}

#[test]
fn test_list_reads_legacy_items_with_missing_fields() {
    let env = TestEnv::new();
    std::fs::write(
        env.backlog_path(),
        r#"[{"id":"1","title":"Imported","type":"bug","status":"in_progress","quality_score":42}]"#,
    )
    .unwrap();

    env.spm()
        .args(["board", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[1] Imported (bug, in_progress) quality 42 Low",
        ));
}

#[test]
fn test_list_corrupt_backlog_is_empty() {
    let env = TestEnv::new();
    std::fs::write(env.backlog_path(), "{not json").unwrap();

    let listed = env.json(&["board", "list"]);
    assert_eq!(listed["count"], 0);
    assert_eq!(listed["items"], serde_json::json!([]));
}

#[test]
fn test_show_item() {
    let env = TestEnv::new();
    let added = env.json(&["board", "add", "Search"]);
    let id = added["item"]["id"].as_str().unwrap();

    let shown = env.json(&["board", "show", id]);
    assert_eq!(shown["item"]["title"], "Search");

    env.spm()
        .args(["board", "show", "nope", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Entity not found"));
}

// === Remove Tests ===

#[test]
fn test_rm_item() {
    let env = TestEnv::new();
    let first = env.json(&["board", "add", "First"]);
    env.json(&["board", "add", "Second"]);
    let id = first["item"]["id"].as_str().unwrap();

    let removed = env.json(&["board", "rm", id]);
    assert_eq!(removed["title"], "First");
    assert_eq!(removed["remaining"], 1);

    let list = env.json(&["board", "list"]);
    assert_eq!(list["count"], 1);
    assert_eq!(list["items"][0]["title"], "Second");
}

#[test]
fn test_rm_last_item_leaves_record_in_place() {
    let env = TestEnv::new();
    let added = env.json(&["board", "add", "Only"]);
    let id = added["item"]["id"].as_str().unwrap();

    let removed = env.json(&["board", "rm", id]);
    assert_eq!(removed["remaining"], 0);

    // An empty collection is never written, so the old record survives.
    let list = env.json(&["board", "list"]);
    assert_eq!(list["count"], 1);
    assert_eq!(list["items"][0]["title"], "Only");
}

#[test]
fn test_rm_missing_item_fails() {
    let env = TestEnv::new();

    env.spm()
        .args(["board", "rm", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
}
