//! Integration tests for roadmap generation and layout via CLI.

mod common;

use common::{StubServer, TestEnv};
use predicates::prelude::*;

const PLAN: &str = r#"{
    "items": [
        {"item_id": "2", "week": 1, "dependencies": [], "risk_level": "low"},
        {"item_id": "1", "week": 2, "dependencies": ["2"], "risk_level": "medium"},
        {"item_id": "3", "week": 2, "dependencies": ["2"], "risk_level": "high"}
    ],
    "warnings": ["Payment Gateway depends on an external vendor"]
}"#;

#[test]
fn test_generate_with_empty_backlog_plans_sample_items() {
    let server = StubServer::start(&[("/roadmap", 200, PLAN)]);
    let env = TestEnv::with_server(&server);

    let roadmap = env.json(&["roadmap", "generate"]);
    assert_eq!(roadmap["sample_data"], true);
    assert_eq!(roadmap["horizon"], 4);
    assert_eq!(roadmap["weeks"].as_array().unwrap().len(), 4);
    assert_eq!(roadmap["weeks"][1]["items"][1]["risk_level"], "high");
    assert_eq!(roadmap["weeks"][2]["open_capacity"], true);
    assert_eq!(
        roadmap["warnings"][0],
        "Payment Gateway depends on an external vendor"
    );

    let sent: serde_json::Value = serde_json::from_str(&server.requests()[0].body).unwrap();
    let titles: Vec<&str> = sent
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["User Profile", "Auth System", "Payment Gateway"]);
    assert_eq!(sent[1]["type"], "chore");

    // Sample items are never persisted.
    assert_eq!(env.json(&["board", "list"])["count"], 0);
}

#[test]
fn test_generate_resolves_backlog_titles() {
    let plan = r#"{"items": [{"item_id": "ID", "week": 5}], "warnings": []}"#;
    let server = StubServer::start(&[("/roadmap", 200, plan)]);
    let env = TestEnv::with_server(&server);
    std::fs::write(
        env.backlog_path(),
        r#"[{"id":"ID","title":"Checkout flow","type":"feature","status":"todo"}]"#,
    )
    .unwrap();

    let roadmap = env.json(&["roadmap", "generate"]);
    assert_eq!(roadmap["sample_data"], false);
    assert_eq!(roadmap["horizon"], 5);
    assert_eq!(roadmap["weeks"][4]["items"][0]["title"], "Checkout flow");
    assert_eq!(roadmap["weeks"][4]["items"][0]["title_resolved"], true);
}

#[test]
fn test_generate_without_assistant_fails() {
    let env = TestEnv::new();

    env.spm()
        .args(["roadmap", "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("roadmap generation failed"));
}

#[test]
fn test_layout_from_plan_file() {
    let env = TestEnv::new();
    std::fs::write(
        env.backlog_path(),
        r#"[{"id":"1","title":"User Profile"},{"id":"2","title":"Auth System"}]"#,
    )
    .unwrap();
    let plan = env.write_file("plan.json", PLAN);

    let roadmap = env.json(&["roadmap", "layout", "--plan", plan.to_str().unwrap()]);
    assert_eq!(roadmap["horizon"], 4);
    let week2 = roadmap["weeks"][1]["items"].as_array().unwrap();
    assert_eq!(week2.len(), 2);
    assert_eq!(week2[0]["title"], "User Profile");
    assert_eq!(week2[0]["dependencies"][0], "2");
    assert_eq!(week2[1]["title"], "Item #3");
    assert_eq!(week2[1]["title_resolved"], false);
}

#[test]
fn test_layout_extends_horizon_to_last_week() {
    let env = TestEnv::new();
    let plan = env.write_file(
        "plan.json",
        r#"{"items": [{"item_id": "a", "week": 9}, {"item_id": "b", "week": 1}]}"#,
    );

    let roadmap = env.json(&["roadmap", "layout", "--plan", plan.to_str().unwrap()]);
    assert_eq!(roadmap["horizon"], 9);
    let weeks = roadmap["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 9);
    let open: Vec<u64> = weeks
        .iter()
        .filter(|w| w["open_capacity"] == true)
        .map(|w| w["week"].as_u64().unwrap())
        .collect();
    assert_eq!(open, vec![2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_layout_human() {
    let env = TestEnv::new();
    let plan = env.write_file("plan.json", PLAN);

    env.spm()
        .args(["roadmap", "layout", "--plan", plan.to_str().unwrap(), "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1\n  - Item #2"))
        .stdout(predicate::str::contains("Item #3 [high risk] (after 2)"))
        .stdout(predicate::str::contains("Week 3\n  Open Capacity"))
        .stdout(predicate::str::contains("Warnings:"));
}

#[test]
fn test_layout_invalid_plan_fails() {
    let env = TestEnv::new();
    let plan = env.write_file("plan.json", r#"{"items": [{"week": 1}]}"#);

    env.spm()
        .args(["roadmap", "layout", "--plan", plan.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}
