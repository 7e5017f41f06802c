//! CLI smoke tests: help, route printing, headless render output and the
//! exit-code contract.

mod common;

use std::fs;

const PAYLOAD: &str = r#"{
    "hasData": true,
    "period": {"year": 2024, "month": 5},
    "dreamLabels": ["bad", "good"],
    "dreamData": [2, 5],
    "emotionLabels": ["평온", "짜증"],
    "emotionIcons": ["😌", "😠"],
    "emotionData": [1, 3],
    "keywords": [["바다", 30], ["고양이", 12]]
}"#;

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: dlr [OPTIONS] <COMMAND>"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
}

#[test]
fn subcommand_help_flags_work() {
    for sub in ["render", "dashboard", "path", "config", "completions"] {
        let result = common::run_cli_case(&format!("help_{sub}"), &[sub, "--help"]);
        assert!(
            result.status.success(),
            "{sub} --help failed; log: {}",
            result.log_path.display()
        );
    }
}

#[test]
fn path_prints_report_route() {
    let result = common::run_cli_case("path_prints_report_route", &["path", "2024-03", "--json"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let json = result.json();
    assert_eq!(json["path"], "/report/202403/");
    assert_eq!(json["month"], 3);
}

#[test]
fn path_rejects_out_of_range_month() {
    let result = common::run_cli_case("path_rejects_out_of_range_month", &["path", "202400"]);
    assert!(!result.status.success(), "log: {}", result.log_path.display());
}

#[test]
fn render_reports_dream_chart_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let payload = dir.path().join("202405.json");
    fs::write(&payload, PAYLOAD).expect("write payload");

    let result = common::run_cli_case(
        "render_reports_dream_chart_as_json",
        &["render", payload.to_str().expect("utf8 path"), "--json"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let json = result.json();
    assert_eq!(json["period"], "2024/05");
    assert_eq!(json["tab"], "dream");
    assert_eq!(json["summary"], "most frequent: 길몽");
    assert_eq!(
        json["chart"]["labels"],
        serde_json::json!(["길몽", "흉몽", "일반몽"])
    );
    assert_eq!(json["chart"]["values"], serde_json::json!([5.0, 2.0, 0.0]));
    assert_eq!(json["cloud"].as_array().map(Vec::len), Some(2));
    assert!(json["issue"].is_null());
}

#[test]
fn render_emotion_tab() {
    let dir = tempfile::tempdir().expect("tempdir");
    let payload = dir.path().join("202405.json");
    fs::write(&payload, PAYLOAD).expect("write payload");

    let result = common::run_cli_case(
        "render_emotion_tab",
        &[
            "render",
            payload.to_str().expect("utf8 path"),
            "--tab",
            "emotion",
            "--json",
        ],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let json = result.json();
    assert_eq!(json["summary"], "most frequent: 😠 짜증");
    assert_eq!(
        json["chart"]["colors"],
        serde_json::json!(["#87CEEB", "#DC143C"])
    );
}

#[test]
fn malformed_payload_exits_partial_with_no_data_render() {
    let dir = tempfile::tempdir().expect("tempdir");
    let payload = dir.path().join("broken.json");
    fs::write(
        &payload,
        r#"{"hasData": true, "period": {"year": 2024, "month": 7}, "dreamData": [-1], "dreamLabels": ["good"]}"#,
    )
    .expect("write payload");

    let result = common::run_cli_case(
        "malformed_payload_exits_partial",
        &["render", payload.to_str().expect("utf8 path"), "--json"],
    );
    assert_eq!(result.status.code(), Some(4), "log: {}", result.log_path.display());
    let json = result.json();
    assert_eq!(json["has_data"], false);
    assert_eq!(json["summary"], "no entries for 2024/07");
    assert!(
        json["issue"]
            .as_str()
            .is_some_and(|issue| issue.contains("DLR-2001"))
    );
}

#[test]
fn missing_payload_is_a_user_error() {
    let result = common::run_cli_case(
        "missing_payload_is_a_user_error",
        &["render", "/nonexistent/dlr/202405.json"],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.starts_with("dlr: "));
}

#[test]
fn config_validate_reads_explicit_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = dir.path().join("good.toml");
    fs::write(&good, "[chart]\nkind = \"pie\"\n").expect("write config");
    let result = common::run_cli_case(
        "config_validate_good",
        &["--config", good.to_str().expect("utf8"), "config", "validate", "--json"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert_eq!(result.json()["valid"], true);

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[cloud]\nmax_attempts = 0\n").expect("write config");
    let result = common::run_cli_case(
        "config_validate_bad",
        &["--config", bad.to_str().expect("utf8"), "config", "validate", "--json"],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert_eq!(result.json()["valid"], false);
}

#[test]
fn completions_generate_script() {
    let result = common::run_cli_case("completions_generate_script", &["completions", "bash"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(result.stdout.contains("dlr"));
}
