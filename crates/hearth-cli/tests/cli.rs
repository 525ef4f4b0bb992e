//! CLI command integration tests.
//! Each test uses a temp directory via HEARTH_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hearth_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("hearth").unwrap();
    cmd.env("HEARTH_DATA_DIR", data_dir.path());
    cmd.env_remove("OPENAI_API_KEY");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stat_value<'a>(stdout: &'a str, key: &str) -> &'a str {
    stdout
        .lines()
        .find(|l| l.starts_with(key))
        .map(|l| l[key.len()..].trim())
        .unwrap_or("")
}

#[test]
fn stats_fresh_db() {
    let dir = TempDir::new().unwrap();
    hearth_cmd(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("sessions:   0 (0 open)"))
        .stdout(predicate::str::contains("messages:   0"))
        .stdout(predicate::str::contains("wellness:   50.0"));
}

#[test]
fn analyze_prints_json() {
    let dir = TempDir::new().unwrap();
    let output = hearth_cmd(&dir)
        .args(["analyze", "все кончено, не хочу жить"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sentiment_label"], "negative");
    assert!(json["risk_level"].as_u64().unwrap() >= 9);
    assert!(json["components"]["lexicon"].as_f64().unwrap() < 0.0);
}

#[test]
fn chat_persists_turn_and_reply() {
    let dir = TempDir::new().unwrap();
    hearth_cmd(&dir)
        .args(["--seed", "42", "chat", "Привет, как дела?"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());

    let output = hearth_cmd(&dir).arg("stats").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stat_value(&stdout, "sessions:"), "1 (1 open)");
    assert_eq!(stat_value(&stdout, "messages:"), "2");
}

#[test]
fn chat_json_reports_outcome() {
    let dir = TempDir::new().unwrap();
    let output = hearth_cmd(&dir)
        .args(["--seed", "7", "chat", "--json", "все кончено, не хочу жить"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["session"].is_string());
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["effective_priority"], "high");
    assert_eq!(json["source"], "rule_based");
    assert!(json["reply_text"].as_str().unwrap().chars().count() >= 10);
}

#[test]
fn same_seed_same_reply() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let reply = |dir: &TempDir| {
        let out = hearth_cmd(dir)
            .args(["--seed", "3", "chat", "всё отлично!"])
            .output()
            .unwrap();
        String::from_utf8_lossy(&out.stdout).to_string()
    };
    assert_eq!(reply(&a), reply(&b));
}

#[test]
fn chat_continues_latest_session() {
    let dir = TempDir::new().unwrap();
    for text in ["привет", "на работе тяжело", "начальник снова кричал"] {
        hearth_cmd(&dir).args(["chat", text]).assert().success();
    }
    let output = hearth_cmd(&dir).arg("stats").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stat_value(&stdout, "sessions:"), "1 (1 open)");
    assert_eq!(stat_value(&stdout, "messages:"), "6");
}

#[test]
fn close_prints_summary() {
    let dir = TempDir::new().unwrap();
    hearth_cmd(&dir)
        .args(["chat", "на работе начальник опять кричит"])
        .assert()
        .success();

    hearth_cmd(&dir)
        .arg("close")
        .assert()
        .success()
        .stdout(predicate::str::contains("Сессия завершена. Всего сообщений: 2."))
        .stdout(predicate::str::contains("работа"));

    // Nothing left to close.
    hearth_cmd(&dir).arg("close").assert().failure();
}

#[test]
fn chat_rejects_unknown_session() {
    let dir = TempDir::new().unwrap();
    hearth_cmd(&dir)
        .args([
            "chat",
            "--session",
            "00000000-0000-4000-8000-000000000000",
            "привет",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown session"));
}

#[test]
fn mood_recorded_and_counted() {
    let dir = TempDir::new().unwrap();
    hearth_cmd(&dir)
        .args(["mood", "sad", "--intensity", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recorded mood sad (6/10)"));

    let output = hearth_cmd(&dir).arg("stats").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stat_value(&stdout, "moods:"), "1");
}

#[test]
fn mood_rejects_bad_intensity() {
    let dir = TempDir::new().unwrap();
    hearth_cmd(&dir)
        .args(["mood", "happy", "--intensity", "0"])
        .assert()
        .failure();
}

#[test]
fn unreachable_remote_falls_back() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("hearth.toml"),
        "[completion]\napi_key = \"sk-test\"\nbase_url = \"http://127.0.0.1:9/v1/chat/completions\"\ntimeout_secs = 2\n",
    )
    .unwrap();

    let output = hearth_cmd(&dir)
        .args(["--seed", "1", "chat", "--json", "мне грустно"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_ne!(json["source"], "remote");
    assert!(json["reply_text"].as_str().unwrap().chars().count() >= 10);
}

#[test]
fn bad_config_path_fails() {
    let dir = TempDir::new().unwrap();
    hearth_cmd(&dir)
        .args(["--config", "/nonexistent/hearth.toml", "analyze", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
