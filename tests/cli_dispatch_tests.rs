use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_lootledger")
}

fn fixture() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/chat_sample.log")
}

fn run(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env("LOOTLEDGER_DATA_DIR", data_dir)
        .env("LOOTLEDGER_LOG", "warn")
        .env_remove("LOOTLEDGER_PLAYER")
        .output()
        .expect("lootledger should run")
}

fn saved_session(data_dir: &Path) -> String {
    let sessions = data_dir.join("sessions");
    let entry = fs::read_dir(&sessions)
        .expect("sessions dir")
        .next()
        .expect("one saved session")
        .expect("dir entry");
    entry.path().display().to_string()
}

#[test]
fn unknown_command_prints_usage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["simulate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: lootledger"));
}

#[test]
fn replay_prints_stats_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["replay", fixture()]);
    assert_eq!(output.status.code(), Some(0));

    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("replay should emit json");
    assert_eq!(payload["combat"]["shots"], 4);
    assert_eq!(payload["combat"]["kills"], 2);
    assert_eq!(payload["event_count"], 14);
    assert_eq!(payload["duration"], 14.0);
    assert!(!dir.path().join("sessions").exists());
}

#[test]
fn replay_requires_a_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["replay"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn replay_with_unknown_loadout_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("loadouts.yaml"), "- id: other\n  name: Other\n").expect("write");
    let output = run(dir.path(), &["replay", fixture(), "--loadout", "rifle"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("loadout 'rifle'"));
}

#[test]
fn saved_replay_feeds_stats_export_and_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("loadouts.yaml"),
        "loadouts:\n  - id: rifle\n    name: Rifle\n    weapon:\n      name: Opalo\n      economy:\n        decay_ped_per_shot: 0.01\n        ammo_burn_units: 100\n",
    )
    .expect("write");

    let replay = run(dir.path(), &["replay", fixture(), "--loadout", "rifle", "--save"]);
    assert_eq!(replay.status.code(), Some(0));
    let session_path = saved_session(dir.path());

    let stats = run(dir.path(), &["stats", &session_path]);
    assert_eq!(stats.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_slice(&stats.stdout).expect("json");
    let spend = payload["economy"]["total_spend"].as_f64().expect("number");
    assert!((spend - 0.08).abs() < 1e-9);
    assert_eq!(payload["loadout_breakdown"][0]["loadout_id"], "rifle");

    let export = run(dir.path(), &["export", &session_path, "loot"]);
    assert_eq!(export.status.code(), Some(0));
    let csv = String::from_utf8_lossy(&export.stdout);
    assert!(csv.starts_with("item,count,quantity,total_value"));
    assert!(csv.contains("Shrapnel,1,2500,0.25"));

    let loadouts = run(dir.path(), &["export", &session_path, "loadouts"]);
    assert_eq!(loadouts.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&loadouts.stdout).contains("rifle,Rifle,4,"));

    let history = run(dir.path(), &["history", "--workers", "2"]);
    assert_eq!(history.status.code(), Some(0));
    let summary: serde_json::Value = serde_json::from_slice(&history.stdout).expect("json");
    assert_eq!(summary["sessions"], 1);
    assert_eq!(summary["shots"], 4);
}

#[test]
fn export_rejects_unknown_kind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["export", "whatever.json", "skills"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn stats_on_missing_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.json");
    let output = run(dir.path(), &["stats", missing.to_str().expect("utf8 path")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("stats failed"));
}

#[test]
fn markup_file_in_data_dir_is_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("markup.json"),
        r#"{"default_percent":100.0,"items":{"Animal Hide":{"markup_percent":200.0}}}"#,
    )
    .expect("write");
    let output = run(dir.path(), &["replay", fixture()]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let with_markup = payload["economy"]["loot_value_with_markup"]
        .as_f64()
        .expect("number");
    assert!((with_markup - 0.85).abs() < 1e-9);
}
