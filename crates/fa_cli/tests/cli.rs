use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let p = dir.path().join(name);
    fs::write(&p, body).unwrap();
    p
}

fn fa() -> Command {
    let mut cmd = Command::cargo_bin("fa").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

const ALICE_BOB: &str = "name,choice 1,choice 2,choice 3,choice 4\n\
                         Alice,Atreides,Harkonnen,-,-\n\
                         Bob,Atreides,Fremen,-,-\n";

#[test]
fn prints_one_line_per_player() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "prefs.csv", ALICE_BOB);
    fa().arg("--input")
        .arg(&input)
        .args(["--seed", "42"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Alice: "))
        .stdout(predicate::str::contains("\nBob: "))
        .stdout(predicate::str::contains("unassigned").not());
}

#[test]
fn markdown_render_has_a_table_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "prefs.csv", ALICE_BOB);
    fa().arg("--input")
        .arg(&input)
        .args(["--seed", "0x2a", "--render", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("| Player | Faction |\n|---|---|\n"))
        .stdout(predicate::str::contains("Unclaimed: "));
}

#[test]
fn seven_players_exit_with_validation_code() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = String::from("name,choice 1\n");
    for i in 0..7 {
        body.push_str(&format!("P{i},-\n"));
    }
    let input = write(&dir, "seven.csv", &body);
    fa().arg("--input")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("too many players"));
}

#[test]
fn unknown_faction_exits_with_validation_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "prefs.csv", "name,choice 1\nAnn,Mentats\n");
    fa().arg("--input")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Mentats"));
}

#[test]
fn missing_input_is_an_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    fa().arg("--input")
        .arg(dir.path().join("absent.csv"))
        .assert()
        .code(4);
}

#[test]
fn validate_only_lists_every_issue_without_drawing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "prefs.csv", "name,choice 1,choice 2\nAnn,Mentats,Spice\nBo,Fremen,\n");
    fa().arg("--input")
        .arg(&input)
        .arg("--validate-only")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Choice.Unknown").count(2))
        .stdout(predicate::str::contains("Fremen").not());

    let ok = write(&dir, "ok.csv", ALICE_BOB);
    fa().arg("--input").arg(&ok).arg("--validate-only").assert().success();
}

#[test]
fn out_dir_receives_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "prefs.csv", ALICE_BOB);
    let out = dir.path().join("out");
    fa().arg("--input")
        .arg(&input)
        .args(["--seed", "7", "--quiet", "--out"])
        .arg(&out)
        .assert()
        .success();

    let asg: serde_json::Value = serde_json::from_slice(&fs::read(out.join("assignment.json")).unwrap()).unwrap();
    let run: serde_json::Value = serde_json::from_slice(&fs::read(out.join("run_record.json")).unwrap()).unwrap();
    assert!(asg["id"].as_str().unwrap().starts_with("ASG:"));
    assert_eq!(run["result_id"], asg["id"]);
    assert_eq!(run["tie_seed"], 7);
    assert_eq!(run["tie_seed_source"], "params");
}

#[test]
fn same_seed_same_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "prefs.csv", "name,choice 1\nA,Ixian\nB,Ixian\nC,Ixian\nD,\n");
    let run = || {
        fa().arg("--input")
            .arg(&input)
            .args(["--seed", "99", "--render", "json"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn out_of_domain_cap_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "prefs.csv", ALICE_BOB);
    fa().arg("--input")
        .arg(&input)
        .args(["--max-players", "9"])
        .assert()
        .code(2);
}
