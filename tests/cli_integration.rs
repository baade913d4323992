// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Command with an isolated config file so the user's own settings never leak in
fn careerline(dir: &Path, config: &str) -> Command {
    let path = dir.join("config.toml");
    fs::write(&path, config).unwrap();

    let mut cmd = Command::cargo_bin("careerline").unwrap();
    cmd.env("CAREERLINE_CONFIG", &path)
        .env_remove("CAREERLINE_ACCOUNT")
        .env_remove("CAREERLINE_API_BASE")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("careerline").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Career timeline"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("careerline").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("careerline"));
}

#[test]
fn test_projects_for_year() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "")
        .args(["projects", "--year", "2005"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yahoo! Maps Product Development"))
        .stdout(predicate::str::contains("Showing 1 projects active in 2005"));
}

#[test]
fn test_projects_json() {
    let temp = TempDir::new().unwrap();

    let output = careerline(temp.path(), "")
        .args(["--json", "projects", "--year", "2024"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let projects: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let titles: Vec<&str> = projects
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["title"].as_str())
        .collect();
    assert_eq!(titles.len(), 3);
    assert!(titles.contains(&"Army Client Internal Tool"));
}

#[test]
fn test_projects_empty_year() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "")
        .args(["projects", "--year", "2008"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects active in 2008"));
}

#[test]
fn test_projects_custom_catalog() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.path().join("catalog.toml");
    fs::write(
        &catalog,
        r#"
first_year = 2020
last_year = 2022
milestones = [2021]

[[projects]]
id = 1
title = "Side Project"
description = "Weekend hacking"
technologies = ["Rust"]
start = "2021-02"
category = "personal"
"#,
    )
    .unwrap();

    careerline(temp.path(), "")
        .args(["projects", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("2021-02 .. present  Side Project [personal]"));

    careerline(temp.path(), "")
        .arg("milestones")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeline 2020 .. 2022"))
        .stdout(predicate::str::contains("2021  Side Project"));
}

#[test]
fn test_invalid_catalog_fails() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.path().join("broken.toml");
    fs::write(&catalog, "first_year = 2030\nlast_year = 2020\nmilestones = []\nprojects = []\n").unwrap();

    careerline(temp.path(), "")
        .args(["projects", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load catalog"));
}

#[test]
fn test_milestones() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "")
        .arg("milestones")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeline 2001 .. 2025"))
        .stdout(predicate::str::contains("Yahoo! Maps Product Development"));
}

#[test]
fn test_config_shows_file_values() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "account = \"octocat\"\ncache_ttl_secs = 30\n")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("account = \"octocat\""))
        .stdout(predicate::str::contains("cache_ttl_secs = 30"));
}

#[test]
fn test_env_overrides_file() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "account = \"octocat\"\n")
        .env("CAREERLINE_ACCOUNT", "hubot")
        .args(["--json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"account\": \"hubot\""));
}

#[test]
fn test_fetch_failure_suggests_fallback() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "api_base = \"http://127.0.0.1:9\"\n")
        .arg("fetch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fallback"));
}

#[test]
fn test_fetch_fallback_shows_catalog() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "api_base = \"http://127.0.0.1:9\"\n")
        .args(["fetch", "--fallback", "--year", "2005"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yahoo! Maps Product Development"));
}

#[test]
fn test_org_conflicts_with_account() {
    let temp = TempDir::new().unwrap();

    careerline(temp.path(), "")
        .args(["fetch", "--account", "a", "--org", "b"])
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    let mut cmd = Command::cargo_bin("careerline").unwrap();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("careerline"));
}
