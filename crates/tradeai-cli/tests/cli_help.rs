use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("tradeai")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("news"))
        .stdout(predicate::str::contains("conversations"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_conversations_help_shows_subcommands() {
    cargo_bin_cmd!("tradeai")
        .args(["conversations", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("new"));
}

#[test]
fn test_news_help_shows_category_filter() {
    cargo_bin_cmd!("tradeai")
        .args(["news", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--category"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("tradeai")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}

#[test]
fn test_config_path_respects_home_override() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("tradeai")
        .env("TRADEAI_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_writes_template() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("tradeai")
        .env("TRADEAI_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    let contents = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("api_base_url"));
}

#[test]
fn test_config_show_prints_effective_config() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("tradeai")
        .env("TRADEAI_HOME", dir.path())
        .env("TRADEAI_API_URL", "https://api.example.com/api")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.example.com/api"));
}
