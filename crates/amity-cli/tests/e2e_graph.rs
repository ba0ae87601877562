//! E2E tests for user/friend management and graph queries.
//!
//! Each test gets its own data directory and config file.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn amity(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("amity"));
    cmd.env("AMITY_DATA_DIR", dir.join("data"));
    cmd.env("AMITY_CONFIG", dir.join("config.toml"));
    cmd.env("RUST_LOG", "error");
    cmd
}

fn json(dir: &Path, args: &[&str]) -> Value {
    let output = amity(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn add_user(dir: &Path, username: &str) -> i64 {
    let name = username.to_uppercase();
    let user = json(dir, &["user", "add", username, "--name", name.as_str()]);
    user["id"].as_i64().expect("id must exist")
}

fn befriend(dir: &Path, a: &str, b: &str) {
    amity(dir).args(["friend", "add", a, b]).assert().success();
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|u| u["id"].as_i64().expect("id"))
        .collect()
}

/// ann, bob, cat form a triangle; dan and eve are a pair; fay is alone.
fn seed_triangle(dir: &Path) {
    for name in ["ann", "bob", "cat", "dan", "eve", "fay"] {
        add_user(dir, name);
    }
    befriend(dir, "ann", "bob");
    befriend(dir, "bob", "cat");
    befriend(dir, "cat", "ann");
    befriend(dir, "dan", "eve");
}

#[test]
fn user_ids_are_sequential_and_usernames_unique() {
    let dir = TempDir::new().unwrap();
    assert_eq!(add_user(dir.path(), "ann"), 1);
    assert_eq!(add_user(dir.path(), "bob"), 2);

    amity(dir.path())
        .args(["user", "add", "ann", "--name", "Second Ann"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate user"));
}

#[test]
fn reach_lists_component_in_bfs_order() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());

    let reach = json(dir.path(), &["graph", "reach", "ann"]);
    assert_eq!(reach["order"], "bfs");
    assert_eq!(ids(&reach["users"]), vec![1, 2, 3]);

    let explore = json(dir.path(), &["graph", "explore", "1"]);
    assert_eq!(explore["order"], "dfs");
    assert_eq!(ids(&explore["users"]), vec![1, 2, 3]);
}

#[test]
fn path_prefers_direct_friendship() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());

    let path = json(dir.path(), &["graph", "path", "ann", "cat"]);
    assert_eq!(path["found"], true);
    assert_eq!(path["hops"], 1);
    assert_eq!(ids(&path["path"]), vec![1, 3]);
}

#[test]
fn path_between_communities_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());

    let path = json(dir.path(), &["graph", "path", "ann", "eve"]);
    assert_eq!(path["found"], false);
    assert!(path["path"].as_array().unwrap().is_empty());

    amity(dir.path())
        .args(["graph", "path", "ann", "eve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No path found from @ann to @eve"));
}

#[test]
fn suggestions_are_exactly_depth_hops_away() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());

    // triangle: nobody new two hops out
    let triangle = json(dir.path(), &["graph", "suggest", "ann"]);
    assert_eq!(triangle["depth"], 2);
    assert!(triangle["suggestions"].as_array().unwrap().is_empty());

    // eve - dan - fay: fay is a friend of a friend
    befriend(dir.path(), "dan", "fay");
    let pair = json(dir.path(), &["graph", "suggest", "eve"]);
    assert_eq!(ids(&pair["suggestions"]), vec![6]);

    let too_far = json(dir.path(), &["graph", "suggest", "eve", "--depth", "3"]);
    assert!(too_far["suggestions"].as_array().unwrap().is_empty());
}

#[test]
fn communities_partition_all_users() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());

    let communities = json(dir.path(), &["graph", "communities"]);
    let groups: Vec<Vec<i64>> = communities
        .as_array()
        .unwrap()
        .iter()
        .map(|c| ids(&c["members"]))
        .collect();
    assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5], vec![6]]);

    let stats = json(dir.path(), &["graph", "stats"]);
    assert_eq!(stats["nodes"], 6);
    assert_eq!(stats["edges"], 4);
    assert_eq!(stats["communities"], 3);
    assert_eq!(stats["isolated"], 1);
}

#[test]
fn friendship_management() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());

    amity(dir.path())
        .args(["friend", "add", "ann", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already friends"));

    amity(dir.path())
        .args(["friend", "add", "ann", "ann"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot befriend themselves"));

    amity(dir.path())
        .args(["friend", "add", "ann", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not found: nobody"));

    let strangers = json(dir.path(), &["friend", "strangers", "ann"]);
    assert_eq!(ids(&strangers), vec![4, 5, 6]);

    amity(dir.path()).args(["friend", "remove", "cat", "ann"]).assert().success();
    let friends = json(dir.path(), &["friend", "list", "ann"]);
    assert_eq!(ids(&friends), vec![2]);

    let path = json(dir.path(), &["graph", "path", "ann", "cat"]);
    assert_eq!(ids(&path["path"]), vec![1, 2, 3]);
}

#[test]
fn deleting_user_removes_friendships() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());

    amity(dir.path()).args(["user", "delete", "bob"]).assert().success();

    let friends = json(dir.path(), &["friend", "list", "ann"]);
    assert_eq!(ids(&friends), vec![3]);

    amity(dir.path())
        .args(["user", "get", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not found"));
}

#[test]
fn export_then_import_into_fresh_store() {
    let source = TempDir::new().unwrap();
    seed_triangle(source.path());

    let file = source.path().join("snapshot.json");
    amity(source.path())
        .args(["export", "--output", file.to_str().unwrap()])
        .assert()
        .success();

    let target = TempDir::new().unwrap();
    let imported = json(target.path(), &["import", file.to_str().unwrap()]);
    assert_eq!(imported["users"], 6);
    assert_eq!(imported["friendships"], 4);

    let communities = json(target.path(), &["graph", "communities"]);
    assert_eq!(communities.as_array().unwrap().len(), 3);

    // second import needs --merge and adds nothing
    amity(target.path())
        .args(["import", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--merge"));
    let merged = json(target.path(), &["import", file.to_str().unwrap(), "--merge"]);
    assert_eq!(merged["friendships"], 0);
}

#[test]
fn config_controls_default_format_and_depth() {
    let dir = TempDir::new().unwrap();
    seed_triangle(dir.path());
    befriend(dir.path(), "dan", "fay");

    amity(dir.path())
        .args(["config", "set", "format", "json"])
        .assert()
        .success();
    amity(dir.path())
        .args(["config", "set", "suggest_depth", "1"])
        .assert()
        .success();

    let output = amity(dir.path())
        .args(["graph", "suggest", "eve"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("config format is json");
    assert_eq!(value["depth"], 1);
    assert!(value["suggestions"].as_array().unwrap().is_empty());

    amity(dir.path())
        .args(["config", "get", "suggest_depth"])
        .assert()
        .success()
        .stdout("1\n");

    amity(dir.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure();
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().unwrap();
    amity(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("amity"));
}
