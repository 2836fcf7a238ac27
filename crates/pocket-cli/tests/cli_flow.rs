use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rusqlite::Connection;
use tempfile::TempDir;

const PASSPHRASE: &str = "GoodPass1";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pocket"))
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir should be created"),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join("pocket.db")
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn write_config(&self, contents: &str) {
        let path = self.config_home().join("pocket").join("config.toml");
        std::fs::create_dir_all(path.parent().expect("config parent"))
            .expect("create config dir");
        std::fs::write(path, contents).expect("write config");
    }

    fn command(&self, passphrase: Option<&str>) -> Command {
        let mut cmd = Command::new(bin());
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("POCKET_DB", self.db_path())
            .env_remove("POCKET_CONFIG")
            .env_remove("POCKET_LOG")
            .env_remove("POCKET_PASSPHRASE")
            .env_remove("EDITOR");
        if let Some(value) = passphrase {
            cmd.env("POCKET_PASSPHRASE", value);
        }
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(Some(PASSPHRASE))
            .args(args)
            .output()
            .expect("pocket should run")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "pocket {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("utf-8 stdout")
    }

    fn add(&self, name: &str, description: &str, content: &str) {
        self.run_ok(&[
            "add",
            "--name",
            name,
            "--description",
            description,
            "--content",
            content,
        ]);
    }

    fn list_json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = vec!["list", "--json"];
        full.extend_from_slice(args);
        serde_json::from_str(&self.run_ok(&full)).expect("list output should be JSON")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn raw_content(path: &Path, id: i64) -> String {
    let conn = Connection::open(path).expect("open database");
    conn.query_row("SELECT content FROM note WHERE rowid = ?1", [id], |row| {
        row.get(0)
    })
    .expect("note row")
}

#[test]
fn test_first_add_bootstraps_database() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["add", "--name", "Groceries", "--content", "milk, eggs"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(sandbox.db_path().exists());
    assert!(stderr(&output).contains("Created new database"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Added note 1"));

    let list = sandbox.list_json(&[]);
    assert_eq!(list["total"], 1);
    assert_eq!(list["notes"][0]["name"], "Groceries");
    assert!(list["notes"][0].get("content").is_none());

    let raw = raw_content(&sandbox.db_path(), 1);
    assert!(!raw.contains("milk"));
}

#[test]
fn test_wrong_passphrase_exit_code() {
    let sandbox = Sandbox::new();
    sandbox.add("A", "d", "secret");

    let output = sandbox
        .command(Some("WrongPass2"))
        .arg("list")
        .output()
        .expect("pocket should run");
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Incorrect passphrase"));
}

#[test]
fn test_invalid_passphrase_exit_code() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command(Some("short"))
        .arg("list")
        .output()
        .expect("pocket should run");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("at least 8 characters"));
}

#[test]
fn test_missing_passphrase_without_tty() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command(None)
        .arg("list")
        .output()
        .expect("pocket should run");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("POCKET_PASSPHRASE"));
}

#[test]
fn test_show_masks_content_unless_revealed() {
    let sandbox = Sandbox::new();
    sandbox.add("Bank", "login", "hunter2-password");

    let masked = sandbox.run_ok(&["show", "1"]);
    assert!(masked.contains("Bank"));
    assert!(!masked.contains("hunter2-password"));

    let revealed = sandbox.run_ok(&["show", "1", "--reveal"]);
    assert!(revealed.contains("hunter2-password"));

    let json: serde_json::Value =
        serde_json::from_str(&sandbox.run_ok(&["show", "1", "--json", "--reveal"])).unwrap();
    assert_eq!(json["content"], "hunter2-password");
}

#[test]
fn test_show_missing_note_exit_code() {
    let sandbox = Sandbox::new();
    sandbox.add("A", "d", "x");

    let output = sandbox.run(&["show", "42"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Note 42 not found"));
}

#[test]
fn test_search_and_paging() {
    let sandbox = Sandbox::new();
    for i in 1..=12 {
        sandbox.add(&format!("note {}", i), "misc", "c");
    }
    sandbox.add("Groceries", "weekly shopping", "milk");

    let first = sandbox.list_json(&[]);
    assert_eq!(first["total"], 13);
    assert_eq!(first["page_count"], 2);
    assert_eq!(first["notes"].as_array().unwrap().len(), 10);
    assert_eq!(first["notes"][0]["name"], "Groceries");

    let second = sandbox.list_json(&["--page", "2"]);
    assert_eq!(second["notes"].as_array().unwrap().len(), 3);

    let found: serde_json::Value =
        serde_json::from_str(&sandbox.run_ok(&["search", "shop", "--json"])).unwrap();
    assert_eq!(found["total"], 1);
    assert_eq!(found["notes"][0]["name"], "Groceries");

    let none: serde_json::Value =
        serde_json::from_str(&sandbox.run_ok(&["search", "nomatch", "--json"])).unwrap();
    assert_eq!(none["total"], 0);
    assert_eq!(none["notes"].as_array().unwrap().len(), 0);
}

#[test]
fn test_page_zero_is_invalid_input() {
    let sandbox = Sandbox::new();
    sandbox.add("A", "d", "x");
    let output = sandbox.run(&["list", "--page", "0"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_config_page_size() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[ui]\npage_size = 2\n");
    for name in ["a", "b", "c"] {
        sandbox.add(name, "", "x");
    }

    let list = sandbox.list_json(&[]);
    assert_eq!(list["total"], 3);
    assert_eq!(list["notes"].as_array().unwrap().len(), 2);

    let list = sandbox.list_json(&["--limit", "3"]);
    assert_eq!(list["notes"].as_array().unwrap().len(), 3);
}

#[test]
fn test_edit_and_delete() {
    let sandbox = Sandbox::new();
    sandbox.add("Draft", "d", "first");

    sandbox.run_ok(&["edit", "1", "--name", "Final", "--content", "second"]);
    let json: serde_json::Value =
        serde_json::from_str(&sandbox.run_ok(&["show", "1", "--json", "--reveal"])).unwrap();
    assert_eq!(json["name"], "Final");
    assert_eq!(json["content"], "second");
    assert_eq!(json["description"], "d");

    let refused = sandbox.run(&["delete", "1"]);
    assert_eq!(refused.status.code(), Some(4));

    sandbox.run_ok(&["delete", "1", "--yes"]);
    assert_eq!(sandbox.list_json(&[])["total"], 0);

    let again = sandbox.run(&["delete", "1", "--yes"]);
    assert_eq!(again.status.code(), Some(3));
}

#[test]
fn test_check_detects_tampering() {
    let sandbox = Sandbox::new();
    sandbox.add("A", "d", "secret");
    sandbox.add("B", "d", "other");

    let ok = sandbox.run_ok(&["check"]);
    assert!(ok.contains("Integrity check: OK"));
    assert!(ok.contains("notes decrypted: 2"));

    let conn = Connection::open(sandbox.db_path()).unwrap();
    conn.execute("UPDATE note SET content = ?1 WHERE rowid = 2", ["00ff"])
        .unwrap();
    drop(conn);

    let output = sandbox.run(&["check"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("FAILED"));
}

#[test]
fn test_debug_writes_log_file() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["--debug", "list"]);
    let log = std::fs::read_to_string(sandbox.dir.path().join("debug.log"))
        .expect("debug.log should exist");
    assert!(log.contains("Opening database"));
    assert!(!log.contains(PASSPHRASE));
}

#[test]
fn test_missing_probe_reported_before_passphrase() {
    let sandbox = Sandbox::new();
    sandbox.add("A", "d", "secret");

    let conn = Connection::open(sandbox.db_path()).unwrap();
    conn.execute(
        "DELETE FROM pocket_config WHERE config_key = ?1",
        ["PasswordTest"],
    )
    .unwrap();
    drop(conn);

    let output = sandbox
        .command(None)
        .arg("list")
        .output()
        .expect("pocket should run");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("corrupted"));
    assert!(!stderr(&output).contains("POCKET_PASSPHRASE"));
}

#[test]
fn test_completions() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_ok(&["completions", "bash"]);
    assert!(output.contains("pocket"));
}
