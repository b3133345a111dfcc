use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread::sleep;
use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, Utc};
use rusqlite::Connection;
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pastebox"))
}

/// Scratch XDG home for one test.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn data_home(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn config_path(&self) -> PathBuf {
        self.config_home().join("pastebox").join("config.toml")
    }

    fn database_path(&self) -> PathBuf {
        self.data_home().join("pastebox").join("pastebox.db")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env_remove("PASTEBOX_CONFIG")
            .env_remove("PASTEBOX_DATABASE_URL")
            .env_remove("PASTEBOX_SECRET")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run pastebox")
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn pastebox");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait for pastebox")
    }

    fn write_config(&self, contents: &str) {
        let path = self.config_path();
        std::fs::create_dir_all(path.parent().expect("config parent")).expect("create config dir");
        std::fs::write(&path, contents).expect("write config");
    }

    fn write_encrypted_config(&self, secret: &str) {
        self.write_config(&format!(
            r#"
dayspan = 90
maxlength = 10000

[database]
url = "sqlite:///{}"
encrypted = true
secret = "{}"
iterations = 1000
"#,
            self.dir.path().join("encrypted.db").display(),
            secret
        ));
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}

fn stored_ids(path: &Path) -> Vec<String> {
    let conn = Connection::open(path).expect("open database");
    let mut stmt = conn
        .prepare("SELECT text_id FROM texts ORDER BY text_id")
        .expect("prepare");
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("collect");
    ids
}

#[test]
fn test_add_get_delete_flow() {
    let env = TestEnv::new();

    let output = env.run(&["add", "--id", "abc", "--body", "FooBar"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "abc");
    assert!(env.database_path().exists());

    let output = env.run(&["get", "abc"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "FooBar\n");

    let output = env.run(&["delete", "abc"]);
    assert_success(&output);

    let output = env.run(&["get", "abc"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Text not found: abc"));
}

#[test]
fn test_add_reads_stdin_and_generates_id() {
    let env = TestEnv::new();

    let output = env.run_with_stdin(&["add", "--json"], "line one\nline two\n");
    assert_success(&output);
    let added: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("add prints JSON");
    let id = added["id"].as_str().expect("id is a string").to_string();
    assert_eq!(id.len(), 36);
    assert!(added["expires"].is_string());

    let output = env.run(&["get", &id, "--json"]);
    assert_success(&output);
    let fetched: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("get prints JSON");
    assert_eq!(fetched["content"], "line one\nline two\n");
    assert_eq!(fetched["created"], added["created"]);
}

#[test]
fn test_duplicate_and_blank_input_rejected() {
    let env = TestEnv::new();

    assert_success(&env.run(&["add", "--id", "DUPLICATED", "--body", "first"]));

    let output = env.run(&["add", "--id", "DUPLICATED", "--body", "second"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Duplicated text: DUPLICATED"));

    let output = env.run(&["add", "--id", "blank", "--body", "   "]);
    assert_eq!(output.status.code(), Some(4));

    let output = env.run(&["get", "DUPLICATED"]);
    assert_eq!(stdout(&output), "first\n");
}

#[test]
fn test_maxlength_enforced() {
    let env = TestEnv::new();
    env.write_config("maxlength = 3\n");

    let output = env.run(&["add", "--id", "long", "--body", "FooBar"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("too long"));
}

#[test]
fn test_purge_removes_expired_texts() {
    let env = TestEnv::new();

    assert_success(&env.run(&["add", "--id", "gone", "--body", "a", "--expires-in", "0"]));
    assert_success(&env.run(&["add", "--id", "kept", "--body", "b"]));
    assert_success(&env.run(&["add", "--id", "forever", "--body", "c", "--no-expiry"]));

    let output = env.run(&["--quiet", "purge"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "1");

    let output = env.run(&["purge", "--json"]);
    assert_success(&output);
    let counts: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON");
    assert_eq!(counts["expired"], 0);
    assert!(counts["by_age"].is_null());

    assert_eq!(env.run(&["get", "gone"]).status.code(), Some(3));
    assert_success(&env.run(&["get", "kept"]));
    assert_success(&env.run(&["get", "forever"]));
}

fn row_count(path: &Path) -> i64 {
    Connection::open(path)
        .expect("open database")
        .query_row("SELECT COUNT(*) FROM texts", [], |row| row.get(0))
        .expect("count rows")
}

#[test]
fn test_purge_by_age_removes_old_texts() {
    let env = TestEnv::new();
    assert_success(&env.run(&["add", "--id", "old", "--body", "a", "--no-expiry"]));
    assert_success(&env.run(&["add", "--id", "new", "--body", "b", "--no-expiry"]));

    let long_ago = (Utc::now() - Duration::days(91)).timestamp_micros();
    Connection::open(env.database_path())
        .expect("open database")
        .execute(
            "UPDATE texts SET created = ?1 WHERE text_id = 'old'",
            [long_ago],
        )
        .expect("backdate text");

    let output = env.run(&["purge", "--by-age", "--json"]);
    assert_success(&output);
    let counts: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON");
    assert_eq!(counts["expired"], 0);
    assert_eq!(counts["by_age"], 1);

    assert_eq!(env.run(&["get", "old"]).status.code(), Some(3));
    assert_success(&env.run(&["get", "new"]));
}

#[test]
fn test_out_of_range_expiry_rejected() {
    let env = TestEnv::new();

    let output = env.run(&["add", "--id", "abc", "--body", "a", "--expires-in", "4294967295"]);
    assert_eq!(output.status.code(), Some(2));

    env.write_config("dayspan = 4294967295\n");
    let output = env.run(&["add", "--id", "abc", "--body", "a"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("dayspan"));
}

#[test]
fn test_far_future_expiry_is_kept() {
    let env = TestEnv::new();

    assert_success(&env.run(&["add", "--id", "far", "--body", "a", "--expires-in", "3000000"]));

    let output = env.run(&["--quiet", "purge"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "0");
    assert_eq!(stdout(&env.run(&["get", "far"])), "a\n");
}

#[cfg(unix)]
#[test]
fn test_watch_purges_until_interrupted() {
    let env = TestEnv::new();
    assert_success(&env.run(&["add", "--id", "gone", "--body", "a", "--expires-in", "0"]));
    assert_success(&env.run(&["add", "--id", "kept", "--body", "b"]));
    assert_eq!(row_count(&env.database_path()), 2);

    let mut child = env
        .command()
        .args(["watch", "--interval", "1"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn pastebox watch");

    let deadline = Instant::now() + StdDuration::from_secs(10);
    while row_count(&env.database_path()) != 1 {
        assert!(Instant::now() < deadline, "watch did not purge in time");
        sleep(StdDuration::from_millis(100));
    }
    // Let the loop settle back into waiting for the next tick or Ctrl-C
    sleep(StdDuration::from_millis(500));

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("send SIGINT");
    assert!(status.success());

    let deadline = Instant::now() + StdDuration::from_secs(10);
    while child.try_wait().expect("poll watch").is_none() {
        if Instant::now() >= deadline {
            child.kill().expect("kill watch");
            panic!("watch did not stop after SIGINT");
        }
        sleep(StdDuration::from_millis(50));
    }
    let output = child.wait_with_output().expect("collect watch output");

    assert_success(&output);
    assert!(stderr(&output).contains("Stopped."));
    assert_eq!(env.run(&["get", "gone"]).status.code(), Some(3));
    assert_success(&env.run(&["get", "kept"]));
}

#[test]
fn test_encrypted_store_hides_identifiers() {
    let env = TestEnv::new();
    env.write_encrypted_config("cli-secret-123");

    assert_success(&env.run(&["add", "--id", "private-id", "--body", "secret body"]));

    let ids = stored_ids(&env.dir.path().join("encrypted.db"));
    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], "private-id");
    assert_eq!(ids[0].len(), 64);

    let output = env.run(&["get", "private-id"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "secret body\n");

    let output = env
        .command()
        .env("PASTEBOX_SECRET", "another-secret")
        .args(["get", "private-id"])
        .output()
        .expect("run pastebox");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_encryption_without_secret_is_invalid() {
    let env = TestEnv::new();
    env.write_config("[database]\nencrypted = true\n");

    let output = env.run(&["add", "--body", "FooBar"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("PASTEBOX_SECRET"));
}

#[test]
fn test_unsupported_database_url() {
    let env = TestEnv::new();

    let output = env
        .command()
        .env("PASTEBOX_DATABASE_URL", "-> wrong <-://127.0.0.1:65535")
        .args(["get", "abc"])
        .output()
        .expect("run pastebox");

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Invalid database URL"));
}

#[test]
fn test_init_config_writes_defaults_once() {
    let env = TestEnv::new();

    assert_success(&env.run(&["init-config"]));
    let written = std::fs::read_to_string(env.config_path()).expect("config written");
    assert!(written.contains("dayspan = 90"));
    assert!(written.contains("[database]"));
    assert!(written.contains("pastebox.db"));

    let output = env.run(&["init-config"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("--force"));

    assert_success(&env.run(&["init-config", "--force"]));
    assert_success(&env.run(&["add", "--id", "abc", "--body", "FooBar"]));
    assert!(env.database_path().exists());
}
