use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};
use timetable_store::{MemoryStore, store_lock_path};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "timetable-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn store(&self) -> PathBuf {
        self.path.join("schedule.jsonl")
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_timetable<I, S>(store: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_timetable");
    Command::new(bin)
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("timetable command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn init_seeds_classrooms_once() {
    let tmp = TempDirGuard::new("init");
    let store = tmp.store();

    let first = run_timetable(&store, ["init"]);
    assert_success(&first);
    let text = stdout_text(&first);
    assert!(text.contains("created store: yes"));
    assert!(text.contains("101 (capacity 30)"));

    let second = run_timetable(&store, ["--json", "init"]);
    assert_success(&second);
    let payload = parse_json_stdout(&second);
    assert_eq!(payload["outcome"]["createdStore"], Value::Bool(false));
    assert_eq!(payload["outcome"]["classrooms"], Value::from(3));
    assert_eq!(payload["outcome"]["created"], Value::Array(Vec::new()));

    let loaded = MemoryStore::load_jsonl(&store).expect("store should load");
    assert_eq!(loaded.classrooms().count(), 3);
    assert!(!store_lock_path(&store).exists());
}

#[test]
fn add_schedule_hide_round() {
    let tmp = TempDirGuard::new("round");
    let store = tmp.store();

    let added = run_timetable(&store, ["add", "Math", ":", "Smith", ":", "101"]);
    assert_success(&added);
    assert_eq!(stdout_text(&added).trim(), "Lesson added to the schedule.");

    let listing = run_timetable(&store, ["schedule"]);
    assert_success(&listing);
    assert_eq!(
        stdout_text(&listing).trim(),
        "Today's schedule:\n1: Math / Smith / 101"
    );

    let missing = run_timetable(&store, ["add", "Art : Jones : 999"]);
    assert_failure(&missing);
    assert_eq!(stdout_text(&missing).trim(), "Classroom 999 not found.");

    let hidden = run_timetable(&store, ["hide", "1"]);
    assert_success(&hidden);
    assert_eq!(stdout_text(&hidden).trim(), "Lesson hidden from the schedule.");

    let empty = run_timetable(&store, ["schedule"]);
    assert_success(&empty);
    assert_eq!(stdout_text(&empty).trim(), "No lessons today.");
}

#[test]
fn schedule_json_lists_lessons() {
    let tmp = TempDirGuard::new("schedule-json");
    let store = tmp.store();

    assert_success(&run_timetable(&store, ["add", "Math : Smith, Jones : 102"]));
    let listing = run_timetable(&store, ["--json", "schedule"]);
    assert_success(&listing);

    let payload = parse_json_stdout(&listing);
    assert_eq!(payload["ok"], Value::Bool(true));
    let lessons = payload["lessons"].as_array().expect("lessons array");
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0]["ordinal"], Value::from(1));
    assert_eq!(lessons[0]["subject"], Value::from("Math"));
    assert_eq!(lessons[0]["teacher"], Value::from("Jones"));
    assert_eq!(lessons[0]["classroom"], Value::from(102));
}

#[test]
fn invalid_input_is_reported_as_one_reply() {
    let tmp = TempDirGuard::new("invalid");
    let store = tmp.store();

    let malformed = run_timetable(&store, ["--json", "add", "Math : Smith"]);
    assert_failure(&malformed);
    let payload = parse_json_stdout(&malformed);
    assert_eq!(payload["ok"], Value::Bool(false));
    assert_eq!(payload["kind"], Value::from("invalid_input"));

    let word = run_timetable(&store, ["hide", "first"]);
    assert_failure(&word);
    assert_eq!(stdout_text(&word).trim(), "Please specify a lesson number.");

    let zero = run_timetable(&store, ["--json", "hide", "0"]);
    assert_failure(&zero);
    let payload = parse_json_stdout(&zero);
    assert_eq!(payload["kind"], Value::from("invalid_input"));
    assert_eq!(payload["message"], Value::from("Invalid lesson number."));

    let negative = run_timetable(&store, ["hide", "-2"]);
    assert_failure(&negative);
    assert_eq!(stdout_text(&negative).trim(), "Invalid lesson number.");
}

#[test]
fn teacher_cap_rejects_sixth_lesson() {
    let tmp = TempDirGuard::new("cap");
    let store = tmp.store();

    for _ in 0..5 {
        assert_success(&run_timetable(&store, ["add", "Physics : Lee : 103"]));
    }
    let sixth = run_timetable(&store, ["--json", "add", "Physics : Lee : 103"]);
    assert_failure(&sixth);
    let payload = parse_json_stdout(&sixth);
    assert_eq!(payload["kind"], Value::from("capacity_exceeded"));
    assert_eq!(
        payload["message"],
        Value::from("Teacher Lee cannot teach more than 5 lessons per day.")
    );
}

#[test]
fn busy_store_lock_is_reported_as_storage_failure() {
    let tmp = TempDirGuard::new("busy-lock");
    let store = tmp.store();
    assert_success(&run_timetable(&store, ["init"]));

    let lock_path = store_lock_path(&store);
    fs::write(&lock_path, "pid=0\n").expect("lock should be written");

    let config_path = tmp.path().join("timetable.toml");
    fs::write(
        &config_path,
        format!(
            "store_path = {:?}\n[lock]\nattempts = 1\nretry_delay_ms = 0\n",
            store.display().to_string()
        ),
    )
    .expect("config should be written");

    let output = Command::new(env!("CARGO_BIN_EXE_timetable"))
        .arg("--config")
        .arg(&config_path)
        .args(["--json", "add", "Math : Smith : 101"])
        .output()
        .expect("timetable command should execute");

    assert_failure(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["ok"], Value::Bool(false));
    assert_eq!(payload["kind"], Value::from("storage_failure"));
    assert!(
        payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("lock busy"))
    );

    // The held lock is left alone and nothing was added.
    assert!(lock_path.exists());
    let loaded = MemoryStore::load_jsonl(&store).expect("store should load");
    assert_eq!(loaded.entries().count(), 0);
}

#[test]
fn config_file_sets_cap_and_seed_rooms() {
    let tmp = TempDirGuard::new("config");
    let config_path = tmp.path().join("timetable.toml");
    fs::write(
        &config_path,
        format!(
            "store_path = {:?}\ndaily_load_cap = 1\n\n[[classrooms]]\nnumber = 7\ncapacity = 12\n",
            tmp.store().display().to_string()
        ),
    )
    .expect("config should be written");

    let bin = env!("CARGO_BIN_EXE_timetable");
    let run = |args: &[&str]| {
        Command::new(bin)
            .arg("--config")
            .arg(&config_path)
            .args(args)
            .output()
            .expect("timetable command should execute")
    };

    assert_success(&run(&["add", "Drama : Kim : 7"]));
    let second = run(&["add", "Drama : Kim : 7"]);
    assert_failure(&second);
    assert_eq!(
        stdout_text(&second).trim(),
        "Teacher Kim cannot teach more than 1 lessons per day."
    );

    let missing_room = run(&["add", "Drama : Park : 101"]);
    assert_failure(&missing_room);
    assert_eq!(stdout_text(&missing_room).trim(), "Classroom 101 not found.");
}

#[test]
fn missing_config_file_fails_before_any_reply() {
    let tmp = TempDirGuard::new("missing-config");
    let bin = env!("CARGO_BIN_EXE_timetable");
    let output = Command::new(bin)
        .arg("--config")
        .arg(tmp.path().join("absent.toml"))
        .arg("schedule")
        .output()
        .expect("timetable command should execute");

    assert_failure(&output);
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read config"));
}

#[test]
fn usage_lists_formats() {
    let tmp = TempDirGuard::new("usage");
    let output = run_timetable(&tmp.store(), ["usage"]);
    assert_success(&output);
    assert!(stdout_text(&output).contains("Subject : Teachers : Classroom"));
}
