//! End-to-end tests of the `tb` binary over a temporary notes directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tb_binary() -> String {
    env!("CARGO_BIN_EXE_tb").to_string()
}

/// Runs `tb` with an isolated home so no user config is picked up.
fn tb(home: &Path, args: &[&str]) -> Output {
    Command::new(tb_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("TB_NOTES_DIR")
        .env_remove("TB_SECTION_MARKER")
        .env_remove("TB_INCLUDE_BREAKS")
        .env_remove("TB_IGNORE_EMPTY")
        .args(args)
        .output()
        .expect("failed to run tb")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const MONDAY: &str = "\
# Monday

## Time
08:00 - 09:00 T: #General Planning
09:00 - 12:00 T: #Project-WebApp Frontend development
12:00 - 13:00 B: #General Lunch

## Notes
Shipped the login page.
";

const TUESDAY: &str = "\
# Tuesday

## Time
09:00 - 10:00 M: #Team Sprint planning
10:30 - 11:00 C: #General Email
11:00 - 12:00 T: #Project-WebApp Review
";

/// Notes directory with Monday and Tuesday notes, plus a Wednesday note
/// that has no time section.
fn notes_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(notes.join("2025-01-27.md"), MONDAY).unwrap();
    fs::write(notes.join("2025-01-28.md"), TUESDAY).unwrap();
    fs::write(notes.join("2025-01-29.md"), "# Wednesday\nOff sick.\n").unwrap();
    temp
}

#[test]
fn test_summary_of_single_note() {
    let temp = notes_dir();
    let notes = temp.path().join("notes");
    let output = tb(
        temp.path(),
        &[
            "summary",
            "--notes-dir",
            notes.to_str().unwrap(),
            "--date",
            "2025-01-27",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("WebApp      3:00   75.0%"), "got:\n{out}");
    assert!(out.contains("General     1:00   25.0%"), "got:\n{out}");
    assert!(out.contains("Total time: 4:00"), "got:\n{out}");
    assert!(!out.contains("Days:"), "single day has no average: {out}");
}

#[test]
fn test_summary_includes_breaks_when_asked() {
    let temp = notes_dir();
    let file = temp.path().join("notes").join("2025-01-27.md");
    let output = tb(
        temp.path(),
        &["summary", file.to_str().unwrap(), "--include-breaks"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Total time: 5:00"));
}

#[test]
fn test_summary_over_range_skips_missing_and_sectionless_notes() {
    let temp = notes_dir();
    let notes = temp.path().join("notes");
    let output = tb(
        temp.path(),
        &[
            "summary",
            "--notes-dir",
            notes.to_str().unwrap(),
            "--from",
            "2025-01-26",
            "--to",
            "2025-01-30",
            "--json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["grand_total_minutes"], 390);
    assert_eq!(json["days"], 2);
    assert_eq!(json["average_minutes_per_day"], 195);
    assert_eq!(json["rows"][0]["project_code"], "WebApp");
    assert_eq!(json["rows"][0]["total_minutes"], 240);
}

#[test]
fn test_summary_filters_and_csv() {
    let temp = notes_dir();
    let notes = temp.path().join("notes");
    let output = tb(
        temp.path(),
        &[
            "summary",
            "--notes-dir",
            notes.to_str().unwrap(),
            "--from",
            "2025-01-27",
            "--to",
            "2025-01-28",
            "--ignore",
            "PLANNING",
            "--ignore-case",
            "--format",
            "csv",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "group,name,minutes,percent\n\
         project,WebApp,240,88.9\n\
         project,General,30,11.1\n"
    );
}

#[test]
fn test_summary_rejects_invalid_regex() {
    let temp = notes_dir();
    let file = temp.path().join("notes").join("2025-01-27.md");
    let output = tb(
        temp.path(),
        &["summary", file.to_str().unwrap(), "--filter", "("],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid --filter or --ignore pattern"));
}

#[test]
fn test_file_must_be_named_by_date() {
    let temp = notes_dir();
    let file = temp.path().join("notes").join("todo.md");
    fs::write(&file, MONDAY).unwrap();

    let output = tb(temp.path(), &["summary", file.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Filename must be in the format YYYY-MM-DD.md"));
}

#[test]
fn test_missing_note_is_an_error() {
    let temp = notes_dir();
    let notes = temp.path().join("notes");
    let output = tb(
        temp.path(),
        &[
            "show",
            "--notes-dir",
            notes.to_str().unwrap(),
            "--date",
            "2024-06-01",
        ],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("2024-06-01.md' does not exist"));
}

#[test]
fn test_year_flags_conflict_with_single_day() {
    let temp = notes_dir();
    let output = tb(temp.path(), &["show", "--this-year", "--date", "2025-01-27"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot be used with"), "stderr: {}", stderr(&output));
}

#[test]
fn test_validate_exit_status() {
    let temp = notes_dir();
    let notes = temp.path().join("notes");
    let dir = notes.to_str().unwrap();

    let clean = tb(temp.path(), &["validate", "--notes-dir", dir, "--date", "2025-01-27"]);
    assert!(clean.status.success(), "stderr: {}", stderr(&clean));
    assert_eq!(stdout(&clean), "2025-01-27.md: OK\n");

    let gappy = tb(temp.path(), &["validate", "--notes-dir", dir, "--date", "2025-01-28"]);
    assert_eq!(gappy.status.code(), Some(1));
    let out = stdout(&gappy);
    assert!(
        out.contains("Lines 4-5: Gap of 30 minutes between 10:00 and 10:30"),
        "got:\n{out}"
    );
}

#[test]
fn test_fix_rewrites_note_in_place() {
    let temp = notes_dir();
    let file = temp.path().join("notes").join("2025-01-28.md");

    let dry = tb(temp.path(), &["fix", file.to_str().unwrap(), "--dry-run"]);
    assert!(dry.status.success(), "stderr: {}", stderr(&dry));
    assert!(stdout(&dry).contains("09:00 - 10:30 M: #Team Sprint planning"));
    assert_eq!(fs::read_to_string(&file).unwrap(), TUESDAY);

    let output = tb(temp.path(), &["fix", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "2025-01-28.md: 1 gap fixed, 0 issues require manual resolution\n"
    );
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        TUESDAY.replace("09:00 - 10:00 M:", "09:00 - 10:30 M:")
    );

    let recheck = tb(temp.path(), &["validate", file.to_str().unwrap()]);
    assert!(recheck.status.success(), "stdout: {}", stdout(&recheck));
}

#[test]
fn test_config_file_and_env_select_marker() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("journal");
    fs::create_dir_all(&notes).unwrap();
    fs::write(
        notes.join("2025-01-27.md"),
        "# Monday\n### Log\n08:00 - 09:30 A: #Ops Inbox zero\n",
    )
    .unwrap();

    let config = temp.path().join("tb.toml");
    fs::write(
        &config,
        format!("notes_dir = {:?}\n", notes.to_str().unwrap()),
    )
    .unwrap();

    let output = Command::new(tb_binary())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env("TB_SECTION_MARKER", "### Log")
        .env_remove("RUST_LOG")
        .args([
            "--config",
            config.to_str().unwrap(),
            "show",
            "--date",
            "2025-01-27",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("08:00-09:30   1:30  Admin     Ops           Inbox zero"), "got:\n{out}");
    assert!(out.contains("Total: 1:30"));
}
