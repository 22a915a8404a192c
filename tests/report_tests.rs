use predicates::str::contains;
use std::fs;

mod common;
use common::{check_at, init_db_with_roster, lg, setup_test_db, temp_out};

fn db_with_visits(name: &str) -> String {
    let db_path = init_db_with_roster(name);
    check_at(&db_path, "2025-09-15 09:00", "12345", "student").success();
    check_at(&db_path, "2025-09-15 10:15", "12345", "student").success();
    check_at(&db_path, "2025-09-15 11:00", "54321", "student").success();
    check_at(&db_path, "2025-09-17 14:00", "4021", "faculty").success();
    db_path
}

#[test]
fn test_daily_summary_xlsx() {
    let db_path = db_with_visits("report_daily_xlsx");
    let out = temp_out("report_daily_xlsx", "xlsx");

    lg().args([
        "--db",
        &db_path,
        "report",
        "daily-summary",
        "--date",
        "2025-09-15",
        "--file",
        &out,
    ])
    .assert()
    .success()
    .stdout(contains("XLSX export completed"));

    let bytes = fs::read(&out).expect("xlsx written");
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_daily_summary_csv_marks_still_inside() {
    let db_path = db_with_visits("report_daily_csv");
    let out = temp_out("report_daily_csv", "csv");

    lg().args([
        "--db",
        &db_path,
        "report",
        "daily-summary",
        "--date",
        "2025-09-15",
        "--format",
        "csv",
        "--file",
        &out,
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).expect("csv written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "Registration No,Name,Branch,Year,Entry Date,Entry Time,Exit Date,Exit Time"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2023PUCS12345,Asha Verma,CSE,2,15-09-2025,09:00:00,15-09-2025,10:15:00"));
    assert!(lines[2].ends_with("Still Inside,Still Inside"));
}

#[test]
fn test_weekly_summary_json() {
    let db_path = db_with_visits("report_weekly_json");
    let out = temp_out("report_weekly_json", "json");

    lg().args([
        "--db",
        &db_path,
        "report",
        "weekly-summary",
        "--date",
        "2025-09-21",
        "--format",
        "json",
        "--file",
        &out,
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).expect("json written");
    let rows: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(rows.as_array().unwrap().len(), 3);
    assert_eq!(rows[2]["Registration No"], "4021");
    assert_eq!(rows[2]["Branch"], "N/A");
    assert_eq!(rows[2]["Year"], "N/A");
}

#[test]
fn test_student_count_preview() {
    let db_path = db_with_visits("report_count_preview");

    lg().args([
        "--db",
        &db_path,
        "report",
        "daily-student-count",
        "--date",
        "2025-09-15",
        "--preview",
    ])
    .assert()
    .success()
    .stdout(contains("daily_student_count_2025-09-15.xlsx"))
    .stdout(contains("Unique Student Count"))
    .stdout(contains("15-09-2025  2"));
}

#[test]
fn test_report_errors() {
    let db_path = db_with_visits("report_errors");

    lg().args(["--db", &db_path, "report", "daily-summary"])
        .assert()
        .failure()
        .stderr(contains("A 'date' parameter is required. Format: YYYY-MM-DD"));

    lg().args(["--db", &db_path, "report", "daily-summary", "--date", "15-09-2025"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format. Please use YYYY-MM-DD."));

    lg().args(["--db", &db_path, "report", "weekly-summary", "--date", "2025-09-02"])
        .assert()
        .failure()
        .stderr(contains("No library entries found for the week of 2025-09-01."));
}

#[test]
fn test_report_on_empty_log() {
    let db_path = setup_test_db("report_empty");
    lg().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    lg().args(["--db", &db_path, "report", "full-log-dump", "--preview"])
        .assert()
        .failure()
        .stderr(contains("Could not connect to the database or the log is empty."));
}

#[test]
fn test_existing_file_needs_force() {
    let db_path = db_with_visits("report_force");
    let out = temp_out("report_force", "csv");
    fs::write(&out, "old").unwrap();

    // stdin closed: the overwrite prompt is declined
    lg().args([
        "--db", &db_path, "report", "full-log-dump", "--format", "csv", "--file", &out,
    ])
    .write_stdin("")
    .assert()
    .failure();
    assert_eq!(fs::read_to_string(&out).unwrap(), "old");

    lg().args([
        "--db", &db_path, "report", "full-log-dump", "--format", "csv", "--file", &out, "--force",
    ])
    .assert()
    .success();
    assert!(fs::read_to_string(&out).unwrap().starts_with("Registration No"));
}
