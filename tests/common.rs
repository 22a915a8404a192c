#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn lg() -> Command {
    cargo_bin_cmd!("libgate")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_libgate.sqlite"));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write `body` to a temp CSV and return its path
pub fn temp_csv(name: &str, body: &str) -> String {
    let p = temp_out(name, "csv");
    fs::write(&p, body).expect("write csv");
    p
}

pub const STUDENTS_CSV: &str = "\
full_reg_no,name,branch,year,email
2023PUCS12345,Asha Verma,CSE,2,asha@poornima.edu.in
2022PUEC54321,Ravi Kumar,ECE,3,ravi@poornima.edu.in
";

pub const FACULTY_CSV: &str = "\
full_reg_no,name,department
4021,Dr. Rao,Physics
";

/// Initialize the DB (test mode) and load a small roster
pub fn init_db_with_roster(name: &str) -> String {
    let db_path = setup_test_db(name);

    lg().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    let students = temp_csv(&format!("{name}_students"), STUDENTS_CSV);
    lg().args(["--db", &db_path, "import", "students", &students])
        .assert()
        .success();

    let faculty = temp_csv(&format!("{name}_faculty"), FACULTY_CSV);
    lg().args(["--db", &db_path, "import", "faculty", &faculty])
        .assert()
        .success();

    db_path
}

/// Toggle a person at a pinned library time
pub fn check_at(db_path: &str, now: &str, code: &str, role: &str) -> assert_cmd::assert::Assert {
    lg().args(["--db", db_path, "--now", now, "check", code, "--role", role])
        .assert()
}
