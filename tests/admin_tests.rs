use predicates::str::contains;

mod common;
use common::{init_db_with_roster, lg, setup_test_db, temp_csv};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("admin_init");

    lg().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    lg().args(["--db", &db_path, "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("0 students, 0 faculty"))
        .stdout(contains("Integrity check passed."));
}

#[test]
fn test_import_reports_skipped_rows() {
    let db_path = setup_test_db("admin_import");
    lg().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    let csv = temp_csv(
        "admin_import_students",
        "full_reg_no,name,branch,year,email\n\
         2023PUCS12345,Asha,CSE,2,asha@poornima.edu.in\n\
         2023PUCS22222,Ravi,ECE,9,ravi@poornima.edu.in\n\
         2023PUCS33333,Meena,ME,1,meena@gmail.com\n",
    );

    lg().args(["--db", &db_path, "import", "students", &csv])
        .assert()
        .success()
        .stdout(contains("1 inserted, 0 updated, 2 skipped"))
        .stdout(contains("Row 3: 'year' must be between 1 and 5."))
        .stdout(contains("Row 4: Email must end with @poornima.edu.in."));
}

#[test]
fn test_db_info_counts_roster_and_visits() {
    let db_path = init_db_with_roster("admin_info");

    lg().args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("2 students, 1 faculty"));

    lg().args(["--db", &db_path, "db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("0 applied"));
}

#[test]
fn test_log_print_lists_migrations() {
    let db_path = init_db_with_roster("admin_log");

    lg().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("create_rosters"));
}

#[test]
fn test_missing_database_is_reported() {
    let db_path = setup_test_db("admin_missing");

    lg().args(["--db", &db_path, "inside"])
        .assert()
        .failure()
        .stderr(contains("run `libgate init` first"));
}

#[test]
fn test_config_print_shows_override() {
    let db_path = setup_test_db("admin_config");

    lg().args(["--db", &db_path, "config", "--print"])
        .assert()
        .success()
        .stdout(contains(db_path.as_str()))
        .stdout(contains("auto_exit_time"));
}
