use crate::core::import::Roster;
use crate::core::report::ReportKind;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for libgate
/// Campus library check-in/check-out tracker backed by SQLite
#[derive(Parser)]
#[command(
    name = "libgate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Library gate tracker: toggle entries and exits, sweep leftovers and export reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the library clock ("YYYY-MM-DD HH:MM[:SS]")
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Record an entry, or an exit if the person is already inside
    Check {
        /// Registration code (last 5 digits for students, 4-digit faculty number)
        code: String,

        #[arg(
            long,
            short,
            default_value = "student",
            help = "Role selected at the desk: student or faculty"
        )]
        role: String,

        #[arg(long, help = "Print the recorded visit as JSON")]
        json: bool,
    },

    /// List everyone currently inside
    Inside {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Live statistics for today
    Stats {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Close every open log now (the daily auto-exit)
    Sweep {
        #[arg(
            long,
            help = "Apply the startup rule instead: after the cutoff hour, close at 23:59:59"
        )]
        startup: bool,
    },

    /// Build a report and write it as a spreadsheet
    Report {
        #[arg(value_enum)]
        kind: ReportKind,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Day of the report (not for full-log-dump)")]
        date: Option<String>,

        #[arg(long, value_enum, default_value = "xlsx")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Output file (default: report file name)")]
        file: Option<String>,

        #[arg(long, help = "Print the rows instead of writing a file")]
        preview: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Import a student or faculty roster from CSV
    Import {
        #[arg(value_enum)]
        roster: Roster,

        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Run the HTTP API with the daily auto-exit task
    Serve {
        #[arg(long, help = "Bind address (default from config)")]
        host: Option<String>,

        #[arg(long, help = "Port (default from config)")]
        port: Option<u16>,

        #[arg(long = "no-sweep", help = "Do not schedule the daily auto-exit")]
        no_sweep: bool,
    },
}
