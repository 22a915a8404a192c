use crate::errors::{AppError, AppResult};
use crate::utils::time::{hour_label, parse_time};
use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Offset of the library clock from UTC, in minutes (IST = 330).
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
    #[serde(default = "default_auto_exit_time")]
    pub auto_exit_time: String,
    #[serde(default = "default_cleanup_after_hour")]
    pub cleanup_after_hour: u32,
    #[serde(default = "default_student_code_len")]
    pub student_code_len: usize,
    #[serde(default = "default_faculty_code_len")]
    pub faculty_code_len: usize,
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
    #[serde(default = "default_reason")]
    pub default_reason: String,
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_utc_offset() -> i32 {
    330
}
fn default_open_hour() -> u32 {
    7
}
fn default_close_hour() -> u32 {
    20
}
fn default_auto_exit_time() -> String {
    "16:30".to_string()
}
fn default_cleanup_after_hour() -> u32 {
    16
}
fn default_student_code_len() -> usize {
    5
}
fn default_faculty_code_len() -> usize {
    4
}
fn default_email_domain() -> String {
    "@poornima.edu.in".to_string()
}
fn default_reason() -> String {
    "Self Study".to_string()
}
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}
fn default_server_port() -> u16 {
    5000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    /// Default settings pointing at the given database file.
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            utc_offset_minutes: default_utc_offset(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            auto_exit_time: default_auto_exit_time(),
            cleanup_after_hour: default_cleanup_after_hour(),
            student_code_len: default_student_code_len(),
            faculty_code_len: default_faculty_code_len(),
            email_domain: default_email_domain(),
            default_reason: default_reason(),
            server_host: default_server_host(),
            server_port: default_server_port(),
            log_level: default_log_level(),
        }
    }

    /// Return the standard configuration directory (~/.libgate)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".libgate")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("libgate.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("libgate.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("libgate.sqlite"),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // test mode never touches the user's config file
        if !is_test {
            let config = Self::with_database(db_path.to_string_lossy().to_string());
            config.save_to(&Self::config_file())?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }

    pub fn offset(&self) -> AppResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            AppError::Config(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }

    /// Current wall-clock time of the library.
    pub fn now(&self) -> AppResult<NaiveDateTime> {
        Ok(Utc::now().with_timezone(&self.offset()?).naive_local())
    }

    pub fn auto_exit_at(&self) -> AppResult<NaiveTime> {
        parse_time(&self.auto_exit_time)
            .ok_or_else(|| AppError::InvalidTime(self.auto_exit_time.clone()))
    }

    /// Human label of the opening hours, e.g. "7 AM - 8 PM".
    pub fn hours_label(&self) -> String {
        format!(
            "{} - {}",
            hour_label(self.open_hour),
            hour_label(self.close_hour)
        )
    }

    pub fn validate(&self) -> AppResult<()> {
        self.offset()?;
        self.auto_exit_at()?;

        if self.open_hour >= self.close_hour || self.close_hour > 24 {
            return Err(AppError::Config(format!(
                "invalid opening hours: {} -> {}",
                self.open_hour, self.close_hour
            )));
        }
        if self.cleanup_after_hour > 23 {
            return Err(AppError::Config(format!(
                "cleanup_after_hour must be 0-23, got {}",
                self.cleanup_after_hour
            )));
        }
        if self.student_code_len == 0 || self.faculty_code_len == 0 {
            return Err(AppError::Config(
                "registration code lengths must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
