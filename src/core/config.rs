use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_fields};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Effective configuration (file values plus defaults and `--db`).
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("📄 Current configuration:\n");
        println!("{yaml}");
        Ok(())
    }

    pub fn check(path: &Path) -> AppResult<()> {
        if !path.exists() {
            warning(format!(
                "No configuration file at {}; defaults are in use. Run `libgate init`.",
                path.display()
            ));
            return Ok(());
        }

        let missing = missing_fields(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!("Missing fields: {}", missing.join(", ")));
            info("Run `libgate config --migrate` to add them with default values.");
        }

        Config::load_from(path)?.validate()?;
        Ok(())
    }

    pub fn migrate(path: &Path) -> AppResult<()> {
        if !path.exists() {
            return Err(AppError::ConfigLoad);
        }
        migrate_config_file(path)?;
        Ok(())
    }

    /// Open the file in `editor`, then `$EDITOR`/`$VISUAL`, then nano/notepad.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });

        let requested = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        if Self::run_editor(&requested, path) {
            success(format!("Configuration file edited using '{requested}'"));
            return Ok(());
        }

        warning(format!(
            "Editor '{requested}' not available, falling back to '{default_editor}'"
        ));
        if requested != default_editor && Self::run_editor(&default_editor, path) {
            success(format!(
                "Configuration file edited using fallback '{default_editor}'"
            ));
            return Ok(());
        }

        Err(AppError::Config(format!(
            "could not open {} with an editor",
            path.display()
        )))
    }

    fn run_editor(editor: &str, path: &Path) -> bool {
        Command::new(editor)
            .arg(path)
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
