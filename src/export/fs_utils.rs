// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// A missing file, or `force`, means go ahead; otherwise ask on stdin.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }
    confirm_overwrite(path, &mut io::stdin().lock())
}

fn confirm_overwrite<R: BufRead>(path: &Path, input: &mut R) -> AppResult<()> {
    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => {
            info("Existing file will be overwritten.");
            Ok(())
        }
        _ => Err(AppError::Export(format!(
            "cancelled, '{}' not overwritten (use --force)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn only_yes_overwrites() {
        let path = Path::new("report.xlsx");
        assert!(confirm_overwrite(path, &mut Cursor::new("YES\n")).is_ok());
        assert!(confirm_overwrite(path, &mut Cursor::new("n\n")).is_err());
        // closed stdin
        assert!(confirm_overwrite(path, &mut Cursor::new("")).is_err());
    }
}
