use crate::cli::commands::open_existing;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::header;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        kind,
        date,
        format,
        file,
        preview,
        force,
    } = cmd
    {
        let pool = open_existing(cfg)?;
        let report = ReportLogic::build(&pool.conn, *kind, date.as_deref())?;

        if *preview {
            header(format!("{} ({} rows)", report.filename, report.rows.len()));
            let mut table = Table::new(&report.headers);
            for row in &report.rows {
                table.add_row(row.clone());
            }
            print!("{}", table.render());
            return Ok(());
        }

        ExportLogic::export(&report, *format, file.as_deref(), *force)?;
    }
    Ok(())
}
