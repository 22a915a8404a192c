use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::server::{self, ServeOptions};
use chrono::NaiveDateTime;

pub fn handle(cmd: &Commands, cfg: &Config, pinned_now: Option<NaiveDateTime>) -> AppResult<()> {
    if let Commands::Serve {
        host,
        port,
        no_sweep,
    } = cmd
    {
        let opts = ServeOptions {
            host: host.clone(),
            port: *port,
            sweep: !*no_sweep,
            pinned_now,
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(server::run(cfg.clone(), opts))?;
    }
    Ok(())
}
