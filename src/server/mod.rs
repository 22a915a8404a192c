//! HTTP API: the desk toggle, live views and report downloads, plus the
//! daily auto-exit task.

pub mod routes;
pub mod scheduler;

use crate::config::Config;
use crate::core::sweep::{StartupCleanup, SweepLogic};
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::telemetry;
use chrono::NaiveDateTime;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<DbPool>>,
    pub config: Arc<Config>,
    /// Fixed library clock, for tests and demos.
    pub pinned_now: Option<NaiveDateTime>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(pool)),
            config: Arc::new(config),
            pinned_now: None,
        }
    }

    pub fn with_clock(mut self, now: Option<NaiveDateTime>) -> Self {
        self.pinned_now = now;
        self
    }

    pub fn now(&self) -> AppResult<NaiveDateTime> {
        match self.pinned_now {
            Some(now) => Ok(now),
            None => self.config.now(),
        }
    }

    pub fn db(&self) -> AppResult<MutexGuard<'_, DbPool>> {
        self.db
            .lock()
            .map_err(|_| AppError::Other("database lock poisoned".to_string()))
    }
}

pub struct ServeOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub sweep: bool,
    pub pinned_now: Option<NaiveDateTime>,
}

pub async fn run(config: Config, opts: ServeOptions) -> AppResult<()> {
    telemetry::init(&config.log_level)?;
    config.validate()?;

    let host = opts.host.unwrap_or_else(|| config.server_host.clone());
    let port = opts.port.unwrap_or(config.server_port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid bind address {host}:{port}: {e}")))?;

    let pool = open_db(&config.database)?;
    let state = AppState::new(pool, config).with_clock(opts.pinned_now);

    {
        let now = state.now()?;
        let db = state.db()?;
        match SweepLogic::startup_cleanup(&db.conn, &state.config, now)? {
            StartupCleanup::Closed(n) => warn!(closed = n, "open logs left from today closed at 23:59:59"),
            StartupCleanup::NothingOpen => info!("startup cleanup: no open logs"),
            StartupCleanup::NotNeeded => {}
        }
    }

    if opts.sweep {
        scheduler::spawn_auto_exit(state.clone());
    }

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "library gate ready");

    axum::serve(listener, app).await?;
    Ok(())
}
