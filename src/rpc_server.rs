//! Navboard RPC Server: JSON-RPC over stdin/stdout for the admin panel.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"import.bookmarks", "params":{"html":"...","dryRun":true}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use navboard::app::App;
use navboard::rpc_handler::handle_method;
use navboard::services::settings_engine::{data_dir, SettingsEngine, SettingsEngineTrait};

use serde_json::{json, Value};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "rpc server failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let dir = data_dir();
    let mut settings = SettingsEngine::new(None);
    let database_file = settings.load().context("failed to load settings")?.database_file;
    let db_path = dir.join(database_file);
    let app = App::new(&db_path.to_string_lossy())
        .map_err(|e| anyhow!("failed to open database {}: {e}", db_path.display()))?;
    let app = Mutex::new(app);
    info!(db = %db_path.display(), "navboard rpc server ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit(&mut out, &json!({"event":"ready","version":env!("CARGO_PKG_VERSION")}))
        .context("failed to write ready event")?;

    let mut rate_limiter = RateLimiter::new(50);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                emit(&mut out, &json!({"id":null,"error":format!("parse error: {}",e)}))
                    .context("failed to write response")?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            emit(&mut out, &json!({"id": id, "error": "rate limit exceeded"}))
                .context("failed to write response")?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                warn!(method, error = %err, "rpc method failed");
                json!({"id": id, "error": err})
            }
        };
        emit(&mut out, &response).context("failed to write response")?;
    }

    Ok(())
}
