mod config;
mod ipc;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout carries responses; diagnostics go to stderr.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = config::SidecarConfig::from_env().context("failed to load sidecar config")?;
    init_tracing(&config.log_filter);
    info!(version = env!("CARGO_PKG_VERSION"), "gradebookd listening on stdin");

    let mut state = ipc::AppState { config };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "stdin read failed; shutting down");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                // No id to echo back.
                debug!(error = %e, "unparseable request line");
                ipc::bad_json(e.to_string())
            }
        };
        writeln!(stdout, "{}", resp).context("failed to write response")?;
        stdout.flush().context("failed to flush response")?;
    }

    info!("stdin closed");
    Ok(())
}
