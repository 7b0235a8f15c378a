use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go. The TUI owns the terminal, so it logs to a file.
#[derive(Debug, Clone)]
pub(crate) enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// `WORTHIT_LOG` wins over `RUST_LOG`, which wins over `default_directive`.
pub(crate) fn build_filter(directive: Option<&str>, default_directive: &str) -> Result<EnvFilter> {
    if let Some(d) = directive {
        return EnvFilter::try_new(d).with_context(|| format!("Invalid log filter: {d}"));
    }
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
}

pub(crate) fn init(directive: Option<&str>, target: LogTarget) -> Result<()> {
    match target {
        LogTarget::Stderr => {
            // one-shot commands print their own output; keep stderr quiet by default
            let filter = build_filter(directive, "warn")?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .compact(),
                )
                .try_init()
                .context("Failed to initialise logging")?;
        }
        LogTarget::File(path) => {
            let filter = build_filter(directive, "info")?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .try_init()
                .context("Failed to initialise logging")?;
        }
    }
    Ok(())
}
