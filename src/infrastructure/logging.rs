//! Logging system configuration and initialization
//!
//! Console + file logging via tracing, with:
//! - File logging (daily rolling) stored relative to the executable
//! - Config-driven log level control
//! - ICT (Indochina Time, UTC+7) timestamps to match the support team's day
//! - Noise filters for the HTTP stack

use anyhow::Result;
use chrono::{FixedOffset, Utc};
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_appender::non_blocking;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::infrastructure::config::LoggingConfig;

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<non_blocking::WorkerGuard>> = Mutex::new(Vec::new());
}

/// Custom time formatter for ICT (Indochina Time, UTC+7)
struct IctTimeFormatter;

impl FormatTime for IctTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Utc::now();
        let ict_offset = FixedOffset::east_opt(7 * 3600).unwrap(); // UTC+7
        let ict_time = now.with_timezone(&ict_offset);
        write!(w, "{}", ict_time.format("%Y-%m-%d %H:%M:%S%.3f %Z"))
    }
}

/// Get the log directory relative to the executable location
#[must_use]
pub fn get_log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Initialize the logging system from the logging section of the settings.
///
/// Safe to call once at startup; returns an error if a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},reqwest=warn,hyper=warn,hyper_util=warn",
            config.level
        ))
    });

    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_timer(IctTimeFormatter)
            .with_target(true)
            .with_ansi(true)
    });

    let file_layer = if config.file_output {
        let log_dir = get_log_directory();
        std::fs::create_dir_all(&log_dir)?;
        let appender = tracing_appender::rolling::daily(log_dir, "cs-console.log");
        let (writer, guard) = non_blocking(appender);
        if let Ok(mut guards) = LOG_GUARDS.lock() {
            guards.push(guard);
        }
        Some(
            fmt::layer()
                .with_timer(IctTimeFormatter)
                .with_writer(writer)
                .with_ansi(false),
        )
    } else {
        None
    };

    Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging initialized (level: {})", config.level);
    Ok(())
}
