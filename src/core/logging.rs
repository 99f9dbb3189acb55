//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (`log` facade bridged into `tracing-subscriber`)
//! - A startup summary of which sinks and features are enabled

use anyhow::Result;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;

/// Initialize the process-wide logger
///
/// Library code logs through the `log` macros; records are forwarded into a
/// `tracing-subscriber` fmt layer filtered by `RUST_LOG` (default `info`).
///
/// # Arguments
/// * `lambda` - When true, drop timestamps and targets: CloudWatch stamps each line itself
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - A logger was already installed
pub fn init_logger(lambda: bool) -> Result<()> {
    tracing_log::LogTracer::init().map_err(|e| anyhow::anyhow!("Failed to bridge log records: {}", e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(!lambda);

    let result = if lambda {
        tracing::subscriber::set_global_default(builder.with_target(false).without_time().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs which parts of the handler are active
///
/// Never prints secret values, only whether they are set.
pub fn log_startup_configuration(config: &Config) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🤖 KinethosBot webhook configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match &config.telegram_token {
        Some(token) if !token.expose_secret().is_empty() => log::info!("✅ TELEGRAM_TOKEN: set"),
        _ => log::error!("❌ TELEGRAM_TOKEN: not set, every update will be answered with 'error logged'"),
    }

    if config.webhook_secret.is_some() {
        log::info!("✅ WEBHOOK_SECRET_TOKEN: set, secret header required");
    } else {
        log::warn!("⚠️  WEBHOOK_SECRET_TOKEN: not set, webhook accepts unauthenticated requests");
    }

    match &config.firehose_stream_name {
        Some(name) => log::info!("✅ FIREHOSE_STREAM_NAME: {}", name),
        None => log::info!("➖ FIREHOSE_STREAM_NAME: not set, stream recording disabled"),
    }

    match &config.table_name {
        Some(name) => log::info!("✅ DDB_TABLE_NAME: {}", name),
        None => log::info!("➖ DDB_TABLE_NAME: not set, table recording and profiles disabled"),
    }
    if config.has_no_sinks() {
        log::warn!("⚠️  No sink configured, updates are answered but not recorded");
    }

    log::info!("   Dialogue store: {}", config.dialogue_backend);
    log::info!(
        "   Coach model: {} (max_tokens={}, temperature={})",
        config.model.model_id,
        config.model.max_tokens,
        config.model.temperature
    );
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
