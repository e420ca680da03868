// Logging sink setup and audit events
// The library only emits `tracing` events; the hosting binary installs the
// subscriber once and keeps the returned guard alive for the process lifetime.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// Target used for routing and tool-usage audit events
pub const AUDIT_TARGET: &str = "poli_agent::audit";

/// Install stdout + daily rolling file logging.
///
/// Dropping the returned guard flushes and stops the file writer.
pub fn init_logger(config: &LogConfig) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.dir)?;

    let file_appender = tracing_appender::rolling::daily(&config.dir, &config.file_prefix);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poli_agent=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    info!(dir = %config.dir, file = %config.file_prefix, "Logging initialized");
    Ok(guard)
}

pub fn log_tool_usage(agent: &str, tool: &str, args: &str) {
    info!(target: AUDIT_TARGET, agent = %agent, tool = %tool, args = %args, "Tool used");
}

pub fn log_agent_routing(from: &str, to: &str, reason: Option<&str>) {
    info!(
        target: AUDIT_TARGET,
        from = %from,
        to = %to,
        reason = reason.unwrap_or("-"),
        "Agent routing"
    );
}
