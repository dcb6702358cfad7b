use log::LevelFilter;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

use crate::cli::Cli;

/// Crates that are chatty at info level.
const QUIET_TARGETS: [&str; 5] = ["alloy", "hyper", "hyper_util", "reqwest", "tracing::span"];

struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let clock = OffsetDateTime::now_utc()
            .format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_else(|_| String::from("??:??:??"));
        write!(w, "{clock}")
    }
}

/// Installs the console subscriber. `log` records from the shared crate are
/// forwarded through the subscriber's log bridge.
pub fn setup_logging(cli: Option<&Cli>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let log_level = match cli.and_then(|cli| cli.log_level.as_deref()) {
        Some(level) => level.parse()?,
        None => LevelFilter::Info,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(log_level.to_string().parse()?);
    for target in QUIET_TARGETS {
        filter = filter.add_directive(format!("{target}=warn").parse()?);
    }

    let console_layer = fmt::layer()
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_timer(ClockTime)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()?;

    Ok(())
}
