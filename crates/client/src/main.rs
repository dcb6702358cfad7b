use clap::Parser;
use client::{setup_logging, Cli};
use std::panic::{self, PanicHookInfo};
use std::process::ExitCode;

fn log_panic(info: &PanicHookInfo<'_>) {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("Unknown panic payload");

    match info.location() {
        Some(location) => log::error!(
            "PANIC: '{message}' at {}:{}",
            location.file(),
            location.line()
        ),
        None => log::error!("PANIC: '{message}'"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(Some(&cli)) {
        eprintln!("Warning: Failed to initialize logging: {e}. Using default logging.");
    }
    panic::set_hook(Box::new(log_panic));

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Command failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
