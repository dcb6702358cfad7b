mod cli;
mod config;
mod console;
mod secure_key;
mod utils;

pub use cli::Cli;
pub use utils::logging::setup_logging;
