pub(crate) mod command;

pub use command::Cli;
