pub mod args;
pub mod exit;

pub use args::{Cli, Command, EmitArgs, Passthrough};
pub use exit::ExitCode;
