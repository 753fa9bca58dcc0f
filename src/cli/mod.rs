// CLI module
// Public interface for command-line interface

mod commands;
mod repl;

pub use commands::{handle_command, Command};
pub use repl::Repl;
