//! External command execution and platform queries.

pub mod command;
pub mod platform;

pub use command::{execute, split_path, CommandResult, Invocation};
pub use platform::is_elevated;
