//! User-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for terminal usage
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use liveproto_setup::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_step(1, 8, "Checking privileges");
//! ui.success("Running as root");
//! assert_eq!(ui.steps().len(), 1);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, Theme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a progress message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show the start of a numbered step (e.g., "[3/8] Installing PHP").
    fn show_step(&mut self, current: usize, total: usize, title: &str);

    /// Show a labelled value.
    fn show_key_value(&mut self, key: &str, value: &str);
}
