//! Presentation layer with command handlers and terminal output.

mod commands;
/// Terminal rendering and the application root.
pub mod ui;

pub use ui::App;
