//! Terminal output.

mod app;
pub mod table;
pub mod toast_view;

pub use app::App;
