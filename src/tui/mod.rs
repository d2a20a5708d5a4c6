//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with model status and recent predictions
//! - Assessment form (symptoms, age, severity, gender)
//! - Result with recommendations and report export

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::Theme;
