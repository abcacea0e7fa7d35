//! TUI module: Terminal User Interface using Ratatui.
//!
//! Single-screen dashboard with:
//! - Turbine readings input form
//! - Prediction result, probability chart and maintenance advice
//! - Usage help overlay

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::TurbineTheme;
