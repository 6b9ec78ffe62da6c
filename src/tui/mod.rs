//! TUI module: Terminal User Interface using Ratatui.
//!
//! Three screens:
//! - Login
//! - Signup
//! - Dashboard with the medicine table and add form

mod app;
mod styles;
mod ui;

pub use app::{App, View};
pub use styles::MedicalTheme;
