// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod error;
pub mod guess;
pub mod logging;
pub mod lyrics;
pub mod runtime;
pub mod session;
pub mod ui;
