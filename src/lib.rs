// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod fade;
pub mod logging;
pub mod notify;
pub mod params;
pub mod progress;
pub mod runtime;
pub mod session;
pub mod ui;
