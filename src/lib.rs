// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod timer;
pub mod ui;
