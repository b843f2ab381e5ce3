// Library surface for the binary, headless/integration tests and reuse.
// Keep terminal setup and CLI parsing in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod input;
pub mod notes;
pub mod notify;
pub mod phase;
pub mod pools;
pub mod prompt;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;
