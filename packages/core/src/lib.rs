// Library root: exposes the scorer and HTTP layer for the binary and for
// integration tests in `tests/`. Production entry point remains `src/main.rs`.

pub mod api;
pub mod error;
pub mod interactions;
pub mod metrics;
pub mod services;

// Startup plumbing used by the binary.
pub mod cli;
pub mod config;
pub mod logging;
