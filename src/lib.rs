// Public API - only expose the runner module
pub mod runner;

// Internal modules - organized by subsystem
mod api;
mod config;
mod model;
mod report;
mod search;

// Defaults the CLI surfaces in its help text
pub use config::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, TOKEN_ENV_VAR};
