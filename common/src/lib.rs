//! Shared building blocks for `scout`: configuration, the scan target model,
//! error types and the logging macros used across the workspace.

pub mod config;
pub mod error;
pub mod log;
pub mod target;

#[doc(hidden)]
pub use tracing as __tracing;
