//! Sinks stacked onto the tracing registry by [`crate::logging::init`].

pub mod console;
pub mod file;
