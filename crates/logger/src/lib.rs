//! Shared tracing setup for the workspace binaries.

mod subscriber;

pub use subscriber::{LogFormat, init_with};
