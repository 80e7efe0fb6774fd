//! Built-in event listeners.

mod logging;

pub use logging::LoggingListener;
