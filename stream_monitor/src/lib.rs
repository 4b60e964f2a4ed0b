//! Watches a Bilibili broadcaster, and whenever they go live, records the
//! stream and sends the recording to a Telegram chat.

mod error;
pub use error::Error;

/// Configuration from environment variables.
pub mod settings;

/// Checking whether a broadcaster is live.
pub mod live;

/// Recording streams and sending them off.
pub mod recorder;

/// The polling loop.
pub mod monitor;

/// Entry function that starts the monitor.
mod entry;
pub use entry::*;
