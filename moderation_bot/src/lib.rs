//! A Telegram bot that removes messages of blacklisted users in groups where
//! it was enabled, managed by a whitelist of users through bot commands.

/// The JSON config file and its in-memory copy.
pub mod config;

/// Pretty-printing of users and chats for logs.
mod misc;

/// Functions that perform stuff via the bot.
mod actions;

/// Functions that handle events from Telegram.
pub mod handlers;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;
