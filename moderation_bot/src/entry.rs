use std::sync::Arc;
use teloxide::{dptree::deps, prelude::*};

use crate::{
    config::ConfigStore,
    handlers::{commands::Command, handle_message},
};

/// Environment variable with the path to the config file.
pub const CONFIG_PATH_VAR: &str = "MODBOT_CONFIG";
/// Config file path if [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// # Panics
///
/// Panics if the config file can't be loaded or if Telegram refuses the token.
pub async fn entry() {
    let config_path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let store = ConfigStore::load(&config_path)
        .await
        .unwrap_or_else(|e| panic!("Could not load config file {config_path}: {e}"));

    let token = store.token().await;
    assert!(!token.is_empty(), "No bot token in {config_path}!");

    let bot = Bot::new(token);

    bot.set_my_commands(Command::generate_bot_commands())
        .await
        .expect("Failed to set bot commands!");

    let store = Arc::new(store);

    log::info!("Creating the handler...");

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    log::info!("Dispatching the dispatcher!");

    // Updates from one chat are handled one after another, but different chats
    // run concurrently. The config store locks around its writes for that.
    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(deps![store])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("it appears we have been bonked.");
}
