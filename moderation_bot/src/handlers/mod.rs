use std::sync::Arc;

use bot_commons::useful_methods::{CommandLine, MessageStuff};
use teloxide::{
    types::{ChatId, Me, Message, UserId},
    Bot, RequestError,
};

use crate::{
    actions::{delete_blacklisted_message, reply},
    config::ConfigStore,
};

use self::commands::{run_command, CommandContext};

pub mod commands;

/// What whitelisted users get in DMs for anything that isn't a command.
pub const PRIVATE_ACK: &str = "Hi! I'm up and running. Send /help for the list of commands.";

/// What to do about an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    Nothing,
    /// Delete it, the sender is blacklisted.
    Remove,
    Reply(String),
}

pub async fn handle_message(
    bot: Bot,
    me: Me,
    message: Message,
    store: Arc<ConfigStore>,
) -> Result<(), RequestError> {
    match reaction(&store, &message, me.id, me.username()).await {
        Reaction::Nothing => {}
        Reaction::Remove => delete_blacklisted_message(&bot, &message).await,
        Reaction::Reply(text) => reply(&bot, &message, text).await?,
    }

    Ok(())
}

/// Decide what to do about `message`, as seen by the bot `me`.
pub async fn reaction(
    store: &ConfigStore,
    message: &Message,
    me: UserId,
    bot_username: &str,
) -> Reaction {
    // Bot ignores messages made by itself.
    if message.from.as_ref().map(|x| x.id) == Some(me) {
        return Reaction::Nothing;
    }

    let sender = message.sender_user_id();
    let text = message.text_full();

    if message.chat.is_private() {
        let Some(sender) = sender else {
            return Reaction::Nothing;
        };
        return match private_response(store, sender, message.chat.id, text, bot_username).await {
            Some(text) => Reaction::Reply(text),
            None => Reaction::Nothing,
        };
    }

    group_reaction(store, message.chat.id, sender, text, bot_username).await
}

/// Decide what to do about a message in a group. The blacklist guard goes
/// first, so a blacklisted sender never gets to run commands there.
pub async fn group_reaction(
    store: &ConfigStore,
    chat: ChatId,
    sender: Option<UserId>,
    text: Option<&str>,
    bot_username: &str,
) -> Reaction {
    if should_remove(store, chat, sender).await {
        return Reaction::Remove;
    }

    let (Some(sender), Some(text)) = (sender, text) else {
        return Reaction::Nothing;
    };

    let Some(line) = CommandLine::parse(text, bot_username) else {
        return Reaction::Nothing;
    };

    let context = CommandContext {
        sender,
        chat,
        in_group: true,
    };

    match run_command(store, context, &line).await {
        Some(text) => Reaction::Reply(text),
        None => Reaction::Nothing,
    }
}

/// Decide what to answer to a direct message from `sender`.
///
/// Users not in the whitelist are ignored entirely. Whitelisted ones can use
/// commands, and get a short acknowledgement for anything else.
pub async fn private_response(
    store: &ConfigStore,
    sender: UserId,
    chat: ChatId,
    text: Option<&str>,
    bot_username: &str,
) -> Option<String> {
    if !store.is_whitelisted(sender).await {
        return None;
    }

    if let Some(line) = text.and_then(|text| CommandLine::parse(text, bot_username)) {
        let context = CommandContext {
            sender,
            chat,
            in_group: false,
        };
        if let Some(response) = run_command(store, context, &line).await {
            return Some(response);
        }
    }

    Some(PRIVATE_ACK.to_string())
}

/// Whether a message in `chat` from `sender` must be removed: the group has
/// moderation enabled and the sender is blacklisted.
///
/// Messages that aren't from a user, like channel posts or anonymous admins,
/// are never removed.
pub async fn should_remove(store: &ConfigStore, chat: ChatId, sender: Option<UserId>) -> bool {
    let Some(sender) = sender else {
        return false;
    };

    store.is_group_allowed(chat).await && store.is_blacklisted(sender).await
}
