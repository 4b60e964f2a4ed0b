use teloxide::{
    prelude::Requester, sugar::request::RequestReplyExt, types::Message, ApiError, Bot,
    RequestError,
};

use crate::misc::{chat_name_prettyprint, sender_name_prettyprint};

/// Delete a message sent by a blacklisted user.
///
/// The bot stays quiet in the chat either way. Failures are only logged and
/// never retried; a message that's already gone is not a failure.
pub async fn delete_blacklisted_message(bot: &Bot, message: &Message) {
    let sender_name = sender_name_prettyprint(message);
    let chat_name = chat_name_prettyprint(&message.chat);

    match bot.delete_message(message.chat.id, message.id).await {
        Ok(_) => {
            log::info!("Deleted a message from {sender_name} in {chat_name}");
        }
        Err(RequestError::Api(ApiError::MessageIdInvalid | ApiError::MessageToDeleteNotFound)) => {
            // Someone else probably has already deleted it. That's fine.
            log::debug!("Message from {sender_name} in {chat_name} was already gone");
        }
        Err(RequestError::Api(ApiError::MessageCantBeDeleted)) => {
            // No rights? Older than 48 hours?
            log::warn!(
                "Can't delete a message from {sender_name} in {chat_name}. \
                Is this bot an admin with the ability to delete messages?"
            );
        }
        Err(e) => {
            log::warn!("Failed deleting a message from {sender_name} in {chat_name}: {e}");
        }
    }
}

/// Reply to `message` with plain `text`.
pub async fn reply(bot: &Bot, message: &Message, text: String) -> Result<(), RequestError> {
    bot.send_message(message.chat.id, text)
        .reply_to(message.id)
        .await?;
    Ok(())
}
