mod command_line;
pub use command_line::*;

use teloxide::types::{Message, UserId};

pub trait MessageStuff {
    /// Text of the message, or its caption if it's a media message.
    fn text_full(&self) -> Option<&str>;
    /// ID of the user that sent this, if it was sent by a user and not
    /// on behalf of a chat.
    fn sender_user_id(&self) -> Option<UserId>;
}

impl MessageStuff for Message {
    fn text_full(&self) -> Option<&str> {
        self.text().or_else(|| self.caption())
    }
    fn sender_user_id(&self) -> Option<UserId> {
        if self.sender_chat.is_some() {
            // Anonymous admins and channel posts come with a placeholder user
            // in `from`, like @GroupAnonymousBot. That's not who sent it.
            return None;
        }
        self.from.as_ref().map(|user| user.id)
    }
}
