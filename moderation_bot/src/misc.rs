use std::fmt::Write;

use teloxide::types::{Chat, Message, User};

/// Describe the user for logs, with either `@username` or full name, and their ID.
#[must_use]
pub fn user_name_prettyprint(user: &User) -> String {
    let mut name = match &user.username {
        Some(username) => format!("@{username}"),
        None => user.full_name(),
    };

    write!(name, " (userid {})", user.id).expect("Writing to a String never fails");
    name
}

/// Describe the chat for logs, with either `@username` or title, and its ID.
#[must_use]
pub fn chat_name_prettyprint(chat: &Chat) -> String {
    let mut name = if let Some(username) = chat.username() {
        format!("@{username}")
    } else if let Some(title) = chat.title() {
        title.to_string()
    } else if let Some(first_name) = chat.first_name() {
        // Private chat.
        match chat.last_name() {
            Some(last_name) => format!("{first_name} {last_name}"),
            None => first_name.to_string(),
        }
    } else {
        "an unnamed chat".to_string()
    };

    write!(name, " (chatid {})", chat.id).expect("Writing to a String never fails");
    name
}

/// Describe whoever sent this message for logs.
#[must_use]
pub fn sender_name_prettyprint(message: &Message) -> String {
    if let Some(chat) = &message.sender_chat {
        chat_name_prettyprint(chat)
    } else if let Some(user) = &message.from {
        user_name_prettyprint(user)
    } else {
        // Shouldn't happen, but eh.
        "an unknown sender".to_string()
    }
}
