//! Conversions from teloxide types to pagebot-core types.

use pagebot_core::{Chat, Context, User};

/// Display name is first name plus last name when present.
pub fn user_from_telegram(user: &teloxide::types::User) -> User {
    let display_name = match &user.last_name {
        Some(last) => format!("{} {}", user.first_name, last),
        None => user.first_name.clone(),
    };
    User {
        id: user.id.0.to_string(),
        username: user.username.clone(),
        display_name: Some(display_name),
    }
}

fn chat_kind(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_private() {
        "private"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else if chat.is_channel() {
        "channel"
    } else {
        "unknown"
    }
}

/// Context for an incoming message; `args` are filled in later by the router.
pub fn context_from_message(msg: &teloxide::types::Message) -> Context {
    let chat = Chat::new(msg.chat.id.0.to_string(), chat_kind(&msg.chat));
    let ctx = Context::in_chat(chat).with_message_id(msg.id.0.to_string());
    match msg.from.as_ref() {
        Some(user) => ctx.with_user(user_from_telegram(user)),
        None => ctx,
    }
}
