//! Core types: user, chat, interaction context, and the rendered form of a page.

use serde::{Deserialize, Serialize};

/// User identity. Ids are strings so Telegram (numeric) and Discord (snowflake) ids share one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            display_name: None,
        }
    }
}

/// Chat (channel, group or private) identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub kind: String,
}

impl Chat {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    /// A private (direct message) chat.
    pub fn private(id: impl Into<String>) -> Self {
        Self::new(id, "private")
    }
}

/// What a command handler, page hook or button sees about the interaction that triggered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub chat: Option<Chat>,
    pub user: Option<User>,
    /// Transport-specific id of the triggering message, if any.
    pub message_id: Option<String>,
    /// Whitespace-separated arguments following a command name.
    pub args: Vec<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context bound to a chat; page displays in this context are delivered and tracked per chat.
    pub fn in_chat(chat: Chat) -> Self {
        Self {
            chat: Some(chat),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat.as_ref().map(|c| c.id.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// One button line of a rendered page. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedButton {
    pub index: usize,
    pub text: String,
    /// Lowercase style tag (e.g. `primary`), if the button has a style.
    pub style: Option<String>,
}

impl RenderedButton {
    /// `N. text [style]`
    pub fn label(&self) -> String {
        match &self.style {
            Some(style) => format!("{}. {} [{}]", self.index, self.text, style),
            None => format!("{}. {}", self.index, self.text),
        }
    }
}

/// A page as shown to one platform: content plus the buttons visible there, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub page: String,
    pub content: String,
    pub buttons: Vec<RenderedButton>,
}

impl RenderedPage {
    /// Plain-text form: content, a blank line, then one numbered line per button.
    pub fn to_text(&self) -> String {
        if self.buttons.is_empty() {
            return self.content.clone();
        }
        let lines: Vec<String> = self.buttons.iter().map(RenderedButton::label).collect();
        format!("{}\n\n{}", self.content, lines.join("\n"))
    }
}
