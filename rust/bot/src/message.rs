//! Transport-neutral shapes of what a user sends and what the bot answers.

use serde::{Deserialize, Serialize};

use ginga_engine::round::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: PlayerId,
    /// First name as the chat network reports it
    pub name: String,
}

impl User {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Event {
    /// `/name args`; `name` has no leading slash
    Command {
        name: String,
        #[serde(default)]
        args: String,
    },
    Text(String),
    /// Callback data of a pressed button
    Button(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incoming {
    pub user: User,
    pub event: Event,
}

impl Incoming {
    pub fn command(user: User, name: &str, args: &str) -> Self {
        Self {
            user,
            event: Event::Command {
                name: name.to_string(),
                args: args.to_string(),
            },
        }
    }

    pub fn text(user: User, text: &str) -> Self {
        Self {
            user,
            event: Event::Text(text.to_string()),
        }
    }

    pub fn button(user: User, data: &str) -> Self {
        Self {
            user,
            event: Event::Button(data.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonTarget {
    /// Comes back as [`Event::Button`] with this data
    Callback(String),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub target: ButtonTarget,
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Url(url.into()),
        }
    }

    pub fn data(&self) -> Option<&str> {
        match &self.target {
            ButtonTarget::Callback(data) => Some(data),
            ButtonTarget::Url(_) => None,
        }
    }
}

/// One message back to the user: text plus rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Vec<Button>>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Finds a button by its callback data.
    pub fn button(&self, data: &str) -> Option<&Button> {
        self.buttons
            .iter()
            .flatten()
            .find(|b| b.data() == Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_json_shape() {
        let json = r#"{"user":{"id":5,"name":"ada"},"event":{"type":"command","value":{"name":"start","args":"42"}}}"#;
        let incoming: Incoming = serde_json::from_str(json).unwrap();
        assert_eq!(incoming, Incoming::command(User::new(5, "ada"), "start", "42"));

        let text = r#"{"user":{"id":5,"name":"ada"},"event":{"type":"text","value":"100"}}"#;
        let incoming: Incoming = serde_json::from_str(text).unwrap();
        assert_eq!(incoming.event, Event::Text("100".into()));
    }

    #[test]
    fn reply_without_buttons_omits_field() {
        let json = serde_json::to_value(Reply::text("hi")).unwrap();
        assert!(json.get("buttons").is_none());
    }

    #[test]
    fn button_lookup_ignores_links() {
        let reply = Reply::text("x").with_buttons(vec![vec![
            Button::url("Channel", "https://t.me/c"),
            Button::callback("Games", "games"),
        ]]);
        assert!(reply.button("games").is_some());
        assert!(reply.button("https://t.me/c").is_none());
    }
}
