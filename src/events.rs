use std::fmt;

use teloxide::utils::command::BotCommands;

use crate::models::UserProfile;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "show every stored user")]
    GetData,
}

impl Command {
    /// recognises `/start` and `/getdata` as the first token of a message.
    /// arguments are ignored. a `@name` suffix must match `bot_username`,
    /// otherwise the command is addressed to another bot.
    pub fn recognise(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        let name = token.strip_prefix('/')?;
        let name = match name.split_once('@') {
            Some((name, mention)) => {
                let ours = bot_username.is_some_and(|me| me.eq_ignore_ascii_case(mention));
                if !ours {
                    return None;
                }
                name
            }
            None => name,
        };

        match name.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "getdata" => Some(Command::GetData),
            _ => None,
        }
    }
}

/// the inbound events the bot reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    Start(UserProfile),
    GetData,
    Text { sender: UserProfile, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    GetData,
    Text,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Start => "start",
            EventKind::GetData => "getdata",
            EventKind::Text => "text",
        };
        f.write_str(name)
    }
}

impl BotEvent {
    /// classifies a message by its text and sender.
    /// returns `None` for messages the bot has nothing to do with.
    pub fn classify(
        text: Option<&str>,
        sender: Option<UserProfile>,
        bot_username: Option<&str>,
    ) -> Option<Self> {
        let text = text?;

        match Command::recognise(text, bot_username) {
            Some(Command::Start) => sender.map(BotEvent::Start),
            Some(Command::GetData) => Some(BotEvent::GetData),
            None => sender.map(|sender| BotEvent::Text {
                sender,
                text: text.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            BotEvent::Start(_) => EventKind::Start,
            BotEvent::GetData => EventKind::GetData,
            BotEvent::Text { .. } => EventKind::Text,
        }
    }

    pub fn sender(&self) -> Option<&UserProfile> {
        match self {
            BotEvent::Start(sender) | BotEvent::Text { sender, .. } => Some(sender),
            BotEvent::GetData => None,
        }
    }
}
