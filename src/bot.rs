use log::{debug, info, warn};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::context::AppContext;
use crate::error::BotError;
use crate::events::{BotEvent, Command};
use crate::handlers;
use crate::models::UserProfile;
use crate::utils::{MessageFormatter, MAX_MESSAGE_LENGTH};

pub struct TelegramBot {
    bot: Bot,
    ctx: AppContext,
}

impl TelegramBot {
    pub fn new(bot_token: &str, ctx: AppContext) -> Self {
        Self {
            bot: Bot::new(bot_token),
            ctx,
        }
    }

    /// long-polls telegram until ctrl-c
    pub async fn run(&self) {
        info!("Starting Telegram bot...");

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!("Failed to register bot commands: {}", e);
        }

        // commands addressed as /cmd@name only count when name is ours
        let bot_username = match self.bot.get_me().await {
            Ok(me) => me.user.username,
            Err(e) => {
                warn!("Failed to fetch bot identity, /cmd@name mentions will be ignored: {}", e);
                None
            }
        };

        let handler = Update::filter_message().endpoint({
            let ctx = self.ctx.clone();
            move |bot: Bot, msg: Message| {
                let ctx = ctx.clone();
                let bot_username = bot_username.clone();
                async move { Self::handle_message(ctx, bot, msg, bot_username.as_deref()).await }
            }
        });

        Dispatcher::builder(self.bot.clone(), handler)
            .error_handler(
                teloxide::error_handlers::LoggingErrorHandler::with_custom_text(
                    "Failed to handle update",
                ),
            )
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn handle_message(
        ctx: AppContext,
        bot: Bot,
        msg: Message,
        bot_username: Option<&str>,
    ) -> Result<(), BotError> {
        let sender = msg.from.as_ref().map(UserProfile::from_telegram);

        let Some(event) = BotEvent::classify(msg.text(), sender, bot_username) else {
            debug!("Ignoring message {} in chat {}", msg.id.0, msg.chat.id);
            return Ok(());
        };

        info!("Handling {} event in chat {}", event.kind(), msg.chat.id);

        let reply = handlers::dispatch(ctx.store.as_ref(), event).await?;
        Self::send_reply(&bot, msg.chat.id, &reply).await
    }

    async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &str) -> Result<(), BotError> {
        for chunk in MessageFormatter::split_message_into_chunks(reply, MAX_MESSAGE_LENGTH) {
            bot.send_message(chat_id, chunk).await?;
        }
        Ok(())
    }
}
