pub mod command_handler;
pub mod text_handler;

pub use command_handler::CommandHandler;
pub use text_handler::TextHandler;

use crate::db::Store;
use crate::error::HandlerError;
use crate::events::BotEvent;

/// routes one event to its handler and returns the reply text to send
pub async fn dispatch(store: &dyn Store, event: BotEvent) -> Result<String, HandlerError> {
    match event {
        BotEvent::Start(sender) => CommandHandler::handle_start(store, &sender).await,
        BotEvent::GetData => Ok(CommandHandler::handle_get_data(store).await),
        BotEvent::Text { sender, text } => TextHandler::handle_text(store, &sender, &text).await,
    }
}
