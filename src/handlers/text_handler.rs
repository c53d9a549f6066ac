use log::info;

use crate::db::Store;
use crate::error::{HandlerError, QueryError};
use crate::events::EventKind;
use crate::models::UserProfile;

pub const ECHO_PREFIX: &str = "You said: ";

pub struct TextHandler;

impl TextHandler {
    pub fn echo_response(text: &str) -> String {
        format!("{}{}", ECHO_PREFIX, text)
    }

    /// upsert sender -> log message/response pair -> hand back the reply
    pub async fn handle_text(
        store: &dyn Store,
        sender: &UserProfile,
        text: &str,
    ) -> Result<String, HandlerError> {
        let fail = |e: QueryError| HandlerError::new(EventKind::Text, Some(sender.telegram_id), e);

        let response = Self::echo_response(text);

        store.upsert_user(sender).await.map_err(fail)?;
        store
            .log_message(sender.telegram_id, text, &response)
            .await
            .map_err(fail)?;

        info!(
            "Logged message from user {} ({} chars)",
            sender.telegram_id,
            text.chars().count()
        );

        Ok(response)
    }
}
