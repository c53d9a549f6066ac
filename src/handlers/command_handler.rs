use log::{error, info};

use crate::db::Store;
use crate::error::HandlerError;
use crate::events::EventKind;
use crate::models::UserProfile;

pub const WELCOME_MESSAGE: &str = "Welcome! This is your AI Mentor bot.";
pub const GET_DATA_PREFIX: &str = "Database Results: ";
pub const GET_DATA_ERROR: &str = "Error fetching data from the database.";

pub struct CommandHandler;

impl CommandHandler {
    /// saves the sender, then greets them
    pub async fn handle_start(
        store: &dyn Store,
        sender: &UserProfile,
    ) -> Result<String, HandlerError> {
        info!(
            "Processing /start from user {} ({})",
            sender.telegram_id, sender.first_name
        );

        store
            .upsert_user(sender)
            .await
            .map_err(|e| HandlerError::new(EventKind::Start, Some(sender.telegram_id), e))?;

        Ok(WELCOME_MESSAGE.to_string())
    }

    /// dumps the users table; failures turn into a fixed reply instead of an error.
    /// the store has already logged the query failure.
    pub async fn handle_get_data(store: &dyn Store) -> String {
        let Ok(users) = store.list_users().await else {
            return GET_DATA_ERROR.to_string();
        };

        info!("Replying to /getdata with {} users", users.len());

        match serde_json::to_string(&users) {
            Ok(json) => format!("{}{}", GET_DATA_PREFIX, json),
            Err(e) => {
                error!("Failed to serialize users for /getdata: {}", e);
                GET_DATA_ERROR.to_string()
            }
        }
    }
}
