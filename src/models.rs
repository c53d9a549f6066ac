/// one table row rendered as `column name -> json value`
pub type Record = serde_json::Map<String, serde_json::Value>;

/// the sender of a telegram message, as stored in the users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl UserProfile {
    pub fn from_telegram(user: &teloxide::types::User) -> Self {
        Self {
            telegram_id: user.id.0 as i64,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }
}
