use thiserror::Error;

use crate::events::EventKind;

/// boot-time configuration problems; the process refuses to start on any of these
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// any failure while running a statement against the pool
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to acquire database connection: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("database query failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

/// a persistence failure while handling one bot event
#[derive(Debug, Error)]
#[error("{kind} handler failed for user {telegram_id:?}: {source}")]
pub struct HandlerError {
    pub kind: EventKind,
    pub telegram_id: Option<i64>,
    #[source]
    pub source: QueryError,
}

impl HandlerError {
    pub fn new(kind: EventKind, telegram_id: Option<i64>, source: QueryError) -> Self {
        Self {
            kind,
            telegram_id,
            source,
        }
    }
}

/// everything an update endpoint can hand to the dispatcher's error handler
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error("failed to deliver reply: {0}")]
    Delivery(#[from] teloxide::RequestError),
}
