use async_trait::async_trait;
use deadpool_postgres::{Config, CreatePoolError, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use log::{error, info, warn};
use serde_json::Value;
use tokio_postgres::types::{FromSql, Kind, ToSql, Type};
use tokio_postgres::{NoTls, Row};
use tokio_postgres_rustls::MakeRustlsConnect;

use crate::config::DatabaseConfig;
use crate::error::QueryError;
use crate::models::{Record, UserProfile};

const UPSERT_USER_SQL: &str = "INSERT INTO users (telegram_id, first_name, last_name, username)
     VALUES ($1, $2, $3, $4)
     ON CONFLICT (telegram_id) DO UPDATE
     SET first_name = EXCLUDED.first_name,
         last_name = EXCLUDED.last_name,
         username = EXCLUDED.username";

const LOG_MESSAGE_SQL: &str =
    "INSERT INTO messages (user_id, message_text, response_text) VALUES ($1, $2, $3)";

/// the persistence operations the bot and the http api rely on
#[async_trait]
pub trait Store: Send + Sync {
    /// inserts the user or overwrites its name fields when the id already exists
    async fn upsert_user(&self, user: &UserProfile) -> Result<(), QueryError>;

    /// appends one inbound message together with the reply sent for it
    async fn log_message(
        &self,
        user_id: i64,
        message_text: &str,
        response_text: &str,
    ) -> Result<(), QueryError>;

    async fn list_users(&self) -> Result<Vec<Record>, QueryError>;
    async fn list_messages(&self) -> Result<Vec<Record>, QueryError>;
    async fn list_questions(&self) -> Result<Vec<Record>, QueryError>;
}

/// postgres-backed store sharing one connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// builds the pool; connections are opened lazily on first use
    pub fn connect(config: &DatabaseConfig) -> Result<Self, CreatePoolError> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.dbname = Some(config.dbname.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        // no wait timeout: callers queue until a connection frees up
        cfg.pool = Some(PoolConfig::new(config.pool_size));

        let pool = if config.ssl {
            let mut root_store = rustls::RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            let tls = MakeRustlsConnect::new(
                rustls::ClientConfig::builder()
                    .with_root_certificates(root_store)
                    .with_no_client_auth(),
            );
            cfg.create_pool(Some(Runtime::Tokio1), tls)?
        } else {
            cfg.create_pool(Some(Runtime::Tokio1), NoTls)?
        };

        info!(
            "Database pool configured for {}:{}/{} (max {} connections, tls: {})",
            config.host, config.port, config.dbname, config.pool_size, config.ssl
        );

        Ok(Self { pool })
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// runs a parameterized statement and returns its rows as json records.
    /// failures are logged here and handed back to the caller.
    pub async fn execute(
        &self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Record>, QueryError> {
        let result = self.run(query, params).await;
        if let Err(e) = &result {
            error!("Database query error: {}", e);
        }
        result
    }

    async fn run(
        &self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Record>, QueryError> {
        let client = self.pool.get().await?;
        let statement = client.prepare_cached(query).await?;

        let columns: Vec<(&str, bool)> = statement
            .columns()
            .iter()
            .map(|column| (column.name(), native_shape(column.type_()).is_some()))
            .collect();

        let rows = if columns.iter().all(|(_, native)| *native) {
            client.query(&statement, params).await?
        } else {
            match text_cast_query(query, &columns) {
                Some(rewritten) => client.query(rewritten.as_str(), params).await?,
                None => {
                    warn!("Duplicate column names, cannot render non-native columns as text");
                    client.query(&statement, params).await?
                }
            }
        };

        Ok(rows.iter().map(row_to_record).collect())
    }

    /// cheap round trip used by the connectivity check
    pub async fn ping(&self) -> Result<(), QueryError> {
        self.execute("SELECT 1", &[]).await.map(|_| ())
    }
}

#[async_trait]
impl Store for Database {
    async fn upsert_user(&self, user: &UserProfile) -> Result<(), QueryError> {
        self.execute(
            UPSERT_USER_SQL,
            &[
                &user.telegram_id,
                &user.first_name,
                &user.last_name,
                &user.username,
            ],
        )
        .await?;
        Ok(())
    }

    async fn log_message(
        &self,
        user_id: i64,
        message_text: &str,
        response_text: &str,
    ) -> Result<(), QueryError> {
        self.execute(LOG_MESSAGE_SQL, &[&user_id, &message_text, &response_text])
            .await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<Record>, QueryError> {
        self.execute("SELECT * FROM users", &[]).await
    }

    async fn list_messages(&self) -> Result<Vec<Record>, QueryError> {
        self.execute("SELECT * FROM messages", &[]).await
    }

    async fn list_questions(&self) -> Result<Vec<Record>, QueryError> {
        self.execute("SELECT * FROM questions", &[]).await
    }
}

// types decoded in binary form; anything else is rendered by the server as text
const NATIVE_TYPES: &[&str] = &[
    "bool",
    "int2",
    "int4",
    "int8",
    "oid",
    "float4",
    "float8",
    "numeric",
    "uuid",
    "json",
    "jsonb",
    "timestamptz",
    "timestamp",
    "date",
    "time",
    "text",
    "varchar",
    "bpchar",
    "name",
    "unknown",
    "citext",
];

/// element type name and whether the column is a one-dimensional array of it
fn native_shape(ty: &Type) -> Option<(&str, bool)> {
    let (name, array) = match ty.kind() {
        Kind::Array(element) => (element.name(), true),
        _ => (ty.name(), false),
    };
    NATIVE_TYPES.contains(&name).then_some((name, array))
}

/// wraps `query` so every non-native column comes back as `::text`,
/// keeping column order and parameters. `None` when column names repeat,
/// since the outer select could not address them.
fn text_cast_query(query: &str, columns: &[(&str, bool)]) -> Option<String> {
    for (i, (name, _)) in columns.iter().enumerate() {
        if columns[..i].iter().any(|(other, _)| other == name) {
            return None;
        }
    }

    let select_list = columns
        .iter()
        .map(|(name, native)| {
            let ident = quote_ident(name);
            if *native {
                ident
            } else {
                format!("{ident}::text AS {ident}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    let inner = query.trim().trim_end_matches(';').trim_end();
    Some(format!("WITH q AS ({inner}) SELECT {select_list} FROM q"))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn row_to_record(row: &Row) -> Record {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        record.insert(column.name().to_string(), column_value(row, idx, column.type_()));
    }
    record
}

fn column_value(row: &Row, idx: usize, ty: &Type) -> Value {
    let decoded = match native_shape(ty) {
        Some((name, array)) => decode_native(row, idx, name, array),
        None => decode_as::<String, _>(row, idx, false, Value::from),
    };

    decoded.unwrap_or_else(|e| {
        warn!(
            "Cannot decode column {} of type {}: {}",
            row.columns()[idx].name(),
            ty.name(),
            e
        );
        Value::Null
    })
}

fn decode_native(
    row: &Row,
    idx: usize,
    name: &str,
    array: bool,
) -> Result<Value, tokio_postgres::Error> {
    match name {
        "bool" => decode_as::<bool, _>(row, idx, array, Value::from),
        "int2" => decode_as::<i16, _>(row, idx, array, Value::from),
        "int4" => decode_as::<i32, _>(row, idx, array, Value::from),
        "int8" => decode_as::<i64, _>(row, idx, array, Value::from),
        "oid" => decode_as::<u32, _>(row, idx, array, Value::from),
        "float4" => decode_as::<f32, _>(row, idx, array, |v| Value::from(f64::from(v))),
        "float8" => decode_as::<f64, _>(row, idx, array, Value::from),
        // kept as a string so no precision is lost
        "numeric" => decode_as::<rust_decimal::Decimal, _>(row, idx, array, |v| {
            Value::from(v.to_string())
        }),
        "uuid" => decode_as::<uuid::Uuid, _>(row, idx, array, |v| Value::from(v.to_string())),
        "json" | "jsonb" => decode_as::<Value, _>(row, idx, array, |v| v),
        "timestamptz" => decode_as::<chrono::DateTime<chrono::Utc>, _>(row, idx, array, |v| {
            Value::from(v.to_rfc3339())
        }),
        "timestamp" => decode_as::<chrono::NaiveDateTime, _>(row, idx, array, |v| {
            Value::from(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }),
        "date" => decode_as::<chrono::NaiveDate, _>(row, idx, array, |v| {
            Value::from(v.to_string())
        }),
        "time" => decode_as::<chrono::NaiveTime, _>(row, idx, array, |v| {
            Value::from(v.to_string())
        }),
        _ => decode_as::<String, _>(row, idx, array, Value::from),
    }
}

fn decode_as<'a, T, F>(
    row: &'a Row,
    idx: usize,
    array: bool,
    to_json: F,
) -> Result<Value, tokio_postgres::Error>
where
    T: FromSql<'a>,
    F: Fn(T) -> Value,
{
    if array {
        Ok(row
            .try_get::<_, Option<Vec<Option<T>>>>(idx)?
            .map(|items| {
                Value::Array(
                    items
                        .into_iter()
                        .map(|item| item.map(&to_json).unwrap_or(Value::Null))
                        .collect(),
                )
            })
            .unwrap_or(Value::Null))
    } else {
        Ok(row
            .try_get::<_, Option<T>>(idx)?
            .map(to_json)
            .unwrap_or(Value::Null))
    }
}
