use orders_models::UnknownVariant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Database error: {0}")]
    Database(#[from] sql_connection::PgError),
    #[error("Connection error: {0}")]
    Connection(#[from] sql_connection::PoolError),
    #[error("Malformed order row: {0}")]
    MalformedRow(#[from] UnknownVariant),
    #[error("Order store unavailable: {0}")]
    Unavailable(String),
}
