use orders_errors::OrderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Data access failure: {0}")]
    DataAccessFailure(#[from] OrderError),
    #[error("Export error: {0}")]
    Export(String),
}
