use async_trait::async_trait;
use chrono::NaiveDateTime;
use orders_dao::OrderDao;
use orders_errors::OrderError;
use orders_models::Order;

/// Read access to order history needed by the aggregator.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders created at or after `from`, newest first.
    async fn orders_since(
        &self, from: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError>;

    /// Orders created within `[from, to]`.
    async fn orders_between(
        &self, from: NaiveDateTime, to: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError>;
}

#[async_trait]
impl OrderStore for OrderDao {
    async fn orders_since(
        &self, from: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError> {
        self.find_created_since(from).await
    }

    async fn orders_between(
        &self, from: NaiveDateTime, to: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError> {
        self.find_created_between(from, to).await
    }
}
