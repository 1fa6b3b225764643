use anyhow::Context;
use orders_models::Order;
use sql_connection::{PostgresDbConfig, SqlConnect, build_pool};
use tracing::info;

const MIGRATION_SQL: &str =
    include_str!("../../../migrations/001_create_cafe_tables.sql");

/// PostgreSQL database from `DATABASE_URL`, migrated and emptied.
pub struct TestDatabase {
    pub db: SqlConnect,
}

impl TestDatabase {
    /// `None` when `DATABASE_URL` is unset so callers can skip.
    pub async fn from_env() -> anyhow::Result<Option<Self>> {
        let Ok(uri) = std::env::var("DATABASE_URL") else {
            return Ok(None);
        };

        let config = PostgresDbConfig {
            uri,
            max_conn: Some(4),
            min_conn: None,
            logger: false,
        };
        let db = SqlConnect::new(build_pool(&config)?);

        let client = db.get_read_client().await?;
        client
            .batch_execute(MIGRATION_SQL)
            .await
            .context("Failed to apply café schema")?;
        client
            .batch_execute(
                "TRUNCATE ordereditems, orders, users RESTART IDENTITY \
                 CASCADE",
            )
            .await?;
        info!("Test database migrated and truncated");

        Ok(Some(Self { db }))
    }

    pub async fn insert_user(&self, id: &str, name: &str) -> anyhow::Result<()> {
        let client = self.db.get_read_client().await?;
        client
            .execute(
                "INSERT INTO users (id, name, permissions) VALUES ($1, $2, '')",
                &[&id, &name],
            )
            .await?;
        Ok(())
    }

    /// Inserts `order` and its items, returning the new order id.
    pub async fn insert_order(&self, order: &Order) -> anyhow::Result<i32> {
        let client = self.db.get_read_client().await?;
        let row = client
            .query_one(
                "INSERT INTO orders (\"totalPrice\", number, status, \
                 \"createdTime\", type, \"deliveryRoom\", \"userId\") \
                 VALUES ($1, $2, $3::text::orderstatus, $4, \
                 $5::text::ordertype, $6, $7) RETURNING id",
                &[
                    &order.total_price,
                    &order.number,
                    &order.status.as_str(),
                    &order.created_time,
                    &order.order_type.as_str(),
                    &order.delivery_room,
                    &order.user_id,
                ],
            )
            .await?;
        let order_id: i32 = row.get(0);

        for item in &order.items {
            client
                .execute(
                    "INSERT INTO ordereditems (\"orderId\", amount) VALUES \
                     ($1, $2)",
                    &[&order_id, &item.amount],
                )
                .await?;
        }

        Ok(order_id)
    }
}
