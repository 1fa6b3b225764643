use std::collections::HashMap;

use chrono::NaiveDateTime;
use orders_errors::OrderError;
use orders_models::{Order, OrderedItem};
use rust_decimal::Decimal;
use sql_connection::{PgClient, SqlConnect};
use tracing::{debug, instrument};

const ORDER_COLUMNS: &str = "o.id, o.\"totalPrice\", o.number, \
                             o.status::text, o.\"createdTime\", \
                             o.type::text, o.\"deliveryRoom\", o.\"userId\"";

/// Read-only access to `orders` and their `ordereditems`.
#[derive(Clone)]
pub struct OrderDao {
    db: SqlConnect,
}

impl OrderDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    fn map_row(row: &tokio_postgres::Row) -> Result<Order, OrderError> {
        let status: Option<String> = row.get(3);
        let order_type: Option<String> = row.get(5);

        Ok(Order {
            id: row.get(0),
            total_price: row
                .get::<_, Option<Decimal>>(1)
                .unwrap_or(Decimal::ZERO),
            number: row.get::<_, Option<String>>(2).unwrap_or_default(),
            status: status
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or_default(),
            created_time: row.get(4),
            order_type: order_type
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or_default(),
            delivery_room: row.get(6),
            user_id: row.get(7),
            items: Vec::new(),
        })
    }

    /// Orders created at or after `from`, newest first.
    #[instrument(skip(self))]
    pub async fn find_created_since(
        &self, from: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError> {
        let client = self.db.get_read_client().await?;
        let stmt = client
            .prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders o \
                 WHERE o.\"createdTime\" >= $1 \
                 ORDER BY o.\"createdTime\" DESC"
            ))
            .await?;
        let rows = client.query(&stmt, &[&from]).await?;

        self.with_items(&client, rows).await
    }

    /// Orders created within `[from, to]`, both ends inclusive.
    #[instrument(skip(self))]
    pub async fn find_created_between(
        &self, from: NaiveDateTime, to: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError> {
        let client = self.db.get_read_client().await?;
        let stmt = client
            .prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders o \
                 WHERE o.\"createdTime\" >= $1 AND o.\"createdTime\" <= $2 \
                 ORDER BY o.\"createdTime\" DESC"
            ))
            .await?;
        let rows = client.query(&stmt, &[&from, &to]).await?;

        self.with_items(&client, rows).await
    }

    async fn with_items(
        &self, client: &PgClient, rows: Vec<tokio_postgres::Row>,
    ) -> Result<Vec<Order>, OrderError> {
        let mut orders = rows
            .iter()
            .map(Self::map_row)
            .collect::<Result<Vec<_>, _>>()?;

        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let stmt = client
            .prepare(
                "SELECT id, \"orderId\", \"itemTypeId\", amount \
                 FROM ordereditems WHERE \"orderId\" = ANY($1) ORDER BY id",
            )
            .await?;
        let item_rows = client.query(&stmt, &[&ids]).await?;

        let mut items: HashMap<i32, Vec<OrderedItem>> = HashMap::new();
        for row in &item_rows {
            let order_id: i32 = row.get(1);
            items.entry(order_id).or_default().push(OrderedItem {
                id: row.get(0),
                order_id,
                item_type_id: row.get(2),
                amount: row.get::<_, Option<i32>>(3).unwrap_or(0),
            });
        }

        for order in &mut orders {
            order.items = items.remove(&order.id).unwrap_or_default();
        }

        debug!(
            "Loaded {} orders with {} line items",
            orders.len(),
            item_rows.len()
        );

        Ok(orders)
    }
}
