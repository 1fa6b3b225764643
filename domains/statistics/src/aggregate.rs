use std::collections::HashSet;

use indexmap::IndexMap;
use orders_models::{Order, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_buckets::BucketMode;

/// The statistics report. Bucket maps keep the order in which keys were
/// first seen while scanning orders newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub today_revenue: Decimal,
    pub today_unique_users: u64,
    pub today_orders: u64,
    pub today_cups: i64,
    pub week_revenue: Decimal,
    pub week_revenue_range: String,
    pub revenue: IndexMap<String, Decimal>,
    pub unique_users: IndexMap<String, u64>,
    pub orders: IndexMap<String, u64>,
    pub cups: IndexMap<String, i64>,
}

impl AggregateResult {
    pub fn assemble(
        buckets: BucketedMetrics, today: WindowSummary, week_revenue: Decimal,
        week_revenue_range: String,
    ) -> Self {
        Self {
            today_revenue: today.revenue,
            today_unique_users: today.unique_users,
            today_orders: today.orders,
            today_cups: today.cups,
            week_revenue,
            week_revenue_range,
            revenue: buckets.revenue,
            unique_users: buckets.unique_users,
            orders: buckets.orders,
            cups: buckets.cups,
        }
    }
}

/// Per-bucket metrics over a lookback window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketedMetrics {
    pub revenue: IndexMap<String, Decimal>,
    pub unique_users: IndexMap<String, u64>,
    pub orders: IndexMap<String, u64>,
    pub cups: IndexMap<String, i64>,
}

impl BucketedMetrics {
    /// Groups `orders` by `mode`. A missing user id is one more member of
    /// the bucket's user set, so all anonymous orders in a bucket count as
    /// a single unique user.
    pub fn collect(mode: BucketMode, orders: &[Order]) -> Self {
        let mut metrics = Self::default();
        let mut users: IndexMap<String, HashSet<Option<&UserId>>> =
            IndexMap::new();

        for order in orders {
            let key = mode.bucket_key(order.created_time);

            *metrics.revenue.entry(key.clone()).or_insert(Decimal::ZERO) +=
                order.total_price;
            *metrics.orders.entry(key.clone()).or_insert(0) += 1;
            *metrics.cups.entry(key.clone()).or_insert(0) += order.cups();
            users.entry(key).or_default().insert(order.user_id.as_ref());
        }

        metrics.unique_users = users
            .into_iter()
            .map(|(key, members)| (key, members.len() as u64))
            .collect();

        metrics
    }

    pub fn is_empty(&self) -> bool { self.orders.is_empty() }
}

/// Totals over a fixed window such as "today".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSummary {
    pub revenue: Decimal,
    pub orders: u64,
    pub cups: i64,
    pub unique_users: u64,
}

impl WindowSummary {
    pub fn collect(orders: &[Order]) -> Self {
        let users: HashSet<Option<&UserId>> =
            orders.iter().map(|o| o.user_id.as_ref()).collect();

        Self {
            revenue: orders.iter().map(|o| o.total_price).sum(),
            orders: orders.len() as u64,
            cups: orders.iter().map(Order::cups).sum(),
            unique_users: users.len() as u64,
        }
    }
}
