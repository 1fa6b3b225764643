use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use orders_errors::OrderError;
use orders_models::Order;
use statistics::OrderStore;

/// Deterministic order store that counts history scans.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<Vec<Order>>,
    history_scans: AtomicUsize,
    window_queries: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryOrderStore {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders: Mutex::new(orders),
            ..Default::default()
        }
    }

    pub fn push(&self, order: Order) {
        self.orders.lock().expect("store lock poisoned").push(order);
    }

    /// Number of `orders_since` calls, i.e. full lookback scans.
    pub fn history_scans(&self) -> usize {
        self.history_scans.load(Ordering::SeqCst)
    }

    /// Number of `orders_between` calls.
    pub fn window_queries(&self) -> usize {
        self.window_queries.load(Ordering::SeqCst)
    }

    /// Makes every subsequent query fail as if the database were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn select(
        &self, keep: impl Fn(&Order) -> bool,
    ) -> Result<Vec<Order>, OrderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OrderError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }

        let mut selected: Vec<Order> = self
            .orders
            .lock()
            .expect("store lock poisoned")
            .iter()
            .filter(|order| keep(order))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_time.cmp(&a.created_time));
        Ok(selected)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn orders_since(
        &self, from: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError> {
        self.history_scans.fetch_add(1, Ordering::SeqCst);
        self.select(|order| order.created_time >= from)
    }

    async fn orders_between(
        &self, from: NaiveDateTime, to: NaiveDateTime,
    ) -> Result<Vec<Order>, OrderError> {
        self.window_queries.fetch_add(1, Ordering::SeqCst);
        self.select(|order| {
            order.created_time >= from && order.created_time <= to
        })
    }
}
