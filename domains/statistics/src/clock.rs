use chrono::{Local, NaiveDateTime};

/// Source of "now" for the aggregator. Order timestamps are naive local
/// time, so the clock is too.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime { Local::now().naive_local() }
}
