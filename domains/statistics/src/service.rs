use std::sync::Arc;

use chrono::{Days, Duration, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::{
    aggregate::{AggregateResult, BucketedMetrics, WindowSummary},
    cache::{StatsCache, StatsCacheKey},
    clock::{Clock, SystemClock},
    error::StatisticsError,
    store::OrderStore,
    time_buckets::{BucketMode, day_bounds, day_key, start_of_week},
};

/// Lookback applied when a caller does not name one.
pub const DEFAULT_LIMIT_DAYS: i64 = 90;

/// Builds statistics reports from order history, caching each
/// `(mode, limit)` report for the cache's freshness window.
pub struct StatisticsService {
    store: Arc<dyn OrderStore>,
    cache: Arc<StatsCache>,
    clock: Arc<dyn Clock>,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            store,
            cache: Arc::new(StatsCache::default()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_custom_components(
        store: Arc<dyn OrderStore>, cache: Arc<StatsCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
        }
    }

    pub fn cache(&self) -> &StatsCache { &self.cache }

    /// Report for a raw mode parameter. Unknown modes bucket by day.
    pub async fn get_statistics(
        &self, mode: &str, limit: i64,
    ) -> Result<Arc<AggregateResult>, StatisticsError> {
        let bucket_mode = BucketMode::from_param(mode);
        if bucket_mode.as_str() != mode {
            debug!("Unrecognised mode {:?}, bucketing by day", mode);
        }
        self.get_statistics_for(bucket_mode, limit).await
    }

    #[instrument(skip(self))]
    pub async fn get_statistics_for(
        &self, mode: BucketMode, limit: i64,
    ) -> Result<Arc<AggregateResult>, StatisticsError> {
        let limit_days = u32::try_from(limit).map_err(|_| {
            StatisticsError::InvalidArgument(format!(
                "limit must be a non-negative number of days, got {limit}"
            ))
        })?;
        let key = StatsCacheKey::new(mode, limit_days);
        let now = self.clock.now();

        if let Some(cached) = self.cache.get_fresh(&key, now) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        debug!("Cache miss for {}, scanning order history", key);

        let result = Arc::new(self.compute(mode, limit_days, now).await?);
        self.cache.insert(key, result.clone(), now);

        Ok(result)
    }

    /// Recomputes a report without consulting or filling the cache.
    ///
    /// The week summary covers Monday 00:00 through the last instant of
    /// Sunday, so Sunday orders count toward `week_revenue`. Earlier
    /// releases stopped at Sunday 00:00 and left Sunday out.
    pub async fn compute(
        &self, mode: BucketMode, limit_days: u32, now: NaiveDateTime,
    ) -> Result<AggregateResult, StatisticsError> {
        let cutoff = Duration::try_days(limit_days as i64)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                StatisticsError::InvalidArgument(format!(
                    "limit of {limit_days} days reaches before the calendar \
                     start"
                ))
            })?;

        let history = self.store.orders_since(cutoff).await?;
        let buckets = BucketedMetrics::collect(mode, &history);

        let today = now.date();
        let (day_start, day_end) = day_bounds(today);
        let today_orders = self.store.orders_between(day_start, day_end).await?;
        let today_summary = WindowSummary::collect(&today_orders);

        let week_start = start_of_week(today);
        let week_end = week_start + Days::new(6);
        let week_orders = self
            .store
            .orders_between(day_bounds(week_start).0, day_bounds(week_end).1)
            .await?;
        let week_revenue: Decimal =
            week_orders.iter().map(|o| o.total_price).sum();

        info!(
            mode = %mode,
            limit_days,
            orders = history.len(),
            buckets = buckets.orders.len(),
            "Computed order statistics"
        );

        Ok(AggregateResult::assemble(
            buckets,
            today_summary,
            week_revenue,
            format!("{} - {}", day_key(week_start), day_key(week_end)),
        ))
    }

    pub fn invalidate(&self, mode: BucketMode) { self.cache.invalidate_mode(mode) }

    pub fn invalidate_all(&self) { self.cache.invalidate_all() }
}
