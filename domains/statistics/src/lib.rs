pub mod aggregate;
pub mod cache;
pub mod clock;
pub mod error;
pub mod export;
pub mod service;
pub mod store;
pub mod time_buckets;

pub use aggregate::{AggregateResult, BucketedMetrics, WindowSummary};
pub use cache::{
    CacheEntry, FRESHNESS_WINDOW_SECS, StatsCache, StatsCacheConfig,
    StatsCacheKey,
};
pub use clock::{Clock, SystemClock};
pub use error::StatisticsError;
pub use export::{EXPORT_FILE_NAME, SHEET_NAMES, XLSX_CONTENT_TYPE, export_workbook};
pub use service::{DEFAULT_LIMIT_DAYS, StatisticsService};
pub use store::OrderStore;
pub use time_buckets::BucketMode;
