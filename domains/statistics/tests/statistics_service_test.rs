use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use statistics::{
    BucketMode, StatisticsError, StatisticsService, StatsCache,
    StatsCacheConfig,
};
use test_utils::{InMemoryOrderStore, ManualClock, datetime, order_at, price};

// Wednesday; the week starts Monday 2024-06-03.
fn wednesday_noon() -> chrono::NaiveDateTime { datetime(2024, 6, 5, 12, 0, 0) }

fn setup(
    store: InMemoryOrderStore, now: chrono::NaiveDateTime,
) -> (Arc<InMemoryOrderStore>, Arc<ManualClock>, StatisticsService) {
    let store = Arc::new(store);
    let clock = Arc::new(ManualClock::new(now));
    let service = StatisticsService::with_custom_components(
        store.clone(),
        Arc::new(StatsCache::new(&StatsCacheConfig::default())),
        clock.clone(),
    );
    (store, clock, service)
}

fn three_orders() -> InMemoryOrderStore {
    InMemoryOrderStore::new(vec![
        order_at(datetime(2024, 6, 3, 9, 0, 0), "5.00", &[2], Some("U1")),
        order_at(datetime(2024, 6, 3, 10, 0, 0), "3.00", &[1], Some("U2")),
        order_at(datetime(2024, 6, 4, 11, 0, 0), "10.00", &[1, 2], Some("U1")),
    ])
}

#[tokio::test]
async fn test_day_report_for_three_orders() {
    let (_store, _clock, service) = setup(three_orders(), wednesday_noon());

    let stats = service.get_statistics("day", 7).await.unwrap();

    assert_eq!(stats.revenue["2024-06-03"], price("8.00"));
    assert_eq!(stats.revenue["2024-06-04"], price("10.00"));
    assert_eq!(stats.cups["2024-06-03"], 3);
    assert_eq!(stats.cups["2024-06-04"], 3);
    assert_eq!(stats.unique_users["2024-06-03"], 2);
    assert_eq!(stats.unique_users["2024-06-04"], 1);
    assert_eq!(stats.orders["2024-06-03"], 2);
    assert_eq!(stats.orders["2024-06-04"], 1);

    // Newest bucket first.
    let keys: Vec<&String> = stats.revenue.keys().collect();
    assert_eq!(keys, vec!["2024-06-04", "2024-06-03"]);

    assert_eq!(stats.today_revenue, Decimal::ZERO);
    assert_eq!(stats.today_orders, 0);
    assert_eq!(stats.today_cups, 0);
    assert_eq!(stats.today_unique_users, 0);
    assert_eq!(stats.week_revenue, price("18.00"));
    assert_eq!(stats.week_revenue_range, "2024-06-03 - 2024-06-09");
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let (store, clock, service) = setup(three_orders(), wednesday_noon());

    let first = service.get_statistics("day", 7).await.unwrap();
    clock.advance(Duration::seconds(1199));
    let second = service.get_statistics("day", 7).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.history_scans(), 1);
    assert_eq!(store.window_queries(), 2);
}

#[tokio::test]
async fn test_report_recomputed_after_freshness_window() {
    let (store, clock, service) = setup(three_orders(), wednesday_noon());

    service.get_statistics("day", 7).await.unwrap();
    clock.advance(Duration::seconds(1200));
    store.push(order_at(
        datetime(2024, 6, 5, 12, 10, 0),
        "4.50",
        &[1],
        Some("U3"),
    ));
    let refreshed = service.get_statistics("day", 7).await.unwrap();

    assert_eq!(store.history_scans(), 2);
    assert_eq!(refreshed.today_orders, 1);
    assert_eq!(refreshed.today_revenue, price("4.50"));
    assert_eq!(refreshed.revenue["2024-06-05"], price("4.50"));
}

#[tokio::test]
async fn test_different_limit_forces_recompute() {
    let (store, _clock, service) = setup(three_orders(), wednesday_noon());

    service.get_statistics("day", 7).await.unwrap();
    service.get_statistics("day", 30).await.unwrap();
    assert_eq!(store.history_scans(), 2);

    // Both limits stay cached side by side.
    service.get_statistics("day", 7).await.unwrap();
    service.get_statistics("day", 30).await.unwrap();
    assert_eq!(store.history_scans(), 2);
}

#[tokio::test]
async fn test_modes_do_not_evict_each_other() {
    let (store, _clock, service) = setup(three_orders(), wednesday_noon());

    let week = service.get_statistics("week", 30).await.unwrap();
    service.get_statistics("day", 7).await.unwrap();
    let week_again = service.get_statistics("week", 30).await.unwrap();

    assert!(Arc::ptr_eq(&week, &week_again));
    assert_eq!(store.history_scans(), 2);
}

#[tokio::test]
async fn test_unknown_mode_buckets_by_day() {
    let (store, _clock, service) = setup(three_orders(), wednesday_noon());

    let by_day = service.get_statistics("day", 7).await.unwrap();
    let fallback = service.get_statistics("fortnight", 7).await.unwrap();

    assert!(Arc::ptr_eq(&by_day, &fallback));
    assert_eq!(store.history_scans(), 1);
}

#[tokio::test]
async fn test_negative_limit_is_rejected() {
    let (store, _clock, service) = setup(three_orders(), wednesday_noon());

    let err = service.get_statistics("day", -1).await.unwrap_err();

    assert!(matches!(err, StatisticsError::InvalidArgument(_)));
    assert_eq!(store.history_scans(), 0);
}

#[tokio::test]
async fn test_store_failure_propagates_and_is_not_cached() {
    let (store, _clock, service) = setup(three_orders(), wednesday_noon());

    store.set_failing(true);
    let err = service.get_statistics("day", 7).await.unwrap_err();
    assert!(matches!(err, StatisticsError::DataAccessFailure(_)));

    store.set_failing(false);
    let stats = service.get_statistics("day", 7).await.unwrap();
    assert_eq!(stats.orders.len(), 2);
    assert_eq!(store.history_scans(), 2);
}

#[tokio::test]
async fn test_today_covers_whole_calendar_day() {
    let store = InMemoryOrderStore::new(vec![
        order_at(datetime(2024, 6, 4, 23, 59, 59), "1.00", &[1], Some("U1")),
        order_at(datetime(2024, 6, 5, 0, 0, 0), "2.00", &[2], Some("U2")),
        order_at(datetime(2024, 6, 5, 8, 30, 0), "3.00", &[1, 1], Some("U2")),
        order_at(datetime(2024, 6, 5, 23, 59, 59), "4.00", &[1], None),
    ]);
    let (_store, _clock, service) = setup(store, wednesday_noon());

    let stats = service.get_statistics("day", 7).await.unwrap();

    assert_eq!(stats.today_orders, 3);
    assert_eq!(stats.today_revenue, price("9.00"));
    assert_eq!(stats.today_cups, 5);
    // U2 plus the anonymous customer.
    assert_eq!(stats.today_unique_users, 2);
}

#[tokio::test]
async fn test_week_starts_at_monday_midnight() {
    let store = InMemoryOrderStore::new(vec![
        order_at(datetime(2024, 6, 9, 23, 59, 59), "7.00", &[1], Some("U1")),
        order_at(datetime(2024, 6, 10, 0, 0, 0), "2.50", &[1], Some("U1")),
        order_at(datetime(2024, 6, 10, 7, 45, 0), "1.50", &[1], Some("U2")),
    ]);
    let (_store, _clock, service) =
        setup(store, datetime(2024, 6, 10, 8, 0, 0));

    let stats = service.get_statistics("week", 14).await.unwrap();

    assert_eq!(stats.week_revenue, price("4.00"));
    assert_eq!(stats.week_revenue_range, "2024-06-10 - 2024-06-16");
    assert_eq!(stats.revenue["2024-06-10"], price("4.00"));
    assert_eq!(stats.revenue["2024-06-03"], price("7.00"));
}

#[tokio::test]
async fn test_sunday_orders_count_toward_week() {
    let store = InMemoryOrderStore::new(vec![
        order_at(datetime(2024, 6, 3, 0, 0, 0), "1.00", &[1], Some("U1")),
        order_at(datetime(2024, 6, 9, 20, 0, 0), "2.00", &[1], Some("U1")),
    ]);
    let (_store, _clock, service) =
        setup(store, datetime(2024, 6, 9, 21, 0, 0));

    let stats = service.get_statistics("day", 7).await.unwrap();

    assert_eq!(stats.week_revenue, price("3.00"));
    assert_eq!(stats.today_revenue, price("2.00"));
}

#[tokio::test]
async fn test_lookback_cutoff_is_inclusive() {
    let store = InMemoryOrderStore::new(vec![
        order_at(datetime(2024, 6, 4, 11, 59, 59), "1.00", &[1], Some("U1")),
        order_at(datetime(2024, 6, 4, 12, 0, 0), "2.00", &[1], Some("U1")),
    ]);
    let (_store, _clock, service) = setup(store, wednesday_noon());

    let stats = service.get_statistics("individual", 1).await.unwrap();

    assert_eq!(stats.orders.len(), 1);
    assert_eq!(stats.revenue["2024-06-04 12:00:00"], price("2.00"));
}

#[tokio::test]
async fn test_zero_limit_only_sees_now() {
    let (_store, _clock, service) = setup(three_orders(), wednesday_noon());

    let stats = service.get_statistics("day", 0).await.unwrap();

    assert!(stats.revenue.is_empty());
    assert_eq!(stats.week_revenue, price("18.00"));
}

#[tokio::test]
async fn test_month_and_week_buckets() {
    let store = InMemoryOrderStore::new(vec![
        order_at(datetime(2024, 5, 31, 18, 0, 0), "6.00", &[2], Some("U1")),
        order_at(datetime(2024, 6, 1, 9, 0, 0), "4.00", &[1], Some("U2")),
        order_at(datetime(2024, 6, 4, 9, 0, 0), "3.00", &[1], Some("U1")),
    ]);
    let (_store, _clock, service) = setup(store, wednesday_noon());

    let by_month = service.get_statistics_for(BucketMode::Month, 30).await.unwrap();
    assert_eq!(by_month.revenue["2024-05-01"], price("6.00"));
    assert_eq!(by_month.revenue["2024-06-01"], price("7.00"));
    assert_eq!(by_month.unique_users["2024-06-01"], 2);

    let by_week = service.get_statistics_for(BucketMode::Week, 30).await.unwrap();
    assert_eq!(by_week.revenue["2024-05-27"], price("10.00"));
    assert_eq!(by_week.cups["2024-05-27"], 3);
    assert_eq!(by_week.revenue["2024-06-03"], price("3.00"));
}

#[tokio::test]
async fn test_explicit_invalidation() {
    let (store, _clock, service) = setup(three_orders(), wednesday_noon());

    service.get_statistics("day", 7).await.unwrap();
    service.get_statistics("month", 7).await.unwrap();

    service.invalidate(BucketMode::Day);
    service.get_statistics("day", 7).await.unwrap();
    service.get_statistics("month", 7).await.unwrap();
    assert_eq!(store.history_scans(), 3);

    service.invalidate_all();
    service.get_statistics("month", 7).await.unwrap();
    assert_eq!(store.history_scans(), 4);
}

#[tokio::test]
async fn test_report_serializes_with_camel_case_fields() {
    let (_store, _clock, service) = setup(three_orders(), wednesday_noon());

    let stats = service.get_statistics("day", 7).await.unwrap();
    let json = serde_json::to_value(&*stats).unwrap();

    for field in [
        "todayRevenue",
        "todayUniqueUsers",
        "todayOrders",
        "todayCups",
        "weekRevenue",
        "weekRevenueRange",
        "revenue",
        "uniqueUsers",
        "orders",
        "cups",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["revenue"]["2024-06-03"], "8.00");
    assert_eq!(json["orders"]["2024-06-03"], 2);
    assert_eq!(json["weekRevenueRange"], "2024-06-03 - 2024-06-09");
}

#[tokio::test]
async fn test_week_ends_at_last_instant_of_sunday() {
    let store = InMemoryOrderStore::new(vec![
        order_at(datetime(2024, 6, 9, 23, 59, 59), "6.00", &[1], Some("U1")),
        order_at(datetime(2024, 6, 10, 0, 0, 0), "1.00", &[1], Some("U2")),
    ]);
    let (_store, clock, service) = setup(store, wednesday_noon());
    clock.set(datetime(2024, 6, 9, 23, 59, 59));

    let stats = service.get_statistics("day", 7).await.unwrap();

    assert_eq!(stats.week_revenue, price("6.00"));
    assert_eq!(stats.week_revenue_range, "2024-06-03 - 2024-06-09");
}
