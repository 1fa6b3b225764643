use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use orders_models::{Order, OrderedItem};
use rust_decimal::Decimal;

pub fn datetime(
    year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32,
) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, min, sec))
        .expect("valid test timestamp")
}

pub fn price(amount: &str) -> Decimal {
    Decimal::from_str(amount).expect("valid test price")
}

/// An order with one line item per entry of `amounts`.
pub fn order_at(
    created_time: NaiveDateTime, total_price: &str, amounts: &[i32],
    user_id: Option<&str>,
) -> Order {
    let items = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            OrderedItem::builder()
                .id(i as i32 + 1)
                .amount(*amount)
                .build()
        })
        .collect();

    let mut order = Order::builder()
        .total_price(price(total_price))
        .created_time(created_time)
        .items(items)
        .build();
    order.user_id = user_id.map(str::to_string);
    order
}
