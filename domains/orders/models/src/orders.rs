use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::OrderedItem;

/// Account ids are short strings (at most 9 characters).
pub type UserId = String;

#[derive(Debug, Error)]
#[error("Unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    #[default]
    NotStarted,
    InProgress,
    Ready,
    PickedUp,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::NotStarted => "notStarted",
            OrderStatus::InProgress => "inProgress",
            OrderStatus::Ready => "ready",
            OrderStatus::PickedUp => "pickedUp",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notStarted" => Ok(OrderStatus::NotStarted),
            "inProgress" => Ok(OrderStatus::InProgress),
            "ready" => Ok(OrderStatus::Ready),
            "pickedUp" => Ok(OrderStatus::PickedUp),
            other => {
                Err(UnknownVariant {
                    kind: "order status",
                    value: other.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum OrderType {
    #[default]
    PickUp,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::PickUp => "pickUp",
            OrderType::Delivery => "delivery",
        }
    }
}

impl FromStr for OrderType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickUp" => Ok(OrderType::PickUp),
            "delivery" => Ok(OrderType::Delivery),
            other => {
                Err(UnknownVariant {
                    kind: "order type",
                    value: other.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read model of a placed order. Timestamps are naive local time, the way
/// the `orders."createdTime"` column stores them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[builder(default)]
    pub id: i32,
    pub total_price: Decimal,
    #[builder(default, setter(into))]
    pub number: String,
    #[builder(default)]
    pub status: OrderStatus,
    pub created_time: NaiveDateTime,
    #[builder(default)]
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[builder(default, setter(strip_option, into))]
    pub delivery_room: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub user_id: Option<UserId>,
    #[builder(default)]
    pub items: Vec<OrderedItem>,
}

impl Order {
    /// Total quantity over all line items.
    pub fn cups(&self) -> i64 {
        self.items.iter().map(|item| item.amount as i64).sum()
    }
}
