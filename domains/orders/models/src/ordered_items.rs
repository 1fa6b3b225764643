use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A line item of an order. `amount` is the number of cups it contributes.
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TypedBuilder,
)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItem {
    #[builder(default)]
    pub id: i32,
    #[builder(default)]
    pub order_id: i32,
    #[builder(default)]
    pub item_type_id: Option<i32>,
    pub amount: i32,
}
