pub mod ordered_items;
pub mod orders;

pub use ordered_items::OrderedItem;
pub use orders::{Order, OrderStatus, OrderType, UnknownVariant, UserId};
