pub mod orders;

pub use orders::OrderDao;
