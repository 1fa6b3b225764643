pub mod clock;
pub mod memory_store;
pub mod postgres;
pub mod test_helpers;

pub use clock::ManualClock;
pub use memory_store::InMemoryOrderStore;
pub use postgres::TestDatabase;
pub use test_helpers::*;
