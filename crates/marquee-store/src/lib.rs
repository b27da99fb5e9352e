pub mod traits;
pub mod error;
pub mod factory;
pub mod memory;
pub mod rest;

pub use traits::{DataStore, StoreOp};
pub use error::StoreError;
pub use factory::create_store;
pub use memory::{MemoryStore, Seed, StoreCall};
pub use rest::RestStore;
