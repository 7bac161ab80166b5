pub mod manager;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod store;
pub mod timeout;

pub use manager::{Datastore, StoreError};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{MovieStore, StoreResult, UserStore};
