pub mod local_storage;

pub use local_storage::{LocalStorage, StorageError, TRANSACTION_COUNT_KEY};
