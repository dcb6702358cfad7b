pub mod error;
pub mod state;
pub mod transaction_context;

pub use error::ContextError;
pub use state::{reduce, Effect, Event, TransactionState};
pub use transaction_context::TransactionContext;
