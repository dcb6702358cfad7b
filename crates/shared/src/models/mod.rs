pub mod form;
pub mod transaction;

pub use form::{FormData, FormField, TransferRequest, ValidationError};
pub use transaction::{PartyOrder, TransactionRecord};
