pub mod order;
pub mod selector;

pub use order::{RecencyIter, RecencyOrder};
pub use selector::SetSelector;
