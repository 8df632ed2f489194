mod error;
mod stack_entry;

pub use error::*;
pub use stack_entry::*;
