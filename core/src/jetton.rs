mod content;
mod error;
mod minter;

pub use content::*;
pub use error::*;
pub use minter::*;
