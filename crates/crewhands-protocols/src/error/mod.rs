//! Error types for the protocol layer.

mod generate;
mod page;
mod sink;

pub use generate::*;
pub use page::*;
pub use sink::*;
