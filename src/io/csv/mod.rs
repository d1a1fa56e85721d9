//! CSV format writing operations.

mod write;

pub use write::*;
