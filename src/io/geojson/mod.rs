//! GeoJSON format reading operations.

mod read;

pub use read::*;
