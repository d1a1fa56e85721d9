mod asset;
mod classify;
mod collection;

pub use asset::{AssetGeometry, AssetType};
pub use classify::{classify, AffectedAsset, Classification, ZonalResult};
pub use collection::AssetCollection;
