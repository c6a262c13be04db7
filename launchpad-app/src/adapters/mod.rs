//! Storage adapters backing the core repository and asset traits.

mod fs_asset_store;
mod fs_site_bundles;

pub use fs_asset_store::FsAssetStore;
pub use fs_site_bundles::FsSiteBundles;

#[cfg(feature = "sqlite-store")]
mod sqlite;

#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;
