pub mod provider;
pub mod visible;

// Re-exports for convenience
pub use provider::{fetch_tiles, FnTileProvider, TileCoord, TileStreamProvider};
pub use visible::{VisibleTiles, VisibleTilesResolver};
