use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a tile inside the pyramid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub row: u32,
    pub col: u32,
    /// Pyramid level, 0 being the lowest resolution
    pub zoom: u8,
}

impl TileCoord {
    pub fn new(row: u32, col: u32, zoom: u8) -> Self {
        Self { row, col, zoom }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.row, self.col)
    }
}

/// Source of raw tile bytes.
///
/// Implementations map every failure (missing file, network error, bad
/// coordinate) to `None`; the viewport never sees an error from here.
#[async_trait]
pub trait TileStreamProvider: Send + Sync {
    async fn get_tile_stream(&self, coord: TileCoord) -> Option<Vec<u8>>;
}

/// Adapts a synchronous closure into a [`TileStreamProvider`]
pub struct FnTileProvider<F> {
    fetch: F,
}

impl<F> FnTileProvider<F>
where
    F: Fn(TileCoord) -> Option<Vec<u8>> + Send + Sync,
{
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<F> TileStreamProvider for FnTileProvider<F>
where
    F: Fn(TileCoord) -> Option<Vec<u8>> + Send + Sync,
{
    async fn get_tile_stream(&self, coord: TileCoord) -> Option<Vec<u8>> {
        (self.fetch)(coord)
    }
}

/// Fetches every coordinate in order, keeping the ones that produced bytes.
pub async fn fetch_tiles<P>(provider: &P, coords: &[TileCoord]) -> Vec<(TileCoord, Vec<u8>)>
where
    P: TileStreamProvider + ?Sized,
{
    let mut tiles = Vec::with_capacity(coords.len());
    for &coord in coords {
        match provider.get_tile_stream(coord).await {
            Some(bytes) => tiles.push((coord, bytes)),
            None => log::trace!("No tile available at {}", coord),
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_provider_skips_missing_tiles() {
        let provider = FnTileProvider::new(|coord: TileCoord| {
            (coord.col % 2 == 0).then(|| vec![coord.row as u8, coord.col as u8])
        });

        let coords = [
            TileCoord::new(0, 0, 1),
            TileCoord::new(0, 1, 1),
            TileCoord::new(1, 2, 1),
        ];
        let tiles = fetch_tiles(&provider, &coords).await;

        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0], (TileCoord::new(0, 0, 1), vec![0, 0]));
        assert_eq!(tiles[1], (TileCoord::new(1, 2, 1), vec![1, 2]));
    }

    #[test]
    fn test_display() {
        assert_eq!(TileCoord::new(3, 7, 2).to_string(), "2/3/7");
    }
}
