//! Which pyramid level and which tiles a transform snapshot needs.
//!
//! Level `level_count - 1` holds the full-resolution image; every level below
//! halves the resolution of the one above it.

use crate::core::geo::to_radians;
use crate::core::viewport::TransformSnapshot;
use crate::tiles::provider::TileCoord;
use crate::{Result, ViewportError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleTilesResolver {
    level_count: u8,
    tile_size: u32,
    full_width: u32,
    full_height: u32,
}

impl VisibleTilesResolver {
    pub fn new(level_count: u8, tile_size: u32, full_width: u32, full_height: u32) -> Result<Self> {
        if full_width == 0 || full_height == 0 {
            return Err(ViewportError::InvalidDimensions {
                width: full_width,
                height: full_height,
            });
        }
        if level_count == 0 || level_count > 32 {
            return Err(ViewportError::InvalidConfig(format!(
                "level_count must be in 1..=32, got {level_count}"
            )));
        }
        if tile_size == 0 {
            return Err(ViewportError::InvalidConfig("tile_size must be > 0".into()));
        }
        Ok(Self {
            level_count,
            tile_size,
            full_width,
            full_height,
        })
    }

    /// Resolver with just enough levels for the lowest one to fit in a single tile.
    pub fn for_image(full_width: u32, full_height: u32, tile_size: u32) -> Result<Self> {
        let tile = tile_size.max(1) as f64;
        let longest = full_width.max(full_height) as f64;
        let levels = (longest / tile).log2().ceil().clamp(0.0, 31.0) as u8 + 1;
        Self::new(levels, tile_size, full_width, full_height)
    }

    pub fn level_count(&self) -> u8 {
        self.level_count
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Lowest level whose resolution still covers `scale`.
    pub fn level_for_scale(&self, scale: f64) -> u8 {
        let top = (self.level_count - 1) as f64;
        if !(scale > 0.0) {
            return 0;
        }
        (top + scale.log2().ceil()).clamp(0.0, top) as u8
    }

    /// Scale of `level` relative to the full-resolution image.
    pub fn level_scale(&self, level: u8) -> f64 {
        let depth = self.level_count.saturating_sub(1).saturating_sub(level);
        0.5f64.powi(depth as i32)
    }

    /// Number of (columns, rows) at `level`.
    pub fn grid_size(&self, level: u8) -> (u32, u32) {
        let level_scale = self.level_scale(level);
        let tile = self.tile_size as f64;
        let cols = (self.full_width as f64 * level_scale / tile).ceil().max(1.0);
        let rows = (self.full_height as f64 * level_scale / tile).ceil().max(1.0);
        (cols as u32, rows as u32)
    }

    /// Tiles covering the viewport of `snapshot`, rotation included.
    ///
    /// Returns `None` before the layout has a size.
    pub fn resolve(&self, snapshot: &TransformSnapshot) -> Option<VisibleTiles> {
        if snapshot.layout_size.is_empty() || !(snapshot.scale > 0.0) {
            return None;
        }
        let level = self.level_for_scale(snapshot.scale);
        let ratio = self.level_scale(level) / snapshot.scale;

        let half_width = snapshot.layout_size.half_width();
        let half_height = snapshot.layout_size.half_height();
        let (sin, cos) = to_radians(snapshot.rotation).sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let extent_x = half_width * cos + half_height * sin;
        let extent_y = half_width * sin + half_height * cos;

        // viewport center in scaled-image pixels
        let center_x = snapshot.scroll_x - snapshot.padding_x + half_width;
        let center_y = snapshot.scroll_y - snapshot.padding_y + half_height;

        let tile = self.tile_size as f64;
        let (cols, rows) = self.grid_size(level);
        let to_range = |center: f64, extent: f64, count: u32| {
            let last = (count - 1) as f64;
            let first = ((center - extent) * ratio / tile).floor().clamp(0.0, last);
            let end = (((center + extent) * ratio / tile).ceil() - 1.0).clamp(first, last);
            (first as u32, end as u32)
        };

        let (col_left, col_right) = to_range(center_x, extent_x, cols);
        let (row_top, row_bottom) = to_range(center_y, extent_y, rows);

        Some(VisibleTiles {
            level,
            col_left,
            row_top,
            col_right,
            row_bottom,
        })
    }
}

/// Inclusive tile range at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleTiles {
    pub level: u8,
    pub col_left: u32,
    pub row_top: u32,
    pub col_right: u32,
    pub row_bottom: u32,
}

impl VisibleTiles {
    pub fn count(&self) -> usize {
        let cols = (self.col_right - self.col_left + 1) as usize;
        let rows = (self.row_bottom - self.row_top + 1) as usize;
        cols * rows
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        coord.zoom == self.level
            && (self.col_left..=self.col_right).contains(&coord.col)
            && (self.row_top..=self.row_bottom).contains(&coord.row)
    }

    /// Row-major list of the covered coordinates
    pub fn coords(&self) -> Vec<TileCoord> {
        let mut coords = Vec::with_capacity(self.count());
        for row in self.row_top..=self.row_bottom {
            for col in self.col_left..=self.col_right {
                coords.push(TileCoord::new(row, col, self.level));
            }
        }
        coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Size;

    fn snapshot(scale: f64, scroll: (f64, f64), rotation: f64) -> TransformSnapshot {
        TransformSnapshot {
            scale,
            rotation,
            scroll_x: scroll.0,
            scroll_y: scroll.1,
            centroid_x: 0.0,
            centroid_y: 0.0,
            padding_x: 0.0,
            padding_y: 0.0,
            layout_size: Size::new(512, 512),
            full_width: 4096,
            full_height: 4096,
        }
    }

    #[test]
    fn test_level_count_for_image() {
        let resolver = VisibleTilesResolver::for_image(4096, 4096, 256).unwrap();
        assert_eq!(resolver.level_count(), 5);
        assert_eq!(resolver.grid_size(4), (16, 16));
        assert_eq!(resolver.grid_size(0), (1, 1));
    }

    #[test]
    fn test_level_for_scale() {
        let resolver = VisibleTilesResolver::new(5, 256, 4096, 4096).unwrap();
        assert_eq!(resolver.level_for_scale(1.0), 4);
        assert_eq!(resolver.level_for_scale(2.0), 4);
        assert_eq!(resolver.level_for_scale(0.5), 3);
        assert_eq!(resolver.level_for_scale(0.3), 3);
        assert_eq!(resolver.level_for_scale(0.01), 0);
        assert_eq!(resolver.level_for_scale(0.0), 0);
    }

    #[test]
    fn test_resolve_unrotated() {
        let resolver = VisibleTilesResolver::new(5, 256, 4096, 4096).unwrap();
        let tiles = resolver.resolve(&snapshot(1.0, (1024.0, 512.0), 0.0)).unwrap();
        assert_eq!(tiles.level, 4);
        assert_eq!((tiles.col_left, tiles.col_right), (4, 5));
        assert_eq!((tiles.row_top, tiles.row_bottom), (2, 3));
        assert_eq!(tiles.count(), 4);
        assert!(tiles.contains(&TileCoord::new(3, 5, 4)));
        assert_eq!(tiles.coords()[0], TileCoord::new(2, 4, 4));
    }

    #[test]
    fn test_rotation_widens_range() {
        let resolver = VisibleTilesResolver::new(5, 256, 4096, 4096).unwrap();
        let tiles = resolver.resolve(&snapshot(1.0, (1024.0, 512.0), 45.0)).unwrap();
        assert_eq!((tiles.col_left, tiles.col_right), (3, 6));
    }

    #[test]
    fn test_range_is_clamped_to_grid() {
        let resolver = VisibleTilesResolver::new(5, 256, 4096, 4096).unwrap();
        let tiles = resolver.resolve(&snapshot(1.0, (3584.0, 3584.0), 30.0)).unwrap();
        assert_eq!(tiles.col_right, 15);
        assert_eq!(tiles.row_bottom, 15);
    }

    #[test]
    fn test_empty_layout_resolves_nothing() {
        let resolver = VisibleTilesResolver::new(5, 256, 4096, 4096).unwrap();
        let mut snap = snapshot(1.0, (0.0, 0.0), 0.0);
        snap.layout_size = Size::default();
        assert!(resolver.resolve(&snap).is_none());
    }
}
