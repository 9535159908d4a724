//! # Collision Map — Uniform-Grid Broad Phase
//!
//! The world is cut into square cells of side `cell_scale`. Every tick each
//! indexed body is *marked* into every cell its bounding box touches; a body
//! then only needs narrow-phase tests against the bodies sharing one of its
//! cells.
//!
//! ```text
//!  offset = (-2, -1), dims = (5, 3)
//!
//!  cell y
//!   1  │ 10 │ 11 │ 12 │ 13 │ 14 │     bucket index = (y - offset.y) * dims.x
//!   0  │  5 │  6 │  7 │  8 │  9 │                  + (x - offset.x)
//!  -1  │  0 │  1 │  2 │  3 │  4 │
//!        -2   -1    0    1    2   cell x
//! ```
//!
//! Cells outside `offset .. offset + dims` don't exist: [`bucket_at`]
//! answers `Ok(None)` and [`mark`] skips them. Bodies out there simply never
//! collide.
//!
//! Buckets hold [`BodySlot`]s, the dense slot of the body in its
//! `ComponentSet<Physics>`, not identities or references. The map is rebuilt
//! from scratch every tick, so slots only need to stay valid for one tick.
//!
//! [`bucket_at`]: CollisionMap::bucket_at
//! [`mark`]: CollisionMap::mark

use crate::error::CollisionMapError;
use crate::math::{IVec2, Vec2};

/// Index of a body in its `ComponentSet<Physics>`.
pub type BodySlot = usize;

/// Uniform spatial hash over a bounded grid of cells.
#[derive(Debug, Clone, Default)]
pub struct CollisionMap {
    /// `None` until the first successful [`configure`](Self::configure).
    grid: Option<Grid>,
}

#[derive(Debug, Clone)]
struct Grid {
    cell_scale: f32,
    dims: IVec2,
    offset: IVec2,
    buckets: Vec<Vec<BodySlot>>,
}

impl Grid {
    fn index(&self, cell: IVec2) -> Option<usize> {
        let x = cell.x.checked_sub(self.offset.x)?;
        let y = cell.y.checked_sub(self.offset.y)?;
        if x < 0 || y < 0 || x >= self.dims.x || y >= self.dims.y {
            return None;
        }
        Some(y as usize * self.dims.x as usize + x as usize)
    }

    /// The last cell inside the grid. `configure` guarantees this can't
    /// overflow.
    fn far(&self) -> IVec2 {
        self.offset + self.dims - IVec2::ONE
    }

    fn clamp(&self, minima: IVec2, maxima: IVec2) -> Option<(IVec2, IVec2)> {
        let lo = minima.max(self.offset);
        let hi = maxima.min(self.far());
        (lo.x <= hi.x && lo.y <= hi.y).then_some((lo, hi))
    }
}

impl CollisionMap {
    /// An unconfigured map. Every query fails with
    /// [`CollisionMapError::NotConfigured`] until [`configure`](Self::configure).
    pub fn new() -> Self {
        Self { grid: None }
    }

    /// Allocate `dims.x * dims.y` empty buckets, replacing any previous grid.
    pub fn configure(
        &mut self,
        cell_scale: f32,
        dims: IVec2,
        offset: IVec2,
    ) -> Result<(), CollisionMapError> {
        let fits =
            offset.x.checked_add(dims.x).is_some() && offset.y.checked_add(dims.y).is_some();
        if !cell_scale.is_finite() || cell_scale <= 0.0 || dims.x <= 0 || dims.y <= 0 || !fits {
            return Err(CollisionMapError::InvalidConfiguration {
                cell_scale,
                dims,
                offset,
            });
        }
        let cells = dims.x as usize * dims.y as usize;
        self.grid = Some(Grid {
            cell_scale,
            dims,
            offset,
            buckets: vec![Vec::new(); cells],
        });
        log::debug!(
            "collision map configured: scale {}, {}x{} cells from {}",
            cell_scale,
            dims.x,
            dims.y,
            offset
        );
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.grid.is_some()
    }

    /// Empty every bucket, keeping their allocations. No-op when unconfigured.
    pub fn clear(&mut self) {
        if let Some(grid) = &mut self.grid {
            for bucket in &mut grid.buckets {
                bucket.clear();
            }
        }
    }

    /// The bodies marked into `cell`, or `Ok(None)` if the cell lies outside
    /// the grid.
    pub fn bucket_at(&self, cell: IVec2) -> Result<Option<&[BodySlot]>, CollisionMapError> {
        let grid = self.grid.as_ref().ok_or(CollisionMapError::NotConfigured)?;
        Ok(grid.index(cell).map(|i| grid.buckets[i].as_slice()))
    }

    /// Append `slot` to every in-grid cell of the inclusive range
    /// `minima..=maxima`.
    pub fn mark(
        &mut self,
        minima: IVec2,
        maxima: IVec2,
        slot: BodySlot,
    ) -> Result<(), CollisionMapError> {
        let grid = self.grid.as_mut().ok_or(CollisionMapError::NotConfigured)?;
        if minima.x > maxima.x || minima.y > maxima.y {
            return Err(CollisionMapError::InvertedRange { minima, maxima });
        }
        let Some((lo, hi)) = grid.clamp(minima, maxima) else {
            return Ok(());
        };
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                if let Some(i) = grid.index(IVec2::new(x, y)) {
                    grid.buckets[i].push(slot);
                }
            }
        }
        Ok(())
    }

    /// The cells touched by a box centred at `center`:
    /// `floor((center - half) / scale) ..= ceil((center + half) / scale)`.
    ///
    /// Rounds outward on both ends, so a box may be marked into one more cell
    /// than it strictly overlaps. Uses a scale of 1 when unconfigured.
    pub fn cell_range(&self, center: Vec2, half_extents: Vec2) -> (IVec2, IVec2) {
        let scale = self.cell_scale();
        let minima = ((center - half_extents) / scale).floor().as_ivec2();
        let maxima = ((center + half_extents) / scale).ceil().as_ivec2();
        (minima, maxima)
    }

    /// The part of `minima..=maxima` that lies inside the grid, or `None` if
    /// none of it does (or the map is unconfigured). Walking the clamped
    /// range costs at most `dims.x * dims.y` cells however large the box.
    pub fn clamp_range(&self, minima: IVec2, maxima: IVec2) -> Option<(IVec2, IVec2)> {
        self.grid.as_ref()?.clamp(minima, maxima)
    }

    /// Whether any cell of `minima..=maxima` lies inside the grid.
    pub fn overlaps_grid(&self, minima: IVec2, maxima: IVec2) -> bool {
        self.clamp_range(minima, maxima).is_some()
    }

    pub fn cell_scale(&self) -> f32 {
        self.grid.as_ref().map_or(1.0, |g| g.cell_scale)
    }

    pub fn dims(&self) -> IVec2 {
        self.grid.as_ref().map_or(IVec2::ZERO, |g| g.dims)
    }

    pub fn offset(&self) -> IVec2 {
        self.grid.as_ref().map_or(IVec2::ZERO, |g| g.offset)
    }

    /// Number of non-empty buckets.
    pub fn occupied_buckets(&self) -> usize {
        self.grid
            .as_ref()
            .map_or(0, |g| g.buckets.iter().filter(|b| !b.is_empty()).count())
    }

    /// Every bucket in index order. Used to compare rebuilds.
    pub fn buckets(&self) -> &[Vec<BodySlot>] {
        match &self.grid {
            Some(grid) => &grid.buckets,
            None => &[],
        }
    }
}
