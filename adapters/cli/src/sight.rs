//! Line-of-sight approximation over the walkability grid.

use glam::Vec2;
use shop_patrol_core::LineOfSightProbe;
use shop_patrol_world::GridIndex;

/// Samples taken per cell length along the sight segment.
const SAMPLES_PER_CELL: f32 = 4.0;

/// Marches the sight segment and treats unwalkable cells as opaque.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GridSightProbe<'a> {
    grid: &'a GridIndex,
}

impl<'a> GridSightProbe<'a> {
    pub(crate) fn new(grid: &'a GridIndex) -> Self {
        Self { grid }
    }

    fn is_clear(&self, point: Vec2) -> bool {
        self.grid
            .world_to_cell(point)
            .and_then(|cell| self.grid.is_walkable(cell))
            .unwrap_or(false)
    }
}

impl LineOfSightProbe for GridSightProbe<'_> {
    fn has_line_of_sight(&self, origin: Vec2, direction: Vec2) -> bool {
        let step = self.grid.cell_size() / SAMPLES_PER_CELL;
        let samples = (direction.length() / step).ceil().max(1.0) as u32;
        (1..=samples).all(|sample| {
            let t = sample as f32 / samples as f32;
            self.is_clear(origin + direction * t)
        })
    }
}
