//! Authored blocked regions applied to a grid at level setup.

use serde::{Deserialize, Serialize};
use shop_patrol_core::{CellCoord, CellRect, CellRectSize, GridError};

use crate::GridIndex;

/// Rectangles of unwalkable cells describing shelves and counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopLayout {
    #[serde(default)]
    blocked: Vec<CellRect>,
}

impl ShopLayout {
    /// Creates a layout from the provided blocked regions.
    #[must_use]
    pub fn new(blocked: Vec<CellRect>) -> Self {
        Self { blocked }
    }

    /// Two shelf rows spanning columns 5 through 13 on rows 2 and 5.
    #[must_use]
    pub fn default_shelves() -> Self {
        let shelf = CellRectSize::new(9, 1);
        Self::new(vec![
            CellRect::from_origin_and_size(CellCoord::new(5, 2), shelf),
            CellRect::from_origin_and_size(CellCoord::new(5, 5), shelf),
        ])
    }

    /// Blocked regions in authoring order.
    #[must_use]
    pub fn blocked(&self) -> &[CellRect] {
        &self.blocked
    }

    /// Marks every cell of every region unwalkable.
    ///
    /// Fails on the first cell outside the grid. Cells marked before the
    /// failure stay marked.
    pub fn apply_to(&self, grid: &mut GridIndex) -> Result<(), GridError> {
        for region in &self.blocked {
            for cell in region.cells() {
                grid.set_walkable(cell, false)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn default_shelves_block_two_rows() {
        let mut grid = GridIndex::create(18, 10, 1.0, Vec2::ZERO).expect("valid grid");
        ShopLayout::default_shelves()
            .apply_to(&mut grid)
            .expect("shelves fit the grid");

        let blocked: Vec<_> = grid
            .nodes()
            .iter()
            .filter(|node| !node.is_walkable())
            .map(|node| node.cell())
            .collect();
        assert_eq!(blocked.len(), 18);
        assert!(blocked
            .iter()
            .all(|cell| (5..14).contains(&cell.column()) && matches!(cell.row(), 2 | 5)));
    }

    #[test]
    fn regions_outside_the_grid_are_rejected() {
        let mut grid = GridIndex::create(4, 4, 1.0, Vec2::ZERO).expect("valid grid");
        let layout = ShopLayout::new(vec![CellRect::from_origin_and_size(
            CellCoord::new(3, 0),
            CellRectSize::new(2, 1),
        )]);

        assert!(matches!(
            layout.apply_to(&mut grid),
            Err(GridError::CellOutOfRange { column: 4, .. })
        ));
    }
}
