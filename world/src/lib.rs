#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Discretised shop floor used by the pathfinding engine.
//!
//! [`GridIndex`] owns one [`PathNode`] per cell in row-major order and converts
//! between world positions and cell coordinates. Every coordinate must lie in
//! `[0, width) x [0, height)`; out-of-range access reports a [`GridError`] and
//! is never clamped.

mod layout;
mod node;

pub use layout::ShopLayout;
pub use node::{PathNode, INFINITE_COST};

use glam::Vec2;
use shop_patrol_core::{CellCoord, GridError};

/// Fixed-size grid of search nodes anchored at a world-space origin.
#[derive(Clone, Debug)]
pub struct GridIndex {
    width: u32,
    height: u32,
    cell_size: f32,
    origin: Vec2,
    nodes: Vec<PathNode>,
}

impl GridIndex {
    /// Allocates a grid whose cells all start walkable and unreached.
    pub fn create(
        width: u32,
        height: u32,
        cell_size: f32,
        origin: Vec2,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize { cell_size });
        }

        let mut nodes = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for column in 0..width {
                nodes.push(PathNode::new(CellCoord::new(column, row)));
            }
        }

        Ok(Self {
            width,
            height,
            cell_size,
            origin,
            nodes,
        })
    }

    /// Width of the grid in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of a cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World position of the grid's lower-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// All nodes in row-major order.
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Cell containing the provided world position.
    pub fn world_to_cell(&self, position: Vec2) -> Result<CellCoord, GridError> {
        let local = (position - self.origin) / self.cell_size;
        let column = local.x.floor();
        let row = local.y.floor();

        let inside = column >= 0.0
            && row >= 0.0
            && column < self.width as f32
            && row < self.height as f32;
        if !inside {
            return Err(GridError::PositionOutsideGrid {
                x: position.x,
                y: position.y,
            });
        }

        Ok(CellCoord::new(column as u32, row as u32))
    }

    /// World position of the centre of the provided cell.
    #[must_use]
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec2 {
        let offset = Vec2::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5);
        self.origin + offset * self.cell_size
    }

    /// Row-major offset of the provided cell.
    pub fn index_of(&self, cell: CellCoord) -> Result<usize, GridError> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return Err(GridError::CellOutOfRange {
                column: i64::from(cell.column()),
                row: i64::from(cell.row()),
                width: self.width,
                height: self.height,
            });
        }

        Ok(cell.row() as usize * self.width as usize + cell.column() as usize)
    }

    /// Node describing the provided cell.
    pub fn node(&self, cell: CellCoord) -> Result<&PathNode, GridError> {
        let index = self.index_of(cell)?;
        Ok(&self.nodes[index])
    }

    /// Whether the provided cell may be traversed.
    pub fn is_walkable(&self, cell: CellCoord) -> Result<bool, GridError> {
        self.node(cell).map(PathNode::is_walkable)
    }

    /// Toggles walkability of the provided cell.
    pub fn set_walkable(&mut self, cell: CellCoord, walkable: bool) -> Result<(), GridError> {
        let index = self.index_of(cell)?;
        self.nodes[index].set_walkable(walkable);
        Ok(())
    }

    /// Orthogonal neighbours of a cell that lie inside the grid.
    ///
    /// Neighbours are yielded left, right, below, above. Search determinism
    /// depends on this order.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> NeighborIter {
        let mut neighbors = NeighborIter::default();

        if cell.column() > 0 {
            neighbors.push(CellCoord::new(cell.column() - 1, cell.row()));
        }
        if cell.column() + 1 < self.width {
            neighbors.push(CellCoord::new(cell.column() + 1, cell.row()));
        }
        if cell.row() > 0 {
            neighbors.push(CellCoord::new(cell.column(), cell.row() - 1));
        }
        if cell.row() + 1 < self.height {
            neighbors.push(CellCoord::new(cell.column(), cell.row() + 1));
        }

        neighbors
    }
}

/// Fixed-capacity iterator over up to four orthogonal neighbours.
#[derive(Clone, Debug, Default)]
pub struct NeighborIter {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32) -> GridIndex {
        GridIndex::create(width, height, 1.0, Vec2::ZERO).expect("valid grid")
    }

    #[test]
    fn create_rejects_zero_dimensions() {
        assert_eq!(
            GridIndex::create(0, 10, 1.0, Vec2::ZERO).unwrap_err(),
            GridError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn create_rejects_non_positive_cell_size() {
        assert!(matches!(
            GridIndex::create(4, 4, 0.0, Vec2::ZERO),
            Err(GridError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            GridIndex::create(4, 4, f32::NAN, Vec2::ZERO),
            Err(GridError::InvalidCellSize { .. })
        ));
    }

    #[test]
    fn new_nodes_are_walkable_and_unreached() {
        let grid = grid(3, 2);
        assert_eq!(grid.nodes().len(), 6);
        for node in grid.nodes() {
            assert!(node.is_walkable());
            assert_eq!(node.g_cost(), INFINITE_COST);
            assert_eq!(node.predecessor(), None);
        }
    }

    #[test]
    fn nodes_are_row_major() {
        let grid = grid(4, 3);
        assert_eq!(grid.index_of(CellCoord::new(1, 2)), Ok(9));
        assert_eq!(grid.nodes()[9].cell(), CellCoord::new(1, 2));
    }

    #[test]
    fn world_to_cell_honours_origin_and_cell_size() {
        let grid = GridIndex::create(10, 10, 2.0, Vec2::new(-4.0, 1.0)).expect("valid grid");
        assert_eq!(
            grid.world_to_cell(Vec2::new(-4.0, 1.0)),
            Ok(CellCoord::new(0, 0))
        );
        assert_eq!(
            grid.world_to_cell(Vec2::new(1.9, 6.5)),
            Ok(CellCoord::new(2, 2))
        );
    }

    #[test]
    fn world_to_cell_never_clamps() {
        let grid = grid(18, 10);
        assert!(matches!(
            grid.world_to_cell(Vec2::new(-0.01, 3.0)),
            Err(GridError::PositionOutsideGrid { .. })
        ));
        assert!(matches!(
            grid.world_to_cell(Vec2::new(3.0, 10.0)),
            Err(GridError::PositionOutsideGrid { .. })
        ));
        assert!(matches!(
            grid.world_to_cell(Vec2::new(18.0, 0.0)),
            Err(GridError::PositionOutsideGrid { .. })
        ));
    }

    #[test]
    fn cell_to_world_returns_cell_centre() {
        let grid = GridIndex::create(10, 10, 2.0, Vec2::new(1.0, 1.0)).expect("valid grid");
        assert_eq!(grid.cell_to_world(CellCoord::new(0, 0)), Vec2::new(2.0, 2.0));
        assert_eq!(grid.cell_to_world(CellCoord::new(3, 1)), Vec2::new(8.0, 4.0));

        let position = Vec2::new(7.3, 3.1);
        let cell = grid.world_to_cell(position).expect("inside grid");
        assert_eq!(grid.cell_to_world(cell), Vec2::new(8.0, 4.0));
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut grid = grid(5, 5);
        let outside = CellCoord::new(5, 0);
        assert_eq!(
            grid.node(outside).unwrap_err(),
            GridError::CellOutOfRange {
                column: 5,
                row: 0,
                width: 5,
                height: 5
            }
        );
        assert!(grid.set_walkable(outside, false).is_err());
        assert!(grid.is_walkable(CellCoord::new(0, 5)).is_err());
    }

    #[test]
    fn set_walkable_toggles_a_single_cell() {
        let mut grid = grid(5, 5);
        let cell = CellCoord::new(2, 3);
        grid.set_walkable(cell, false).expect("inside grid");
        assert_eq!(grid.is_walkable(cell), Ok(false));
        assert_eq!(grid.is_walkable(CellCoord::new(3, 2)), Ok(true));

        grid.set_walkable(cell, true).expect("inside grid");
        assert_eq!(grid.is_walkable(cell), Ok(true));
    }

    #[test]
    fn neighbors_follow_left_right_below_above_order() {
        let grid = grid(3, 3);
        let centre: Vec<_> = grid.neighbors(CellCoord::new(1, 1)).collect();
        assert_eq!(
            centre,
            vec![
                CellCoord::new(0, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 0),
                CellCoord::new(1, 2),
            ]
        );

        let corner: Vec<_> = grid.neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);
    }
}
