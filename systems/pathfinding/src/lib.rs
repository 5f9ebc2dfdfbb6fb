#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid A* search that turns two world positions into a walkable route.
//!
//! Movement is restricted to orthogonal steps. The distance heuristic is the
//! diagonal-aware octile estimate even though diagonal neighbours are never
//! generated, so the estimate can exceed the true remaining cost and the
//! search is not guaranteed to return a shortest route around obstacles.
//!
//! Queries run synchronously to completion inside the caller's tick. Large
//! grids therefore cost a full search per request; nothing caps the work.

mod search;

use glam::Vec2;
use shop_patrol_core::{CellCoord, GridError, PathPlanner, WaypointPath};
use shop_patrol_world::GridIndex;
use tracing::debug;

use crate::search::SearchSpace;

/// Cost of a single orthogonal step.
pub const STRAIGHT_COST: u32 = 10;
/// Cost of a diagonal step. Only the heuristic uses it.
pub const DIAGONAL_COST: u32 = 14;

/// Pathfinding engine constructed once per level and shared by all agents.
#[derive(Clone, Debug)]
pub struct PathfindingEngine {
    grid: GridIndex,
}

impl PathfindingEngine {
    /// Wraps the provided grid.
    #[must_use]
    pub fn new(grid: GridIndex) -> Self {
        Self { grid }
    }

    /// Read-only access to the searched grid.
    #[must_use]
    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Mutable access to the grid for walkability edits between queries.
    pub fn grid_mut(&mut self) -> &mut GridIndex {
        &mut self.grid
    }

    /// Searches for a cell route from `start` to `end`, both included.
    ///
    /// Returns `Ok(None)` when the open set empties before reaching `end`.
    pub fn find_cell_path(
        &self,
        start: CellCoord,
        end: CellCoord,
    ) -> Result<Option<Vec<CellCoord>>, GridError> {
        let start_index = self.grid.index_of(start)?;
        let end_index = self.grid.index_of(end)?;

        let mut search = SearchSpace::new(&self.grid);
        search.seed(start_index, distance_cost(start, end));

        while let Some(current) = search.pop_lowest() {
            if current == end_index {
                return Ok(Some(search.reconstruct(end_index)));
            }

            search.close(current);
            let current_cell = search.node(current).cell();
            let current_g = search.node(current).g_cost();

            for neighbor in self.grid.neighbors(current_cell) {
                let neighbor_index = self.grid.index_of(neighbor)?;
                if search.is_closed(neighbor_index) {
                    continue;
                }
                if !search.node(neighbor_index).is_walkable() {
                    search.close(neighbor_index);
                    continue;
                }

                let tentative = current_g.saturating_add(distance_cost(current_cell, neighbor));
                if tentative < search.node(neighbor_index).g_cost() {
                    search.relax(
                        neighbor_index,
                        current,
                        tentative,
                        distance_cost(neighbor, end),
                    );
                }
            }
        }

        debug!(
            ?start,
            ?end,
            explored = search.closed_count(),
            "no route between cells"
        );
        Ok(None)
    }

    /// Searches for a world-space route between two positions.
    ///
    /// Waypoints are cell centres. The first waypoint, the requester's own
    /// cell, is dropped, so a query within a single cell yields an empty path
    /// while an unreachable target yields `Ok(None)`.
    pub fn find_path(&self, start: Vec2, end: Vec2) -> Result<Option<WaypointPath>, GridError> {
        let start_cell = self.grid.world_to_cell(start)?;
        let end_cell = self.grid.world_to_cell(end)?;

        let Some(cells) = self.find_cell_path(start_cell, end_cell)? else {
            return Ok(None);
        };

        let waypoints = cells
            .into_iter()
            .skip(1)
            .map(|cell| self.grid.cell_to_world(cell))
            .collect();
        Ok(Some(WaypointPath::new(waypoints)))
    }
}

impl PathPlanner for PathfindingEngine {
    fn find_path(&self, start: Vec2, end: Vec2) -> Result<Option<WaypointPath>, GridError> {
        PathfindingEngine::find_path(self, start, end)
    }
}

/// Octile distance between two cells.
///
/// Pairs of axis steps are priced as diagonal moves and the remainder as
/// straight moves.
#[must_use]
pub fn distance_cost(from: CellCoord, to: CellCoord) -> u32 {
    let dx = from.column().abs_diff(to.column());
    let dy = from.row().abs_diff(to.row());
    DIAGONAL_COST * dx.min(dy) + STRAIGHT_COST * dx.abs_diff(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_engine(width: u32, height: u32) -> PathfindingEngine {
        let grid = GridIndex::create(width, height, 1.0, Vec2::ZERO).expect("valid grid");
        PathfindingEngine::new(grid)
    }

    #[test]
    fn distance_cost_prices_diagonal_pairs() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(distance_cost(origin, CellCoord::new(3, 0)), 30);
        assert_eq!(distance_cost(origin, CellCoord::new(2, 2)), 28);
        assert_eq!(distance_cost(origin, CellCoord::new(2, 5)), 58);
        assert_eq!(distance_cost(CellCoord::new(4, 1), CellCoord::new(1, 3)), 38);
    }

    #[test]
    fn ties_resolve_in_neighbor_order() {
        let engine = open_engine(3, 3);
        let path = engine
            .find_cell_path(CellCoord::new(0, 0), CellCoord::new(2, 2))
            .expect("cells inside grid")
            .expect("route exists");

        assert_eq!(
            path,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
            ]
        );
    }

    #[test]
    fn cell_path_includes_start() {
        let engine = open_engine(4, 1);
        let path = engine
            .find_cell_path(CellCoord::new(0, 0), CellCoord::new(0, 0))
            .expect("cells inside grid")
            .expect("route exists");
        assert_eq!(path, vec![CellCoord::new(0, 0)]);
    }

    #[test]
    fn world_path_drops_the_requesters_cell() {
        let engine = open_engine(4, 1);
        let path = engine
            .find_path(Vec2::new(0.2, 0.7), Vec2::new(3.9, 0.1))
            .expect("positions inside grid")
            .expect("route exists");

        assert_eq!(
            path.as_slice(),
            &[Vec2::new(1.5, 0.5), Vec2::new(2.5, 0.5), Vec2::new(3.5, 0.5)]
        );
    }

    #[test]
    fn out_of_range_endpoints_are_errors() {
        let engine = open_engine(4, 4);
        assert!(matches!(
            engine.find_cell_path(CellCoord::new(0, 0), CellCoord::new(4, 0)),
            Err(GridError::CellOutOfRange { .. })
        ));
        assert!(matches!(
            engine.find_path(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 1.0)),
            Err(GridError::PositionOutsideGrid { .. })
        ));
    }

    #[test]
    fn unwalkable_end_is_unreachable() {
        let mut engine = open_engine(3, 3);
        let end = CellCoord::new(2, 2);
        engine.grid_mut().set_walkable(end, false).expect("inside grid");

        assert_eq!(engine.find_cell_path(CellCoord::new(0, 0), end), Ok(None));
    }
}
