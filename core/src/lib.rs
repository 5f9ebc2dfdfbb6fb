#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the shop patrol engine.
//!
//! This crate defines the surface that connects the grid, the pathfinding
//! engine, the per-agent state machines and the adapters driving them. The
//! engine is reached exclusively through the [`PathPlanner`] seam, sensing
//! arrives as a [`Perception`] snapshot once per tick, and every observable
//! side effect of a tick is reported as an [`Event`] pushed into a
//! caller-owned buffer.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Behaviour states an agent can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Walking the authored patrol route.
    Shopping,
    /// Paused at a stopping point, looking around.
    ShoppingStopped,
    /// Noticed the player without seeing them; holds still briefly.
    Alerted,
    /// Walking a planned path toward where the player was noticed.
    Investigating,
    /// Walking a planned path back to the start of the patrol route.
    Returning,
    /// Heading straight for a visible, nearby player.
    Chasing,
    /// Reserved state without behaviour.
    Stunned,
    /// Reserved state without behaviour.
    Smelling,
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column (x) and row (y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Lower-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Iterates every cell covered by the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let size = self.size;
        (0..size.height()).flat_map(move |dy| {
            (0..size.width())
                .map(move |dx| CellCoord::new(origin.column() + dx, origin.row() + dy))
        })
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Ordered world-space route produced by a single path query.
///
/// The path is immutable once produced. Agents own it until they consume it or
/// replace it with the result of a newer request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaypointPath {
    waypoints: Vec<Vec2>,
}

impl WaypointPath {
    /// Wraps the provided waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints }
    }

    /// Number of waypoints left in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the route is empty, meaning the requester already arrived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint stored at the provided index, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Final waypoint of the route.
    #[must_use]
    pub fn last(&self) -> Option<Vec2> {
        self.waypoints.last().copied()
    }

    /// Borrows the waypoints as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Vec2] {
        &self.waypoints
    }
}

/// Sensing snapshot captured once per simulation tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perception {
    /// World position of the player during the tick.
    pub player_position: Vec2,
    /// Whether the agent has an unobstructed view of the player.
    pub line_of_sight: bool,
}

/// Summary of a single path request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathOutcome {
    /// A route was produced with the provided number of waypoints.
    Found {
        /// Waypoints remaining after the head trim; zero means already arrived.
        waypoints: usize,
    },
    /// The target cell cannot be reached from the start cell.
    NotFound,
    /// The request referenced a position outside the grid.
    Rejected,
}

/// Side effects reported by agents while ticking.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// An agent moved from one behaviour state to another.
    StateChanged {
        /// Agent that changed state.
        agent: AgentId,
        /// State active before the transition.
        from: AgentState,
        /// State active after the transition.
        to: AgentState,
    },
    /// An agent fired its alert cue. Fire-and-forget.
    AlertCue {
        /// Agent that became alerted.
        agent: AgentId,
    },
    /// An agent asked the planner for a route.
    PathRequested {
        /// Agent that issued the request.
        agent: AgentId,
        /// World position the route should end at.
        target: Vec2,
        /// Result reported by the planner.
        outcome: PathOutcome,
    },
    /// An agent moved on to the next point of its patrol route.
    PatrolAdvanced {
        /// Agent that advanced.
        agent: AgentId,
        /// Patrol index the agent now walks toward.
        index: usize,
    },
}

/// Errors raised by grid construction and coordinate conversion.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridError {
    /// A cell coordinate lies outside `[0, width) x [0, height)`.
    #[error("cell ({column}, {row}) is outside the {width}x{height} grid")]
    CellOutOfRange {
        /// Requested column.
        column: i64,
        /// Requested row.
        row: i64,
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },
    /// A world position does not fall inside any grid cell.
    #[error("world position ({x}, {y}) is outside the grid")]
    PositionOutsideGrid {
        /// Horizontal world coordinate.
        x: f32,
        /// Vertical world coordinate.
        y: f32,
    },
    /// A grid was requested with a zero dimension.
    #[error("grid dimensions {width}x{height} must both be non-zero")]
    InvalidDimensions {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
    },
    /// A grid was requested with a non-positive or non-finite cell size.
    #[error("cell size {cell_size} must be finite and positive")]
    InvalidCellSize {
        /// Requested cell edge length in world units.
        cell_size: f32,
    },
}

/// Source of walkable routes between two world positions.
///
/// The engine is constructed once at level setup and handed to every agent
/// that needs routes.
pub trait PathPlanner {
    /// Plans a route from `start` to `end`.
    ///
    /// `Ok(None)` means the end is unreachable. `Ok(Some(path))` with an empty
    /// path means the start and end share a cell.
    fn find_path(&self, start: Vec2, end: Vec2) -> Result<Option<WaypointPath>, GridError>;
}

impl<T: PathPlanner + ?Sized> PathPlanner for &T {
    fn find_path(&self, start: Vec2, end: Vec2) -> Result<Option<WaypointPath>, GridError> {
        (**self).find_path(start, end)
    }
}

/// Opaque line-of-sight sensor consulted by simulation drivers.
pub trait LineOfSightProbe {
    /// Reports whether the player is visible from `origin` along `direction`.
    ///
    /// `direction` spans the full vector from the origin to the player.
    fn has_line_of_sight(&self, origin: Vec2, direction: Vec2) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn cell_rect_iterates_row_major() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(5, 2), CellRectSize::new(2, 2));
        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(5, 2),
                CellCoord::new(6, 2),
                CellCoord::new(5, 3),
                CellCoord::new(6, 3),
            ]
        );
    }

    #[test]
    fn empty_waypoint_path_reports_arrival() {
        let path = WaypointPath::default();
        assert!(path.is_empty());
        assert_eq!(path.get(0), None);
        assert_eq!(path.last(), None);
    }

    #[test]
    fn grid_error_messages_name_the_offending_cell() {
        let error = GridError::CellOutOfRange {
            column: 18,
            row: -1,
            width: 18,
            height: 10,
        };
        assert_eq!(error.to_string(), "cell (18, -1) is outside the 18x10 grid");
    }
}
