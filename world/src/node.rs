//! Per-cell search node stored by the grid.

use shop_patrol_core::CellCoord;

/// Cost assigned to nodes that no search has reached yet.
pub const INFINITE_COST: u32 = u32::MAX;

/// Search node describing a single grid cell.
///
/// The predecessor is the row-major index of another node in the same search,
/// never an ownership edge, and is cleared by [`PathNode::reset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathNode {
    cell: CellCoord,
    walkable: bool,
    g_cost: u32,
    h_cost: u32,
    f_cost: u32,
    predecessor: Option<usize>,
}

impl PathNode {
    /// Creates a walkable node with unreached costs.
    #[must_use]
    pub fn new(cell: CellCoord) -> Self {
        let mut node = Self {
            cell,
            walkable: true,
            g_cost: INFINITE_COST,
            h_cost: 0,
            f_cost: 0,
            predecessor: None,
        };
        node.recompute_f_cost();
        node
    }

    /// Cell described by the node.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Whether agents may traverse the cell.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Accumulated cost from the search start.
    #[must_use]
    pub const fn g_cost(&self) -> u32 {
        self.g_cost
    }

    /// Sum of the g-cost and h-cost, saturating at [`INFINITE_COST`].
    #[must_use]
    pub const fn f_cost(&self) -> u32 {
        self.f_cost
    }

    /// Index of the node this one was reached from.
    #[must_use]
    pub const fn predecessor(&self) -> Option<usize> {
        self.predecessor
    }

    /// Toggles walkability.
    pub fn set_walkable(&mut self, walkable: bool) {
        self.walkable = walkable;
    }

    /// Updates the g-cost and recomputes the f-cost.
    pub fn set_g_cost(&mut self, g_cost: u32) {
        self.g_cost = g_cost;
        self.recompute_f_cost();
    }

    /// Updates the h-cost and recomputes the f-cost.
    pub fn set_h_cost(&mut self, h_cost: u32) {
        self.h_cost = h_cost;
        self.recompute_f_cost();
    }

    /// Records the node this one was reached from.
    pub fn set_predecessor(&mut self, predecessor: Option<usize>) {
        self.predecessor = predecessor;
    }

    /// Clears search state left behind by a previous query.
    pub fn reset(&mut self) {
        self.g_cost = INFINITE_COST;
        self.predecessor = None;
        self.recompute_f_cost();
    }

    fn recompute_f_cost(&mut self) {
        self.f_cost = self.g_cost.saturating_add(self.h_cost);
    }
}
