//! Call-scoped A* bookkeeping.

use shop_patrol_core::CellCoord;
use shop_patrol_world::{GridIndex, PathNode};

/// Node costs and open/closed membership for a single query.
///
/// Built from a fresh copy of the grid's nodes so concurrent queries never
/// observe each other's costs or predecessors.
#[derive(Debug)]
pub(crate) struct SearchSpace {
    nodes: Vec<PathNode>,
    open: Vec<usize>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
}

impl SearchSpace {
    /// Copies the grid's nodes and resets every one of them.
    pub(crate) fn new(grid: &GridIndex) -> Self {
        let mut nodes = grid.nodes().to_vec();
        for node in &mut nodes {
            node.reset();
        }

        let count = nodes.len();
        Self {
            nodes,
            open: Vec::new(),
            in_open: vec![false; count],
            closed: vec![false; count],
        }
    }

    pub(crate) fn node(&self, index: usize) -> &PathNode {
        &self.nodes[index]
    }

    /// Opens the start node with zero accumulated cost.
    pub(crate) fn seed(&mut self, start: usize, h_cost: u32) {
        let node = &mut self.nodes[start];
        node.set_g_cost(0);
        node.set_h_cost(h_cost);
        self.open_node(start);
    }

    /// Removes and returns the open node with the lowest f-cost.
    ///
    /// Ties keep the node that entered the open list first.
    pub(crate) fn pop_lowest(&mut self) -> Option<usize> {
        if self.open.is_empty() {
            return None;
        }

        let mut best = 0;
        for position in 1..self.open.len() {
            if self.nodes[self.open[position]].f_cost() < self.nodes[self.open[best]].f_cost() {
                best = position;
            }
        }

        let index = self.open.remove(best);
        self.in_open[index] = false;
        Some(index)
    }

    pub(crate) fn close(&mut self, index: usize) {
        self.closed[index] = true;
    }

    pub(crate) fn is_closed(&self, index: usize) -> bool {
        self.closed[index]
    }

    /// Records a cheaper route into `index` and opens it if needed.
    pub(crate) fn relax(&mut self, index: usize, predecessor: usize, g_cost: u32, h_cost: u32) {
        let node = &mut self.nodes[index];
        node.set_predecessor(Some(predecessor));
        node.set_g_cost(g_cost);
        node.set_h_cost(h_cost);
        if !self.in_open[index] {
            self.open_node(index);
        }
    }

    pub(crate) fn closed_count(&self) -> usize {
        self.closed.iter().filter(|closed| **closed).count()
    }

    /// Follows predecessors back from `end` and returns the route start first.
    pub(crate) fn reconstruct(&self, end: usize) -> Vec<CellCoord> {
        let mut path = vec![self.nodes[end].cell()];
        let mut current = end;
        while let Some(previous) = self.nodes[current].predecessor() {
            path.push(self.nodes[previous].cell());
            current = previous;
        }
        path.reverse();
        path
    }

    fn open_node(&mut self, index: usize) {
        self.open.push(index);
        self.in_open[index] = true;
    }
}
