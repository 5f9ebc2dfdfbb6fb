//! Authored patrol data.

use glam::Vec2;
use serde::Deserialize;

/// Cyclic patrol route plus the points an agent may pause at.
///
/// Static for the lifetime of the agent.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PatrolRoute {
    #[serde(default)]
    points: Vec<Vec2>,
    #[serde(default)]
    stopping_points: Vec<Vec2>,
}

impl PatrolRoute {
    /// Creates a route without stopping points.
    #[must_use]
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            stopping_points: Vec::new(),
        }
    }

    /// Adds the points an agent may stop and look around at.
    #[must_use]
    pub fn with_stopping_points(mut self, stopping_points: Vec<Vec2>) -> Self {
        self.stopping_points = stopping_points;
        self
    }

    /// Patrol points in walking order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Stopping points in authoring order.
    #[must_use]
    pub fn stopping_points(&self) -> &[Vec2] {
        &self.stopping_points
    }
}
