//! Tunable movement parameters for a single agent.

use serde::Deserialize;

/// Movement speeds, in world units per second, and optional behaviours.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speed while walking the patrol route.
    pub shopping_speed: f32,
    /// Speed while following a path toward where the player was noticed.
    pub investigate_speed: f32,
    /// Speed while running straight at a visible player.
    pub chase_speed: f32,
    /// Speed while walking back to the start of the patrol route.
    pub return_speed: f32,
    /// Pause and look around at authored stopping points while shopping.
    pub stop_at_stopping_points: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shopping_speed: 5.0,
            investigate_speed: 2.0,
            chase_speed: 3.1,
            return_speed: 2.0,
            stop_at_stopping_points: false,
        }
    }
}
