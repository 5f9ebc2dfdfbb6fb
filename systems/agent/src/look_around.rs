//! Time-stepped look-around performed while stopped.

/// Heading change applied on entry, in tenths of a degree.
pub(crate) const ENTRY_TURN: i32 = -900;

const LEFT_SWEEP: u32 = 450;
const RIGHT_SWEEP: u32 = 900;
const SETTLE_SWEEP: u32 = 450;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sweep {
    Left,
    Right,
    Settle,
    Done,
}

/// Sweeps +45°, -90°, then +45° in 0.1° increments, one increment per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LookAround {
    sweep: Sweep,
    turned: u32,
}

impl LookAround {
    pub(crate) const fn new() -> Self {
        Self {
            sweep: Sweep::Left,
            turned: 0,
        }
    }

    /// Advances one increment and returns the heading change in tenths of a degree.
    pub(crate) fn step(&mut self) -> Option<i32> {
        let (delta, length, next) = match self.sweep {
            Sweep::Left => (1, LEFT_SWEEP, Sweep::Right),
            Sweep::Right => (-1, RIGHT_SWEEP, Sweep::Settle),
            Sweep::Settle => (1, SETTLE_SWEEP, Sweep::Done),
            Sweep::Done => return None,
        };

        self.turned += 1;
        if self.turned >= length {
            self.sweep = next;
            self.turned = 0;
        }
        Some(delta)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.sweep == Sweep::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sweep_takes_eighteen_hundred_steps() {
        let mut look = LookAround::new();
        let mut heading = 0;
        let mut steps = 0;
        let mut lowest = 0;
        let mut highest = 0;

        while let Some(delta) = look.step() {
            heading += delta;
            steps += 1;
            lowest = lowest.min(heading);
            highest = highest.max(heading);
        }

        assert!(look.is_finished());
        assert_eq!(steps, 1800);
        assert_eq!(highest, 450);
        assert_eq!(lowest, -450);
        assert_eq!(heading, 0);
    }
}
