//! Gear selector lever module.
//!
//! ```text
//!   --------------
//!   |s/c         |
//!   |      P     |
//!   |      R     |
//!   |      N     |
//!   |    - D +   |
//!   --------------
//! ```
//!
//! A host pushes the lever with [`GearSelector::apply_force`] and works the
//! drive program button with [`GearSelector::press_button`] and
//! [`GearSelector::release_button`]. Each tick the latched movement is
//! applied and the [`Ewm230`] frame is republished.

use super::{Ecu, TickContext};
use crate::frames::{Ewm230, SelectorRange};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

#[derive(Debug, Clone)]
pub struct GearSelector {
    position: SelectorRange,
    program_button: bool,
    move_dir: MoveDir,
    sim_ticks: u64,
    frame: Ewm230,
}

impl GearSelector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: SelectorRange::Park,
            program_button: false,
            move_dir: MoveDir::None,
            sim_ticks: 0,
            frame: Ewm230::default(),
        }
    }

    /// Push the lever. Up and Down move one gate on the next tick; Left and
    /// Right hold the tip position until released with [`MoveDir::None`].
    pub fn apply_force(&mut self, dir: MoveDir) {
        self.move_dir = dir;
    }

    pub fn press_button(&mut self) {
        self.program_button = true;
    }

    pub fn release_button(&mut self) {
        self.program_button = false;
    }

    /// Force the reported position, e.g. to put a not-valid signal on the bus.
    pub fn set_position(&mut self, range: SelectorRange) {
        self.position = range;
    }

    #[must_use]
    pub fn position(&self) -> SelectorRange {
        self.position
    }

    #[must_use]
    pub fn button_pressed(&self) -> bool {
        self.program_button
    }

    #[must_use]
    pub fn move_dir(&self) -> MoveDir {
        self.move_dir
    }

    #[must_use]
    pub fn sim_ticks(&self) -> u64 {
        self.sim_ticks
    }

    fn apply_movement(&mut self) {
        use SelectorRange::{Drive, Minus, Neutral, Park, Plus, Reverse, SportNonValid};

        if self.position == SportNonValid {
            return;
        }

        let next = match (self.move_dir, self.position) {
            (MoveDir::Up, Reverse) => Park,
            (MoveDir::Up, Neutral) => Reverse,
            (MoveDir::Up, Drive | Plus | Minus) => Neutral,
            (MoveDir::Down, Park) => Reverse,
            (MoveDir::Down, Reverse) => Neutral,
            (MoveDir::Down, Neutral) => Drive,
            (MoveDir::Right, Drive | Plus | Minus) => Plus,
            (MoveDir::Left, Drive | Plus | Minus) => Minus,
            (MoveDir::None, Plus | Minus) => Drive,
            (_, current) => current,
        };

        if matches!(self.move_dir, MoveDir::Up | MoveDir::Down) {
            self.move_dir = MoveDir::None;
        }

        if next != self.position {
            debug!(from = ?self.position, to = ?next, "selector moved");
            self.position = next;
        }
    }
}

impl Default for GearSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl Ecu for GearSelector {
    type Frames = Ewm230;

    fn name(&self) -> &'static str {
        "EWM"
    }

    fn setup(&mut self) {
        self.position = SelectorRange::Park;
        self.program_button = false;
        self.move_dir = MoveDir::None;
        self.sim_ticks = 0;
        self.frame = Ewm230::default();
    }

    fn simulate_tick(&mut self, _ctx: &mut TickContext<'_>) {
        self.sim_ticks = self.sim_ticks.wrapping_add(1);
        self.apply_movement();
        self.frame = Ewm230 {
            range: self.position,
            program_button: self.program_button,
        };
    }

    fn frames(&self) -> Self::Frames {
        self.frame
    }
}
