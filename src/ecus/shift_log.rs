//! Bounded history of completed gear changes.

use crate::ratio::ForwardGear;
use heapless::Vec;
use serde::{Deserialize, Serialize};

pub const MAX_SHIFT_HISTORY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub tick: u64,
    pub from: ForwardGear,
    pub to: ForwardGear,
    pub direction: ShiftDirection,
    pub engine_rpm: i32,
    pub target_rpm: i32,
    pub ratio: f32,
}

/// Most recent completed shifts, oldest evicted first.
#[derive(Debug, Clone, Default)]
pub struct ShiftLog {
    history: Vec<ShiftRecord, MAX_SHIFT_HISTORY>,
    total_upshifts: u32,
    total_downshifts: u32,
}

impl ShiftLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: ShiftRecord) {
        match record.direction {
            ShiftDirection::Up => self.total_upshifts = self.total_upshifts.wrapping_add(1),
            ShiftDirection::Down => self.total_downshifts = self.total_downshifts.wrapping_add(1),
        }

        if self.history.is_full() {
            self.history.remove(0);
        }
        let _ = self.history.push(record);
    }

    #[must_use]
    pub fn history(&self) -> &[ShiftRecord] {
        &self.history
    }

    #[must_use]
    pub fn last(&self) -> Option<&ShiftRecord> {
        self.history.last()
    }

    #[must_use]
    pub fn total_upshifts(&self) -> u32 {
        self.total_upshifts
    }

    #[must_use]
    pub fn total_downshifts(&self) -> u32 {
        self.total_downshifts
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.total_upshifts = 0;
        self.total_downshifts = 0;
    }
}
