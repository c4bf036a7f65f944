//! Fixed gear ratio table of the 5-speed box.
//!
//! Ratios are input shaft turns per output shaft turn, so a ratio above 1.0
//! means the output shaft turns slower than the engine.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

pub const MIN_FORWARD_GEAR: u8 = 1;
pub const MAX_FORWARD_GEAR: u8 = 5;

pub const D1_RATIO: f32 = 3.59;
pub const D2_RATIO: f32 = 2.19;
pub const D3_RATIO: f32 = 1.41;
pub const D4_RATIO: f32 = 1.00;
pub const D5_RATIO: f32 = 0.83;

pub const R1_RATIO: f32 = 3.16;

/// Returned for any gear index outside the forward table.
pub const IDENTITY_RATIO: f32 = 1.0;

const FORWARD_RATIOS: [f32; MAX_FORWARD_GEAR as usize] =
    [D1_RATIO, D2_RATIO, D3_RATIO, D4_RATIO, D5_RATIO];

const_assert_eq!(FORWARD_RATIOS.len(), (MAX_FORWARD_GEAR - MIN_FORWARD_GEAR + 1) as usize);

/// Ratio for a raw forward gear index. Anything outside `1..=5` yields 1.0.
#[must_use]
pub fn forward_ratio(gear: u8) -> f32 {
    match gear {
        MIN_FORWARD_GEAR..=MAX_FORWARD_GEAR => FORWARD_RATIOS[(gear - MIN_FORWARD_GEAR) as usize],
        _ => IDENTITY_RATIO,
    }
}

/// A forward gear index, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ForwardGear(u8);

impl ForwardGear {
    pub const FIRST: ForwardGear = ForwardGear(MIN_FORWARD_GEAR);
    pub const TOP: ForwardGear = ForwardGear(MAX_FORWARD_GEAR);

    #[must_use]
    pub fn new(gear: u8) -> Option<Self> {
        (MIN_FORWARD_GEAR..=MAX_FORWARD_GEAR)
            .contains(&gear)
            .then_some(Self(gear))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Next gear up, `None` in top gear.
    #[must_use]
    pub fn up(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Next gear down, `None` in first gear.
    #[must_use]
    pub fn down(self) -> Option<Self> {
        self.0.checked_sub(1).and_then(Self::new)
    }

    #[must_use]
    pub fn ratio(self) -> f32 {
        forward_ratio(self.0)
    }
}

impl Default for ForwardGear {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<ForwardGear> for u8 {
    fn from(gear: ForwardGear) -> Self {
        gear.0
    }
}

impl TryFrom<u8> for ForwardGear {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("forward gear must be within 1..=5")
    }
}

impl core::fmt::Display for ForwardGear {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "D{}", self.0)
    }
}
