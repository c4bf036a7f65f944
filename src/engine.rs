//! Engine speed collaborator.
//!
//! The transmission controller only needs two things from the engine: its
//! current speed, and a way to pull the speed onto the new gear once a shift
//! completes. [`EngineModel`] is the stand-in the harness drives; it is a
//! ramp, not a powertrain model.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_IDLE_RPM: i32 = 750;
pub const DEFAULT_REDLINE_RPM: i32 = 6000;
pub const DEFAULT_THROTTLE_RPM_PER_TICK: i32 = 150;
pub const DEFAULT_COAST_RPM_PER_TICK: i32 = 120;

pub trait EngineControl {
    fn rpm(&self) -> i32;
    /// Set the engine speed instantly after a completed shift.
    fn force_set_rpm(&mut self, target_rpm: i32, ratio: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RpmOverride {
    pub target_rpm: i32,
    pub ratio: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    pub idle_rpm: i32,
    pub redline_rpm: i32,
    pub throttle_rpm_per_tick: i32,
    pub coast_rpm_per_tick: i32,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            idle_rpm: DEFAULT_IDLE_RPM,
            redline_rpm: DEFAULT_REDLINE_RPM,
            throttle_rpm_per_tick: DEFAULT_THROTTLE_RPM_PER_TICK,
            coast_rpm_per_tick: DEFAULT_COAST_RPM_PER_TICK,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineModel {
    limits: EngineLimits,
    rpm: i32,
    throttle: bool,
    last_override: Option<RpmOverride>,
    override_count: u32,
}

impl EngineModel {
    #[must_use]
    pub fn new(limits: EngineLimits) -> Self {
        Self {
            rpm: limits.idle_rpm,
            limits,
            throttle: false,
            last_override: None,
            override_count: 0,
        }
    }

    pub fn set_throttle(&mut self, on: bool) {
        self.throttle = on;
    }

    #[must_use]
    pub fn throttle(&self) -> bool {
        self.throttle
    }

    /// Place the engine at an exact speed, bypassing the limits.
    pub fn set_rpm(&mut self, rpm: i32) {
        self.rpm = rpm;
    }

    #[must_use]
    pub fn last_override(&self) -> Option<RpmOverride> {
        self.last_override
    }

    #[must_use]
    pub fn override_count(&self) -> u32 {
        self.override_count
    }

    #[must_use]
    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// Advance one tick: climb while the throttle is held, coast otherwise.
    pub fn update(&mut self) {
        let next = if self.throttle {
            self.rpm.saturating_add(self.limits.throttle_rpm_per_tick)
        } else {
            self.rpm.saturating_sub(self.limits.coast_rpm_per_tick)
        };
        self.rpm = self.clamp(next);
    }

    fn clamp(&self, rpm: i32) -> i32 {
        rpm.clamp(self.limits.idle_rpm, self.limits.redline_rpm)
    }
}

impl Default for EngineModel {
    fn default() -> Self {
        Self::new(EngineLimits::default())
    }
}

impl EngineControl for EngineModel {
    fn rpm(&self) -> i32 {
        self.rpm
    }

    fn force_set_rpm(&mut self, target_rpm: i32, ratio: f32) {
        debug!(from = self.rpm, to = target_rpm, ratio, "engine speed forced");
        self.rpm = self.clamp(target_rpm);
        self.last_override = Some(RpmOverride { target_rpm, ratio });
        self.override_count = self.override_count.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_is_clamped() {
        let mut engine = EngineModel::default();
        engine.update();
        assert_eq!(engine.rpm(), DEFAULT_IDLE_RPM);

        engine.set_throttle(true);
        for _ in 0..100 {
            engine.update();
        }
        assert_eq!(engine.rpm(), DEFAULT_REDLINE_RPM);
    }

    #[test]
    fn test_override_is_recorded() {
        let mut engine = EngineModel::default();
        engine.force_set_rpm(2200, 2.19);
        assert_eq!(engine.rpm(), 2200);
        assert_eq!(
            engine.last_override(),
            Some(RpmOverride { target_rpm: 2200, ratio: 2.19 })
        );
        assert_eq!(engine.override_count(), 1);
    }
}
