//! Simulation settings loaded from JSON.

use crate::engine::EngineLimits;
use crate::error::SimError;
use crate::scenario::{Scenario, ScheduledAction};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TICK_PERIOD_MS: u64 = 100;
pub const DEFAULT_TICKS: u64 = 150;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Wall-clock spacing between ticks when run by the simulator binary.
    pub tick_period_ms: u64,
    /// Number of ticks to run, 0 runs until interrupted.
    pub ticks: u64,
    pub engine: EngineLimits,
    /// Driver actions. `None` replays the built-in drive cycle.
    pub scenario: Option<Vec<ScheduledAction>>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            ticks: DEFAULT_TICKS,
            engine: EngineLimits::default(),
            scenario: None,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_period_ms == 0 {
            return Err(SimError::InvalidConfig("tick_period_ms must be positive".into()));
        }
        let engine = &self.engine;
        if engine.idle_rpm <= 0 || engine.idle_rpm >= engine.redline_rpm {
            return Err(SimError::InvalidConfig(format!(
                "idle rpm {} must be positive and below redline {}",
                engine.idle_rpm, engine.redline_rpm
            )));
        }
        if engine.throttle_rpm_per_tick <= 0 || engine.coast_rpm_per_tick <= 0 {
            return Err(SimError::InvalidConfig("engine ramp rates must be positive".into()));
        }
        Ok(())
    }

    pub fn build_scenario(&self) -> Result<Scenario, SimError> {
        match &self.scenario {
            Some(actions) => Scenario::from_actions(actions.iter().copied()),
            None => Scenario::drive_cycle(),
        }
    }
}
