//! Scheduler for the simulated vehicle: owns the engine stand-in, the
//! virtual gearbox and both ECUs, and ticks them in a fixed order.

use crate::config::SimConfig;
use crate::diagnostics::{read_record, DiagError, LocalRecord};
use crate::ecus::transmission::TransmissionFrames;
use crate::ecus::{DrivingProgram, Ecu, GearSelector, ShiftRecord, TickContext, TransmissionController};
use crate::engine::{EngineControl, EngineModel};
use crate::error::SimError;
use crate::frames::{Ewm230, Ms308, SelectorRange};
use crate::gearbox::{VirtualGear, VirtualGearbox};
use crate::ratio::ForwardGear;
use crate::scenario::{Action, Scenario};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Observable state after one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub engine_rpm: i32,
    pub throttle: bool,
    pub selector: SelectorRange,
    pub program_button: bool,
    pub virtual_gear: VirtualGear,
    pub forward_gear: ForwardGear,
    pub program: DrivingProgram,
    pub limp_mode: bool,
    pub output_shaft_rpm: i32,
    /// Shift completed during this tick, if any.
    pub shift: Option<ShiftRecord>,
    pub frames: TransmissionFrames,
}

#[derive(Debug, Clone)]
pub struct VehicleSim {
    config: SimConfig,
    engine: EngineModel,
    gearbox: VirtualGearbox,
    selector: GearSelector,
    transmission: TransmissionController,
    scenario: Scenario,
    tick: u64,
    running: bool,
}

impl VehicleSim {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let scenario = config.build_scenario()?;
        Ok(Self::with_scenario(config, scenario))
    }

    #[must_use]
    pub fn with_scenario(config: SimConfig, scenario: Scenario) -> Self {
        Self {
            engine: EngineModel::new(config.engine),
            gearbox: VirtualGearbox::new(),
            selector: GearSelector::new(),
            transmission: TransmissionController::new(),
            scenario,
            tick: 0,
            running: false,
            config,
        }
    }

    /// Run `setup()` on every ECU and begin accepting ticks.
    pub fn start(&mut self) {
        self.selector.setup();
        self.transmission.setup();
        self.running = true;
        info!(
            selector = self.selector.name(),
            transmission = self.transmission.name(),
            pending_actions = self.scenario.pending().len(),
            "vehicle simulation started"
        );
    }

    pub fn stop(&mut self) {
        self.running = false;
        info!(tick = self.tick, "vehicle simulation stopped");
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one tick. Returns `None` while stopped.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        self.tick = self.tick.wrapping_add(1);

        for action in self.scenario.take_due(self.tick) {
            self.apply(action);
        }

        self.engine.update();

        let ms308 = Ms308 {
            engine_rpm: self.engine.rpm(),
        };
        let shifts_before = self.shift_count();

        {
            let mut ctx = TickContext {
                ms308,
                ewm230: self.selector.frames(),
                engine: &mut self.engine,
                gearbox: &mut self.gearbox,
            };
            self.selector.simulate_tick(&mut ctx);
        }

        let mut ctx = TickContext {
            ms308,
            ewm230: self.selector.frames(),
            engine: &mut self.engine,
            gearbox: &mut self.gearbox,
        };
        self.transmission.simulate_tick(&mut ctx);

        let shift = if self.shift_count() == shifts_before {
            None
        } else {
            self.transmission.shift_log().last().copied()
        };
        Some(self.report(shift))
    }

    /// Run up to `ticks` ticks, collecting every report.
    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map_while(|_| self.tick()).collect()
    }

    /// Queue an action relative to the current tick.
    pub fn schedule(&mut self, at_tick: u64, action: Action) -> Result<(), SimError> {
        self.scenario.schedule(at_tick, action, self.tick)
    }

    pub fn read_diagnostic(&self, id: u8) -> Result<LocalRecord, DiagError> {
        read_record(id, &self.gearbox, self.engine.rpm())
    }

    pub fn telemetry_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(&self.report(None))?)
    }

    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &EngineModel {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineModel {
        &mut self.engine
    }

    #[must_use]
    pub fn gearbox(&self) -> &VirtualGearbox {
        &self.gearbox
    }

    #[must_use]
    pub fn selector(&self) -> &GearSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut GearSelector {
        &mut self.selector
    }

    #[must_use]
    pub fn transmission(&self) -> &TransmissionController {
        &self.transmission
    }

    pub fn transmission_mut(&mut self) -> &mut TransmissionController {
        &mut self.transmission
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    fn shift_count(&self) -> u32 {
        let log = self.transmission.shift_log();
        log.total_upshifts().wrapping_add(log.total_downshifts())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::MoveLever { dir } => self.selector.apply_force(dir),
            Action::ReleaseLever => self.selector.apply_force(crate::ecus::MoveDir::None),
            Action::PressButton => self.selector.press_button(),
            Action::ReleaseButton => self.selector.release_button(),
            Action::Throttle { on } => self.engine.set_throttle(on),
            Action::SetEngineRpm { rpm } => {
                if rpm < 0 {
                    warn!(rpm, "ignoring negative engine speed");
                } else {
                    self.engine.set_rpm(rpm);
                }
            }
            Action::SetSelector { range } => self.selector.set_position(range),
            Action::EnterLimp => self.transmission.enter_limp_mode(),
            Action::ClearLimp => self.transmission.clear_limp_mode(),
        }
    }

    fn report(&self, shift: Option<ShiftRecord>) -> TickReport {
        let ewm: Ewm230 = self.selector.frames();
        TickReport {
            tick: self.tick,
            engine_rpm: self.engine.rpm(),
            throttle: self.engine.throttle(),
            selector: ewm.range,
            program_button: ewm.program_button,
            virtual_gear: self.gearbox.gear(),
            forward_gear: self.transmission.gear(),
            program: self.transmission.program(),
            limp_mode: self.transmission.is_limp(),
            output_shaft_rpm: self.transmission.output_shaft_rpm(),
            shift,
            frames: self.transmission.frames(),
        }
    }
}
