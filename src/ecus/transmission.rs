//! Transmission control unit.
//!
//! Every tick the controller refreshes its status fields, decides on an
//! up- or downshift from the engine speed trend, mirrors the lever position
//! onto the bus and into the gearbox, and cycles the drive program on a
//! fresh press of the program button.
//!
//! Limp mode is the only failure state. It is sticky until cleared, forces
//! the drive program to [`DrivingProgram::Fail`] and blocks program cycling.

use super::shift_log::{ShiftDirection, ShiftLog, ShiftRecord};
use super::{Ecu, TickContext};
use crate::frames::{GearVariant, Gs218, Gs418, SelectorRange};
use crate::gearbox::GearboxInterface;
use crate::mapping::{program_code, range_indication};
use crate::ratio::ForwardGear;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Downshift when decelerating below this engine speed.
pub const DOWNSHIFT_BELOW_RPM: i32 = 1500;
/// Upshift when accelerating above this engine speed.
pub const UPSHIFT_ABOVE_RPM: i32 = 3000;

const SHIFT_SOLENOID_PWM: u8 = 255;
const OIL_TEMP_FIELD_OFFSET_C: i32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DrivingProgram {
    #[default]
    Sport,
    Comfort,
    Agility,
    Manual,
    Fail,
}

impl DrivingProgram {
    /// Next program in the S -> C -> A -> M -> S cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            DrivingProgram::Sport => DrivingProgram::Comfort,
            DrivingProgram::Comfort => DrivingProgram::Agility,
            DrivingProgram::Agility => DrivingProgram::Manual,
            DrivingProgram::Manual | DrivingProgram::Fail => DrivingProgram::Sport,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ShiftSolenoid {
    OneTwo,
    TwoThree,
    ThreeFour,
}

impl ShiftSolenoid {
    /// Solenoid that shifts between `lower` and the gear above it.
    fn for_pair(lower: ForwardGear) -> Option<Self> {
        match lower.get() {
            1 | 4 => Some(ShiftSolenoid::OneTwo),
            2 => Some(ShiftSolenoid::TwoThree),
            3 => Some(ShiftSolenoid::ThreeFour),
            _ => None,
        }
    }

    fn pulse(self, gearbox: &mut dyn GearboxInterface) {
        match self {
            ShiftSolenoid::OneTwo => gearbox.shift_1_2(SHIFT_SOLENOID_PWM),
            ShiftSolenoid::TwoThree => gearbox.shift_2_3(SHIFT_SOLENOID_PWM),
            ShiftSolenoid::ThreeFour => gearbox.shift_3_4(SHIFT_SOLENOID_PWM),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionFrames {
    pub gs418: Gs418,
    pub gs218: Gs218,
}

#[derive(Debug, Clone)]
pub struct TransmissionController {
    /// Gear the controller believes is engaged. Shift bounds come from this,
    /// not from the gearbox, so the two drift apart if Drive is engaged
    /// while this is above first.
    gear: ForwardGear,
    last_rpm: i32,
    output_shaft_rpm: i32,
    limp_mode: bool,
    program: DrivingProgram,
    button_latched: bool,
    ticks: u64,
    gs418: Gs418,
    gs218: Gs218,
    shift_log: ShiftLog,
}

impl TransmissionController {
    #[must_use]
    pub fn new() -> Self {
        let mut controller = Self {
            gear: ForwardGear::FIRST,
            last_rpm: 0,
            output_shaft_rpm: 0,
            limp_mode: false,
            program: DrivingProgram::Sport,
            button_latched: false,
            ticks: 0,
            gs418: Gs418::default(),
            gs218: Gs218::default(),
            shift_log: ShiftLog::new(),
        };
        controller.setup();
        controller
    }

    #[must_use]
    pub fn gear(&self) -> ForwardGear {
        self.gear
    }

    #[must_use]
    pub fn program(&self) -> DrivingProgram {
        self.program
    }

    #[must_use]
    pub fn is_limp(&self) -> bool {
        self.limp_mode
    }

    #[must_use]
    pub fn output_shaft_rpm(&self) -> i32 {
        self.output_shaft_rpm
    }

    #[must_use]
    pub fn last_rpm(&self) -> i32 {
        self.last_rpm
    }

    #[must_use]
    pub fn button_latched(&self) -> bool {
        self.button_latched
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn shift_log(&self) -> &ShiftLog {
        &self.shift_log
    }

    #[must_use]
    pub fn gs418(&self) -> Gs418 {
        self.gs418
    }

    #[must_use]
    pub fn gs218(&self) -> Gs218 {
        self.gs218
    }

    pub fn enter_limp_mode(&mut self) {
        if !self.limp_mode {
            info!(gear = %self.gear, program = ?self.program, "entering limp mode");
        }
        self.limp_mode = true;
    }

    /// Leave limp mode. The program stays `Fail` until the next button press.
    pub fn clear_limp_mode(&mut self) {
        if self.limp_mode {
            info!("limp mode cleared");
        }
        self.limp_mode = false;
    }

    /// Shift one gear up. Returns `false` without touching anything in top gear.
    pub fn upshift(&mut self, gearbox: &mut dyn GearboxInterface) -> bool {
        let Some(next) = self.gear.up() else {
            return false;
        };
        if let Some(solenoid) = ShiftSolenoid::for_pair(self.gear) {
            solenoid.pulse(gearbox);
        }
        self.gear = next;
        true
    }

    /// Shift one gear down. Returns `false` without touching anything in first gear.
    pub fn downshift(&mut self, gearbox: &mut dyn GearboxInterface) -> bool {
        let Some(next) = self.gear.down() else {
            return false;
        };
        if let Some(solenoid) = ShiftSolenoid::for_pair(next) {
            solenoid.pulse(gearbox);
        }
        self.gear = next;
        true
    }

    /// Engine speed that matches the current output shaft speed in the engaged gear.
    #[must_use]
    pub fn synchronized_engine_rpm(&self) -> i32 {
        (self.output_shaft_rpm as f32 * self.gear.ratio()) as i32
    }

    /// Program button handler, called every tick the button is held.
    pub fn handle_program_button(&mut self) {
        if self.limp_mode {
            self.program = DrivingProgram::Fail;
            return;
        }
        if !self.button_latched {
            let next = self.program.next();
            debug!(from = ?self.program, to = ?next, "drive program changed");
            self.program = next;
            self.button_latched = true;
        }
    }

    fn try_shift(&mut self, direction: ShiftDirection, ctx: &mut TickContext<'_>) {
        let from = self.gear;
        let shifted = match direction {
            ShiftDirection::Up => self.upshift(&mut *ctx.gearbox),
            ShiftDirection::Down => self.downshift(&mut *ctx.gearbox),
        };
        if !shifted {
            return;
        }

        let ratio = self.gear.ratio();
        let target_rpm = self.synchronized_engine_rpm();
        ctx.engine.force_set_rpm(target_rpm, ratio);

        debug!(
            tick = self.ticks,
            from = %from,
            to = %self.gear,
            engine_rpm = ctx.ms308.engine_rpm,
            target_rpm,
            "shift completed"
        );

        self.shift_log.record(ShiftRecord {
            tick: self.ticks,
            from,
            to: self.gear,
            direction,
            engine_rpm: ctx.ms308.engine_rpm,
            target_rpm,
            ratio,
        });
    }
}

impl Default for TransmissionController {
    fn default() -> Self {
        Self::new()
    }
}

impl Ecu for TransmissionController {
    type Frames = TransmissionFrames;

    fn name(&self) -> &'static str {
        "GS"
    }

    fn setup(&mut self) {
        self.gs418 = Gs418::default();
        self.gs218 = Gs218::default();
        self.limp_mode = false;
        self.button_latched = false;
        self.program = DrivingProgram::Sport;
        self.gear = ForwardGear::FIRST;
        self.last_rpm = 0;
        self.output_shaft_rpm = 0;
        self.ticks = 0;
        self.shift_log.clear();
    }

    fn simulate_tick(&mut self, ctx: &mut TickContext<'_>) {
        self.ticks = self.ticks.wrapping_add(1);

        self.gs418.all_wheel = false;
        self.gs418.cvt = false;
        self.gs418.oil_temp_field = ctx.gearbox.oil_temp_c() + OIL_TEMP_FIELD_OFFSET_C;
        self.gs218.gsp_ok = !self.limp_mode;
        self.gs218.limp_active = self.limp_mode;

        let curr_rpm = ctx.ms308.engine_rpm;
        self.output_shaft_rpm = ctx.gearbox.output_shaft_speed(curr_rpm);

        let in_drive = ctx.ewm230.range == SelectorRange::Drive;
        // Only a strictly slower engine counts as decelerating.
        if self.last_rpm > curr_rpm {
            if in_drive && curr_rpm < DOWNSHIFT_BELOW_RPM {
                self.try_shift(ShiftDirection::Down, ctx);
            }
        } else if in_drive && curr_rpm > UPSHIFT_ABOVE_RPM {
            self.try_shift(ShiftDirection::Up, ctx);
        }
        self.last_rpm = curr_rpm;

        let indication = range_indication(ctx.ewm230.range);
        self.gs418.shift_pattern = indication.shift_pattern;
        self.gs418.display = indication.display;
        if let Some(range) = indication.range {
            ctx.gearbox.enter_range(range);
        }

        if self.limp_mode {
            self.program = DrivingProgram::Fail;
        }
        self.gs418.program = program_code(self.program);

        if ctx.ewm230.program_button {
            self.handle_program_button();
        } else {
            self.button_latched = false;
        }

        self.gs418.mech = GearVariant::configured();
    }

    fn frames(&self) -> Self::Frames {
        TransmissionFrames {
            gs418: self.gs418,
            gs218: self.gs218,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gearbox::{VirtualGear, VirtualGearbox};

    #[test]
    fn test_program_cycle_wraps() {
        assert_eq!(DrivingProgram::Manual.next(), DrivingProgram::Sport);
        assert_eq!(DrivingProgram::Fail.next(), DrivingProgram::Sport);
    }

    #[test]
    fn test_fourth_to_fifth_uses_one_two_solenoid() {
        let mut controller = TransmissionController::new();
        let mut gearbox = VirtualGearbox::in_gear(VirtualGear::Drive1);
        for _ in 0..4 {
            assert!(controller.upshift(&mut gearbox));
        }
        assert_eq!(controller.gear(), ForwardGear::TOP);
        assert_eq!(gearbox.gear(), VirtualGear::Drive5);

        assert!(!controller.upshift(&mut gearbox));
        assert_eq!(gearbox.gear(), VirtualGear::Drive5);
    }
}
