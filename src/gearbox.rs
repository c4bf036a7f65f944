//! Virtual gearbox standing in for the mechanical transmission.
//!
//! The controller never owns the mechanism. It drives it through
//! [`GearboxInterface`], the same surface the real hydraulics would see:
//! shift solenoid pulses, pressure regulator duty, and a selector range
//! command. [`VirtualGearbox`] turns those commands into a single discrete
//! gear and derives the shaft speeds from the engine speed.

use crate::ratio::{D1_RATIO, D2_RATIO, D3_RATIO, D4_RATIO, D5_RATIO, R1_RATIO};
use serde::{Deserialize, Serialize};

const SIM_OIL_TEMP_C: i32 = 80;
const SIM_BATTERY_MV: u16 = 14300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VirtualGear {
    Park,
    Neutral,
    Reverse1,
    Reverse2,
    Drive1,
    Drive2,
    Drive3,
    Drive4,
    Drive5,
}

impl VirtualGear {
    #[must_use]
    pub fn is_forward(self) -> bool {
        matches!(
            self,
            VirtualGear::Drive1
                | VirtualGear::Drive2
                | VirtualGear::Drive3
                | VirtualGear::Drive4
                | VirtualGear::Drive5
        )
    }
}

/// Range position commanded to the mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RangeCode {
    Park = 0,
    Reverse = 1,
    Neutral = 2,
    Drive = 3,
}

impl RangeCode {
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(RangeCode::Park),
            1 => Some(RangeCode::Reverse),
            2 => Some(RangeCode::Neutral),
            3 => Some(RangeCode::Drive),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Last duty written to each actuator, 0..=255.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorDuty {
    pub spc: u8,
    pub mpc: u8,
    pub tcc: u8,
    pub one_two: u8,
    pub two_three: u8,
    pub three_four: u8,
}

/// Command and sensor surface of a gearbox, as seen by its controller.
pub trait GearboxInterface {
    /// Output shaft (N2) speed for the given engine speed.
    fn output_shaft_speed(&self, engine_rpm: i32) -> i32;
    /// Secondary (N3) shaft speed, used for diagnostics only.
    fn secondary_shaft_speed(&self, engine_rpm: i32) -> i32;
    fn oil_temp_c(&self) -> i32;
    fn battery_mv(&self) -> u16;

    fn shift_1_2(&mut self, pwm: u8);
    fn shift_2_3(&mut self, pwm: u8);
    fn shift_3_4(&mut self, pwm: u8);
    fn enter_range(&mut self, range: RangeCode);

    fn set_spc_pwm(&mut self, pwm: u8);
    fn set_mpc_pwm(&mut self, pwm: u8);
    fn set_tcc_pwm(&mut self, pwm: u8);
}

#[derive(Debug, Clone)]
pub struct VirtualGearbox {
    gear: VirtualGear,
    duty: ActuatorDuty,
}

impl VirtualGearbox {
    #[must_use]
    pub fn new() -> Self {
        Self {
            gear: VirtualGear::Park,
            duty: ActuatorDuty::default(),
        }
    }

    /// Build a gearbox already sitting in `gear`.
    #[must_use]
    pub fn in_gear(gear: VirtualGear) -> Self {
        Self {
            gear,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn gear(&self) -> VirtualGear {
        self.gear
    }

    #[must_use]
    pub fn actuator_duty(&self) -> ActuatorDuty {
        self.duty
    }

    /// Ratio of the engaged gear, `None` when no drive path is engaged.
    #[must_use]
    pub fn engaged_ratio(&self) -> Option<f32> {
        match self.gear {
            VirtualGear::Drive1 => Some(D1_RATIO),
            VirtualGear::Drive2 => Some(D2_RATIO),
            VirtualGear::Drive3 => Some(D3_RATIO),
            VirtualGear::Drive4 => Some(D4_RATIO),
            VirtualGear::Drive5 => Some(D5_RATIO),
            VirtualGear::Park
            | VirtualGear::Neutral
            | VirtualGear::Reverse1
            | VirtualGear::Reverse2 => None,
        }
    }

    fn toggle(&mut self, a: VirtualGear, b: VirtualGear) -> bool {
        if self.gear == a {
            self.gear = b;
            true
        } else if self.gear == b {
            self.gear = a;
            true
        } else {
            false
        }
    }
}

impl Default for VirtualGearbox {
    fn default() -> Self {
        Self::new()
    }
}

impl GearboxInterface for VirtualGearbox {
    fn output_shaft_speed(&self, engine_rpm: i32) -> i32 {
        match self.engaged_ratio() {
            Some(ratio) => (engine_rpm as f32 / ratio) as i32,
            None => 0,
        }
    }

    // Multiplies where the output shaft divides. N3 sits on a different
    // planetary member, so the two formulas are not meant to agree.
    fn secondary_shaft_speed(&self, engine_rpm: i32) -> i32 {
        let rpm = engine_rpm as f32;
        let speed = match self.gear {
            VirtualGear::Drive2 | VirtualGear::Reverse2 => D2_RATIO * rpm,
            VirtualGear::Drive3 => D3_RATIO * rpm,
            VirtualGear::Drive4 => D4_RATIO * rpm,
            VirtualGear::Reverse1 => R1_RATIO * rpm,
            VirtualGear::Drive1
            | VirtualGear::Drive5
            | VirtualGear::Park
            | VirtualGear::Neutral => 0.0,
        };
        speed as i32
    }

    fn oil_temp_c(&self) -> i32 {
        SIM_OIL_TEMP_C
    }

    fn battery_mv(&self) -> u16 {
        SIM_BATTERY_MV
    }

    // One solenoid serves both the 1-2 and the 4-5 shift.
    fn shift_1_2(&mut self, pwm: u8) {
        self.duty.one_two = pwm;
        if !self.toggle(VirtualGear::Drive1, VirtualGear::Drive2) {
            self.toggle(VirtualGear::Drive4, VirtualGear::Drive5);
        }
    }

    fn shift_2_3(&mut self, pwm: u8) {
        self.duty.two_three = pwm;
        self.toggle(VirtualGear::Drive2, VirtualGear::Drive3);
    }

    fn shift_3_4(&mut self, pwm: u8) {
        self.duty.three_four = pwm;
        self.toggle(VirtualGear::Drive3, VirtualGear::Drive4);
    }

    fn enter_range(&mut self, range: RangeCode) {
        match range {
            RangeCode::Park => self.gear = VirtualGear::Park,
            RangeCode::Reverse => self.gear = VirtualGear::Reverse1,
            RangeCode::Neutral => self.gear = VirtualGear::Neutral,
            // Already driving: keep the engaged gear.
            RangeCode::Drive => {
                if !self.gear.is_forward() {
                    self.gear = VirtualGear::Drive1;
                }
            }
        }
    }

    fn set_spc_pwm(&mut self, pwm: u8) {
        self.duty.spc = pwm;
    }

    fn set_mpc_pwm(&mut self, pwm: u8) {
        self.duty.mpc = pwm;
    }

    fn set_tcc_pwm(&mut self, pwm: u8) {
        self.duty.tcc = pwm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_codes() {
        assert_eq!(RangeCode::from_code(0), Some(RangeCode::Park));
        assert_eq!(RangeCode::from_code(3), Some(RangeCode::Drive));
        assert_eq!(RangeCode::from_code(4), None);
        assert_eq!(RangeCode::Neutral.code(), 2);
    }

    #[test]
    fn test_toggle_outside_pair_is_noop() {
        let mut gearbox = VirtualGearbox::in_gear(VirtualGear::Drive1);
        gearbox.shift_3_4(255);
        assert_eq!(gearbox.gear(), VirtualGear::Drive1);
        gearbox.shift_2_3(255);
        assert_eq!(gearbox.gear(), VirtualGear::Drive1);
    }
}
