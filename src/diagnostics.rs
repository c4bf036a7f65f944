//! Read-by-local-identifier records served by the transmission controller.
//!
//! These are the live data blocks a diagnostic tester polls: shaft speed
//! sensors, supply voltage and fluid temperature, and the duty of every
//! solenoid.

use crate::gearbox::{GearboxInterface, VirtualGear, VirtualGearbox};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RecordId {
    GearboxSensors = 0x20,
    SolenoidStatus = 0x21,
}

impl TryFrom<u8> for RecordId {
    type Error = DiagError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x20 => Ok(RecordId::GearboxSensors),
            0x21 => Ok(RecordId::SolenoidStatus),
            other => Err(DiagError::UnsupportedIdentifier(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiagError {
    #[error("local identifier 0x{0:02X} is not supported")]
    UnsupportedIdentifier(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearboxSensors {
    pub n2_rpm: u16,
    pub n3_rpm: u16,
    /// Input shaft speed.
    pub calculated_rpm: u16,
    /// Input over output speed, scaled by 100. Zero with no drive engaged.
    pub calc_ratio: u16,
    pub v_batt_mv: u16,
    pub atf_temp_c: i32,
    pub parking_lock: bool,
}

impl GearboxSensors {
    #[must_use]
    pub fn capture(gearbox: &VirtualGearbox, engine_rpm: i32) -> Self {
        let n2 = gearbox.output_shaft_speed(engine_rpm);
        let n3 = gearbox.secondary_shaft_speed(engine_rpm);
        let calc_ratio = if n2 > 0 {
            ((engine_rpm as f32 / n2 as f32) * 100.0).round() as u16
        } else {
            0
        };

        Self {
            n2_rpm: clamp_u16(n2),
            n3_rpm: clamp_u16(n3),
            calculated_rpm: clamp_u16(engine_rpm),
            calc_ratio,
            v_batt_mv: gearbox.battery_mv(),
            atf_temp_c: gearbox.oil_temp_c(),
            parking_lock: gearbox.gear() == VirtualGear::Park,
        }
    }
}

/// Last commanded duty of every solenoid, 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolenoidStatus {
    pub spc_pwm: u8,
    pub mpc_pwm: u8,
    pub tcc_pwm: u8,
    /// 1-2 / 4-5 shift solenoid.
    pub y3_pwm: u8,
    /// 3-4 shift solenoid.
    pub y4_pwm: u8,
    /// 2-3 shift solenoid.
    pub y5_pwm: u8,
}

impl SolenoidStatus {
    #[must_use]
    pub fn capture(gearbox: &VirtualGearbox) -> Self {
        let duty = gearbox.actuator_duty();
        Self {
            spc_pwm: duty.spc,
            mpc_pwm: duty.mpc,
            tcc_pwm: duty.tcc,
            y3_pwm: duty.one_two,
            y4_pwm: duty.three_four,
            y5_pwm: duty.two_three,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalRecord {
    Sensors(GearboxSensors),
    Solenoids(SolenoidStatus),
}

/// Serve one record by raw identifier.
pub fn read_record(
    id: u8,
    gearbox: &VirtualGearbox,
    engine_rpm: i32,
) -> Result<LocalRecord, DiagError> {
    Ok(match RecordId::try_from(id)? {
        RecordId::GearboxSensors => LocalRecord::Sensors(GearboxSensors::capture(gearbox, engine_rpm)),
        RecordId::SolenoidStatus => LocalRecord::Solenoids(SolenoidStatus::capture(gearbox)),
    })
}

fn clamp_u16(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}
