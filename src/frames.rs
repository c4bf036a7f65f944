//! Typed field views of the bus frames exchanged between the simulated ECUs.
//!
//! Packing these into wire-format bytes is the job of the codec layer; the
//! simulation only ever reads and writes named fields.

use serde::{Deserialize, Serialize};

/// Selector lever position reported by the lever module (WHC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectorRange {
    #[default]
    Park,
    Reverse,
    Neutral,
    Drive,
    Plus,
    Minus,
    /// Signal not valid.
    SportNonValid,
}

impl SelectorRange {
    /// D and its tip positions.
    #[must_use]
    pub fn is_drive_family(self) -> bool {
        matches!(self, SelectorRange::Drive | SelectorRange::Plus | SelectorRange::Minus)
    }
}

/// Drive program letter shown by the instrument cluster (FPC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramCode {
    S,
    C,
    A,
    M,
    F,
}

impl ProgramCode {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            ProgramCode::S => 'S',
            ProgramCode::C => 'C',
            ProgramCode::A => 'A',
            ProgramCode::M => 'M',
            ProgramCode::F => 'F',
        }
    }
}

/// Mechanical gearbox variant (MECH).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GearVariant {
    Nag2Klein2 = 2,
    Nag2Gross2 = 3,
}

impl GearVariant {
    /// Variant selected when the crate was built.
    #[must_use]
    pub const fn configured() -> Self {
        if cfg!(feature = "w5a330") {
            GearVariant::Nag2Klein2
        } else {
            GearVariant::Nag2Gross2
        }
    }
}

/// Engine status frame, read by the transmission controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Ms308 {
    /// NMOT, engine speed in rpm.
    pub engine_rpm: i32,
}

/// Selector lever frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Ewm230 {
    /// WHC
    pub range: SelectorRange,
    /// FPT, drive program button held.
    pub program_button: bool,
}

/// Transmission status frame consumed by the cluster and engine ECU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gs418 {
    pub all_wheel: bool,
    pub cvt: bool,
    /// T_GET, oil temperature with a +40 offset.
    pub oil_temp_field: i32,
    /// WHST, shift pattern code.
    pub shift_pattern: u8,
    /// FSC, character shown in the gear display. 255 means not valid.
    pub display: u8,
    pub program: ProgramCode,
    pub mech: GearVariant,
}

impl Default for Gs418 {
    fn default() -> Self {
        Self {
            all_wheel: false,
            cvt: false,
            oil_temp_field: 0,
            shift_pattern: 0,
            display: b'P',
            program: ProgramCode::S,
            mech: GearVariant::configured(),
        }
    }
}

/// Transmission health frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gs218 {
    /// GSP_OK
    pub gsp_ok: bool,
    /// GS_NOTL, emergency running (limp) active.
    pub limp_active: bool,
}

impl Default for Gs218 {
    fn default() -> Self {
        Self {
            gsp_ok: true,
            limp_active: false,
        }
    }
}
