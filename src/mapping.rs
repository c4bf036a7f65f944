//! Pure mapping from controller and lever state to bus output fields.

use crate::ecus::transmission::DrivingProgram;
use crate::frames::{ProgramCode, SelectorRange};
use crate::gearbox::RangeCode;
use serde::{Deserialize, Serialize};

/// FSC value for "signal not valid".
pub const DISPLAY_NOT_VALID: u8 = 255;

/// What the controller publishes and commands for a given lever position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeIndication {
    /// WHST
    pub shift_pattern: u8,
    /// FSC
    pub display: u8,
    /// Range command for the gearbox. `None` leaves the mechanism untouched.
    pub range: Option<RangeCode>,
}

#[must_use]
pub fn range_indication(range: SelectorRange) -> RangeIndication {
    match range {
        range if range.is_drive_family() => RangeIndication {
            shift_pattern: 4,
            display: b'D',
            range: Some(RangeCode::Drive),
        },
        SelectorRange::Park => RangeIndication {
            shift_pattern: 0,
            display: b'P',
            range: Some(RangeCode::Park),
        },
        SelectorRange::Neutral => RangeIndication {
            shift_pattern: 2,
            display: b'N',
            range: Some(RangeCode::Neutral),
        },
        SelectorRange::Reverse => RangeIndication {
            shift_pattern: 1,
            display: b'R',
            range: Some(RangeCode::Reverse),
        },
        // Signal not valid.
        _ => RangeIndication {
            shift_pattern: 7,
            display: DISPLAY_NOT_VALID,
            range: None,
        },
    }
}

#[must_use]
pub fn program_code(program: DrivingProgram) -> ProgramCode {
    match program {
        DrivingProgram::Sport => ProgramCode::S,
        DrivingProgram::Comfort => ProgramCode::C,
        DrivingProgram::Agility => ProgramCode::A,
        DrivingProgram::Manual => ProgramCode::M,
        DrivingProgram::Fail => ProgramCode::F,
    }
}
