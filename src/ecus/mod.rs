//! The simulated control units and the trait the harness drives them through.

pub mod selector;
pub mod shift_log;
pub mod transmission;

pub use selector::{GearSelector, MoveDir};
pub use shift_log::{ShiftDirection, ShiftLog, ShiftRecord};
pub use transmission::{DrivingProgram, TransmissionController};

use crate::engine::EngineControl;
use crate::frames::{Ewm230, Ms308};
use crate::gearbox::GearboxInterface;
use serde::Serialize;

/// Everything an ECU may see during one tick.
///
/// Frames are snapshots taken once before the tick; the collaborators are
/// borrowed for the duration of the call only.
pub struct TickContext<'a> {
    pub ms308: Ms308,
    pub ewm230: Ewm230,
    pub engine: &'a mut dyn EngineControl,
    pub gearbox: &'a mut dyn GearboxInterface,
}

/// A simulated control unit driven by the harness scheduler.
pub trait Ecu {
    /// Frames the ECU publishes on the bus.
    type Frames: Clone + Serialize;

    fn name(&self) -> &'static str;
    /// Called once before the first tick.
    fn setup(&mut self);
    fn simulate_tick(&mut self, ctx: &mut TickContext<'_>);
    fn frames(&self) -> Self::Frames;
}
