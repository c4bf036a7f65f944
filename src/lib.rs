//! # Gearbox ECU Simulator
//!
//! Tick-driven simulation of two vehicle control units on a shared bus: an
//! automatic transmission controller for a 5-speed box and the gear selector
//! lever that feeds it.
//!
//! ## Features
//!
//! - **Shift logic**: up/downshift decisions from the engine speed trend,
//!   with the engine pulled onto the new gear after every shift
//! - **Drive programs**: S/C/A/M cycle on the program button, `F` in limp mode
//! - **Virtual gearbox**: solenoid-driven gear model deriving shaft speeds
//! - **Selector lever**: P/R/N/D gate with +/- tip positions
//! - **Diagnostics**: sensor and solenoid records as a tester would read them
//! - **Scenarios**: tick-tagged driver actions replayed by the harness
//!
//! ## Quick Start
//!
//! ```rust
//! use nagsim::{SimConfig, VehicleSim};
//!
//! let mut sim = VehicleSim::new(SimConfig::default()).unwrap();
//! sim.start();
//!
//! for report in sim.run(100) {
//!     if let Some(shift) = report.shift {
//!         println!("tick {}: {} -> {}", report.tick, shift.from, shift.to);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`ratio`] - Fixed gear ratio table
//! - [`gearbox`] - Virtual gearbox and its command surface
//! - [`ecus`] - Transmission controller and selector lever ECUs
//! - [`frames`] - Typed bus frame fields
//! - [`mapping`] - Controller state to bus field mapping
//! - [`engine`] - Engine speed collaborator
//! - [`diagnostics`] - Local identifier records
//! - [`harness`] - Tick scheduler owning all components
//! - [`scenario`] - Tick-tagged driver actions

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod config;
pub mod diagnostics;
pub mod ecus;
pub mod engine;
pub mod error;
pub mod frames;
pub mod gearbox;
pub mod harness;
pub mod mapping;
pub mod ratio;
pub mod scenario;

// Re-export main public types for convenience
pub use config::SimConfig;
pub use ecus::{DrivingProgram, Ecu, GearSelector, MoveDir, TickContext, TransmissionController};
pub use engine::{EngineControl, EngineModel};
pub use error::SimError;
pub use frames::SelectorRange;
pub use gearbox::{GearboxInterface, RangeCode, VirtualGear, VirtualGearbox};
pub use harness::{TickReport, VehicleSim};
pub use ratio::{forward_ratio, ForwardGear};
