//! inRide power sensor: telemetry decoding, command encoding and calibration tracking.

pub mod calibration;
pub mod codec;
pub mod commands;
pub mod constants;
pub mod telemetry;
pub mod types;

pub use calibration::{CalibrationOutcome, SpindownTracker};
pub use codec::KineticInRide;
pub use commands::InRideCommand;
pub use constants::InRideOpcode;
pub use types::{
    CalibrationResult, CommandResult, InRideConfigData, InRidePowerData, SensorState, UpdateRate,
};
