//! inRide enumerations and telemetry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sensor state machine, carried in the high nibble of the first power byte.
///
/// Normal → SpindownIdle → SpindownReady → SpindownActive → Normal. The
/// firmware drives the transitions; any unrecognized value is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorState {
    /// Reporting power
    Normal,
    /// Waiting for the rider to exceed the calibration speed
    SpindownIdle,
    /// Speed reached; waiting for the rider to coast
    SpindownReady,
    /// Spindown timer running
    SpindownActive,
    Unknown,
}

impl SensorState {
    /// Map the state nibble (already shifted into the high nibble).
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => SensorState::Normal,
            0x10 => SensorState::SpindownIdle,
            0x20 => SensorState::SpindownReady,
            0x30 => SensorState::SpindownActive,
            _ => SensorState::Unknown,
        }
    }
}

impl std::fmt::Display for SensorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorState::Normal => write!(f, "Normal"),
            SensorState::SpindownIdle => write!(f, "Spindown Idle"),
            SensorState::SpindownReady => write!(f, "Spindown Ready"),
            SensorState::SpindownActive => write!(f, "Spindown Active"),
            SensorState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Outcome of the last spindown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationResult {
    Unknown,
    Success,
    /// Loosen the roller and calibrate again
    TooFast,
    /// Tighten the roller and calibrate again
    TooSlow,
    /// Loosen the roller on a pro flywheel, tighten it otherwise, then
    /// calibrate again
    Middle,
}

impl CalibrationResult {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => CalibrationResult::Success,
            2 => CalibrationResult::TooFast,
            3 => CalibrationResult::TooSlow,
            4 => CalibrationResult::Middle,
            _ => CalibrationResult::Unknown,
        }
    }
}

/// Outcome of the most recently issued command, repeated until superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandResult {
    None,
    Success,
    NotSupported,
    InvalidRequest,
    CalibrationResult,
    UnknownError,
}

impl CommandResult {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => CommandResult::None,
            0x01 => CommandResult::Success,
            0x02 => CommandResult::NotSupported,
            0x03 => CommandResult::InvalidRequest,
            0x0A => CommandResult::CalibrationResult,
            _ => CommandResult::UnknownError,
        }
    }
}

/// Power data broadcast period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum UpdateRate {
    Millis1000 = 0x20,
    Millis500 = 0x10,
    Millis250 = 0x08,
}

impl UpdateRate {
    /// Map a raw rate byte; no fallback.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x20 => Some(UpdateRate::Millis1000),
            0x10 => Some(UpdateRate::Millis500),
            0x08 => Some(UpdateRate::Millis250),
            _ => None,
        }
    }

    /// Broadcast period in milliseconds.
    pub fn period_ms(&self) -> u32 {
        match self {
            UpdateRate::Millis1000 => 1000,
            UpdateRate::Millis500 => 500,
            UpdateRate::Millis250 => 250,
        }
    }
}

/// Decoded Power characteristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InRidePowerData {
    /// When this data was processed
    pub timestamp: DateTime<Utc>,
    pub state: SensorState,
    /// Current power in watts
    pub power: u16,
    /// Current speed in km/h
    pub speed_kph: f64,
    /// Roller speed in RPM
    pub roller_rpm: f64,
    /// Current (virtual) cadence in RPM
    pub cadence_rpm: f64,
    /// Rider is coasting
    pub coasting: bool,
    /// Spindown time applied to the power calculation (s)
    pub spindown_time: f64,
    /// Roller resistance normalized to 0-1
    pub roller_resistance: f64,
    pub calibration_result: CalibrationResult,
    /// Spindown time produced by the last calibration (s)
    pub last_spindown_result_time: f64,
    /// Pro (lighter) flywheel detected
    pub pro_flywheel: bool,
    pub command_result: CommandResult,
}

/// Decoded Config characteristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InRideConfigData {
    /// Pro (lighter) flywheel detected
    pub pro_flywheel: bool,
    /// Spindown time applied to the power calculation (s)
    pub current_spindown_time: f64,
    pub update_rate: UpdateRate,
}
