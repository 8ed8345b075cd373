//! Smart Control enumerations and telemetry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constants::ControlOpcode;

/// Resistance mode reported in the power data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ControlMode {
    /// Constant target wattage
    Erg = 0x00,
    /// Simulated fluid trainer
    Fluid = 0x01,
    /// Fixed brake position
    Brake = 0x02,
    /// Road physics simulation
    Simulation = 0x03,
}

impl ControlMode {
    /// Map a raw mode byte; no fallback.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x00 => Some(ControlMode::Erg),
            0x01 => Some(ControlMode::Fluid),
            0x02 => Some(ControlMode::Brake),
            0x03 => Some(ControlMode::Simulation),
            _ => None,
        }
    }
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlMode::Erg => write!(f, "ERG"),
            ControlMode::Fluid => write!(f, "Fluid"),
            ControlMode::Brake => write!(f, "Brake"),
            ControlMode::Simulation => write!(f, "Simulation"),
        }
    }
}

/// Calibration state of the resistance unit.
///
/// Raw values are 0-5 and 10; 6-9 are not used by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CalibrationState {
    NotPerformed = 0,
    Initializing = 1,
    SpeedUp = 2,
    StartCoasting = 3,
    Coasting = 4,
    SpeedUpDetected = 5,
    Complete = 10,
}

impl CalibrationState {
    /// Map a raw calibration state byte; no fallback.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(CalibrationState::NotPerformed),
            1 => Some(CalibrationState::Initializing),
            2 => Some(CalibrationState::SpeedUp),
            3 => Some(CalibrationState::StartCoasting),
            4 => Some(CalibrationState::Coasting),
            5 => Some(CalibrationState::SpeedUpDetected),
            10 => Some(CalibrationState::Complete),
            _ => None,
        }
    }

    /// Whether a calibration run is in progress.
    pub fn is_calibrating(&self) -> bool {
        !matches!(
            self,
            CalibrationState::NotPerformed | CalibrationState::Complete
        )
    }
}

/// Decoded Power characteristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPowerData {
    /// When this data was processed
    pub timestamp: DateTime<Utc>,
    /// Current resistance mode
    pub mode: ControlMode,
    /// Current power in watts
    pub power: u16,
    /// Current speed in km/h
    pub speed_kph: f64,
    /// Current (virtual) cadence in RPM
    pub cadence_rpm: u8,
    /// Wattage the resistance unit is targeting
    pub target_resistance: u16,
}

impl ControlPowerData {
    /// Whether an ERG target has not been picked up by the unit yet.
    ///
    /// True while in ERG mode and the reported target differs from the one the
    /// caller last requested; the command should then be written again.
    pub fn needs_erg_resend(&self, desired_watts: u16) -> bool {
        self.mode == ControlMode::Erg && self.target_resistance != desired_watts
    }
}

/// Decoded Config characteristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfigData {
    /// Power data update rate in Hz
    pub update_rate: u8,
    /// Current calibration state
    pub calibration_state: CalibrationState,
    /// Spindown time applied to the power data (seconds)
    pub spindown_time: f64,
    /// Calibration speed threshold (km/h)
    pub calibration_threshold_kph: f64,
    /// Normalized brake strength from a brake calibration
    pub brake_strength: u8,
    /// Normalized brake offset from a brake calibration
    pub brake_offset: u8,
    /// Brake calibration speed threshold (km/h)
    pub brake_calibration_threshold_kph: f64,
}

/// Resistance mode as reported on the Debug characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugMode {
    Erg,
    Position,
    Simulation,
}

impl DebugMode {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(DebugMode::Erg),
            1 => Some(DebugMode::Position),
            2 => Some(DebugMode::Simulation),
            _ => None,
        }
    }
}

/// Decoded Debug characteristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlDebugData {
    pub mode: DebugMode,
    pub target_resistance: u16,
    pub actual_resistance: u16,
    pub target_position: u16,
    pub actual_position: u16,
    pub temp_sensor: i16,
    pub temp_die: i16,
    pub temp_calculated: u16,
    pub home_accuracy: i16,
    pub ble_build: u8,
}

/// Outcome reported for a control point write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseResult {
    Success,
    NotSupported,
    InvalidParameter,
    OperationFailed,
}

impl ResponseResult {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(ResponseResult::Success),
            0x02 => Some(ResponseResult::NotSupported),
            0x03 => Some(ResponseResult::InvalidParameter),
            0x04 => Some(ResponseResult::OperationFailed),
            _ => None,
        }
    }
}

/// Decoded control point indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPointResponse {
    /// Command the response refers to
    pub request: ControlOpcode,
    /// Outcome of that command
    pub result: ResponseResult,
}
