//! Smart Control command encoding.
//!
//! Commands are written to the Control Point characteristic (with response).
//! Parameters are validated before any bytes are produced; multi-byte fields
//! are little-endian, matching the telemetry payloads.

use serde::{Deserialize, Serialize};

use super::constants::{
    ControlOpcode, DEVICE_NAME_MAX_LEN, FLUID_MAX_LEVEL, FLUID_ROLLING_COEFF, FLUID_WEIGHT_KG,
    FLUID_WIND_COEFF, FLUID_WIND_SPEED_MPS, MAX_GRADE_PERCENT,
};
use crate::error::{KineticError, Result};

/// Weight is sent in 0.01 kg units.
const WEIGHT_SCALE: f32 = 100.0;
/// Rolling resistance coefficient is sent in 0.00001 units.
const ROLLING_SCALE: f32 = 100_000.0;
/// Wind resistance coefficient is sent in 0.001 units.
const WIND_COEFF_SCALE: f32 = 1000.0;
/// Grade is sent in 0.01 % units.
const GRADE_SCALE: f32 = 100.0;
/// Wind speed is sent in 0.01 m/s units.
const WIND_SPEED_SCALE: f32 = 100.0;

const MAX_WEIGHT_KG: f32 = u16::MAX as f32 / WEIGHT_SCALE;
const MAX_ROLLING_COEFF: f32 = u16::MAX as f32 / ROLLING_SCALE;
const MAX_WIND_COEFF: f32 = u16::MAX as f32 / WIND_COEFF_SCALE;
const MIN_WIND_SPEED_MPS: f32 = i16::MIN as f32 / WIND_SPEED_SCALE;
const MAX_WIND_SPEED_MPS: f32 = i16::MAX as f32 / WIND_SPEED_SCALE;

/// Parameters of the Simulation mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Rider + bike weight in kg
    pub weight_kg: f32,
    /// Rolling resistance coefficient (0.004 for asphalt)
    pub rolling_coeff: f32,
    /// Wind resistance coefficient (0.6 default)
    pub wind_coeff: f32,
    /// Grade of the simulated hill in percent (-45 to 45)
    pub grade: f32,
    /// Head (positive) or tail (negative) wind speed in m/s
    pub wind_speed_mps: f32,
}

impl SimulationParams {
    /// Parameters equivalent to fluid level `level` (grade = level %).
    pub fn fluid(level: u8) -> Self {
        Self {
            weight_kg: FLUID_WEIGHT_KG,
            rolling_coeff: FLUID_ROLLING_COEFF,
            wind_coeff: FLUID_WIND_COEFF,
            grade: f32::from(level),
            wind_speed_mps: FLUID_WIND_SPEED_MPS,
        }
    }

    /// Check every field against its documented and encodable range.
    pub fn validate(&self) -> Result<()> {
        check_finite("weight_kg", self.weight_kg)?;
        if self.weight_kg <= 0.0 || self.weight_kg > MAX_WEIGHT_KG {
            return Err(KineticError::parameter(
                "weight_kg",
                format!("{} must be > 0 and <= {}", self.weight_kg, MAX_WEIGHT_KG),
            ));
        }

        check_finite("rolling_coeff", self.rolling_coeff)?;
        if !(0.0..=MAX_ROLLING_COEFF).contains(&self.rolling_coeff) {
            return Err(KineticError::parameter(
                "rolling_coeff",
                format!("{} must be between 0 and {}", self.rolling_coeff, MAX_ROLLING_COEFF),
            ));
        }

        check_finite("wind_coeff", self.wind_coeff)?;
        if !(0.0..=MAX_WIND_COEFF).contains(&self.wind_coeff) {
            return Err(KineticError::parameter(
                "wind_coeff",
                format!("{} must be between 0 and {}", self.wind_coeff, MAX_WIND_COEFF),
            ));
        }

        check_finite("grade", self.grade)?;
        if !(-MAX_GRADE_PERCENT..=MAX_GRADE_PERCENT).contains(&self.grade) {
            return Err(KineticError::parameter(
                "grade",
                format!(
                    "{} must be between {} and {}",
                    self.grade, -MAX_GRADE_PERCENT, MAX_GRADE_PERCENT
                ),
            ));
        }

        check_finite("wind_speed_mps", self.wind_speed_mps)?;
        if !(MIN_WIND_SPEED_MPS..=MAX_WIND_SPEED_MPS).contains(&self.wind_speed_mps) {
            return Err(KineticError::parameter(
                "wind_speed_mps",
                format!(
                    "{} must be between {} and {}",
                    self.wind_speed_mps, MIN_WIND_SPEED_MPS, MAX_WIND_SPEED_MPS
                ),
            ));
        }

        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(KineticError::parameter(field, format!("{} is not a finite number", value)));
    }
    Ok(())
}

/// A typed control point command.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// Hold `target_watts` regardless of cadence and speed
    SetErg { target_watts: u16 },
    /// Hold the brake at `position` (0 = open, 65535 = full)
    SetBrake { position: u16 },
    /// Simulate road physics
    SetSimulation(SimulationParams),
    /// Start calibration; `brake` selects a brake calibration
    StartCalibration { brake: bool },
    /// Abort a running calibration
    StopCalibration,
    /// Change the advertised device name
    SetDeviceName(String),
}

impl ControlCommand {
    /// ERG mode at a target wattage. Every 16-bit value is valid.
    pub(crate) fn erg(target_watts: u16) -> Self {
        ControlCommand::SetErg { target_watts }
    }

    /// Fluid mode, expressed as a Simulation command.
    pub(crate) fn fluid(level: u8) -> Result<Self> {
        if level > FLUID_MAX_LEVEL {
            return Err(KineticError::parameter(
                "level",
                format!("{} must be between 0 and {}", level, FLUID_MAX_LEVEL),
            ));
        }
        Self::simulation(SimulationParams::fluid(level))
    }

    /// Brake mode at `percent` (0-1) of full resistance.
    pub(crate) fn brake(percent: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&percent) {
            return Err(KineticError::parameter(
                "percent",
                format!("{} must be between 0.0 and 1.0", percent),
            ));
        }
        let position = (percent * f32::from(u16::MAX)).round() as u16;
        Ok(ControlCommand::SetBrake { position })
    }

    pub(crate) fn simulation(params: SimulationParams) -> Result<Self> {
        params.validate()?;
        Ok(ControlCommand::SetSimulation(params))
    }

    pub(crate) fn start_calibration(brake: bool) -> Self {
        ControlCommand::StartCalibration { brake }
    }

    pub(crate) fn stop_calibration() -> Self {
        ControlCommand::StopCalibration
    }

    pub(crate) fn device_name(name: &str) -> Result<Self> {
        if name.is_empty() || name.len() > DEVICE_NAME_MAX_LEN {
            return Err(KineticError::parameter(
                "device_name",
                format!(
                    "'{}' is {} bytes, must be 1 to {}",
                    name,
                    name.len(),
                    DEVICE_NAME_MAX_LEN
                ),
            ));
        }
        Ok(ControlCommand::SetDeviceName(name.to_string()))
    }

    /// Opcode this command is sent with.
    pub fn opcode(&self) -> ControlOpcode {
        match self {
            ControlCommand::SetErg { .. } => ControlOpcode::SetErg,
            ControlCommand::SetBrake { .. } => ControlOpcode::SetBrake,
            ControlCommand::SetSimulation(_) => ControlOpcode::SetSimulation,
            ControlCommand::StartCalibration { .. } => ControlOpcode::StartCalibration,
            ControlCommand::StopCalibration => ControlOpcode::StopCalibration,
            ControlCommand::SetDeviceName(_) => ControlOpcode::SetDeviceName,
        }
    }

    /// Serialize to control point bytes. Only called on validated commands.
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut cmd = vec![self.opcode() as u8];
        match self {
            ControlCommand::SetErg { target_watts } => {
                cmd.extend_from_slice(&target_watts.to_le_bytes());
            }
            ControlCommand::SetBrake { position } => {
                cmd.extend_from_slice(&position.to_le_bytes());
            }
            ControlCommand::SetSimulation(params) => {
                let weight = (params.weight_kg * WEIGHT_SCALE).round() as u16;
                let rolling = (params.rolling_coeff * ROLLING_SCALE).round() as u16;
                let wind_coeff = (params.wind_coeff * WIND_COEFF_SCALE).round() as u16;
                let grade = (params.grade * GRADE_SCALE).round() as i16;
                let wind_speed = (params.wind_speed_mps * WIND_SPEED_SCALE).round() as i16;

                cmd.extend_from_slice(&weight.to_le_bytes());
                cmd.extend_from_slice(&rolling.to_le_bytes());
                cmd.extend_from_slice(&wind_coeff.to_le_bytes());
                cmd.extend_from_slice(&grade.to_le_bytes());
                cmd.extend_from_slice(&wind_speed.to_le_bytes());
            }
            ControlCommand::StartCalibration { brake } => {
                cmd.push(u8::from(*brake));
            }
            ControlCommand::StopCalibration => {}
            ControlCommand::SetDeviceName(name) => {
                cmd.extend_from_slice(name.as_bytes());
            }
        }
        cmd
    }

    /// Parse control point bytes back into a command.
    pub(crate) fn parse(data: &[u8]) -> Result<Self> {
        let (&raw_opcode, body) = data
            .split_first()
            .ok_or_else(|| KineticError::length("control command", 1, 0))?;

        let opcode = ControlOpcode::from_raw(raw_opcode).ok_or_else(|| {
            KineticError::payload("opcode", format!("unknown opcode {:#04x}", raw_opcode))
        })?;

        let expect_body = |expected: usize| -> Result<()> {
            if body.len() != expected {
                return Err(KineticError::length(
                    "control command",
                    expected + 1,
                    data.len(),
                ));
            }
            Ok(())
        };

        let command = match opcode {
            ControlOpcode::SetErg => {
                expect_body(2)?;
                ControlCommand::SetErg {
                    target_watts: u16::from_le_bytes([body[0], body[1]]),
                }
            }
            ControlOpcode::SetBrake => {
                expect_body(2)?;
                ControlCommand::SetBrake {
                    position: u16::from_le_bytes([body[0], body[1]]),
                }
            }
            ControlOpcode::SetSimulation => {
                expect_body(10)?;
                let weight = u16::from_le_bytes([body[0], body[1]]);
                let rolling = u16::from_le_bytes([body[2], body[3]]);
                let wind_coeff = u16::from_le_bytes([body[4], body[5]]);
                let grade = i16::from_le_bytes([body[6], body[7]]);
                let wind_speed = i16::from_le_bytes([body[8], body[9]]);
                ControlCommand::SetSimulation(SimulationParams {
                    weight_kg: f32::from(weight) / WEIGHT_SCALE,
                    rolling_coeff: f32::from(rolling) / ROLLING_SCALE,
                    wind_coeff: f32::from(wind_coeff) / WIND_COEFF_SCALE,
                    grade: f32::from(grade) / GRADE_SCALE,
                    wind_speed_mps: f32::from(wind_speed) / WIND_SPEED_SCALE,
                })
            }
            ControlOpcode::StartCalibration => {
                expect_body(1)?;
                match body[0] {
                    0 => ControlCommand::StartCalibration { brake: false },
                    1 => ControlCommand::StartCalibration { brake: true },
                    other => {
                        return Err(KineticError::payload(
                            "brake",
                            format!("calibration flag must be 0 or 1, got {}", other),
                        ))
                    }
                }
            }
            ControlOpcode::StopCalibration => {
                expect_body(0)?;
                ControlCommand::StopCalibration
            }
            ControlOpcode::SetDeviceName => {
                if body.is_empty() || body.len() > DEVICE_NAME_MAX_LEN {
                    return Err(KineticError::payload(
                        "device_name",
                        format!("{} bytes, must be 1 to {}", body.len(), DEVICE_NAME_MAX_LEN),
                    ));
                }
                let name = std::str::from_utf8(body)
                    .map_err(|e| KineticError::payload("device_name", e.to_string()))?;
                ControlCommand::SetDeviceName(name.to_string())
            }
        };

        Ok(command)
    }
}
