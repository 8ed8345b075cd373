//! inRide command encoding.
//!
//! Several sensors can share one control channel, so every command names its
//! target: `[opcode][system ID][payload]`.

use super::constants::{InRideOpcode, PERIPHERAL_NAME_MAX_LEN, PERIPHERAL_NAME_MIN_LEN};
use super::types::UpdateRate;
use crate::error::{KineticError, Result};
use crate::system_id::{SystemId, SYSTEM_ID_LEN};

/// A typed control point command for one sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InRideCommand {
    /// Change the power data update rate
    ConfigureSensor {
        system_id: SystemId,
        update_rate: UpdateRate,
    },
    /// Enter the spindown state machine
    StartCalibration { system_id: SystemId },
    /// Leave the spindown state machine
    StopCalibration { system_id: SystemId },
    /// Change the advertised name
    SetPeripheralName { system_id: SystemId, name: String },
}

impl InRideCommand {
    pub(crate) fn configure_sensor(system_id: SystemId, update_rate: UpdateRate) -> Self {
        InRideCommand::ConfigureSensor {
            system_id,
            update_rate,
        }
    }

    /// Configure from a raw update rate byte.
    pub(crate) fn configure_sensor_raw(system_id: SystemId, raw_rate: u8) -> Result<Self> {
        let update_rate = UpdateRate::from_raw(raw_rate).ok_or_else(|| {
            KineticError::parameter(
                "update_rate",
                format!("{:#04x} is not one of 0x20, 0x10, 0x08", raw_rate),
            )
        })?;
        Ok(Self::configure_sensor(system_id, update_rate))
    }

    pub(crate) fn start_calibration(system_id: SystemId) -> Self {
        InRideCommand::StartCalibration { system_id }
    }

    pub(crate) fn stop_calibration(system_id: SystemId) -> Self {
        InRideCommand::StopCalibration { system_id }
    }

    /// Name must be 3 to 8 ASCII characters.
    pub(crate) fn set_peripheral_name(system_id: SystemId, name: &str) -> Result<Self> {
        check_name(name).map_err(|reason| KineticError::parameter("name", reason))?;
        Ok(InRideCommand::SetPeripheralName {
            system_id,
            name: name.to_string(),
        })
    }

    pub fn opcode(&self) -> InRideOpcode {
        match self {
            InRideCommand::ConfigureSensor { .. } => InRideOpcode::ConfigureSensor,
            InRideCommand::StartCalibration { .. } => InRideOpcode::StartCalibration,
            InRideCommand::StopCalibration { .. } => InRideOpcode::StopCalibration,
            InRideCommand::SetPeripheralName { .. } => InRideOpcode::SetPeripheralName,
        }
    }

    /// Sensor the command is addressed to.
    pub fn system_id(&self) -> &SystemId {
        match self {
            InRideCommand::ConfigureSensor { system_id, .. }
            | InRideCommand::StartCalibration { system_id }
            | InRideCommand::StopCalibration { system_id }
            | InRideCommand::SetPeripheralName { system_id, .. } => system_id,
        }
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut cmd = Vec::with_capacity(1 + SYSTEM_ID_LEN + PERIPHERAL_NAME_MAX_LEN);
        cmd.push(self.opcode() as u8);
        cmd.extend_from_slice(self.system_id().as_bytes());
        match self {
            InRideCommand::ConfigureSensor { update_rate, .. } => cmd.push(*update_rate as u8),
            InRideCommand::StartCalibration { .. } | InRideCommand::StopCalibration { .. } => {}
            InRideCommand::SetPeripheralName { name, .. } => {
                cmd.extend_from_slice(name.as_bytes())
            }
        }
        cmd
    }

    pub(crate) fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 1 + SYSTEM_ID_LEN {
            return Err(KineticError::length(
                "inRide command",
                1 + SYSTEM_ID_LEN,
                data.len(),
            ));
        }

        let opcode = InRideOpcode::from_raw(data[0]).ok_or_else(|| {
            KineticError::payload("opcode", format!("unknown opcode {:#04x}", data[0]))
        })?;
        let system_id = SystemId::from_slice(&data[1..=SYSTEM_ID_LEN])?;
        let body = &data[1 + SYSTEM_ID_LEN..];

        let expect_body = |expected: usize| -> Result<()> {
            if body.len() != expected {
                return Err(KineticError::length(
                    "inRide command",
                    1 + SYSTEM_ID_LEN + expected,
                    data.len(),
                ));
            }
            Ok(())
        };

        let command = match opcode {
            InRideOpcode::ConfigureSensor => {
                expect_body(1)?;
                let update_rate = UpdateRate::from_raw(body[0]).ok_or_else(|| {
                    KineticError::payload(
                        "update_rate",
                        format!("unknown update rate {:#04x}", body[0]),
                    )
                })?;
                Self::configure_sensor(system_id, update_rate)
            }
            InRideOpcode::StartCalibration => {
                expect_body(0)?;
                Self::start_calibration(system_id)
            }
            InRideOpcode::StopCalibration => {
                expect_body(0)?;
                Self::stop_calibration(system_id)
            }
            InRideOpcode::SetPeripheralName => {
                let name = std::str::from_utf8(body)
                    .map_err(|e| KineticError::payload("name", e.to_string()))?;
                check_name(name).map_err(|reason| KineticError::payload("name", reason))?;
                InRideCommand::SetPeripheralName {
                    system_id,
                    name: name.to_string(),
                }
            }
        };

        Ok(command)
    }
}

fn check_name(name: &str) -> std::result::Result<(), String> {
    if !name.is_ascii() {
        return Err(format!("'{}' must be ASCII", name));
    }
    if !(PERIPHERAL_NAME_MIN_LEN..=PERIPHERAL_NAME_MAX_LEN).contains(&name.len()) {
        return Err(format!(
            "'{}' is {} characters, must be {} to {}",
            name,
            name.len(),
            PERIPHERAL_NAME_MIN_LEN,
            PERIPHERAL_NAME_MAX_LEN
        ));
    }
    Ok(())
}
