//! Gated entry points for the inRide codec.

use chrono::{DateTime, Utc};

use super::commands::InRideCommand;
use super::constants::CALIBRATION_READY_SPEED_KPH;
use super::telemetry;
use super::types::{InRideConfigData, InRidePowerData, UpdateRate};
use crate::error::Result;
use crate::sdk::AuthGate;
use crate::system_id::SystemId;

/// inRide codec.
///
/// Every decoder and builder consults the authorization gate first.
#[derive(Debug, Clone, Copy, Default)]
pub struct KineticInRide {
    gate: AuthGate,
}

impl KineticInRide {
    /// Codec gated on the process-wide SDK status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec gated on an injected status.
    pub fn with_gate(gate: AuthGate) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> AuthGate {
        self.gate
    }

    /// Decode a Power characteristic value, stamped with the current time.
    ///
    /// Fails with `InvalidPayload` if the data was sent by a different sensor.
    pub fn decode_power(&self, data: &[u8], system_id: &SystemId) -> Result<InRidePowerData> {
        self.decode_power_at(data, system_id, Utc::now())
    }

    pub fn decode_power_at(
        &self,
        data: &[u8],
        system_id: &SystemId,
        timestamp: DateTime<Utc>,
    ) -> Result<InRidePowerData> {
        self.gate.check()?;
        telemetry::parse_power_data(data, system_id, timestamp)
    }

    /// Decode a Config characteristic value.
    pub fn decode_config(&self, data: &[u8]) -> Result<InRideConfigData> {
        self.gate.check()?;
        telemetry::parse_config_data(data)
    }

    /// Parse control point bytes back into a typed command.
    pub fn parse_command(&self, data: &[u8]) -> Result<InRideCommand> {
        self.gate.check()?;
        InRideCommand::parse(data)
    }

    /// Change the power data update rate.
    pub fn configure_sensor(&self, system_id: &SystemId, rate: UpdateRate) -> Result<Vec<u8>> {
        self.gate.check()?;
        tracing::debug!("Configuring inRide {}: {} ms updates", system_id, rate.period_ms());
        Ok(InRideCommand::configure_sensor(*system_id, rate).encode())
    }

    /// Change the power data update rate from a raw rate byte (0x20, 0x10, 0x08).
    pub fn configure_sensor_raw(&self, system_id: &SystemId, raw_rate: u8) -> Result<Vec<u8>> {
        self.gate.check()?;
        let command = InRideCommand::configure_sensor_raw(*system_id, raw_rate)?;
        tracing::debug!("Configuring inRide {}: rate {:#04x}", system_id, raw_rate);
        Ok(command.encode())
    }

    pub fn start_calibration(&self, system_id: &SystemId) -> Result<Vec<u8>> {
        self.gate.check()?;
        tracing::debug!("Starting inRide {} calibration", system_id);
        Ok(InRideCommand::start_calibration(*system_id).encode())
    }

    pub fn stop_calibration(&self, system_id: &SystemId) -> Result<Vec<u8>> {
        self.gate.check()?;
        tracing::debug!("Stopping inRide {} calibration", system_id);
        Ok(InRideCommand::stop_calibration(*system_id).encode())
    }

    /// Rename the sensor (3-8 ASCII characters).
    pub fn set_peripheral_name(&self, system_id: &SystemId, name: &str) -> Result<Vec<u8>> {
        self.gate.check()?;
        let command = InRideCommand::set_peripheral_name(*system_id, name)?;
        tracing::debug!("Renaming inRide {} to {}", system_id, name);
        Ok(command.encode())
    }

    /// Speed (km/h) the rider must exceed before coasting into a spindown.
    pub fn calibration_ready_speed_kph() -> f64 {
        CALIBRATION_READY_SPEED_KPH
    }

    /// Display form of a System ID; not gated.
    pub fn system_id_to_string(system_id: &SystemId) -> String {
        system_id.to_string()
    }
}
