//! Gated entry points for the Smart Control codec.

use chrono::{DateTime, Utc};

use super::commands::{ControlCommand, SimulationParams};
use super::telemetry;
use super::types::{ControlConfigData, ControlDebugData, ControlPointResponse, ControlPowerData};
use crate::error::Result;
use crate::sdk::AuthGate;
use crate::system_id::SystemId;

/// Smart Control codec.
///
/// Every decoder and builder consults the authorization gate before touching
/// its input. The codec holds no other state; it is `Copy` and can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct KineticControl {
    gate: AuthGate,
}

impl KineticControl {
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
    pub fn decode_power(&self, data: &[u8], system_id: &SystemId) -> Result<ControlPowerData> {
        self.decode_power_at(data, system_id, Utc::now())
    }

    /// Decode a Power characteristic value captured at `timestamp`.
    pub fn decode_power_at(
        &self,
        data: &[u8],
        system_id: &SystemId,
        timestamp: DateTime<Utc>,
    ) -> Result<ControlPowerData> {
        self.gate.check()?;
        telemetry::parse_power_data(data, system_id, timestamp)
    }

    /// Decode a Config characteristic value.
    pub fn decode_config(&self, data: &[u8]) -> Result<ControlConfigData> {
        self.gate.check()?;
        telemetry::parse_config_data(data)
    }

    /// Decode a Debug characteristic value.
    pub fn decode_debug(&self, data: &[u8]) -> Result<ControlDebugData> {
        self.gate.check()?;
        telemetry::parse_debug_data(data)
    }

    /// Decode a control point indication.
    pub fn decode_control_point_response(&self, data: &[u8]) -> Result<ControlPointResponse> {
        self.gate.check()?;
        telemetry::parse_control_point_response(data)
    }

    /// Parse control point bytes back into a typed command.
    pub fn parse_command(&self, data: &[u8]) -> Result<ControlCommand> {
        self.gate.check()?;
        ControlCommand::parse(data)
    }

    /// ERG mode at `target_watts`.
    pub fn build_erg(&self, target_watts: u16) -> Result<Vec<u8>> {
        self.gate.check()?;
        tracing::debug!("Building ERG command: {} W", target_watts);
        Ok(ControlCommand::erg(target_watts).encode())
    }

    /// Fluid mode at `level` (0-9).
    pub fn build_fluid(&self, level: u8) -> Result<Vec<u8>> {
        self.gate.check()?;
        let command = ControlCommand::fluid(level)?;
        tracing::debug!("Building fluid command: level {}", level);
        Ok(command.encode())
    }

    /// Brake mode at `percent` (0.0-1.0) of full resistance.
    pub fn build_brake(&self, percent: f32) -> Result<Vec<u8>> {
        self.gate.check()?;
        let command = ControlCommand::brake(percent)?;
        tracing::debug!("Building brake command: {:.1}%", percent * 100.0);
        Ok(command.encode())
    }

    /// Simulation mode.
    pub fn build_simulation(&self, params: &SimulationParams) -> Result<Vec<u8>> {
        self.gate.check()?;
        let command = ControlCommand::simulation(*params)?;
        tracing::debug!(
            "Building simulation command: {} kg, grade {:.2}%, wind {:.2} m/s",
            params.weight_kg,
            params.grade,
            params.wind_speed_mps
        );
        Ok(command.encode())
    }

    /// Start a calibration; `brake` selects a brake calibration.
    pub fn build_start_calibration(&self, brake: bool) -> Result<Vec<u8>> {
        self.gate.check()?;
        tracing::debug!("Building start calibration command (brake: {})", brake);
        Ok(ControlCommand::start_calibration(brake).encode())
    }

    pub fn build_stop_calibration(&self) -> Result<Vec<u8>> {
        self.gate.check()?;
        tracing::debug!("Building stop calibration command");
        Ok(ControlCommand::stop_calibration().encode())
    }

    /// Change the advertised device name (1-19 bytes).
    pub fn build_device_name(&self, name: &str) -> Result<Vec<u8>> {
        self.gate.check()?;
        let command = ControlCommand::device_name(name)?;
        tracing::debug!("Building device name command: {}", name);
        Ok(command.encode())
    }

    /// Display form of a System ID; not gated.
    pub fn system_id_to_string(system_id: &SystemId) -> String {
        system_id.to_string()
    }
}
