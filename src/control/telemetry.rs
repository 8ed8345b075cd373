//! Smart Control telemetry decoding.
//!
//! All multi-byte fields are little-endian. Every payload has a fixed size and
//! every enumerated field is strict: an unmapped value is an error.

use chrono::{DateTime, Utc};

use super::constants::{
    ControlOpcode, CONFIG_DATA_LEN, CONTROL_POINT_RESPONSE_CODE, CONTROL_POINT_RESPONSE_LEN,
    DEBUG_DATA_LEN, POWER_DATA_LEN,
};
use super::types::{
    CalibrationState, ControlConfigData, ControlDebugData, ControlMode, ControlPointResponse,
    ControlPowerData, DebugMode, ResponseResult,
};
use crate::error::{KineticError, Result};
use crate::system_id::SystemId;

fn expect_len(data: &[u8], what: &'static str, expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(KineticError::length(what, expected, data.len()));
    }
    Ok(())
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Speed fields are in 0.01 km/h units.
fn centi_kph(raw: u16) -> f64 {
    f64::from(raw) / 100.0
}

/// Parse the Power characteristic.
///
/// Layout:
/// - Byte 0: mode
/// - Bytes 1-2: power (W)
/// - Bytes 3-4: speed (0.01 km/h)
/// - Byte 5: cadence (RPM)
/// - Bytes 6-7: target resistance (W)
pub(crate) fn parse_power_data(
    data: &[u8],
    system_id: &SystemId,
    timestamp: DateTime<Utc>,
) -> Result<ControlPowerData> {
    expect_len(data, "power data", POWER_DATA_LEN)?;

    let mode = ControlMode::from_raw(data[0])
        .ok_or_else(|| KineticError::payload("mode", format!("unknown mode {:#04x}", data[0])))?;

    let power = ControlPowerData {
        timestamp,
        mode,
        power: read_u16(data, 1),
        speed_kph: centi_kph(read_u16(data, 3)),
        cadence_rpm: data[5],
        target_resistance: read_u16(data, 6),
    };

    tracing::trace!(
        "Control {} power: {} W, {:.2} km/h, {} rpm, mode {}",
        system_id,
        power.power,
        power.speed_kph,
        power.cadence_rpm,
        power.mode
    );

    Ok(power)
}

/// Parse the Config characteristic.
///
/// Layout:
/// - Byte 0: update rate (Hz)
/// - Byte 1: calibration state
/// - Bytes 2-3: spindown time (ms)
/// - Bytes 4-5: calibration threshold (0.01 km/h)
/// - Byte 6: brake strength
/// - Byte 7: brake offset
/// - Bytes 8-9: brake calibration threshold (0.01 km/h)
pub(crate) fn parse_config_data(data: &[u8]) -> Result<ControlConfigData> {
    expect_len(data, "config data", CONFIG_DATA_LEN)?;

    let calibration_state = CalibrationState::from_raw(data[1]).ok_or_else(|| {
        KineticError::payload(
            "calibration_state",
            format!("unknown calibration state {}", data[1]),
        )
    })?;

    let config = ControlConfigData {
        update_rate: data[0],
        calibration_state,
        spindown_time: f64::from(read_u16(data, 2)) / 1000.0,
        calibration_threshold_kph: centi_kph(read_u16(data, 4)),
        brake_strength: data[6],
        brake_offset: data[7],
        brake_calibration_threshold_kph: centi_kph(read_u16(data, 8)),
    };

    tracing::trace!(
        "Control config: {} Hz, calibration {:?}, spindown {:.3} s",
        config.update_rate,
        config.calibration_state,
        config.spindown_time
    );

    Ok(config)
}

/// Parse the Debug characteristic.
pub(crate) fn parse_debug_data(data: &[u8]) -> Result<ControlDebugData> {
    expect_len(data, "debug data", DEBUG_DATA_LEN)?;

    let mode = DebugMode::from_raw(data[0]).ok_or_else(|| {
        KineticError::payload("debug_mode", format!("unknown debug mode {:#04x}", data[0]))
    })?;

    Ok(ControlDebugData {
        mode,
        target_resistance: read_u16(data, 1),
        actual_resistance: read_u16(data, 3),
        target_position: read_u16(data, 5),
        actual_position: read_u16(data, 7),
        temp_sensor: read_i16(data, 9),
        temp_die: read_i16(data, 11),
        temp_calculated: read_u16(data, 13),
        home_accuracy: read_i16(data, 15),
        ble_build: data[17],
    })
}

/// Parse a control point indication: `[0x80, request opcode, result]`.
pub(crate) fn parse_control_point_response(data: &[u8]) -> Result<ControlPointResponse> {
    expect_len(data, "control point response", CONTROL_POINT_RESPONSE_LEN)?;

    if data[0] != CONTROL_POINT_RESPONSE_CODE {
        return Err(KineticError::payload(
            "response_code",
            format!("expected {:#04x}, got {:#04x}", CONTROL_POINT_RESPONSE_CODE, data[0]),
        ));
    }

    let request = ControlOpcode::from_raw(data[1]).ok_or_else(|| {
        KineticError::payload("request", format!("unknown opcode {:#04x}", data[1]))
    })?;
    let result = ResponseResult::from_raw(data[2]).ok_or_else(|| {
        KineticError::payload("result", format!("unknown result {:#04x}", data[2]))
    })?;

    Ok(ControlPointResponse { request, result })
}
