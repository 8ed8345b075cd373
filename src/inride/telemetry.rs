//! inRide telemetry decoding.
//!
//! All multi-byte fields are little-endian. Unlike Smart Control, the state,
//! calibration result and command result fields degrade to an unknown value
//! instead of failing; lengths and the update rate are still strict.

use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use super::constants::{
    CONFIG_DATA_LEN, POWER_DATA_LEN, PRO_FLYWHEEL_SPINDOWN_SECONDS, ROLLER_DIAMETER_M,
    SPINDOWN_MAX_SECONDS, SPINDOWN_MAX_SECONDS_PRO, SPINDOWN_MIN_SECONDS,
    SPINDOWN_MIN_SECONDS_PRO,
};
use super::types::{
    CalibrationResult, CommandResult, InRideConfigData, InRidePowerData, SensorState, UpdateRate,
};
use crate::error::{KineticError, Result};
use crate::system_id::{SystemId, SYSTEM_ID_LEN};

/// Offset of the system ID echo in the power data
const SYSTEM_ID_OFFSET: usize = POWER_DATA_LEN - SYSTEM_ID_LEN;

fn expect_len(data: &[u8], what: &'static str, expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(KineticError::length(what, expected, data.len()));
    }
    Ok(())
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn millis_to_seconds(raw: u16) -> f64 {
    f64::from(raw) / 1000.0
}

/// Whether a spindown time indicates the lighter pro flywheel.
pub fn is_pro_flywheel(spindown_time: f64) -> bool {
    spindown_time >= PRO_FLYWHEEL_SPINDOWN_SECONDS
}

/// Normalize a spindown time onto 0-1 roller resistance.
///
/// The shortest spindown of the flywheel's range is full resistance.
pub fn roller_resistance(spindown_time: f64, pro_flywheel: bool) -> f64 {
    let (min, max) = if pro_flywheel {
        (SPINDOWN_MIN_SECONDS_PRO, SPINDOWN_MAX_SECONDS_PRO)
    } else {
        (SPINDOWN_MIN_SECONDS, SPINDOWN_MAX_SECONDS)
    };
    ((max - spindown_time) / (max - min)).clamp(0.0, 1.0)
}

/// Roller RPM from one revolution period in microseconds; 0 means stopped.
fn roller_rpm(period_us: u32) -> f64 {
    if period_us == 0 {
        return 0.0;
    }
    60_000_000.0 / f64::from(period_us)
}

fn roller_speed_kph(rpm: f64) -> f64 {
    rpm * PI * ROLLER_DIAMETER_M * 60.0 / 1000.0
}

/// Parse the Power characteristic.
///
/// Layout:
/// - Byte 0: sensor state (high nibble), command result (low nibble)
/// - Byte 1: coasting (bit 7), calibration result (low nibble)
/// - Bytes 2-3: power (W)
/// - Bytes 4-7: roller revolution period (µs)
/// - Byte 8: cadence (RPM)
/// - Bytes 9-10: spindown time (ms)
/// - Bytes 11-12: last spindown result time (ms)
/// - Byte 13: reserved
/// - Bytes 14-19: system ID of the sensor
pub(crate) fn parse_power_data(
    data: &[u8],
    system_id: &SystemId,
    timestamp: DateTime<Utc>,
) -> Result<InRidePowerData> {
    expect_len(data, "power data", POWER_DATA_LEN)?;

    let echoed = &data[SYSTEM_ID_OFFSET..];
    if echoed != system_id.as_bytes() {
        return Err(KineticError::payload(
            "system_id",
            format!("power data is for a different sensor (expected {})", system_id),
        ));
    }

    let state = SensorState::from_raw(data[0] & 0xF0);
    let command_result = CommandResult::from_raw(data[0] & 0x0F);
    let coasting = data[1] & 0x80 != 0;
    let calibration_result = CalibrationResult::from_raw(data[1] & 0x0F);

    let period_us = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let rpm = roller_rpm(period_us);
    let spindown_time = millis_to_seconds(read_u16(data, 9));
    let pro_flywheel = is_pro_flywheel(spindown_time);

    let power = InRidePowerData {
        timestamp,
        state,
        power: read_u16(data, 2),
        speed_kph: roller_speed_kph(rpm),
        roller_rpm: rpm,
        cadence_rpm: f64::from(data[8]),
        coasting,
        spindown_time,
        roller_resistance: roller_resistance(spindown_time, pro_flywheel),
        calibration_result,
        last_spindown_result_time: millis_to_seconds(read_u16(data, 11)),
        pro_flywheel,
        command_result,
    };

    tracing::trace!(
        "inRide {} power: {} W, {:.2} km/h, state {}",
        system_id,
        power.power,
        power.speed_kph,
        power.state
    );

    Ok(power)
}

/// Parse the Config characteristic.
///
/// Layout:
/// - Byte 0: update rate
/// - Bytes 1-2: current spindown time (ms)
/// - Bytes 3-19: reserved
pub(crate) fn parse_config_data(data: &[u8]) -> Result<InRideConfigData> {
    expect_len(data, "config data", CONFIG_DATA_LEN)?;

    let update_rate = UpdateRate::from_raw(data[0]).ok_or_else(|| {
        KineticError::payload("update_rate", format!("unknown update rate {:#04x}", data[0]))
    })?;
    let current_spindown_time = millis_to_seconds(read_u16(data, 1));

    let config = InRideConfigData {
        pro_flywheel: is_pro_flywheel(current_spindown_time),
        current_spindown_time,
        update_rate,
    };

    tracing::trace!(
        "inRide config: {} ms updates, spindown {:.3} s",
        config.update_rate.period_ms(),
        config.current_spindown_time
    );

    Ok(config)
}
