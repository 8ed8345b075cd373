//! Unit tests for inRide telemetry decoding, commands and spindown tracking.

use chrono::Utc;
use kinetic_sdk::inride::{
    CalibrationResult, CommandResult, InRideCommand, KineticInRide, SensorState, SpindownTracker,
    UpdateRate,
};
use kinetic_sdk::{ApiStatus, AuthGate, KineticError, SystemId};

const SYSTEM_ID: SystemId = SystemId::new([0xC0, 0xFF, 0xEE, 0x00, 0x12, 0x34]);

fn inride() -> KineticInRide {
    KineticInRide::with_gate(AuthGate::fixed(ApiStatus::Authorized))
}

/// Power notification with the given state byte, calibration byte and
/// last spindown result (ms).
fn power_frame(state: u8, calibration: u8, last_ms: u16) -> Vec<u8> {
    let mut data = vec![state, calibration];
    data.extend_from_slice(&210u16.to_le_bytes());
    data.extend_from_slice(&25_000u32.to_le_bytes());
    data.push(88);
    data.extend_from_slice(&1_800u16.to_le_bytes());
    data.extend_from_slice(&last_ms.to_le_bytes());
    data.push(0x00);
    data.extend_from_slice(SYSTEM_ID.as_bytes());
    data
}

#[test]
fn test_decode_power_normal() {
    let power = inride()
        .decode_power(&power_frame(0x00, 0x00, 0), &SYSTEM_ID)
        .unwrap();

    assert_eq!(power.state, SensorState::Normal);
    assert_eq!(power.command_result, CommandResult::None);
    assert_eq!(power.calibration_result, CalibrationResult::Unknown);
    assert_eq!(power.power, 210);
    // 25 ms per revolution = 2400 rpm
    assert!((power.roller_rpm - 2400.0).abs() < 1e-9);
    assert!((power.speed_kph - 25.854).abs() < 0.001);
    assert!((power.spindown_time - 1.8).abs() < 1e-9);
    assert!((power.roller_resistance - 0.4).abs() < 1e-9);
}

#[test]
fn test_decode_power_every_state() {
    let cases = [
        (0x00, SensorState::Normal),
        (0x10, SensorState::SpindownIdle),
        (0x20, SensorState::SpindownReady),
        (0x30, SensorState::SpindownActive),
        (0x40, SensorState::Unknown),
        (0xF0, SensorState::Unknown),
    ];
    for (raw, expected) in cases {
        let power = inride()
            .decode_power(&power_frame(raw, 0x00, 0), &SYSTEM_ID)
            .unwrap();
        assert_eq!(power.state, expected, "state byte {:#04x}", raw);
    }
}

#[test]
fn test_decode_power_command_results() {
    let cases = [
        (0x01, CommandResult::Success),
        (0x02, CommandResult::NotSupported),
        (0x03, CommandResult::InvalidRequest),
        (0x0A, CommandResult::CalibrationResult),
        (0x0F, CommandResult::UnknownError),
        (0x05, CommandResult::UnknownError),
    ];
    for (raw, expected) in cases {
        let power = inride()
            .decode_power(&power_frame(raw, 0x00, 0), &SYSTEM_ID)
            .unwrap();
        assert_eq!(power.command_result, expected);
    }
}

#[test]
fn test_decode_power_length_checked() {
    let mut data = power_frame(0x00, 0x00, 0);
    data.pop();
    assert!(matches!(
        inride().decode_power(&data, &SYSTEM_ID),
        Err(KineticError::InvalidLength { expected: 20, actual: 19, .. })
    ));
}

#[test]
fn test_decode_config_one_byte_short() {
    let data = [0x20; 19];
    assert!(matches!(
        inride().decode_config(&data),
        Err(KineticError::InvalidLength { .. })
    ));
}

#[test]
fn test_decode_config_rates() {
    for (raw, rate) in [
        (0x20, UpdateRate::Millis1000),
        (0x10, UpdateRate::Millis500),
        (0x08, UpdateRate::Millis250),
    ] {
        let mut data = [0u8; 20];
        data[0] = raw;
        assert_eq!(inride().decode_config(&data).unwrap().update_rate, rate);
    }
}

#[test]
fn test_peripheral_name_lengths() {
    assert!(matches!(
        inride().set_peripheral_name(&SYSTEM_ID, "ab"),
        Err(KineticError::InvalidParameter { field: "name", .. })
    ));
    assert!(matches!(
        inride().set_peripheral_name(&SYSTEM_ID, "abcdefghi"),
        Err(KineticError::InvalidParameter { field: "name", .. })
    ));
    assert!(inride().set_peripheral_name(&SYSTEM_ID, "abc").is_ok());
    assert!(inride().set_peripheral_name(&SYSTEM_ID, "abcdefgh").is_ok());
}

#[test]
fn test_commands_embed_system_id() {
    let codec = inride();
    let commands = [
        codec.configure_sensor(&SYSTEM_ID, UpdateRate::Millis500).unwrap(),
        codec.configure_sensor_raw(&SYSTEM_ID, 0x08).unwrap(),
        codec.start_calibration(&SYSTEM_ID).unwrap(),
        codec.stop_calibration(&SYSTEM_ID).unwrap(),
        codec.set_peripheral_name(&SYSTEM_ID, "Garage").unwrap(),
    ];
    for bytes in &commands {
        assert_eq!(&bytes[1..7], SYSTEM_ID.as_bytes());
    }

    match codec.parse_command(&commands[1]).unwrap() {
        InRideCommand::ConfigureSensor { update_rate, .. } => {
            assert_eq!(update_rate, UpdateRate::Millis250)
        }
        other => panic!("expected configure sensor, got {:?}", other),
    }
}

#[test]
fn test_configure_sensor_raw_rejects_other_rates() {
    for raw in [0x00, 0x04, 0x18, 0x40, 0xFF] {
        assert!(matches!(
            inride().configure_sensor_raw(&SYSTEM_ID, raw),
            Err(KineticError::InvalidParameter { .. })
        ));
    }
}

#[test]
fn test_tracker_follows_decoded_frames() {
    let codec = inride();
    let mut tracker = SpindownTracker::new();

    let frames = [
        power_frame(0x10, 0x00, 0),
        power_frame(0x20, 0x00, 0),
        power_frame(0x30, 0x80, 0),
        // Back in Normal, success, 1.800 s
        power_frame(0x0A, 0x01, 1_800),
        power_frame(0x00, 0x01, 1_800),
    ];

    let outcomes: Vec<_> = frames
        .iter()
        .map(|frame| {
            let power = codec
                .decode_power_at(frame, &SYSTEM_ID, Utc::now())
                .unwrap();
            tracker.observe(&power)
        })
        .collect();

    assert!(outcomes[..3].iter().all(Option::is_none));
    let outcome = outcomes[3].unwrap();
    assert_eq!(outcome.result, CalibrationResult::Success);
    assert!((outcome.spindown_time - 1.8).abs() < 1e-9);
    assert!(outcomes[4].is_none());
    assert!(tracker.can_start_calibration());
    assert!((tracker.last_successful_spindown() - 1.8).abs() < 1e-9);
}
