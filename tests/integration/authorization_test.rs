//! Every codec entry point refuses to run behind a rejected or unlaunched gate.

use kinetic_sdk::control::SimulationParams;
use kinetic_sdk::inride::UpdateRate;
use kinetic_sdk::{ApiStatus, AuthGate, KineticControl, KineticError, KineticInRide, SystemId};

const SYSTEM_ID: SystemId = SystemId::new([1, 2, 3, 4, 5, 6]);

/// Run every Control and inRide entry point with otherwise valid input.
fn all_entry_points(gate: AuthGate) -> Vec<(&'static str, Option<KineticError>)> {
    let control = KineticControl::with_gate(gate);
    let inride = KineticInRide::with_gate(gate);

    let mut inride_power = vec![0u8; 14];
    inride_power.extend_from_slice(SYSTEM_ID.as_bytes());
    let mut inride_config = vec![0u8; 20];
    inride_config[0] = 0x20;

    vec![
        ("control.decode_power", control.decode_power(&[0u8; 8], &SYSTEM_ID).err()),
        ("control.decode_config", control.decode_config(&[0u8; 10]).err()),
        ("control.decode_debug", control.decode_debug(&[0u8; 18]).err()),
        (
            "control.decode_control_point_response",
            control.decode_control_point_response(&[0x80, 0x01, 0x01]).err(),
        ),
        ("control.parse_command", control.parse_command(&[0x05]).err()),
        ("control.build_erg", control.build_erg(100).err()),
        ("control.build_fluid", control.build_fluid(3).err()),
        ("control.build_brake", control.build_brake(0.25).err()),
        (
            "control.build_simulation",
            control.build_simulation(&SimulationParams::fluid(2)).err(),
        ),
        (
            "control.build_start_calibration",
            control.build_start_calibration(false).err(),
        ),
        ("control.build_stop_calibration", control.build_stop_calibration().err()),
        ("control.build_device_name", control.build_device_name("Trainer").err()),
        ("inride.decode_power", inride.decode_power(&inride_power, &SYSTEM_ID).err()),
        ("inride.decode_config", inride.decode_config(&inride_config).err()),
        ("inride.parse_command", inride.parse_command(&[0x02, 1, 2, 3, 4, 5, 6]).err()),
        (
            "inride.configure_sensor",
            inride.configure_sensor(&SYSTEM_ID, UpdateRate::Millis250).err(),
        ),
        (
            "inride.configure_sensor_raw",
            inride.configure_sensor_raw(&SYSTEM_ID, 0x10).err(),
        ),
        ("inride.start_calibration", inride.start_calibration(&SYSTEM_ID).err()),
        ("inride.stop_calibration", inride.stop_calibration(&SYSTEM_ID).err()),
        (
            "inride.set_peripheral_name",
            inride.set_peripheral_name(&SYSTEM_ID, "Garage").err(),
        ),
    ]
}

#[test]
fn test_authorized_gate_runs_everything() {
    for (name, err) in all_entry_points(AuthGate::fixed(ApiStatus::Authorized)) {
        assert_eq!(err, None, "{} failed", name);
    }
}

#[test]
fn test_unknown_status_runs_everything() {
    for (name, err) in all_entry_points(AuthGate::fixed(ApiStatus::Unknown)) {
        assert_eq!(err, None, "{} failed", name);
    }
}

#[test]
fn test_rejected_gate_blocks_everything() {
    for (name, err) in all_entry_points(AuthGate::fixed(ApiStatus::Rejected)) {
        assert_eq!(err, Some(KineticError::Unauthorized), "{}", name);
    }
}

#[test]
fn test_uninitialized_gate_blocks_everything() {
    for (name, err) in all_entry_points(AuthGate::uninitialized()) {
        assert_eq!(err, Some(KineticError::NotInitialized), "{}", name);
    }
}

#[test]
fn test_rejection_reported_with_vendor_code() {
    let control = KineticControl::with_gate(AuthGate::fixed(ApiStatus::Rejected));
    let err = control.build_erg(100).unwrap_err();
    assert_eq!(err.code(), 102);
    assert_eq!(err.to_string(), "API key has been rejected");
}
