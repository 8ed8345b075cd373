//! Unit tests for System ID formatting.

use kinetic_sdk::{KineticControl, KineticError, KineticInRide, SystemId};

#[test]
fn test_display_format() {
    let id = SystemId::new([0x00, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E]);
    assert_eq!(id.to_string(), "00:1A:2B:3C:4D:5E");
    assert_eq!(KineticControl::system_id_to_string(&id), "00:1A:2B:3C:4D:5E");
    assert_eq!(KineticInRide::system_id_to_string(&id), "00:1A:2B:3C:4D:5E");
}

#[test]
fn test_from_characteristic_value() {
    let value = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01];
    let id = SystemId::from_slice(&value).unwrap();
    assert_eq!(id.as_bytes(), &value);

    assert!(matches!(
        SystemId::from_slice(&value[..5]),
        Err(KineticError::InvalidLength { expected: 6, actual: 5, .. })
    ));
}

#[test]
fn test_serializes_to_json() {
    let id = SystemId::new([1, 2, 3, 4, 5, 6]);
    let json = serde_json::to_string(&id).unwrap();
    let back: SystemId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
