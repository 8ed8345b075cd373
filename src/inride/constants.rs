//! inRide service identifiers, payload sizes and calibration references.

use uuid::Uuid;

/// inRide Power Service UUID
pub const POWER_SERVICE_UUID: Uuid = Uuid::from_u128(0xe941_0100_b434_446b_b5cc_3659_2fc4_c724);

/// Power Characteristic UUID (broadcasts power data)
pub const POWER_UUID: Uuid = Uuid::from_u128(0xe941_0101_b434_446b_b5cc_3659_2fc4_c724);

/// Control Point Characteristic UUID
pub const CONTROL_POINT_UUID: Uuid = Uuid::from_u128(0xe941_0102_b434_446b_b5cc_3659_2fc4_c724);

/// Configuration Characteristic UUID
pub const CONFIG_UUID: Uuid = Uuid::from_u128(0xe941_0104_b434_446b_b5cc_3659_2fc4_c724);

/// Device Information Service UUID (0x180A)
pub const DEVICE_INFORMATION_UUID: Uuid =
    Uuid::from_u128(0x0000_180a_0000_1000_8000_0080_5f9b_34fb);

/// System ID Characteristic UUID (0x2A23)
pub const SYSTEM_ID_UUID: Uuid = Uuid::from_u128(0x0000_2a23_0000_1000_8000_0080_5f9b_34fb);

/// Power characteristic payload size
pub const POWER_DATA_LEN: usize = 20;

/// Config characteristic payload size
pub const CONFIG_DATA_LEN: usize = 20;

/// Roller diameter (m)
pub const ROLLER_DIAMETER_M: f64 = 0.05715;

/// Spindown time separating the standard and pro flywheels (s)
pub const PRO_FLYWHEEL_SPINDOWN_SECONDS: f64 = 3.0;

/// Standard flywheel spindown giving full roller resistance (s)
pub const SPINDOWN_MIN_SECONDS: f64 = 1.5;

/// Standard flywheel spindown giving no roller resistance (s)
pub const SPINDOWN_MAX_SECONDS: f64 = 2.0;

/// Pro flywheel spindown giving full roller resistance (s)
pub const SPINDOWN_MIN_SECONDS_PRO: f64 = 4.7;

/// Pro flywheel spindown giving no roller resistance (s)
pub const SPINDOWN_MAX_SECONDS_PRO: f64 = 5.3;

/// Speed the rider must reach before coasting into a spindown (20 mph)
pub const CALIBRATION_READY_SPEED_KPH: f64 = 20.0 * 1.609344;

/// Shortest peripheral name
pub const PERIPHERAL_NAME_MIN_LEN: usize = 3;

/// Longest peripheral name
pub const PERIPHERAL_NAME_MAX_LEN: usize = 8;

/// Control point opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InRideOpcode {
    ConfigureSensor = 0x01,
    StartCalibration = 0x02,
    StopCalibration = 0x03,
    SetPeripheralName = 0x04,
}

impl InRideOpcode {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(InRideOpcode::ConfigureSensor),
            0x02 => Some(InRideOpcode::StartCalibration),
            0x03 => Some(InRideOpcode::StopCalibration),
            0x04 => Some(InRideOpcode::SetPeripheralName),
            _ => None,
        }
    }
}
