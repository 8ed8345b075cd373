//! Smart Control service identifiers, USB identifiers and payload sizes.

use uuid::Uuid;

/// Smart Control Power Service UUID
pub const POWER_SERVICE_UUID: Uuid = Uuid::from_u128(0xe941_0200_b434_446b_b5cc_3659_2fc4_c724);

/// Power Characteristic UUID (broadcasts power data)
pub const POWER_UUID: Uuid = Uuid::from_u128(0xe941_0201_b434_446b_b5cc_3659_2fc4_c724);

/// Configuration Characteristic UUID (broadcasts config data)
pub const CONFIG_UUID: Uuid = Uuid::from_u128(0xe941_0202_b434_446b_b5cc_3659_2fc4_c724);

/// Control Point Characteristic UUID
pub const CONTROL_POINT_UUID: Uuid = Uuid::from_u128(0xe941_0203_b434_446b_b5cc_3659_2fc4_c724);

/// Debug Characteristic UUID (broadcasts debug data)
pub const DEBUG_UUID: Uuid = Uuid::from_u128(0xe941_0204_b434_446b_b5cc_3659_2fc4_c724);

/// Device Information Service UUID (0x180A)
pub const DEVICE_INFORMATION_UUID: Uuid =
    Uuid::from_u128(0x0000_180a_0000_1000_8000_0080_5f9b_34fb);

/// System ID Characteristic UUID (0x2A23)
pub const SYSTEM_ID_UUID: Uuid = Uuid::from_u128(0x0000_2a23_0000_1000_8000_0080_5f9b_34fb);

/// Firmware Revision String Characteristic UUID (0x2A26)
pub const FIRMWARE_REVISION_UUID: Uuid =
    Uuid::from_u128(0x0000_2a26_0000_1000_8000_0080_5f9b_34fb);

/// USB vendor ID of the Smart Control bridge
pub const USB_VENDOR_ID: u16 = 0x1915;

/// USB product ID of the Smart Control bridge
pub const USB_PRODUCT_ID: u16 = 0x520f;

/// Power characteristic payload size
pub const POWER_DATA_LEN: usize = 8;

/// Config characteristic payload size
pub const CONFIG_DATA_LEN: usize = 10;

/// Debug characteristic payload size
pub const DEBUG_DATA_LEN: usize = 18;

/// Control point response size
pub const CONTROL_POINT_RESPONSE_LEN: usize = 3;

/// First byte of every control point response
pub const CONTROL_POINT_RESPONSE_CODE: u8 = 0x80;

/// Longest device name accepted by the control point (bytes)
pub const DEVICE_NAME_MAX_LEN: usize = 19;

/// Fluid mode: rider + bike weight (kg)
pub const FLUID_WEIGHT_KG: f32 = 85.0;

/// Fluid mode: rolling resistance coefficient
pub const FLUID_ROLLING_COEFF: f32 = 0.004;

/// Fluid mode: wind resistance coefficient
pub const FLUID_WIND_COEFF: f32 = 0.60;

/// Fluid mode: wind speed (m/s)
pub const FLUID_WIND_SPEED_MPS: f32 = 0.0;

/// Highest fluid level
pub const FLUID_MAX_LEVEL: u8 = 9;

/// Steepest simulated grade in either direction (%)
pub const MAX_GRADE_PERCENT: f32 = 45.0;

/// Control point opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlOpcode {
    /// Hold a target wattage
    SetErg = 0x01,
    /// Hold a fixed brake position
    SetBrake = 0x02,
    /// Simulate road physics
    SetSimulation = 0x03,
    /// Start (brake) calibration
    StartCalibration = 0x04,
    /// Abort calibration
    StopCalibration = 0x05,
    /// Change the advertised name
    SetDeviceName = 0x09,
}

impl ControlOpcode {
    /// Map a raw opcode byte.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(ControlOpcode::SetErg),
            0x02 => Some(ControlOpcode::SetBrake),
            0x03 => Some(ControlOpcode::SetSimulation),
            0x04 => Some(ControlOpcode::StartCalibration),
            0x05 => Some(ControlOpcode::StopCalibration),
            0x09 => Some(ControlOpcode::SetDeviceName),
            _ => None,
        }
    }
}
