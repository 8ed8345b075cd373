//! Smart Control trainer: telemetry decoding, command encoding and USB framing.

pub mod codec;
pub mod commands;
pub mod constants;
pub mod telemetry;
pub mod types;
pub mod usb;

pub use codec::KineticControl;
pub use commands::{ControlCommand, SimulationParams};
pub use constants::ControlOpcode;
pub use types::{
    CalibrationState, ControlConfigData, ControlDebugData, ControlMode, ControlPointResponse,
    ControlPowerData, DebugMode, ResponseResult,
};
pub use usb::{
    build_request, parse_stream, UsbAssembler, UsbCharacteristic, UsbPacket, UsbPacketType,
    UsbStream,
};
