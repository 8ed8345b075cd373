//! Kinetic SDK - trainer protocol codec
//!
//! Decodes telemetry from Kinetic Smart Control trainers and inRide power
//! sensors, and encodes the commands they accept. Transport (BLE, USB serial)
//! stays with the caller: this crate turns characteristic values into typed
//! records and typed commands into bytes to write.
//!
//! Every decoder and builder is gated on the SDK authorization status; call
//! [`sdk::launch`] once at startup.

pub mod control;
pub mod error;
pub mod inride;
pub mod sdk;
pub mod system_id;

// Re-export commonly used types
pub use control::KineticControl;
pub use error::{KineticError, Result};
pub use inride::KineticInRide;
pub use sdk::{ApiStatus, AuthGate};
pub use system_id::SystemId;
