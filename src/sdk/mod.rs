//! SDK lifecycle: API key launch and the authorization gate.
//!
//! The process-wide API status is set once by `launch` (and optionally updated
//! by an external validator through `report_status`). Every codec entry point
//! reads it through an [`AuthGate`] at call time and never mutates it.

pub mod config;
pub mod logging;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{KineticError, Result};

pub use config::{ConfigError, LoggingSettings, SdkConfig, UsbSettings};
pub use logging::init_logging;

/// API key status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    /// Status is unknown; the SDK keeps operating
    Unknown,
    /// Key is authorized or pending authorization
    Authorized,
    /// Key was explicitly disabled; every entry point fails
    Rejected,
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiStatus::Unknown => write!(f, "Unknown"),
            ApiStatus::Authorized => write!(f, "Authorized"),
            ApiStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

const STATUS_NOT_LAUNCHED: u8 = 0;
const STATUS_UNKNOWN: u8 = 1;
const STATUS_AUTHORIZED: u8 = 2;
const STATUS_REJECTED: u8 = 3;

static API_STATUS: AtomicU8 = AtomicU8::new(STATUS_NOT_LAUNCHED);

fn encode_status(status: ApiStatus) -> u8 {
    match status {
        ApiStatus::Unknown => STATUS_UNKNOWN,
        ApiStatus::Authorized => STATUS_AUTHORIZED,
        ApiStatus::Rejected => STATUS_REJECTED,
    }
}

fn decode_status(raw: u8) -> Option<ApiStatus> {
    match raw {
        STATUS_UNKNOWN => Some(ApiStatus::Unknown),
        STATUS_AUTHORIZED => Some(ApiStatus::Authorized),
        STATUS_REJECTED => Some(ApiStatus::Rejected),
        _ => None,
    }
}

/// Launch the SDK with an API key.
///
/// The key is only checked for presence here; remote validation lives outside
/// this crate and reports back through [`report_status`]. Until then the key is
/// treated as authorized.
pub fn launch(api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(KineticError::parameter("api_key", "must not be empty"));
    }

    API_STATUS.store(STATUS_AUTHORIZED, Ordering::Release);
    tracing::info!("Kinetic SDK v{} launched", version());
    Ok(())
}

/// Launch using the API key from a loaded configuration.
pub fn launch_with_config(config: &SdkConfig) -> Result<()> {
    match config.api_key.as_deref() {
        Some(key) => launch(key),
        None => Err(KineticError::parameter(
            "api_key",
            "no API key in configuration",
        )),
    }
}

/// Record the outcome of external API key validation.
pub fn report_status(status: ApiStatus) {
    let previous = API_STATUS.swap(encode_status(status), Ordering::AcqRel);
    if decode_status(previous) != Some(status) {
        tracing::info!("API status changed to {}", status);
    }
}

/// Current API status, or `None` if the SDK was never launched.
pub fn status() -> Option<ApiStatus> {
    decode_status(API_STATUS.load(Ordering::Acquire))
}

/// SDK version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateSource {
    Process,
    Fixed(Option<ApiStatus>),
}

/// Read-only view of the authorization state consulted by every entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthGate {
    source: GateSource,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::process()
    }
}

impl AuthGate {
    /// Gate that reads the process-wide status on every call.
    pub fn process() -> Self {
        Self {
            source: GateSource::Process,
        }
    }

    /// Gate pinned to a given status.
    pub fn fixed(status: ApiStatus) -> Self {
        Self {
            source: GateSource::Fixed(Some(status)),
        }
    }

    /// Gate that behaves as if the SDK was never launched.
    pub fn uninitialized() -> Self {
        Self {
            source: GateSource::Fixed(None),
        }
    }

    /// Status as seen by this gate right now.
    pub fn snapshot(&self) -> Option<ApiStatus> {
        match self.source {
            GateSource::Process => status(),
            GateSource::Fixed(status) => status,
        }
    }

    /// Fail unless the codec is permitted to operate.
    pub fn check(&self) -> Result<()> {
        match self.snapshot() {
            None => Err(KineticError::NotInitialized),
            Some(ApiStatus::Rejected) => Err(KineticError::Unauthorized),
            Some(ApiStatus::Unknown) | Some(ApiStatus::Authorized) => Ok(()),
        }
    }
}
