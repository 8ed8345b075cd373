//! Hardware System ID read from the Device Information service (0x2A23).
//!
//! Both product lines share this type so the same physical identifier always
//! renders identically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KineticError;

/// Length of a System ID in bytes.
pub const SYSTEM_ID_LEN: usize = 6;

/// A 6-byte hardware identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemId([u8; SYSTEM_ID_LEN]);

impl SystemId {
    /// Wrap raw identifier bytes.
    pub const fn new(bytes: [u8; SYSTEM_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a System ID out of a characteristic value.
    ///
    /// Fails with `InvalidLength` unless the buffer is exactly 6 bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, KineticError> {
        let bytes: [u8; SYSTEM_ID_LEN] = data
            .try_into()
            .map_err(|_| KineticError::length("system id", SYSTEM_ID_LEN, data.len()))?;
        Ok(Self(bytes))
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; SYSTEM_ID_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for SystemId {
    type Error = KineticError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(data)
    }
}

impl From<[u8; SYSTEM_ID_LEN]> for SystemId {
    fn from(bytes: [u8; SYSTEM_ID_LEN]) -> Self {
        Self(bytes)
    }
}

/// Colon-delimited uppercase hex, e.g. `00:1A:2B:3C:4D:5E`.
impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for SystemId {
    type Err = KineticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; SYSTEM_ID_LEN];
        let mut count = 0usize;

        for part in s.split(':') {
            if count == SYSTEM_ID_LEN {
                return Err(KineticError::parameter(
                    "system_id",
                    format!("'{}' has more than {} octets", s, SYSTEM_ID_LEN),
                ));
            }
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(KineticError::parameter(
                    "system_id",
                    format!("octet '{}' must be two hex digits", part),
                ));
            }
            bytes[count] = u8::from_str_radix(part, 16).map_err(|e| {
                KineticError::parameter("system_id", format!("octet '{}': {}", part, e))
            })?;
            count += 1;
        }

        if count != SYSTEM_ID_LEN {
            return Err(KineticError::parameter(
                "system_id",
                format!("'{}' has {} octets, expected {}", s, count, SYSTEM_ID_LEN),
            ));
        }

        Ok(Self(bytes))
    }
}
