//! USB serial framing for the Smart Control bridge.
//!
//! The bridge multiplexes several characteristics over one serial stream.
//! Each packet is sent as:
//!
//! ```text
//! 0xE5 | escaped( id_lo | id_hi | type | [len | data..] | crc8 ) | 0xE5
//! ```
//!
//! - `type` bit 0: read request, bit 1: data attached (write)
//! - Consecutive packets may share one delimiter: `E5 A E5 B E5`
//! - `len` and `data` are only present when bit 1 is set (max 20 bytes)
//! - Any body byte equal to 0xE5 or 0xE6 is sent as `0xE6, byte ^ 0x80`
//!
//! Serial delivery is chunked independently of packet boundaries, so the
//! parser hands back the trailing partial packet for the caller to prepend to
//! the next chunk ([`UsbAssembler`] does this bookkeeping).

use serde::{Deserialize, Serialize};

use crate::error::{KineticError, Result};

/// Frame delimiter
pub const PACKET_DELIMITER: u8 = 0xE5;
/// Escape marker
pub const PACKET_ESCAPE: u8 = 0xE6;
/// XOR applied to an escaped byte
pub const PACKET_ESCAPE_XOR: u8 = 0x80;
/// Largest characteristic payload carried in one packet
pub const MAX_PACKET_DATA_LEN: usize = 20;

/// identifier + type + length + data + crc
const MAX_BODY_LEN: usize = 2 + 1 + 1 + MAX_PACKET_DATA_LEN + 1;
/// identifier + type + crc
const MIN_BODY_LEN: usize = 4;

/// Characteristic identifiers used inside USB packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum UsbCharacteristic {
    Power = 0x0201,
    Config = 0x0202,
    ControlPoint = 0x0203,
    Debug = 0x0204,
    SystemId = 0x2a23,
    FirmwareRevision = 0x2a26,
    RawStream = 0x0cad,
}

impl UsbCharacteristic {
    /// Map a raw identifier; the code space is sparse and matched exactly.
    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0x0201 => Some(UsbCharacteristic::Power),
            0x0202 => Some(UsbCharacteristic::Config),
            0x0203 => Some(UsbCharacteristic::ControlPoint),
            0x0204 => Some(UsbCharacteristic::Debug),
            0x2a23 => Some(UsbCharacteristic::SystemId),
            0x2a26 => Some(UsbCharacteristic::FirmwareRevision),
            0x0cad => Some(UsbCharacteristic::RawStream),
            _ => None,
        }
    }
}

/// Packet type bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UsbPacketType(u8);

impl UsbPacketType {
    /// Read request bit
    pub const REQUEST: u8 = 0x01;
    /// Data attached bit
    pub const DATA: u8 = 0x02;

    pub fn new(read: bool, write: bool) -> Self {
        let mut bits = 0u8;
        if read {
            bits |= Self::REQUEST;
        }
        if write {
            bits |= Self::DATA;
        }
        Self(bits)
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_request(&self) -> bool {
        self.0 & Self::REQUEST != 0
    }

    pub fn has_data(&self) -> bool {
        self.0 & Self::DATA != 0
    }
}

/// One logical characteristic read or write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbPacket {
    /// Characteristic the packet refers to
    pub identifier: UsbCharacteristic,
    /// Request / data bitmask
    pub packet_type: UsbPacketType,
    /// Attached data; `None` when the data bit is clear
    pub data: Option<Vec<u8>>,
}

/// Result of parsing a chunk of the serial stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsbStream {
    /// Complete packets in arrival order
    pub packets: Vec<UsbPacket>,
    /// Trailing bytes of an unfinished packet, to prepend to the next chunk
    pub remainder: Vec<u8>,
    /// Complete frames that failed validation and were discarded
    pub dropped: usize,
}

impl UsbStream {
    /// Whether the chunk ended on a packet boundary.
    ///
    /// A lone trailing delimiter may open the next packet but holds no data.
    pub fn is_complete(&self) -> bool {
        self.remainder.iter().all(|&b| b == PACKET_DELIMITER)
    }
}

/// Build one USB packet.
///
/// `data` is only attached when `write` is set. Combining `read` and `write`
/// on a characteristic that does not support it is not checked here.
pub fn build_request(
    read: bool,
    write: bool,
    characteristic: UsbCharacteristic,
    data: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let packet_type = UsbPacketType::new(read, write);
    let id = characteristic as u16;

    let mut body = Vec::with_capacity(MAX_BODY_LEN);
    body.extend_from_slice(&id.to_le_bytes());
    body.push(packet_type.bits());

    if write {
        let data = data.unwrap_or(&[]);
        if data.len() > MAX_PACKET_DATA_LEN {
            return Err(KineticError::parameter(
                "data",
                format!(
                    "{} bytes exceeds the {} byte packet limit",
                    data.len(),
                    MAX_PACKET_DATA_LEN
                ),
            ));
        }
        body.push(data.len() as u8);
        body.extend_from_slice(data);
    }

    body.push(crc8(&body));

    let mut frame = Vec::with_capacity(body.len() * 2 + 2);
    frame.push(PACKET_DELIMITER);
    for &byte in &body {
        if byte == PACKET_DELIMITER || byte == PACKET_ESCAPE {
            frame.push(PACKET_ESCAPE);
            frame.push(byte ^ PACKET_ESCAPE_XOR);
        } else {
            frame.push(byte);
        }
    }
    frame.push(PACKET_DELIMITER);

    tracing::debug!(
        "USB packet for {:?}: type {:#04x}, {} bytes",
        characteristic,
        packet_type.bits(),
        frame.len()
    );

    Ok(frame)
}

/// Parse every complete packet in `bytes`.
///
/// Never fails: corrupt frames are dropped and counted, and a trailing
/// unfinished packet is returned in [`UsbStream::remainder`].
pub fn parse_stream(bytes: &[u8]) -> UsbStream {
    let mut stream = UsbStream::default();

    let mut body: Vec<u8> = Vec::with_capacity(MAX_BODY_LEN);
    // Index of the delimiter that opened the current frame
    let mut frame_start: Option<usize> = None;
    let mut escaped = false;
    let mut overflow = false;

    for (index, &byte) in bytes.iter().enumerate() {
        if byte == PACKET_DELIMITER {
            if frame_start.is_some() && (!body.is_empty() || escaped || overflow) {
                if overflow || escaped {
                    tracing::warn!("Dropping malformed USB frame");
                    stream.dropped += 1;
                } else {
                    match decode_body(&body) {
                        Some(packet) => stream.packets.push(packet),
                        None => stream.dropped += 1,
                    }
                }
                body.clear();
                escaped = false;
                overflow = false;
            }
            // Every delimiter also opens the next frame
            frame_start = Some(index);
            continue;
        }

        if frame_start.is_none() {
            // Out of sync; wait for a delimiter
            continue;
        }

        if overflow {
            continue;
        }

        let value = if escaped {
            escaped = false;
            byte ^ PACKET_ESCAPE_XOR
        } else if byte == PACKET_ESCAPE {
            escaped = true;
            continue;
        } else {
            byte
        };

        if body.len() == MAX_BODY_LEN {
            overflow = true;
            body.clear();
            continue;
        }
        body.push(value);
    }

    if let Some(start) = frame_start {
        if overflow {
            tracing::warn!("Dropping oversized USB frame");
            stream.dropped += 1;
        } else {
            stream.remainder = bytes[start..].to_vec();
        }
    }

    stream
}

fn decode_body(body: &[u8]) -> Option<UsbPacket> {
    if body.len() < MIN_BODY_LEN {
        tracing::warn!("Dropping short USB frame ({} bytes)", body.len());
        return None;
    }

    let (payload, crc) = body.split_at(body.len() - 1);
    if crc8(payload) != crc[0] {
        tracing::warn!("Dropping USB frame with bad CRC");
        return None;
    }

    let raw_id = u16::from_le_bytes([payload[0], payload[1]]);
    let packet_type = UsbPacketType::from_bits(payload[2]);
    let Some(identifier) = UsbCharacteristic::from_raw(raw_id) else {
        tracing::warn!("Dropping USB frame for unknown characteristic {:#06x}", raw_id);
        return None;
    };

    let rest = &payload[3..];
    let data = if packet_type.has_data() {
        let (&len, data) = rest.split_first()?;
        if usize::from(len) != data.len() || data.len() > MAX_PACKET_DATA_LEN {
            tracing::warn!(
                "Dropping USB frame with length {} but {} data bytes",
                len,
                data.len()
            );
            return None;
        }
        Some(data.to_vec())
    } else {
        if !rest.is_empty() {
            tracing::warn!("Dropping USB frame with unexpected trailing data");
            return None;
        }
        None
    };

    Some(UsbPacket {
        identifier,
        packet_type,
        data,
    })
}

/// Reassembles packets across serial reads.
#[derive(Debug, Clone)]
pub struct UsbAssembler {
    pending: Vec<u8>,
    max_pending: usize,
}

impl Default for UsbAssembler {
    fn default() -> Self {
        Self::new(crate::sdk::UsbSettings::default().max_pending_bytes)
    }
}

impl UsbAssembler {
    /// Create an assembler that holds back at most `max_pending` bytes.
    pub fn new(max_pending: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_pending,
        }
    }

    /// Feed one chunk from the serial device; returns the packets it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<UsbPacket> {
        self.pending.extend_from_slice(chunk);
        let stream = parse_stream(&self.pending);

        if stream.remainder.len() > self.max_pending {
            tracing::warn!(
                "Discarding {} pending USB bytes (limit {})",
                stream.remainder.len(),
                self.max_pending
            );
            self.pending.clear();
        } else {
            self.pending = stream.remainder;
        }

        stream.packets
    }

    /// Bytes held back waiting for the rest of a packet.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Drop any partial packet.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

const CRC8_TABLE: [u8; 256] = [
    0x00, 0x91, 0xe3, 0x72, 0x07, 0x96, 0xe4, 0x75, 0x0e, 0x9f, 0xed, 0x7c, 0x09, 0x98, 0xea, 0x7b,
    0x1c, 0x8d, 0xff, 0x6e, 0x1b, 0x8a, 0xf8, 0x69, 0x12, 0x83, 0xf1, 0x60, 0x15, 0x84, 0xf6, 0x67,
    0x38, 0xa9, 0xdb, 0x4a, 0x3f, 0xae, 0xdc, 0x4d, 0x36, 0xa7, 0xd5, 0x44, 0x31, 0xa0, 0xd2, 0x43,
    0x24, 0xb5, 0xc7, 0x56, 0x23, 0xb2, 0xc0, 0x51, 0x2a, 0xbb, 0xc9, 0x58, 0x2d, 0xbc, 0xce, 0x5f,
    0x70, 0xe1, 0x93, 0x02, 0x77, 0xe6, 0x94, 0x05, 0x7e, 0xef, 0x9d, 0x0c, 0x79, 0xe8, 0x9a, 0x0b,
    0x6c, 0xfd, 0x8f, 0x1e, 0x6b, 0xfa, 0x88, 0x19, 0x62, 0xf3, 0x81, 0x10, 0x65, 0xf4, 0x86, 0x17,
    0x48, 0xd9, 0xab, 0x3a, 0x4f, 0xde, 0xac, 0x3d, 0x46, 0xd7, 0xa5, 0x34, 0x41, 0xd0, 0xa2, 0x33,
    0x54, 0xc5, 0xb7, 0x26, 0x53, 0xc2, 0xb0, 0x21, 0x5a, 0xcb, 0xb9, 0x28, 0x5d, 0xcc, 0xbe, 0x2f,
    0xe0, 0x71, 0x03, 0x92, 0xe7, 0x76, 0x04, 0x95, 0xee, 0x7f, 0x0d, 0x9c, 0xe9, 0x78, 0x0a, 0x9b,
    0xfc, 0x6d, 0x1f, 0x8e, 0xfb, 0x6a, 0x18, 0x89, 0xf2, 0x63, 0x11, 0x80, 0xf5, 0x64, 0x16, 0x87,
    0xd8, 0x49, 0x3b, 0xaa, 0xdf, 0x4e, 0x3c, 0xad, 0xd6, 0x47, 0x35, 0xa4, 0xd1, 0x40, 0x32, 0xa3,
    0xc4, 0x55, 0x27, 0xb6, 0xc3, 0x52, 0x20, 0xb1, 0xca, 0x5b, 0x29, 0xb8, 0xcd, 0x5c, 0x2e, 0xbf,
    0x90, 0x01, 0x73, 0xe2, 0x97, 0x06, 0x74, 0xe5, 0x9e, 0x0f, 0x7d, 0xec, 0x99, 0x08, 0x7a, 0xeb,
    0x8c, 0x1d, 0x6f, 0xfe, 0x8b, 0x1a, 0x68, 0xf9, 0x82, 0x13, 0x61, 0xf0, 0x85, 0x14, 0x66, 0xf7,
    0xa8, 0x39, 0x4b, 0xda, 0xaf, 0x3e, 0x4c, 0xdd, 0xa6, 0x37, 0x45, 0xd4, 0xa1, 0x30, 0x42, 0xd3,
    0xb4, 0x25, 0x57, 0xc6, 0xb3, 0x22, 0x50, 0xc1, 0xba, 0x2b, 0x59, 0xc8, 0xbd, 0x2c, 0x5e, 0xcf,
];

/// Table-driven CRC-8 with 0xFF initial and final XOR.
pub fn crc8(data: &[u8]) -> u8 {
    data.iter()
        .fold(0xFF, |crc, &byte| CRC8_TABLE[usize::from(crc ^ byte)])
        ^ 0xFF
}
