//! Unit tests for the Smart Control USB packet framer.

use kinetic_sdk::control::usb::{crc8, PACKET_DELIMITER, PACKET_ESCAPE};
use kinetic_sdk::control::{
    build_request, parse_stream, UsbAssembler, UsbCharacteristic, UsbPacketType,
};

#[test]
fn test_two_packets_and_truncated_tail() {
    let mut bytes = build_request(true, false, UsbCharacteristic::Power, None).unwrap();
    bytes.extend(
        build_request(
            false,
            true,
            UsbCharacteristic::ControlPoint,
            Some(&[0x01, 0xFA, 0x00]),
        )
        .unwrap(),
    );
    let third = build_request(true, false, UsbCharacteristic::FirmwareRevision, None).unwrap();
    bytes.extend_from_slice(&third[..3]);

    let stream = parse_stream(&bytes);

    assert_eq!(stream.packets.len(), 2);
    assert_eq!(stream.packets[0].identifier, UsbCharacteristic::Power);
    assert!(stream.packets[0].packet_type.is_request());
    assert!(stream.packets[0].data.is_none());
    assert_eq!(stream.packets[1].identifier, UsbCharacteristic::ControlPoint);
    assert_eq!(stream.packets[1].data, Some(vec![0x01, 0xFA, 0x00]));
    assert_eq!(stream.remainder, third[..3].to_vec());
    assert!(!stream.is_complete());
    assert_eq!(stream.dropped, 0);
}

#[test]
fn test_frames_sharing_delimiters() {
    let power = build_request(true, false, UsbCharacteristic::Power, None).unwrap();
    let config = build_request(true, false, UsbCharacteristic::Config, None).unwrap();
    let debug = build_request(true, false, UsbCharacteristic::Debug, None).unwrap();

    // E5 power E5 config E5 debug E5
    let mut bytes = power.clone();
    bytes.extend_from_slice(&config[1..]);
    bytes.extend_from_slice(&debug[1..]);
    assert_eq!(
        bytes,
        vec![
            0xE5, 0x01, 0x02, 0x01, 0xb0, 0xE5, 0x02, 0x02, 0x01, 0x01, 0xE5, 0x04, 0x02, 0x01,
            0xa2, 0xE5
        ]
    );

    let stream = parse_stream(&bytes);
    let ids: Vec<_> = stream.packets.iter().map(|p| p.identifier).collect();
    assert_eq!(
        ids,
        vec![
            UsbCharacteristic::Power,
            UsbCharacteristic::Config,
            UsbCharacteristic::Debug
        ]
    );
    assert_eq!(stream.dropped, 0);
    assert!(stream.is_complete());
}

#[test]
fn test_shared_delimiter_split_across_chunks() {
    let power = build_request(true, false, UsbCharacteristic::Power, None).unwrap();
    let config = build_request(false, true, UsbCharacteristic::Config, Some(&[0x07])).unwrap();

    let mut assembler = UsbAssembler::default();
    assert_eq!(assembler.push(&power).len(), 1);
    let packets = assembler.push(&config[1..]);
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].data, Some(vec![0x07]));
}

#[test]
fn test_empty_write_is_distinct_from_no_data() {
    let frame = build_request(false, true, UsbCharacteristic::Config, None).unwrap();
    let stream = parse_stream(&frame);
    assert_eq!(stream.packets[0].data, Some(Vec::new()));

    let frame = build_request(true, false, UsbCharacteristic::Config, None).unwrap();
    let stream = parse_stream(&frame);
    assert_eq!(stream.packets[0].data, None);
}

#[test]
fn test_read_and_write_bits_together() {
    let frame = build_request(true, true, UsbCharacteristic::RawStream, Some(&[0xAA])).unwrap();
    let packet = &parse_stream(&frame).packets[0];
    assert_eq!(packet.packet_type, UsbPacketType::new(true, true));
    assert!(packet.packet_type.is_request());
    assert!(packet.packet_type.has_data());
    assert_eq!(packet.data, Some(vec![0xAA]));
}

#[test]
fn test_full_size_payload() {
    let data: Vec<u8> = (0xD0..0xE4).collect();
    assert_eq!(data.len(), 20);
    let frame = build_request(false, true, UsbCharacteristic::Debug, Some(&data)).unwrap();
    let stream = parse_stream(&frame);
    assert_eq!(stream.packets.len(), 1);
    assert_eq!(stream.packets[0].data.as_deref(), Some(&data[..]));
}

#[test]
fn test_unknown_identifier_dropped() {
    // id 0x0300, type 0x01, crc
    let body = [0x00, 0x03, 0x01];
    let mut frame = vec![PACKET_DELIMITER];
    frame.extend_from_slice(&body);
    frame.push(crc8(&body));
    frame.push(PACKET_DELIMITER);
    assert!(!frame[1..frame.len() - 1].contains(&PACKET_ESCAPE));

    let stream = parse_stream(&frame);
    assert!(stream.packets.is_empty());
    assert_eq!(stream.dropped, 1);
    assert!(stream.is_complete());
}

#[test]
fn test_assembler_byte_by_byte() {
    let mut bytes = build_request(true, false, UsbCharacteristic::SystemId, None).unwrap();
    bytes.extend(
        build_request(false, true, UsbCharacteristic::Config, Some(&[0xE5, 0xE6])).unwrap(),
    );

    let mut assembler = UsbAssembler::default();
    let mut packets = Vec::new();
    for byte in &bytes {
        packets.extend(assembler.push(std::slice::from_ref(byte)));
    }

    assert_eq!(packets.len(), 2);
    assert_eq!(packets[0].identifier, UsbCharacteristic::SystemId);
    assert_eq!(packets[1].data, Some(vec![0xE5, 0xE6]));
    // The last closing delimiter is held as the opener of the next packet
    assert_eq!(assembler.pending(), &[PACKET_DELIMITER]);
}

#[test]
fn test_assembler_discards_runaway_frame() {
    let mut assembler = UsbAssembler::new(8);
    // An opening delimiter followed by more bytes than the cap
    let mut chunk = vec![PACKET_DELIMITER];
    chunk.extend_from_slice(&[0x01; 10]);
    assert!(assembler.push(&chunk).is_empty());
    assert!(assembler.pending().is_empty());

    let frame = build_request(true, false, UsbCharacteristic::Power, None).unwrap();
    let packets = assembler.push(&frame);
    assert_eq!(packets.len(), 1);
}
