use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use shared::error::Error;

use super::writer::PacketWriter;

#[test]
fn test_write_u16_network_order() {
    let mut writer = PacketWriter::with_capacity(1500);
    writer.write_u16(0x1234).unwrap();
    writer.write_u16(0x0001).unwrap();
    let packet = writer.get_packet("224.0.0.251:5353".parse().unwrap());
    assert_eq!(&packet.message[..], &[0x12, 0x34, 0x00, 0x01]);
}

#[test]
fn test_write_u16_overflow() {
    let mut writer = PacketWriter::with_capacity(3);
    writer.write_u16(1).unwrap();
    assert_eq!(writer.write_u16(2).unwrap_err(), Error::ErrBufferFull);
    // the failed write appended nothing
    assert_eq!(writer.len(), 2);
}

#[test]
fn test_write_labels_simple() {
    let mut writer = PacketWriter::with_capacity(1500);
    writer.write_labels(&["_printer", "_tcp"]).unwrap();

    let mut expected = vec![8u8];
    expected.extend_from_slice(b"_printer");
    expected.push(4);
    expected.extend_from_slice(b"_tcp");
    expected.push(0);
    let packet = writer.get_packet("224.0.0.251:5353".parse().unwrap());
    assert_eq!(&packet.message[..], &expected[..]);
}

#[test]
fn test_write_labels_full_back_reference() {
    let mut writer = PacketWriter::with_capacity(1500);
    writer.write_labels(&["example", "local"]).unwrap();
    writer.write_labels(&["example", "local"]).unwrap();

    let mut expected = vec![7u8];
    expected.extend_from_slice(b"example");
    expected.push(5);
    expected.extend_from_slice(b"local");
    expected.push(0);
    // whole name shared: a bare pointer to offset 0, no terminator
    expected.extend_from_slice(&[0xc0, 0x00]);
    let packet = writer.get_packet("224.0.0.251:5353".parse().unwrap());
    assert_eq!(&packet.message[..], &expected[..]);
}

#[test]
fn test_write_labels_shared_suffix() {
    let mut writer = PacketWriter::with_capacity(1500);
    writer.write_labels(&["a", "local"]).unwrap();
    writer.write_labels(&["b", "local"]).unwrap();

    let mut expected = vec![1u8, b'a', 5];
    expected.extend_from_slice(b"local");
    expected.push(0);
    // "local" was written at offset 2; "b" is new
    expected.extend_from_slice(&[1, b'b', 0xc0, 0x02]);
    let packet = writer.get_packet("224.0.0.251:5353".parse().unwrap());
    assert_eq!(&packet.message[..], &expected[..]);
}

#[test]
fn test_write_labels_compression_is_case_insensitive() {
    let mut writer = PacketWriter::with_capacity(1500);
    writer.write_labels(&["MyPrinter", "Local"]).unwrap();
    writer.write_labels(&["myprinter", "local"]).unwrap();

    let mut expected = vec![9u8];
    // original casing is preserved on the wire
    expected.extend_from_slice(b"MyPrinter");
    expected.push(5);
    expected.extend_from_slice(b"Local");
    expected.push(0);
    expected.extend_from_slice(&[0xc0, 0x00]);
    let packet = writer.get_packet("224.0.0.251:5353".parse().unwrap());
    assert_eq!(&packet.message[..], &expected[..]);
}

#[test]
fn test_write_labels_rejects_empty_sequence() {
    let mut writer = PacketWriter::with_capacity(1500);
    let labels: &[&str] = &[];
    assert_eq!(writer.write_labels(labels).unwrap_err(), Error::ErrEmptyLabels);
}

#[test]
fn test_write_labels_rejects_empty_label() {
    let mut writer = PacketWriter::with_capacity(1500);
    assert_eq!(
        writer.write_labels(&["printer", ""]).unwrap_err(),
        Error::ErrLabelTooLong
    );
}

#[test]
fn test_write_labels_label_length_limit() {
    let mut writer = PacketWriter::with_capacity(1500);
    let max = "a".repeat(63);
    writer.write_labels(&[max.as_str()]).unwrap();

    let over = "a".repeat(64);
    assert_eq!(
        writer.write_labels(&[over.as_str()]).unwrap_err(),
        Error::ErrLabelTooLong
    );
}

#[test]
fn test_write_labels_name_length_limit() {
    let mut writer = PacketWriter::with_capacity(1500);
    // four maximum labels encode to 4 * 64 + 1 = 257 bytes
    let label = "a".repeat(63);
    let labels = vec![label.clone(), label.clone(), label.clone(), label];
    assert_eq!(
        writer.write_labels(&labels).unwrap_err(),
        Error::ErrNameTooLong
    );
}

#[test]
fn test_write_labels_overflow_leaves_no_packet() {
    let mut writer = PacketWriter::with_capacity(4);
    assert_eq!(
        writer.write_labels(&["abcdef"]).unwrap_err(),
        Error::ErrBufferFull
    );
}

#[test]
fn test_get_packet_destination_and_local_family() {
    let writer = PacketWriter::with_capacity(1500);
    let destination: SocketAddr = "224.0.0.251:5353".parse().unwrap();
    let packet = writer.get_packet(destination);
    assert_eq!(packet.transport.peer_addr, destination);
    assert_eq!(
        packet.transport.local_addr,
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
    );

    let writer = PacketWriter::with_capacity(1500);
    let destination: SocketAddr = "[ff02::fb]:5353".parse().unwrap();
    let packet = writer.get_packet(destination);
    assert_eq!(packet.transport.peer_addr, destination);
    assert_eq!(
        packet.transport.local_addr,
        SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
    );
}

#[test]
fn test_encoding_is_deterministic() {
    let encode = || {
        let mut writer = PacketWriter::with_capacity(1500);
        writer.write_u16(0xabcd).unwrap();
        writer
            .write_labels(&["MyPrinter", "_printer", "_tcp", "local"])
            .unwrap();
        writer.write_labels(&["printer", "local"]).unwrap();
        writer
            .get_packet("224.0.0.251:5353".parse().unwrap())
            .message
    };
    assert_eq!(encode(), encode());
}
