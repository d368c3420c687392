use as112d::dns::common::PacketComponent;
use as112d::dns::header::DNSHeader;
use bitstream_io::{BigEndian, BitReader, BitWriter};

fn write_header(header: &DNSHeader) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut writer = BitWriter::<_, BigEndian>::new(&mut buffer);
        header.write(&mut writer).expect("Failed to write header");
    }
    buffer
}

#[test]
fn test_header_read_write_roundtrip() {
    let original = DNSHeader {
        id: 0xABCD,
        qr: true,
        opcode: 5,
        aa: true,
        tc: false,
        rd: true,
        ra: false,
        z: 0,
        rcode: 4,
        qdcount: 1,
        ancount: 0,
        nscount: 1,
        arcount: 0,
    };

    let buffer = write_header(&original);
    assert_eq!(buffer.len(), 12);

    let mut reader = BitReader::<_, BigEndian>::new(&buffer[..]);
    let mut parsed = DNSHeader::default();
    parsed
        .read(&mut reader, &buffer)
        .expect("Failed to read header");

    assert_eq!(parsed, original);
}

#[test]
fn test_authoritative_nxdomain_flags() {
    let header = DNSHeader {
        id: 0x1234,
        qr: true,   // bit 15
        opcode: 0,  // bits 14-11
        aa: true,   // bit 10
        tc: false,  // bit 9
        rd: true,   // bit 8
        ra: false,  // bit 7
        z: 0,       // bits 6-4
        rcode: 3,   // bits 3-0
        ..Default::default()
    };

    let buffer = write_header(&header);
    assert_eq!(&buffer[..2], &[0x12, 0x34]);
    assert_eq!(buffer[2], 0b1000_0101);
    assert_eq!(buffer[3], 0b0000_0011);
}

#[test]
fn test_truncated_flag_position() {
    let header = DNSHeader {
        qr: true,
        tc: true,
        ..Default::default()
    };
    let buffer = write_header(&header);
    assert_eq!(buffer[2], 0b1000_0010);
}

#[test]
fn test_short_header_is_error() {
    let buffer = [0x12, 0x34, 0x01];
    let mut reader = BitReader::<_, BigEndian>::new(&buffer[..]);
    let mut parsed = DNSHeader::default();
    assert!(parsed.read(&mut reader, &buffer).is_err());
}

#[test]
fn test_formerr_response_header_round_trip() {
    use as112d::dns::{DNSPacket, enums::ResponseCode};

    // Query with two questions and a nonzero opcode: FORMERR wins
    let mut query_bytes = vec![0x55, 0xAA, 0x29, 0x00, 0x00, 0x02, 0, 0, 0, 0, 0, 0];
    for _ in 0..2 {
        query_bytes.extend_from_slice(b"\x0210\x07in-addr\x04arpa\x00\x00\x06\x00\x01");
    }

    let handler = as112d::QueryHandler::new(std::sync::Arc::new(
        as112d::Catalog::build().unwrap(),
    ));
    let encoded = handler.handle_udp(&query_bytes).unwrap().unwrap();

    let mut reader = BitReader::<_, BigEndian>::new(&encoded[..]);
    let mut header = DNSHeader::default();
    header.read(&mut reader, &encoded).unwrap();

    assert_eq!(header.id, 0x55AA);
    assert!(header.qr);
    assert_eq!(header.opcode, 5);
    assert!(!header.aa);
    assert!(header.rd);
    assert_eq!(header.rcode, ResponseCode::FormatError.to_u8());
    assert_eq!(header.qdcount, 2);
    assert_eq!(header.ancount, 0);
    assert_eq!(header.nscount, 0);

    // Re-encoding the decoded header gives the same leading bytes
    assert_eq!(write_header(&header), encoded[..12].to_vec());
    assert_eq!(DNSPacket::parse(&encoded).unwrap().header, header);
}
