pub mod common;
pub mod constants;
pub mod enums;
pub mod header;
pub mod question;
pub mod resource;

use bitstream_io::{BigEndian, BitReader, BitWriter};
use common::PacketComponent;
use enums::ResponseCode;
use header::DNSHeader;
use question::DNSQuestion;
use resource::DNSResource;
use thiserror::Error;
use tracing::trace;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DNSPacket {
    pub header: DNSHeader,
    pub questions: Vec<DNSQuestion>,
    pub answers: Vec<DNSResource>,
    pub authorities: Vec<DNSResource>,
    pub resources: Vec<DNSResource>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid DNS header")]
    InvalidHeader,
    #[error("Invalid DNS label")]
    InvalidLabel,
    #[error("DNS name too long")]
    NameTooLong,
    #[error("Compression pointer loop")]
    PointerLoop,
    #[error("Invalid record data")]
    InvalidRdata,
    #[error("Invalid bit stream: {0}")]
    InvalidBitStream(String),
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::InvalidBitStream(e.to_string())
    }
}

impl DNSPacket {
    pub fn parse(buf: &[u8]) -> Result<Self, ParseError> {
        trace!("Parsing DNS packet, size: {} bytes", buf.len());
        if buf.len() < constants::HEADER_LEN {
            return Err(ParseError::InvalidHeader);
        }
        let mut reader = BitReader::<_, BigEndian>::new(buf);
        let mut packet = DNSPacket::default();
        packet.header.read(&mut reader, buf)?;
        trace!(
            "Parsed DNS header: id={}, qr={}, opcode={}, questions={}",
            packet.header.id, packet.header.qr, packet.header.opcode, packet.header.qdcount
        );

        for _ in 0..packet.header.qdcount {
            let mut question = DNSQuestion::default();
            question.read(&mut reader, buf)?;
            packet.questions.push(question);
        }

        for _ in 0..packet.header.ancount {
            let mut answer = DNSResource::default();
            answer.read(&mut reader, buf)?;
            packet.answers.push(answer);
        }

        for _ in 0..packet.header.nscount {
            let mut authority = DNSResource::default();
            authority.read(&mut reader, buf)?;
            packet.authorities.push(authority);
        }

        for _ in 0..packet.header.arcount {
            let mut resource = DNSResource::default();
            resource.read(&mut reader, buf)?;
            packet.resources.push(resource);
        }

        Ok(packet)
    }

    /// Serialize the packet. Section counts are written as they stand in the
    /// header; callers keep them in step with the sections.
    pub fn serialize(&self) -> Result<Vec<u8>, ParseError> {
        let mut buf = Vec::with_capacity(constants::MAX_UDP_PAYLOAD);
        let mut writer: BitWriter<&mut Vec<u8>, BigEndian> = BitWriter::new(&mut buf);

        self.header.write(&mut writer)?;

        for question in self.questions.iter() {
            question.write(&mut writer)?;
        }

        for answer in self.answers.iter() {
            answer.write(&mut writer)?;
        }

        for authority in self.authorities.iter() {
            authority.write(&mut writer)?;
        }

        for resource in self.resources.iter() {
            resource.write(&mut writer)?;
        }

        Ok(buf)
    }

    /// Response scaffold for `query`: id, opcode, RD and the question
    /// section are copied, QR is set, all other sections start empty.
    pub fn response_to(query: &DNSPacket, rcode: ResponseCode) -> Self {
        DNSPacket {
            header: DNSHeader {
                id: query.header.id,
                qr: true,
                opcode: query.header.opcode,
                aa: false,
                tc: false,
                rd: query.header.rd,
                ra: false,
                z: 0,
                rcode: rcode.to_u8(),
                qdcount: query.questions.len() as u16,
                ancount: 0,
                nscount: 0,
                arcount: 0,
            },
            questions: query.questions.clone(),
            answers: vec![],
            authorities: vec![],
            resources: vec![],
        }
    }

    pub fn is_query(&self) -> bool {
        !self.header.qr
    }

    pub fn rcode(&self) -> Option<ResponseCode> {
        ResponseCode::from_u8(self.header.rcode)
    }

    /// Name of the first question, dotted and lowercase
    pub fn qname(&self) -> Option<String> {
        self.questions.first().map(|q| q.name())
    }

    /// Copy of this response with only the header and question, and TC set
    pub fn truncated(&self) -> Self {
        let mut packet = self.clone();
        packet.header.tc = true;
        packet.answers.clear();
        packet.authorities.clear();
        packet.resources.clear();
        packet.header.ancount = 0;
        packet.header.nscount = 0;
        packet.header.arcount = 0;
        packet
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use enums::{DNSResourceClass, DNSResourceType};

    fn soa_query_bytes() -> Vec<u8> {
        let mut buf = vec![0x12, 0x34, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0];
        buf.extend_from_slice(b"\x0210\x07in-addr\x04arpa\x00");
        buf.extend_from_slice(&[0x00, 0x06, 0x00, 0x01]);
        buf
    }

    #[test]
    fn test_parse_query() {
        let packet = DNSPacket::parse(&soa_query_bytes()).unwrap();
        assert_eq!(packet.header.id, 0x1234);
        assert!(packet.header.rd);
        assert!(packet.is_query());
        assert_eq!(packet.questions.len(), 1);
        assert_eq!(packet.questions[0].labels, vec!["10", "in-addr", "arpa"]);
        assert_eq!(packet.questions[0].qtype, DNSResourceType::SOA);
        assert_eq!(packet.questions[0].qclass, DNSResourceClass::IN);
        assert_eq!(packet.qname().as_deref(), Some("10.in-addr.arpa"));
    }

    #[test]
    fn test_parse_compressed_owner() {
        let mut buf = soa_query_bytes();
        buf[7] = 1; // ancount
        buf.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x02, 0x00, 0x01]);
        buf.extend_from_slice(&[0x00, 0x00, 0x01, 0x2C, 0x00, 0x02, 0xC0, 0x0C]);

        let packet = DNSPacket::parse(&buf).unwrap();
        assert_eq!(packet.answers.len(), 1);
        assert_eq!(packet.answers[0].labels, vec!["10", "in-addr", "arpa"]);
        assert_eq!(packet.answers[0].rtype, DNSResourceType::NS);
        assert_eq!(packet.answers[0].ttl, 300);
        assert_eq!(packet.answers[0].rdata, vec![0xC0, 0x0C]);
    }

    #[test]
    fn test_pointer_loop_rejected() {
        let mut buf = vec![0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0];
        buf.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01]);
        assert!(matches!(
            DNSPacket::parse(&buf),
            Err(ParseError::PointerLoop)
        ));
    }

    #[test]
    fn test_truncated_packet_rejected() {
        let buf = soa_query_bytes();
        assert!(DNSPacket::parse(&buf[..buf.len() - 3]).is_err());
        assert!(matches!(
            DNSPacket::parse(&buf[..6]),
            Err(ParseError::InvalidHeader)
        ));
    }

    #[test]
    fn test_binary_label_survives_round_trip() {
        let mut buf = vec![0xAB, 0xCD, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0];
        buf.extend_from_slice(b"\x02\xff\x80\x0210\x07in-addr\x04arpa\x00");
        buf.extend_from_slice(&[0x00, 0x0C, 0x00, 0x01]);

        let packet = DNSPacket::parse(&buf).unwrap();
        assert_eq!(packet.questions[0].labels[0].chars().count(), 2);
        assert_eq!(packet.questions[0].labels[1], "10");
        assert_eq!(packet.serialize().unwrap(), buf);
    }

    #[test]
    fn test_serialize_matches_wire_form() {
        let packet = DNSPacket::parse(&soa_query_bytes()).unwrap();
        assert_eq!(packet.serialize().unwrap(), soa_query_bytes());
    }

    #[test]
    fn test_response_scaffold() {
        let query = DNSPacket::parse(&soa_query_bytes()).unwrap();
        let response = DNSPacket::response_to(&query, ResponseCode::Refused);
        assert!(response.header.qr);
        assert!(!response.header.aa);
        assert_eq!(response.header.id, 0x1234);
        assert_eq!(response.header.qdcount, 1);
        assert_eq!(response.rcode(), Some(ResponseCode::Refused));
        assert_eq!(response.questions, query.questions);
    }
}
