use crate::dns::DNSPacket;
use crate::dns::enums::{DnsOpcode, ResponseCode};

/// Gate applied to every query before zone logic runs.
///
/// Returns the terminal response code when the query must not reach the
/// responder. A query failing both checks gets FORMERR: the question-count
/// check outranks the opcode check.
pub fn validate_query(query: &DNSPacket) -> Option<ResponseCode> {
    if query.header.qdcount != 1 {
        return Some(ResponseCode::FormatError);
    }

    if DnsOpcode::from_u8(query.header.opcode) != DnsOpcode::Query {
        return Some(ResponseCode::NotImplemented);
    }

    None
}
