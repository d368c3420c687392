//! Per-query decision pipeline shared by the UDP and TCP listeners.

use crate::dns::{DNSPacket, constants::MAX_UDP_PAYLOAD, enums::ResponseCode};
use crate::error::Result;
use crate::zone::{AuthoritativeResponder, Catalog, validate_query};
use std::sync::Arc;
use tracing::{debug, trace};

/// Suffix the zone responder is registered for, root-most label last
const REVERSE_SUFFIX: [&str; 2] = ["in-addr", "arpa"];

pub struct QueryHandler {
    responder: AuthoritativeResponder,
}

impl QueryHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            responder: AuthoritativeResponder::new(catalog),
        }
    }

    /// Decide the response for a decoded query. `None` means the packet is
    /// not answered at all.
    pub fn handle(&self, query: &DNSPacket) -> Option<DNSPacket> {
        if !query.is_query() {
            debug!("Dropping response packet id={}", query.header.id);
            return None;
        }

        if let Some(rcode) = validate_query(query) {
            debug!(
                "Query id={} rejected by validation (opcode={}, qdcount={}), returning {}",
                query.header.id, query.header.opcode, query.header.qdcount, rcode
            );
            return Some(DNSPacket::response_to(query, rcode));
        }

        let question = query.questions.first()?;
        if !is_reverse_name(&question.labels) {
            debug!(
                "Query id={} for {} is outside in-addr.arpa, returning REFUSED",
                query.header.id,
                question.name()
            );
            return Some(DNSPacket::response_to(query, ResponseCode::Refused));
        }

        trace!("Query id={}: {} {:?}", query.header.id, question.name(), question.qtype);
        Some(self.responder.generate_response(query))
    }

    /// Parse, handle and serialize one wire-format message. `max_size`
    /// bounds the encoded response; larger responses are sent truncated.
    pub fn handle_bytes(&self, buf: &[u8], max_size: Option<usize>) -> Result<Option<Vec<u8>>> {
        let query = DNSPacket::parse(buf)?;
        let Some(response) = self.handle(&query) else {
            return Ok(None);
        };

        let encoded = response.serialize()?;
        match max_size {
            Some(limit) if encoded.len() > limit => {
                debug!(
                    "Response id={} too large ({} > {} bytes), truncating",
                    response.header.id,
                    encoded.len(),
                    limit
                );
                Ok(Some(response.truncated().serialize()?))
            }
            _ => Ok(Some(encoded)),
        }
    }

    pub fn handle_udp(&self, buf: &[u8]) -> Result<Option<Vec<u8>>> {
        self.handle_bytes(buf, Some(MAX_UDP_PAYLOAD))
    }

    pub fn handle_tcp(&self, buf: &[u8]) -> Result<Option<Vec<u8>>> {
        self.handle_bytes(buf, None)
    }
}

/// True for names matching `*.in-addr.arpa.`: at least one label below the
/// suffix, compared case-insensitively.
pub fn is_reverse_name<S: AsRef<str>>(labels: &[S]) -> bool {
    let labels: Vec<&str> = labels
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.is_empty())
        .collect();
    if labels.len() <= REVERSE_SUFFIX.len() {
        return false;
    }
    labels[labels.len() - REVERSE_SUFFIX.len()..]
        .iter()
        .zip(REVERSE_SUFFIX.iter())
        .all(|(label, expected)| label.eq_ignore_ascii_case(expected))
}
