//! Authoritative response generation for the served reverse zones.

use super::{Catalog, MatchResult};
use crate::dns::{
    DNSPacket,
    enums::{DNSResourceType, ResponseCode},
};
use std::sync::Arc;
use tracing::debug;

/// Answers queries for names under `in-addr.arpa` from the catalog
pub struct AuthoritativeResponder {
    catalog: Arc<Catalog>,
}

impl AuthoritativeResponder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Build the response for a query that already passed validation.
    pub fn generate_response(&self, query: &DNSPacket) -> DNSPacket {
        let Some(question) = query.questions.first() else {
            return DNSPacket::response_to(query, ResponseCode::Refused);
        };

        let result = self.catalog.lookup(&question.labels);
        build_response(query, question.qtype, result)
    }
}

/// Turn a catalog match into answer, authority and response code.
pub fn build_response(
    query: &DNSPacket,
    qtype: DNSResourceType,
    result: MatchResult<'_>,
) -> DNSPacket {
    let mut response = DNSPacket::response_to(query, ResponseCode::Refused);

    let Some(zone) = result.zone else {
        debug!("No served zone for {:?}, refusing", query.qname());
        return response;
    };

    if result.extra_depth == 0 {
        if matches!(qtype, DNSResourceType::ANY | DNSResourceType::SOA) {
            response.answers.push(zone.soa().clone());
        }
        if matches!(qtype, DNSResourceType::ANY | DNSResourceType::NS) {
            response.answers.push(zone.ns1().clone());
            response.answers.push(zone.ns2().clone());
        }
        response.header.rcode = ResponseCode::NoError.to_u8();
    } else {
        response.header.rcode = ResponseCode::NameError.to_u8();
    }

    response.header.ancount = response.answers.len() as u16;

    // NODATA and NXDOMAIN both carry the SOA for negative caching
    if response.answers.is_empty() {
        response.authorities.push(zone.soa().clone());
        response.header.nscount = 1;
    }

    response.header.aa = true;

    debug!(
        "Zone {} answered {:?} with {} (depth {}, {} answers)",
        zone.apex(),
        qtype,
        ResponseCode::from_u8(response.header.rcode).unwrap_or(ResponseCode::ServerFailure),
        result.extra_depth,
        response.header.ancount
    );

    response
}
