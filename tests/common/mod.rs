//! Shared helpers for the integration tests.

#![allow(dead_code)]

use as112d::{
    DNSPacket, QueryHandler,
    config::DnsConfig,
    dns::{
        enums::{DNSResourceClass, DNSResourceType, DnsOpcode},
        question::DNSQuestion,
    },
    server::DnsServer,
    zone::Catalog,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;

pub fn create_handler() -> QueryHandler {
    QueryHandler::new(Arc::new(Catalog::build().unwrap()))
}

/// Standard query with one question
pub fn create_test_query(domain: &str, qtype: DNSResourceType) -> DNSPacket {
    create_query_with(0x1234, DnsOpcode::Query, &[domain], qtype)
}

pub fn create_query_with(
    id: u16,
    opcode: DnsOpcode,
    domains: &[&str],
    qtype: DNSResourceType,
) -> DNSPacket {
    let mut packet = DNSPacket::default();
    packet.header.id = id;
    packet.header.opcode = opcode.to_u8();
    packet.header.rd = true;
    packet.header.qdcount = domains.len() as u16;
    for domain in domains {
        packet
            .questions
            .push(DNSQuestion::new(domain, qtype, DNSResourceClass::IN));
    }
    packet
}

/// Wire-format query bytes, written by hand so the codec is not testing itself
pub fn create_dns_query_bytes(id: u16, domain: &str, query_type: u16) -> Vec<u8> {
    let mut packet = Vec::new();

    packet.extend_from_slice(&id.to_be_bytes());
    packet.extend_from_slice(&[0x01, 0x00]); // QR=0, OPCODE=0, RD=1
    packet.extend_from_slice(&[0x00, 0x01]); // QDCOUNT = 1
    packet.extend_from_slice(&[0x00, 0x00]);
    packet.extend_from_slice(&[0x00, 0x00]);
    packet.extend_from_slice(&[0x00, 0x00]);

    for label in domain.split('.').filter(|l| !l.is_empty()) {
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0);

    packet.extend_from_slice(&query_type.to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x01]); // QCLASS = IN

    packet
}

/// Start a server on an ephemeral loopback port
pub async fn start_test_server() -> (
    SocketAddr,
    broadcast::Sender<()>,
    tokio::task::JoinHandle<as112d::error::Result<()>>,
) {
    let config = DnsConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        tcp_idle_timeout_secs: 2,
        ..Default::default()
    };
    let server = DnsServer::bind(&config, Arc::new(create_handler()))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();

    let (shutdown_tx, _) = broadcast::channel(1);
    let tx = shutdown_tx.clone();
    let handle = tokio::spawn(async move { server.run(&tx).await });

    (addr, shutdown_tx, handle)
}
