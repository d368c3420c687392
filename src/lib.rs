pub mod config;
pub mod dns;
pub mod error;
pub mod graceful_shutdown;
pub mod handler;
pub mod server;
pub mod zone;

pub use dns::DNSPacket;
pub use handler::QueryHandler;
pub use zone::Catalog;
