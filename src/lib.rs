pub mod config;
pub mod dns;
pub mod dnssec;
pub mod error;
pub mod zone;

pub use dns::DNSPacket;
