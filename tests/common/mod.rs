//! Common test utilities for the bifrost DNSSEC tests

#![allow(dead_code)] // These functions are used by various test files

use bifrost::dns::{DNSResource, DNSResourceClass, DNSResourceType, Name, RRset};
use bifrost::dnssec::keys::{SEP_FLAG, ZONE_KEY_FLAG};
use bifrost::dnssec::{DnsSecAlgorithm, RandomContext, SigningKey, ValidityWindow};

/// Reference time used by signing tests (2023-11-14)
pub const NOW: u32 = 1_700_000_000;

/// PKCS#8 private keys generated with `openssl genpkey`
pub const RSA2048_PKCS8: &[u8] = include_bytes!("../data/rsa2048.pk8");
pub const RSA1024_PKCS8: &[u8] = include_bytes!("../data/rsa1024.pk8");
pub const RSA512_PKCS8: &[u8] = include_bytes!("../data/rsa512.pk8");
pub const DSA1024_PKCS8: &[u8] = include_bytes!("../data/dsa1024.pk8");

/// Deterministic random source
pub fn random() -> RandomContext {
    RandomContext::from_entropy(&[7u8; 32][..], 32).unwrap()
}

pub fn name(s: &str) -> Name {
    s.parse().unwrap()
}

pub fn window() -> ValidityWindow {
    ValidityWindow::starting_at(NOW - 3600)
}

pub fn a_record(owner: &str, ttl: u32, addr: [u8; 4]) -> DNSResource {
    DNSResource::new(
        name(owner),
        DNSResourceType::A,
        DNSResourceClass::IN,
        ttl,
        addr.to_vec(),
    )
}

pub fn txt_record(owner: &str, text: &str) -> DNSResource {
    let mut rdata = vec![text.len() as u8];
    rdata.extend_from_slice(text.as_bytes());
    DNSResource::new(
        name(owner),
        DNSResourceType::TXT,
        DNSResourceClass::IN,
        300,
        rdata,
    )
}

pub fn ns_record(owner: &str, target: &str) -> DNSResource {
    DNSResource::new(
        name(owner),
        DNSResourceType::NS,
        DNSResourceClass::IN,
        3600,
        name(target).to_wire(),
    )
}

pub fn mx_record(owner: &str, preference: u16, exchange: &str) -> DNSResource {
    let mut rdata = preference.to_be_bytes().to_vec();
    rdata.extend(name(exchange).to_wire());
    DNSResource::new(
        name(owner),
        DNSResourceType::MX,
        DNSResourceClass::IN,
        300,
        rdata,
    )
}

pub fn soa_record(origin: &str, minimum: u32) -> DNSResource {
    let mut rdata = name(&format!("ns1.{origin}")).to_wire();
    rdata.extend(name(&format!("hostmaster.{origin}")).to_wire());
    for value in [2024010101u32, 7200, 3600, 1_209_600, minimum] {
        rdata.extend_from_slice(&value.to_be_bytes());
    }
    DNSResource::new(
        name(origin),
        DNSResourceType::SOA,
        DNSResourceClass::IN,
        3600,
        rdata,
    )
}

pub fn rrset(records: Vec<DNSResource>) -> RRset {
    RRset::new(records).unwrap()
}

/// Ed25519 zone-signing key from a fixed seed
pub fn zsk(owner: &str, seed: u8) -> SigningKey {
    SigningKey::from_ed25519_seed(name(owner), ZONE_KEY_FLAG, &[seed; 32]).unwrap()
}

/// Ed25519 key-signing key from a fixed seed
pub fn ksk(owner: &str, seed: u8) -> SigningKey {
    SigningKey::from_ed25519_seed(name(owner), ZONE_KEY_FLAG | SEP_FLAG, &[seed; 32]).unwrap()
}

pub fn ecdsa_key(owner: &str, algorithm: DnsSecAlgorithm, random: &RandomContext) -> SigningKey {
    SigningKey::generate(name(owner), algorithm, ZONE_KEY_FLAG, random).unwrap()
}

pub fn pkcs8_key(owner: &str, algorithm: DnsSecAlgorithm, flags: u16, pkcs8: &[u8]) -> SigningKey {
    SigningKey::from_pkcs8(name(owner), algorithm, flags, pkcs8, &random()).unwrap()
}
