use std::fmt;

use thiserror::Error;

use crate::dns::{DNSResourceType, Name};

/// DNSSEC signing and validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DnsSecError {
    /// Record data could not be decoded or its declared length is wrong
    #[error("Malformed {rtype} record at {owner}: {reason}")]
    MalformedRecord {
        owner: Name,
        rtype: DNSResourceType,
        reason: String,
    },
    /// Records that should form one rrset differ in owner, type or class
    #[error("Type mismatch for {rtype} rrset at {owner}: {reason}")]
    TypeMismatch {
        owner: Name,
        rtype: DNSResourceType,
        reason: String,
    },
    /// Algorithm not supported
    #[error("Unsupported DNSSEC algorithm: {0}")]
    UnsupportedAlgorithm(u8),
    /// Digest type not supported
    #[error("Unsupported digest type: {0}")]
    UnsupportedDigestType(u8),
    /// Invalid public or private key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// Signature length is wrong for the algorithm
    #[error("Malformed signature for algorithm {algorithm}: {len} bytes")]
    MalformedSignature { algorithm: u8, len: usize },
    /// No signature validated with any candidate key
    #[error("No valid signature found")]
    NoValidSignature,
    /// Key pair cannot produce signatures for the requested algorithm
    #[error("Signing key mismatch for algorithm {algorithm}: {reason}")]
    SigningKeyMismatch { algorithm: u8, reason: String },
    /// Owner is not at or below the signer name
    #[error("Owner {owner} is not within signer {signer}")]
    SignerNameMismatch { owner: Name, signer: Name },
    /// Expiration precedes inception
    #[error("Invalid validity window: inception {inception}, expiration {expiration}")]
    InvalidValidityWindow { inception: u32, expiration: u32 },
    /// Zone has no records to sign
    #[error("Zone is empty")]
    EmptyZone,
    /// No signing keys were supplied
    #[error("No signing keys supplied")]
    NoSigningKeys,
    /// Record owner outside the zone origin
    #[error("Record owner {0} is outside the zone")]
    OutOfZone(Name),
    /// Signing one rrset failed, aborting the zone
    #[error("Signing {rtype} rrset at {owner} failed: {source}")]
    RrsetSigningFailed {
        owner: Name,
        rtype: DNSResourceType,
        source: Box<DnsSecError>,
    },
    /// Process-wide random source initialized twice
    #[error("Random source already initialized")]
    AlreadyInitialized,
    /// Seed material could not be read
    #[error("Failed to read entropy: {0}")]
    EntropyReadFailure(String),
    /// Backend failure inside the crypto library
    #[error("Crypto failure: {0}")]
    Crypto(String),
}

pub type Result<T> = std::result::Result<T, DnsSecError>;

pub(crate) fn malformed(owner: &Name, rtype: DNSResourceType, reason: impl fmt::Display) -> DnsSecError {
    DnsSecError::MalformedRecord {
        owner: owner.clone(),
        rtype,
        reason: reason.to_string(),
    }
}
