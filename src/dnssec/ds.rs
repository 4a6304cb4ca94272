use std::fmt;

use super::digest::DigestType;
use super::errors::{DnsSecError, Result, malformed};
use super::keys::DnsKey;
use crate::dns::{DNSResource, DNSResourceClass, DNSResourceType, Name};

/// Delegation signer: a digest of a child zone's DNSKEY (RFC 4034 section 5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ds {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: DigestType,
    pub digest: Vec<u8>,
}

impl Ds {
    /// Digest over the canonical owner name followed by the DNSKEY payload
    pub fn from_dnskey(owner: &Name, key: &DnsKey, digest_type: DigestType) -> Result<Self> {
        let mut data = owner.to_canonical_wire();
        data.extend_from_slice(&key.to_rdata());
        Ok(Self {
            key_tag: key.key_tag(),
            algorithm: key.algorithm(),
            digest_type,
            digest: digest_type.digest(&data)?,
        })
    }

    /// Whether this DS refers to `key` owned by `owner`
    pub fn matches_key(&self, owner: &Name, key: &DnsKey) -> bool {
        self.key_tag == key.key_tag()
            && self.algorithm == key.algorithm()
            && Ds::from_dnskey(owner, key, self.digest_type)
                .is_ok_and(|computed| computed.digest == self.digest)
    }

    pub fn from_rdata(owner: &Name, rdata: &[u8]) -> Result<Self> {
        if rdata.len() < 4 {
            return Err(malformed(
                owner,
                DNSResourceType::DS,
                format!("payload of {} bytes", rdata.len()),
            ));
        }
        let digest_type =
            DigestType::from_u8(rdata[3]).ok_or(DnsSecError::UnsupportedDigestType(rdata[3]))?;
        let digest = rdata[4..].to_vec();
        if digest_type.is_supported() && digest.len() != digest_type.digest_len() {
            return Err(malformed(
                owner,
                DNSResourceType::DS,
                format!("{} digest of {} bytes", digest_type, digest.len()),
            ));
        }
        Ok(Self {
            key_tag: u16::from_be_bytes([rdata[0], rdata[1]]),
            algorithm: rdata[2],
            digest_type,
            digest,
        })
    }

    pub fn from_record(record: &DNSResource) -> Result<Self> {
        if record.rtype != DNSResourceType::DS {
            return Err(DnsSecError::TypeMismatch {
                owner: record.name.clone(),
                rtype: record.rtype,
                reason: "expected DS".to_string(),
            });
        }
        Self::from_rdata(&record.name, &record.rdata)
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut rdata = Vec::with_capacity(4 + self.digest.len());
        rdata.extend_from_slice(&self.key_tag.to_be_bytes());
        rdata.push(self.algorithm);
        rdata.push(self.digest_type.to_u8());
        rdata.extend_from_slice(&self.digest);
        rdata
    }

    pub fn to_record(&self, owner: Name, class: DNSResourceClass, ttl: u32) -> DNSResource {
        DNSResource::new(owner, DNSResourceType::DS, class, ttl, self.to_rdata())
    }
}

impl fmt::Display for Ds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm,
            self.digest_type.to_u8(),
            hex::encode_upper(&self.digest)
        )
    }
}
