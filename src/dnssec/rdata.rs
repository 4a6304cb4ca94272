use std::collections::BTreeSet;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::DateTime;

use super::errors::{DnsSecError, Result, malformed};
use crate::dns::{DNSResource, DNSResourceClass, DNSResourceType, Name};
use crate::error::DnsError;

/// RRSIG payload (RFC 4034 section 3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rrsig {
    pub type_covered: DNSResourceType,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: Name,
    pub signature: Vec<u8>,
}

impl Rrsig {
    /// Fixed-size fields before the signer name
    pub const HEADER_LEN: usize = 18;

    pub fn from_rdata(owner: &Name, rdata: &[u8]) -> Result<Self> {
        if rdata.len() < Self::HEADER_LEN + 1 {
            return Err(malformed(
                owner,
                DNSResourceType::RRSIG,
                format!("payload of {} bytes", rdata.len()),
            ));
        }
        let (signer_name, name_len) = Name::from_wire(&rdata[Self::HEADER_LEN..])
            .map_err(|e| malformed(owner, DNSResourceType::RRSIG, e))?;
        let u32_at = |pos: usize| {
            u32::from_be_bytes([rdata[pos], rdata[pos + 1], rdata[pos + 2], rdata[pos + 3]])
        };
        Ok(Self {
            type_covered: u16::from_be_bytes([rdata[0], rdata[1]]).into(),
            algorithm: rdata[2],
            labels: rdata[3],
            original_ttl: u32_at(4),
            expiration: u32_at(8),
            inception: u32_at(12),
            key_tag: u16::from_be_bytes([rdata[16], rdata[17]]),
            signer_name,
            signature: rdata[Self::HEADER_LEN + name_len..].to_vec(),
        })
    }

    pub fn from_record(record: &DNSResource) -> Result<Self> {
        if record.rtype != DNSResourceType::RRSIG {
            return Err(DnsSecError::TypeMismatch {
                owner: record.name.clone(),
                rtype: record.rtype,
                reason: "expected RRSIG".to_string(),
            });
        }
        if !record.has_consistent_length() {
            return Err(malformed(
                &record.name,
                record.rtype,
                format!("rdlength {} for {} bytes", record.rdlength, record.rdata.len()),
            ));
        }
        Self::from_rdata(&record.name, &record.rdata)
    }

    fn write_fixed(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.type_covered.code().to_be_bytes());
        out.push(self.algorithm);
        out.push(self.labels);
        out.extend_from_slice(&self.original_ttl.to_be_bytes());
        out.extend_from_slice(&self.expiration.to_be_bytes());
        out.extend_from_slice(&self.inception.to_be_bytes());
        out.extend_from_slice(&self.key_tag.to_be_bytes());
    }

    /// Payload without the signature and with the signer name lowercased,
    /// the prefix of the data a signature is computed over
    pub fn write_signed_header(&self, out: &mut Vec<u8>) {
        self.write_fixed(out);
        self.signer_name.write_canonical_wire(out);
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            Self::HEADER_LEN + self.signer_name.wire_len() + self.signature.len(),
        );
        self.write_fixed(&mut out);
        out.extend_from_slice(&self.signer_name.to_wire());
        out.extend_from_slice(&self.signature);
        out
    }

    /// The RRSIG record, with the covered rrset's original TTL
    pub fn to_record(&self, owner: Name, class: DNSResourceClass) -> DNSResource {
        DNSResource::new(
            owner,
            DNSResourceType::RRSIG,
            class,
            self.original_ttl,
            self.to_rdata(),
        )
    }

    /// Inception and expiration are both inclusive
    pub fn is_current(&self, now: u32) -> bool {
        self.inception <= now && now <= self.expiration
    }
}

fn format_timestamp(secs: u32) -> String {
    DateTime::from_timestamp(i64::from(secs), 0)
        .map(|t| t.format("%Y%m%d%H%M%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

impl fmt::Display for Rrsig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            self.algorithm,
            self.labels,
            self.original_ttl,
            format_timestamp(self.expiration),
            format_timestamp(self.inception),
            self.key_tag,
            self.signer_name,
            STANDARD.encode(&self.signature)
        )
    }
}

/// Set of type codes in the NSEC window-block encoding (RFC 4034 section 4.1.2)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeBitmap(BTreeSet<u16>);

impl TypeBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rtype: DNSResourceType) {
        self.0.insert(rtype.code());
    }

    pub fn contains(&self, rtype: DNSResourceType) -> bool {
        self.0.contains(&rtype.code())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = DNSResourceType> + '_ {
        self.0.iter().map(|&code| DNSResourceType::from(code))
    }

    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut window: Option<(u8, [u8; 32], usize)> = None;
        for &code in &self.0 {
            let (hi, lo) = ((code >> 8) as u8, (code & 0xFF) as u8);
            match window {
                Some((w, _, _)) if w == hi => {}
                _ => {
                    if let Some((w, bits, len)) = window.take() {
                        write_window(&mut out, w, &bits[..len]);
                    }
                    window = Some((hi, [0u8; 32], 0));
                }
            }
            if let Some((_, bits, len)) = window.as_mut() {
                let byte = usize::from(lo / 8);
                bits[byte] |= 0x80 >> (lo % 8);
                *len = (*len).max(byte + 1);
            }
        }
        if let Some((w, bits, len)) = window {
            write_window(&mut out, w, &bits[..len]);
        }
        out
    }

    pub fn from_wire(data: &[u8]) -> std::result::Result<Self, DnsError> {
        let mut types = BTreeSet::new();
        let mut pos = 0;
        let mut last_window: Option<u8> = None;
        while pos < data.len() {
            let header = data.get(pos..pos + 2).ok_or(DnsError::BufferTooSmall {
                need: pos + 2,
                have: data.len(),
            })?;
            let (window, len) = (header[0], usize::from(header[1]));
            if last_window.is_some_and(|w| w >= window) {
                return Err(DnsError::Parse(format!("window {window} out of order")));
            }
            if len == 0 || len > 32 {
                return Err(DnsError::Parse(format!("bitmap length {len}")));
            }
            let bits = data
                .get(pos + 2..pos + 2 + len)
                .ok_or(DnsError::BufferTooSmall {
                    need: pos + 2 + len,
                    have: data.len(),
                })?;
            for (i, &byte) in bits.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (0x80 >> bit) != 0 {
                        types.insert(u16::from(window) << 8 | (i * 8 + bit) as u16);
                    }
                }
            }
            last_window = Some(window);
            pos += 2 + len;
        }
        Ok(Self(types))
    }
}

fn write_window(out: &mut Vec<u8>, window: u8, bits: &[u8]) {
    out.push(window);
    out.push(bits.len() as u8);
    out.extend_from_slice(bits);
}

impl FromIterator<DNSResourceType> for TypeBitmap {
    fn from_iter<I: IntoIterator<Item = DNSResourceType>>(iter: I) -> Self {
        Self(iter.into_iter().map(DNSResourceType::code).collect())
    }
}

impl fmt::Display for TypeBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.types().map(|t| t.to_string()).collect();
        write!(f, "{}", names.join(" "))
    }
}
