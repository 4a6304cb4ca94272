use std::fmt;
use std::str::FromStr;

use ring::digest;

use super::errors::{DnsSecError, Result};

/// DS digest types (RFC 4034, 4509, 6605)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DigestType {
    Reserved = 0,
    /// SHA-1 (RFC 3658)
    Sha1 = 1,
    /// SHA-256 (RFC 4509)
    Sha256 = 2,
    /// GOST R 34.11-94, recognized but not computed
    Gost94 = 3,
    /// SHA-384 (RFC 6605)
    Sha384 = 4,
}

impl DigestType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Reserved),
            1 => Some(Self::Sha1),
            2 => Some(Self::Sha256),
            3 => Some(Self::Gost94),
            4 => Some(Self::Sha384),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn is_supported(&self) -> bool {
        self.ring_algorithm().is_some()
    }

    /// Check if digest type is recommended (RFC 8624)
    pub fn is_recommended(&self) -> bool {
        matches!(self, Self::Sha256)
    }

    pub fn digest_len(&self) -> usize {
        match self {
            Self::Reserved => 0,
            Self::Sha1 => 20,
            Self::Sha256 | Self::Gost94 => 32,
            Self::Sha384 => 48,
        }
    }

    fn ring_algorithm(&self) -> Option<&'static digest::Algorithm> {
        match self {
            Self::Sha1 => Some(&digest::SHA1_FOR_LEGACY_USE_ONLY),
            Self::Sha256 => Some(&digest::SHA256),
            Self::Sha384 => Some(&digest::SHA384),
            Self::Reserved | Self::Gost94 => None,
        }
    }

    /// Digest `data`, failing for types without an implementation
    pub fn digest(&self, data: &[u8]) -> Result<Vec<u8>> {
        let algorithm = self
            .ring_algorithm()
            .ok_or(DnsSecError::UnsupportedDigestType(self.to_u8()))?;
        Ok(digest::digest(algorithm, data).as_ref().to_vec())
    }
}

impl FromStr for DigestType {
    type Err = DnsSecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" | "1" => Ok(Self::Sha1),
            "SHA256" | "2" => Ok(Self::Sha256),
            "GOST94" | "GOST" | "3" => Ok(Self::Gost94),
            "SHA384" | "4" => Ok(Self::Sha384),
            other => Err(DnsSecError::UnsupportedDigestType(
                other.parse::<u8>().unwrap_or(0),
            )),
        }
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved => write!(f, "RESERVED"),
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Gost94 => write!(f, "GOST94"),
            Self::Sha384 => write!(f, "SHA384"),
        }
    }
}
