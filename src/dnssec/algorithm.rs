use std::fmt;
use std::str::FromStr;

use super::errors::DnsSecError;
use super::primitive::SignatureScheme;

/// DNSSEC algorithm numbers from the IANA registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DnsSecAlgorithm {
    DeleteDS = 0,
    /// RSA/MD5, deprecated but still decodable
    RsaMd5 = 1,
    DH = 2,
    /// DSA/SHA-1 (RFC 2536)
    DSA = 3,
    /// RSA/SHA-1 (RFC 3110)
    RsaSha1 = 5,
    DsaNsec3Sha1 = 6,
    /// RSA/SHA-1 alias for NSEC3 zones
    RsaSha1Nsec3Sha1 = 7,
    /// RSA/SHA-256 (RFC 5702)
    RsaSha256 = 8,
    /// RSA/SHA-512 (RFC 5702)
    RsaSha512 = 10,
    EccGost = 12,
    /// ECDSA P-256 with SHA-256 (RFC 6605)
    EcdsaP256Sha256 = 13,
    /// ECDSA P-384 with SHA-384 (RFC 6605)
    EcdsaP384Sha384 = 14,
    /// Ed25519 (RFC 8080)
    Ed25519 = 15,
    Ed448 = 16,
    Indirect = 252,
    PrivateDNS = 253,
    PrivateOID = 254,
}

const ALL: [DnsSecAlgorithm; 17] = [
    DnsSecAlgorithm::DeleteDS,
    DnsSecAlgorithm::RsaMd5,
    DnsSecAlgorithm::DH,
    DnsSecAlgorithm::DSA,
    DnsSecAlgorithm::RsaSha1,
    DnsSecAlgorithm::DsaNsec3Sha1,
    DnsSecAlgorithm::RsaSha1Nsec3Sha1,
    DnsSecAlgorithm::RsaSha256,
    DnsSecAlgorithm::RsaSha512,
    DnsSecAlgorithm::EccGost,
    DnsSecAlgorithm::EcdsaP256Sha256,
    DnsSecAlgorithm::EcdsaP384Sha384,
    DnsSecAlgorithm::Ed25519,
    DnsSecAlgorithm::Ed448,
    DnsSecAlgorithm::Indirect,
    DnsSecAlgorithm::PrivateDNS,
    DnsSecAlgorithm::PrivateOID,
];

impl DnsSecAlgorithm {
    pub fn from_u8(value: u8) -> Option<Self> {
        ALL.iter().copied().find(|alg| alg.to_u8() == value)
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// The signature primitive for this algorithm, if one exists
    pub fn scheme(self) -> Option<SignatureScheme> {
        SignatureScheme::for_algorithm(self)
    }

    /// Check if signatures of this algorithm can be produced and verified
    pub fn is_supported(&self) -> bool {
        self.scheme().is_some()
    }

    /// Check if algorithm is recommended (RFC 8624)
    pub fn is_recommended(&self) -> bool {
        matches!(
            self,
            Self::RsaSha256 | Self::EcdsaP256Sha256 | Self::Ed25519
        )
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::DeleteDS => "DELETE",
            Self::RsaMd5 => "RSAMD5",
            Self::DH => "DH",
            Self::DSA => "DSA",
            Self::RsaSha1 => "RSASHA1",
            Self::DsaNsec3Sha1 => "DSA-NSEC3-SHA1",
            Self::RsaSha1Nsec3Sha1 => "RSASHA1-NSEC3-SHA1",
            Self::RsaSha256 => "RSASHA256",
            Self::RsaSha512 => "RSASHA512",
            Self::EccGost => "ECC-GOST",
            Self::EcdsaP256Sha256 => "ECDSAP256SHA256",
            Self::EcdsaP384Sha384 => "ECDSAP384SHA384",
            Self::Ed25519 => "ED25519",
            Self::Ed448 => "ED448",
            Self::Indirect => "INDIRECT",
            Self::PrivateDNS => "PRIVATEDNS",
            Self::PrivateOID => "PRIVATEOID",
        }
    }
}

impl FromStr for DnsSecAlgorithm {
    type Err = DnsSecError;

    /// Accepts a mnemonic (case-insensitive) or the algorithm number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(number) = s.parse::<u8>() {
            return Self::from_u8(number).ok_or(DnsSecError::UnsupportedAlgorithm(number));
        }
        ALL.iter()
            .copied()
            .find(|alg| alg.mnemonic().eq_ignore_ascii_case(s))
            .ok_or(DnsSecError::UnsupportedAlgorithm(0))
    }
}

impl fmt::Display for DnsSecAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
