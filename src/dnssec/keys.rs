use std::fmt;
use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::signature::{
    self, EcdsaKeyPair, Ed25519KeyPair, KeyPair as RingKeyPair, RsaKeyPair,
};

use super::algorithm::DnsSecAlgorithm;
use super::errors::{DnsSecError, Result, malformed};
use super::key_tag::key_tag_from_rdata;
use super::legacy::{self, DsaKeyPair};
use super::random::RandomContext;
use crate::dns::{DNSResource, DNSResourceClass, DNSResourceType, Name};

/// DNSKEY protocol field, always 3 (RFC 4034 section 2.1.2)
pub const DNSSEC_PROTOCOL: u8 = 3;
pub const ZONE_KEY_FLAG: u16 = 0x0100;
pub const SEP_FLAG: u16 = 0x0001;
pub const REVOKE_FLAG: u16 = 0x0080;

/// A public DNSSEC key as carried in a DNSKEY record
#[derive(Debug, Clone)]
pub struct DnsKey {
    flags: u16,
    protocol: u8,
    algorithm: u8,
    public_key: Vec<u8>,
    key_tag: OnceLock<u16>,
}

impl DnsKey {
    pub fn new(flags: u16, algorithm: u8, public_key: Vec<u8>) -> Self {
        Self {
            flags,
            protocol: DNSSEC_PROTOCOL,
            algorithm,
            public_key,
            key_tag: OnceLock::new(),
        }
    }

    pub fn from_rdata(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < 4 {
            return Err(DnsSecError::InvalidKey(format!(
                "DNSKEY payload of {} bytes",
                rdata.len()
            )));
        }
        let protocol = rdata[2];
        if protocol != DNSSEC_PROTOCOL {
            return Err(DnsSecError::InvalidKey(format!(
                "DNSKEY protocol {protocol}"
            )));
        }
        Ok(Self {
            flags: u16::from_be_bytes([rdata[0], rdata[1]]),
            protocol,
            algorithm: rdata[3],
            public_key: rdata[4..].to_vec(),
            key_tag: OnceLock::new(),
        })
    }

    pub fn from_record(record: &DNSResource) -> Result<Self> {
        if record.rtype != DNSResourceType::DNSKEY {
            return Err(DnsSecError::TypeMismatch {
                owner: record.name.clone(),
                rtype: record.rtype,
                reason: "expected DNSKEY".to_string(),
            });
        }
        if !record.has_consistent_length() {
            return Err(malformed(
                &record.name,
                record.rtype,
                format!("rdlength {} for {} bytes", record.rdlength, record.rdata.len()),
            ));
        }
        Self::from_rdata(&record.rdata)
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn is_zone_key(&self) -> bool {
        self.flags & ZONE_KEY_FLAG != 0
    }

    pub fn is_sep(&self) -> bool {
        self.flags & SEP_FLAG != 0
    }

    pub fn is_revoked(&self) -> bool {
        self.flags & REVOKE_FLAG != 0
    }

    /// Keytag, computed on first use
    pub fn key_tag(&self) -> u16 {
        *self
            .key_tag
            .get_or_init(|| key_tag_from_rdata(&self.to_rdata()))
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut rdata = Vec::with_capacity(4 + self.public_key.len());
        rdata.extend_from_slice(&self.flags.to_be_bytes());
        rdata.push(self.protocol);
        rdata.push(self.algorithm);
        rdata.extend_from_slice(&self.public_key);
        rdata
    }

    pub fn to_record(&self, owner: Name, class: DNSResourceClass, ttl: u32) -> DNSResource {
        DNSResource::new(owner, DNSResourceType::DNSKEY, class, ttl, self.to_rdata())
    }
}

impl PartialEq for DnsKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
            && self.key_tag() == other.key_tag()
            && self.public_key == other.public_key
    }
}

impl Eq for DnsKey {}

impl fmt::Display for DnsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.flags,
            self.protocol,
            self.algorithm,
            STANDARD.encode(&self.public_key)
        )
    }
}

/// Encode an RSA public key per RFC 3110
pub(crate) fn rsa_encode(e: &[u8], n: &[u8]) -> Vec<u8> {
    let e = strip_leading_zeros(e);
    let n = strip_leading_zeros(n);
    let mut key = Vec::with_capacity(3 + e.len() + n.len());
    if let Ok(len) = u8::try_from(e.len()) {
        key.push(len);
    } else {
        key.push(0);
        key.extend_from_slice(&(e.len() as u16).to_be_bytes());
    }
    key.extend_from_slice(e);
    key.extend_from_slice(n);
    key
}

/// Split an RFC 3110 RSA public key into exponent and modulus
pub(crate) fn rsa_decode(key: &[u8]) -> Result<(&[u8], &[u8])> {
    let (exp_len, rest) = match key {
        [0, hi, lo, rest @ ..] => (usize::from(u16::from_be_bytes([*hi, *lo])), rest),
        [len, rest @ ..] => (usize::from(*len), rest),
        [] => return Err(DnsSecError::InvalidKey("empty RSA key".to_string())),
    };
    if exp_len == 0 || rest.len() <= exp_len {
        return Err(DnsSecError::InvalidKey(format!(
            "RSA exponent length {exp_len} for {} key bytes",
            rest.len()
        )));
    }
    let (e, n) = rest.split_at(exp_len);
    Ok((strip_leading_zeros(e), strip_leading_zeros(n)))
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Private key material
pub enum KeyPair {
    Rsa(RsaKeyPair),
    /// RSA key for RSA/MD5 and RSA/SHA-1, any RFC 3110 size
    LegacyRsa(rsa::RsaPrivateKey),
    Dsa(DsaKeyPair),
    EcdsaP256(EcdsaKeyPair),
    EcdsaP384(EcdsaKeyPair),
    Ed25519(Ed25519KeyPair),
}

impl KeyPair {
    /// Public key in DNSKEY wire format
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            KeyPair::Rsa(pair) => {
                let components: ring::rsa::PublicKeyComponents<Vec<u8>> = pair.public().into();
                rsa_encode(&components.e, &components.n)
            }
            KeyPair::LegacyRsa(key) => legacy::rsa_public_key(key),
            KeyPair::Dsa(pair) => pair.public_key(),
            // ring prefixes the uncompressed point with 0x04
            KeyPair::EcdsaP256(pair) | KeyPair::EcdsaP384(pair) => {
                pair.public_key().as_ref()[1..].to_vec()
            }
            KeyPair::Ed25519(pair) => pair.public_key().as_ref().to_vec(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            KeyPair::Rsa(_) => "RSA",
            KeyPair::LegacyRsa(_) => "legacy RSA",
            KeyPair::Dsa(_) => "DSA",
            KeyPair::EcdsaP256(_) => "ECDSA P-256",
            KeyPair::EcdsaP384(_) => "ECDSA P-384",
            KeyPair::Ed25519(_) => "Ed25519",
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({})", self.kind())
    }
}

/// A zone signing key: owner, public DNSKEY and private key pair
#[derive(Debug)]
pub struct SigningKey {
    owner: Name,
    dnskey: DnsKey,
    algorithm: DnsSecAlgorithm,
    pair: KeyPair,
}

impl SigningKey {
    fn from_pair(owner: Name, algorithm: DnsSecAlgorithm, flags: u16, pair: KeyPair) -> Self {
        let dnskey = DnsKey::new(flags, algorithm.to_u8(), pair.public_key_bytes());
        Self {
            owner,
            dnskey,
            algorithm,
            pair,
        }
    }

    /// Load a private key from a PKCS#8 document
    pub fn from_pkcs8(
        owner: Name,
        algorithm: DnsSecAlgorithm,
        flags: u16,
        pkcs8: &[u8],
        random: &RandomContext,
    ) -> Result<Self> {
        let rejected = |e: ring::error::KeyRejected| DnsSecError::InvalidKey(e.to_string());
        let pair = match algorithm {
            DnsSecAlgorithm::RsaSha256 | DnsSecAlgorithm::RsaSha512 => {
                KeyPair::Rsa(RsaKeyPair::from_pkcs8(pkcs8).map_err(rejected)?)
            }
            DnsSecAlgorithm::RsaMd5
            | DnsSecAlgorithm::RsaSha1
            | DnsSecAlgorithm::RsaSha1Nsec3Sha1 => {
                KeyPair::LegacyRsa(legacy::rsa_from_pkcs8(pkcs8)?)
            }
            DnsSecAlgorithm::DSA | DnsSecAlgorithm::DsaNsec3Sha1 => {
                KeyPair::Dsa(DsaKeyPair::from_pkcs8(pkcs8)?)
            }
            DnsSecAlgorithm::EcdsaP256Sha256 => KeyPair::EcdsaP256(
                EcdsaKeyPair::from_pkcs8(
                    &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
                    pkcs8,
                    random.system(),
                )
                .map_err(rejected)?,
            ),
            DnsSecAlgorithm::EcdsaP384Sha384 => KeyPair::EcdsaP384(
                EcdsaKeyPair::from_pkcs8(
                    &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
                    pkcs8,
                    random.system(),
                )
                .map_err(rejected)?,
            ),
            DnsSecAlgorithm::Ed25519 => KeyPair::Ed25519(
                Ed25519KeyPair::from_pkcs8_maybe_unchecked(pkcs8).map_err(rejected)?,
            ),
            other => return Err(DnsSecError::UnsupportedAlgorithm(other.to_u8())),
        };
        Ok(Self::from_pair(owner, algorithm, flags, pair))
    }

    /// Ed25519 key from a raw 32-byte seed
    pub fn from_ed25519_seed(owner: Name, flags: u16, seed: &[u8]) -> Result<Self> {
        let pair = Ed25519KeyPair::from_seed_unchecked(seed)
            .map_err(|e| DnsSecError::InvalidKey(e.to_string()))?;
        Ok(Self::from_pair(
            owner,
            DnsSecAlgorithm::Ed25519,
            flags,
            KeyPair::Ed25519(pair),
        ))
    }

    /// Generate a fresh key. RSA and DSA keys must be loaded from PKCS#8.
    pub fn generate(
        owner: Name,
        algorithm: DnsSecAlgorithm,
        flags: u16,
        random: &RandomContext,
    ) -> Result<Self> {
        let unspecified =
            |_: ring::error::Unspecified| DnsSecError::Crypto("key generation failed".to_string());
        match algorithm {
            DnsSecAlgorithm::Ed25519 => {
                let mut seed = [0u8; 32];
                random.fill(&mut seed);
                Self::from_ed25519_seed(owner, flags, &seed)
            }
            DnsSecAlgorithm::EcdsaP256Sha256 => {
                let doc = EcdsaKeyPair::generate_pkcs8(
                    &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
                    random.system(),
                )
                .map_err(unspecified)?;
                Self::from_pkcs8(owner, algorithm, flags, doc.as_ref(), random)
            }
            DnsSecAlgorithm::EcdsaP384Sha384 => {
                let doc = EcdsaKeyPair::generate_pkcs8(
                    &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
                    random.system(),
                )
                .map_err(unspecified)?;
                Self::from_pkcs8(owner, algorithm, flags, doc.as_ref(), random)
            }
            other => Err(DnsSecError::UnsupportedAlgorithm(other.to_u8())),
        }
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn dnskey(&self) -> &DnsKey {
        &self.dnskey
    }

    pub fn algorithm(&self) -> DnsSecAlgorithm {
        self.algorithm
    }

    pub fn key_tag(&self) -> u16 {
        self.dnskey.key_tag()
    }

    /// Key-signing key (SEP flag set)
    pub fn is_ksk(&self) -> bool {
        self.dnskey.is_sep()
    }

    pub(crate) fn pair(&self) -> &KeyPair {
        &self.pair
    }

    pub fn to_dnskey_record(&self, class: DNSResourceClass, ttl: u32) -> DNSResource {
        self.dnskey.to_record(self.owner.clone(), class, ttl)
    }
}
