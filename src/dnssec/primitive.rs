//! Per-algorithm signature primitives.
//!
//! Every DNSSEC algorithm maps onto one [`SignatureScheme`]; the scheme knows
//! the key and signature encodings of its algorithm and hands the actual
//! mathematics to ring, or to [`super::legacy`] for what ring lacks. Hashing
//! happens inside the backend, so callers pass the canonical signed data as is.

use ring::signature::{self, RsaPublicKeyComponents, UnparsedPublicKey};

use super::algorithm::DnsSecAlgorithm;
use super::errors::{DnsSecError, Result};
use super::keys::{KeyPair, rsa_decode};
use super::legacy::{self, RSA_MAX_BITS, RSA_MIN_BITS};
use super::random::RandomContext;

// ring refuses shorter moduli
const RING_RSA_MIN_MODULUS: usize = 1024 / 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    RsaMd5,
    RsaSha1,
    RsaSha256,
    RsaSha512,
    Dsa,
    EcdsaP256Sha256,
    EcdsaP384Sha384,
    Ed25519,
}

impl SignatureScheme {
    pub fn for_algorithm(algorithm: DnsSecAlgorithm) -> Option<Self> {
        match algorithm {
            DnsSecAlgorithm::RsaMd5 => Some(Self::RsaMd5),
            DnsSecAlgorithm::RsaSha1 | DnsSecAlgorithm::RsaSha1Nsec3Sha1 => Some(Self::RsaSha1),
            DnsSecAlgorithm::RsaSha256 => Some(Self::RsaSha256),
            DnsSecAlgorithm::RsaSha512 => Some(Self::RsaSha512),
            DnsSecAlgorithm::DSA | DnsSecAlgorithm::DsaNsec3Sha1 => Some(Self::Dsa),
            DnsSecAlgorithm::EcdsaP256Sha256 => Some(Self::EcdsaP256Sha256),
            DnsSecAlgorithm::EcdsaP384Sha384 => Some(Self::EcdsaP384Sha384),
            DnsSecAlgorithm::Ed25519 => Some(Self::Ed25519),
            _ => None,
        }
    }

    /// Scheme for an algorithm number, `UnsupportedAlgorithm` if there is none
    pub fn from_u8(code: u8) -> Result<Self> {
        DnsSecAlgorithm::from_u8(code)
            .and_then(Self::for_algorithm)
            .ok_or(DnsSecError::UnsupportedAlgorithm(code))
    }

    /// Primary algorithm number of the scheme
    pub fn code(self) -> u8 {
        match self {
            Self::RsaMd5 => 1,
            Self::Dsa => 3,
            Self::RsaSha1 => 5,
            Self::RsaSha256 => 8,
            Self::RsaSha512 => 10,
            Self::EcdsaP256Sha256 => 13,
            Self::EcdsaP384Sha384 => 14,
            Self::Ed25519 => 15,
        }
    }

    fn ring_rsa_params(self) -> Option<&'static signature::RsaParameters> {
        match self {
            Self::RsaSha1 => Some(&signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY),
            Self::RsaSha256 => Some(&signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY),
            Self::RsaSha512 => Some(&signature::RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY),
            _ => None,
        }
    }

    /// Verify `signature` over `signed_data` with a DNSKEY public key.
    ///
    /// `Ok(false)` means the signature does not match; errors report keys or
    /// signatures that cannot be used at all.
    pub fn verify(self, signed_data: &[u8], sig: &[u8], public_key: &[u8]) -> Result<bool> {
        match self {
            Self::Dsa => legacy::dsa_verify(signed_data, sig, public_key),
            Self::RsaMd5 | Self::RsaSha1 | Self::RsaSha256 | Self::RsaSha512 => {
                let (e, n) = rsa_decode(public_key)?;
                if !(RSA_MIN_BITS / 8..=RSA_MAX_BITS / 8).contains(&n.len()) {
                    return Err(DnsSecError::InvalidKey(format!(
                        "RSA modulus of {} bits",
                        n.len() * 8
                    )));
                }
                if sig.len() != n.len() {
                    return Err(self.malformed_signature(sig));
                }
                match self.ring_rsa_params() {
                    Some(params) if n.len() >= RING_RSA_MIN_MODULUS => {
                        let components = RsaPublicKeyComponents { n, e };
                        Ok(components.verify(params, signed_data, sig).is_ok())
                    }
                    _ => legacy::rsa_verify(self, signed_data, sig, e, n),
                }
            }
            Self::EcdsaP256Sha256 | Self::EcdsaP384Sha384 => {
                let (params, width) = match self {
                    Self::EcdsaP256Sha256 => (&signature::ECDSA_P256_SHA256_FIXED, 64),
                    _ => (&signature::ECDSA_P384_SHA384_FIXED, 96),
                };
                if public_key.len() != width {
                    return Err(DnsSecError::InvalidKey(format!(
                        "ECDSA public key of {} bytes",
                        public_key.len()
                    )));
                }
                if sig.len() != width {
                    return Err(self.malformed_signature(sig));
                }
                let mut point = Vec::with_capacity(width + 1);
                point.push(0x04);
                point.extend_from_slice(public_key);
                Ok(UnparsedPublicKey::new(params, point)
                    .verify(signed_data, sig)
                    .is_ok())
            }
            Self::Ed25519 => {
                if public_key.len() != 32 {
                    return Err(DnsSecError::InvalidKey(format!(
                        "Ed25519 public key of {} bytes",
                        public_key.len()
                    )));
                }
                if sig.len() != 64 {
                    return Err(self.malformed_signature(sig));
                }
                Ok(UnparsedPublicKey::new(&signature::ED25519, public_key)
                    .verify(signed_data, sig)
                    .is_ok())
            }
        }
    }

    /// Sign `signed_data` with a key pair of the matching kind
    pub fn sign(self, signed_data: &[u8], pair: &KeyPair, random: &RandomContext) -> Result<Vec<u8>> {
        let failed = |_: ring::error::Unspecified| {
            DnsSecError::Crypto(format!("signing with algorithm {} failed", self.code()))
        };
        match (self, pair) {
            (Self::RsaSha256 | Self::RsaSha512, KeyPair::Rsa(key)) => {
                let padding = if self == Self::RsaSha256 {
                    &signature::RSA_PKCS1_SHA256
                } else {
                    &signature::RSA_PKCS1_SHA512
                };
                let mut buf = vec![0u8; key.public().modulus_len()];
                key.sign(padding, random.system(), signed_data, &mut buf)
                    .map_err(failed)?;
                Ok(buf)
            }
            (
                Self::RsaMd5 | Self::RsaSha1 | Self::RsaSha256 | Self::RsaSha512,
                KeyPair::LegacyRsa(key),
            ) => legacy::rsa_sign(self, signed_data, key),
            (Self::Dsa, KeyPair::Dsa(key)) => key.sign(signed_data),
            (Self::EcdsaP256Sha256, KeyPair::EcdsaP256(key))
            | (Self::EcdsaP384Sha384, KeyPair::EcdsaP384(key)) => key
                .sign(random.system(), signed_data)
                .map(|sig| sig.as_ref().to_vec())
                .map_err(failed),
            (Self::Ed25519, KeyPair::Ed25519(key)) => Ok(key.sign(signed_data).as_ref().to_vec()),
            (scheme, pair) => Err(DnsSecError::SigningKeyMismatch {
                algorithm: scheme.code(),
                reason: format!("{} key pair", pair.kind()),
            }),
        }
    }

    fn malformed_signature(self, sig: &[u8]) -> DnsSecError {
        DnsSecError::MalformedSignature {
            algorithm: self.code(),
            len: sig.len(),
        }
    }
}

/// DSA signature in its RFC 2536 wire form T || R || S
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsaSignature {
    pub t: u8,
    pub r: [u8; 20],
    pub s: [u8; 20],
}

impl DsaSignature {
    pub const WIRE_LEN: usize = 41;

    pub fn from_wire(sig: &[u8]) -> Result<Self> {
        if sig.len() != Self::WIRE_LEN || sig[0] > 8 {
            return Err(DnsSecError::MalformedSignature {
                algorithm: SignatureScheme::Dsa.code(),
                len: sig.len(),
            });
        }
        let mut r = [0u8; 20];
        let mut s = [0u8; 20];
        r.copy_from_slice(&sig[1..21]);
        s.copy_from_slice(&sig[21..41]);
        Ok(Self { t: sig[0], r, s })
    }

    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::WIRE_LEN);
        out.push(self.t);
        out.extend_from_slice(&self.r);
        out.extend_from_slice(&self.s);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::Name;
    use crate::dnssec::keys::{SigningKey, ZONE_KEY_FLAG};

    const RSA2048_PKCS8: &[u8] = include_bytes!("../../tests/data/rsa2048.pk8");
    const RSA1024_PKCS8: &[u8] = include_bytes!("../../tests/data/rsa1024.pk8");
    const DSA_PKCS8: &[u8] = include_bytes!("../../tests/data/dsa1024.pk8");

    fn context() -> RandomContext {
        RandomContext::from_entropy(&[3u8; 32][..], 32).unwrap()
    }

    fn load(algorithm: DnsSecAlgorithm, pkcs8: &[u8]) -> SigningKey {
        SigningKey::from_pkcs8(Name::root(), algorithm, ZONE_KEY_FLAG, pkcs8, &context()).unwrap()
    }

    #[test]
    fn test_scheme_mapping() {
        assert_eq!(SignatureScheme::from_u8(7), Ok(SignatureScheme::RsaSha1));
        assert_eq!(SignatureScheme::from_u8(6), Ok(SignatureScheme::Dsa));
        assert_eq!(
            SignatureScheme::from_u8(16),
            Err(DnsSecError::UnsupportedAlgorithm(16))
        );
        assert_eq!(SignatureScheme::from_u8(1), Ok(SignatureScheme::RsaMd5));
    }

    #[test]
    fn test_ed25519_sign_verify() {
        let random = context();
        let key = SigningKey::generate(
            Name::root(),
            DnsSecAlgorithm::Ed25519,
            ZONE_KEY_FLAG,
            &random,
        )
        .unwrap();
        let scheme = SignatureScheme::Ed25519;
        let sig = scheme.sign(b"payload", key.pair(), &random).unwrap();
        let public = key.dnskey().public_key();
        assert_eq!(scheme.verify(b"payload", &sig, public), Ok(true));
        assert_eq!(scheme.verify(b"payloae", &sig, public), Ok(false));
        assert!(matches!(
            scheme.verify(b"payload", &sig[..63], public),
            Err(DnsSecError::MalformedSignature { algorithm: 15, len: 63 })
        ));
        assert!(matches!(
            scheme.verify(b"payload", &sig, &public[..31]),
            Err(DnsSecError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_ecdsa_sign_verify() {
        let random = context();
        for (alg, scheme) in [
            (DnsSecAlgorithm::EcdsaP256Sha256, SignatureScheme::EcdsaP256Sha256),
            (DnsSecAlgorithm::EcdsaP384Sha384, SignatureScheme::EcdsaP384Sha384),
        ] {
            let key = SigningKey::generate(Name::root(), alg, ZONE_KEY_FLAG, &random).unwrap();
            let sig = scheme.sign(b"data", key.pair(), &random).unwrap();
            assert_eq!(scheme.verify(b"data", &sig, key.dnskey().public_key()), Ok(true));
            let mut bad = sig.clone();
            bad[10] ^= 0x01;
            assert_eq!(scheme.verify(b"data", &bad, key.dnskey().public_key()), Ok(false));
        }
    }

    #[test]
    fn test_rsa_sign_verify() {
        let random = context();
        for (alg, scheme, pkcs8) in [
            (DnsSecAlgorithm::RsaSha256, SignatureScheme::RsaSha256, RSA2048_PKCS8),
            (DnsSecAlgorithm::RsaSha512, SignatureScheme::RsaSha512, RSA2048_PKCS8),
            (DnsSecAlgorithm::RsaSha1, SignatureScheme::RsaSha1, RSA1024_PKCS8),
            (DnsSecAlgorithm::RsaMd5, SignatureScheme::RsaMd5, RSA1024_PKCS8),
        ] {
            let key = load(alg, pkcs8);
            let public = key.dnskey().public_key();
            let sig = scheme.sign(b"rrset data", key.pair(), &random).unwrap();
            assert_eq!(sig.len(), rsa_decode(public).unwrap().1.len());
            assert_eq!(scheme.verify(b"rrset data", &sig, public), Ok(true), "{scheme:?}");

            let mut bad = sig.clone();
            bad[0] ^= 0x01;
            assert_eq!(scheme.verify(b"rrset data", &bad, public), Ok(false));
            assert_eq!(scheme.verify(b"rrset datb", &sig, public), Ok(false));
            assert!(matches!(
                scheme.verify(b"rrset data", &sig[1..], public),
                Err(DnsSecError::MalformedSignature { .. })
            ));
        }
    }

    #[test]
    fn test_rsa_digest_is_bound() {
        let random = context();
        let key = load(DnsSecAlgorithm::RsaSha256, RSA2048_PKCS8);
        let public = key.dnskey().public_key();
        let sig = SignatureScheme::RsaSha256
            .sign(b"data", key.pair(), &random)
            .unwrap();
        assert_eq!(SignatureScheme::RsaSha512.verify(b"data", &sig, public), Ok(false));
        assert_eq!(SignatureScheme::RsaSha1.verify(b"data", &sig, public), Ok(false));
    }

    #[test]
    fn test_dsa_sign_verify() {
        let random = context();
        let key = load(DnsSecAlgorithm::DSA, DSA_PKCS8);
        let public = key.dnskey().public_key();
        let sig = SignatureScheme::Dsa.sign(b"data", key.pair(), &random).unwrap();

        let decoded = DsaSignature::from_wire(&sig).unwrap();
        assert_eq!(decoded.t, public[0]);
        assert_eq!(decoded.to_wire(), sig);
        assert_eq!(SignatureScheme::Dsa.verify(b"data", &sig, public), Ok(true));
        assert_eq!(SignatureScheme::Dsa.verify(b"date", &sig, public), Ok(false));

        let mut bad = sig.clone();
        bad[0] = 9;
        assert!(matches!(
            SignatureScheme::Dsa.verify(b"data", &bad, public),
            Err(DnsSecError::MalformedSignature { algorithm: 3, .. })
        ));
        assert!(matches!(
            SignatureScheme::Dsa.verify(b"data", &sig, &public[..100]),
            Err(DnsSecError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_sign_with_wrong_pair() {
        let random = context();
        let key = SigningKey::generate(Name::root(), DnsSecAlgorithm::Ed25519, ZONE_KEY_FLAG, &random)
            .unwrap();
        assert!(matches!(
            SignatureScheme::EcdsaP256Sha256.sign(b"x", key.pair(), &random),
            Err(DnsSecError::SigningKeyMismatch { algorithm: 13, .. })
        ));
        assert!(matches!(
            SignatureScheme::RsaSha1.sign(b"x", key.pair(), &random),
            Err(DnsSecError::SigningKeyMismatch { algorithm: 5, .. })
        ));

        let dsa = load(DnsSecAlgorithm::DSA, DSA_PKCS8);
        assert!(matches!(
            SignatureScheme::RsaMd5.sign(b"x", dsa.pair(), &random),
            Err(DnsSecError::SigningKeyMismatch { algorithm: 1, .. })
        ));
    }

    #[test]
    fn test_rsa_key_size_limits() {
        // 384-bit modulus is below the RFC 3110 minimum
        let mut key = vec![3, 1, 0, 1];
        key.extend_from_slice(&[0xC1; 48]);
        assert!(matches!(
            SignatureScheme::RsaSha1.verify(b"x", &[0; 48], &key),
            Err(DnsSecError::InvalidKey(_))
        ));

        // 512 bits is short for ring but still checked
        let mut key = vec![3, 1, 0, 1];
        key.extend_from_slice(&[0xC1; 64]);
        assert_eq!(SignatureScheme::RsaSha256.verify(b"x", &[1; 64], &key), Ok(false));
        assert!(matches!(
            SignatureScheme::RsaSha256.verify(b"x", &[1; 63], &key),
            Err(DnsSecError::MalformedSignature { algorithm: 8, len: 63 })
        ));
    }

    #[test]
    fn test_dsa_signature_wire() {
        let mut wire = vec![2u8];
        wire.extend_from_slice(&[0xAA; 20]);
        wire.extend_from_slice(&[0xBB; 20]);
        let sig = DsaSignature::from_wire(&wire).unwrap();
        assert_eq!(sig.t, 2);
        assert_eq!(sig.s, [0xBB; 20]);
        assert_eq!(sig.to_wire(), wire);
    }
}
