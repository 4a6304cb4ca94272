//! RSA and DSA operations outside ring's range.
//!
//! ring only handles RSA moduli of at least 1024 bits and has no MD5 or DSA
//! support. RSA/MD5, short RFC 3110 moduli and RFC 2536 DSA keys go through
//! the RustCrypto `rsa` and `dsa` crates instead.

use dsa::signature::{DigestSigner, DigestVerifier};
use md5::Md5;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};

use super::errors::{DnsSecError, Result};
use super::keys::rsa_encode;
use super::primitive::{DsaSignature, SignatureScheme};

/// Largest RSA modulus accepted, in bits
pub(crate) const RSA_MAX_BITS: usize = 8192;
/// Smallest RSA modulus accepted, in bits (RFC 3110)
pub(crate) const RSA_MIN_BITS: usize = 512;

const DSA_Q_LEN: usize = 20;

fn pkcs1_digest(scheme: SignatureScheme, data: &[u8]) -> Result<(Pkcs1v15Sign, Vec<u8>)> {
    Ok(match scheme {
        SignatureScheme::RsaMd5 => (Pkcs1v15Sign::new::<Md5>(), Md5::digest(data).to_vec()),
        SignatureScheme::RsaSha1 => (Pkcs1v15Sign::new::<Sha1>(), Sha1::digest(data).to_vec()),
        SignatureScheme::RsaSha256 => {
            (Pkcs1v15Sign::new::<Sha256>(), Sha256::digest(data).to_vec())
        }
        SignatureScheme::RsaSha512 => {
            (Pkcs1v15Sign::new::<Sha512>(), Sha512::digest(data).to_vec())
        }
        other => return Err(DnsSecError::UnsupportedAlgorithm(other.code())),
    })
}

/// PKCS#1 v1.5 verification for RSA keys ring refuses
pub(crate) fn rsa_verify(
    scheme: SignatureScheme,
    signed_data: &[u8],
    sig: &[u8],
    e: &[u8],
    n: &[u8],
) -> Result<bool> {
    let key = RsaPublicKey::new_with_max_size(
        rsa::BigUint::from_bytes_be(n),
        rsa::BigUint::from_bytes_be(e),
        RSA_MAX_BITS,
    )
    .map_err(|err| DnsSecError::InvalidKey(format!("RSA public key: {err}")))?;
    let (padding, hashed) = pkcs1_digest(scheme, signed_data)?;
    Ok(key.verify(padding, &hashed, sig).is_ok())
}

pub(crate) fn rsa_sign(
    scheme: SignatureScheme,
    signed_data: &[u8],
    key: &RsaPrivateKey,
) -> Result<Vec<u8>> {
    let (padding, hashed) = pkcs1_digest(scheme, signed_data)?;
    key.sign(padding, &hashed).map_err(|err| {
        DnsSecError::Crypto(format!("signing with algorithm {} failed: {err}", scheme.code()))
    })
}

/// Load an RSA private key of any RFC 3110 size
pub(crate) fn rsa_from_pkcs8(pkcs8: &[u8]) -> Result<RsaPrivateKey> {
    let key = RsaPrivateKey::from_pkcs8_der(pkcs8)
        .map_err(|err| DnsSecError::InvalidKey(format!("RSA private key: {err}")))?;
    let bits = key.n().bits();
    if !(RSA_MIN_BITS..=RSA_MAX_BITS).contains(&bits) {
        return Err(DnsSecError::InvalidKey(format!("RSA modulus of {bits} bits")));
    }
    Ok(key)
}

pub(crate) fn rsa_public_key(key: &RsaPrivateKey) -> Vec<u8> {
    rsa_encode(&key.e().to_bytes_be(), &key.n().to_bytes_be())
}

/// DSA key pair with its RFC 2536 size parameter T
pub struct DsaKeyPair {
    key: dsa::SigningKey,
    t: u8,
}

impl DsaKeyPair {
    pub fn from_pkcs8(pkcs8: &[u8]) -> Result<Self> {
        let key = dsa::SigningKey::from_pkcs8_der(pkcs8)
            .map_err(|err| DnsSecError::InvalidKey(format!("DSA private key: {err}")))?;
        let components = key.verifying_key().components();
        let p_len = components.p().to_bytes_be().len();
        let q_len = components.q().to_bytes_be().len();
        let t = p_len
            .checked_sub(64)
            .filter(|extra| extra % 8 == 0 && extra / 8 <= 8)
            .map(|extra| (extra / 8) as u8)
            .filter(|_| q_len <= DSA_Q_LEN)
            .ok_or_else(|| {
                DnsSecError::InvalidKey(format!("DSA parameters of {} bits", p_len * 8))
            })?;
        Ok(Self { key, t })
    }

    /// Public key in RFC 2536 form: T, Q, P, G, Y
    pub fn public_key(&self) -> Vec<u8> {
        let width = dsa_width(self.t);
        let verifying = self.key.verifying_key();
        let components = verifying.components();
        let mut out = Vec::with_capacity(1 + DSA_Q_LEN + 3 * width);
        out.push(self.t);
        out.extend_from_slice(&left_pad(&components.q().to_bytes_be(), DSA_Q_LEN));
        out.extend_from_slice(&left_pad(&components.p().to_bytes_be(), width));
        out.extend_from_slice(&left_pad(&components.g().to_bytes_be(), width));
        out.extend_from_slice(&left_pad(&verifying.y().to_bytes_be(), width));
        out
    }

    /// SHA-1 DSA signature in wire form T || R || S
    pub fn sign(&self, signed_data: &[u8]) -> Result<Vec<u8>> {
        let signature: dsa::Signature = self
            .key
            .try_sign_digest(Sha1::new_with_prefix(signed_data))
            .map_err(|err| DnsSecError::Crypto(format!("DSA signing failed: {err}")))?;
        let r = fixed_integer(&signature.r().to_bytes_be())?;
        let s = fixed_integer(&signature.s().to_bytes_be())?;
        Ok(DsaSignature { t: self.t, r, s }.to_wire())
    }
}

pub(crate) fn dsa_verify(signed_data: &[u8], sig: &[u8], public_key: &[u8]) -> Result<bool> {
    let wire = DsaSignature::from_wire(sig)?;
    let key = dsa_verifying_key(public_key)?;
    let Ok(signature) = dsa::Signature::from_components(
        dsa::BigUint::from_bytes_be(&wire.r),
        dsa::BigUint::from_bytes_be(&wire.s),
    ) else {
        return Ok(false);
    };
    Ok(key
        .verify_digest(Sha1::new_with_prefix(signed_data), &signature)
        .is_ok())
}

fn dsa_width(t: u8) -> usize {
    64 + 8 * usize::from(t)
}

fn dsa_verifying_key(key: &[u8]) -> Result<dsa::VerifyingKey> {
    let t = *key
        .first()
        .ok_or_else(|| DnsSecError::InvalidKey("empty DSA key".to_string()))?;
    let width = dsa_width(t);
    if t > 8 || key.len() != 1 + DSA_Q_LEN + 3 * width {
        return Err(DnsSecError::InvalidKey(format!(
            "DSA key of {} bytes with T={t}",
            key.len()
        )));
    }
    let (q, rest) = key[1..].split_at(DSA_Q_LEN);
    let (p, rest) = rest.split_at(width);
    let (g, y) = rest.split_at(width);

    let rejected = |err: dsa::signature::Error| DnsSecError::InvalidKey(format!("DSA key: {err}"));
    let components = dsa::Components::from_components(
        dsa::BigUint::from_bytes_be(p),
        dsa::BigUint::from_bytes_be(q),
        dsa::BigUint::from_bytes_be(g),
    )
    .map_err(rejected)?;
    dsa::VerifyingKey::from_components(components, dsa::BigUint::from_bytes_be(y)).map_err(rejected)
}

fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width.saturating_sub(bytes.len())];
    out.extend_from_slice(bytes);
    out
}

fn fixed_integer(bytes: &[u8]) -> Result<[u8; DSA_Q_LEN]> {
    let mut out = [0u8; DSA_Q_LEN];
    let start = DSA_Q_LEN
        .checked_sub(bytes.len())
        .ok_or_else(|| DnsSecError::Crypto(format!("DSA integer of {} bytes", bytes.len())))?;
    out[start..].copy_from_slice(bytes);
    Ok(out)
}
