use chrono::Utc;
use tracing::{debug, trace, warn};

use super::canonical::signed_data;
use super::errors::{DnsSecError, Result};
use super::keys::DnsKey;
use super::primitive::SignatureScheme;
use super::rdata::Rrsig;
use crate::dns::RRset;

/// Outcome of checking an rrset against its signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// At least one signature validated with a candidate key
    Validated,
    NoValidSignature,
}

impl Verification {
    pub fn is_validated(self) -> bool {
        self == Verification::Validated
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Verification::Validated => Ok(()),
            Verification::NoValidSignature => Err(DnsSecError::NoValidSignature),
        }
    }
}

/// Keys that validated at least one signature. Append-only, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodKeys {
    keys: Vec<DnsKey>,
}

impl GoodKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the key was already present
    pub fn push(&mut self, key: &DnsKey) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key.clone());
        true
    }

    pub fn contains(&self, key: &DnsKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DnsKey> {
        self.keys.iter()
    }

    pub fn into_vec(self) -> Vec<DnsKey> {
        self.keys
    }
}

/// DNSSEC validator: matches signatures against candidate keys
#[derive(Debug, Clone, Default)]
pub struct DnsSecValidator {
    /// Fixed reference time, wall clock when unset
    current_time: Option<u32>,
}

impl DnsSecValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_time(time: u32) -> Self {
        Self {
            current_time: Some(time),
        }
    }

    pub fn set_current_time(&mut self, time: u32) {
        self.current_time = Some(time);
    }

    /// Reference time as a Unix timestamp
    pub fn current_time(&self) -> u32 {
        self.current_time
            .unwrap_or_else(|| u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX))
    }

    /// Check every signature against every matching key.
    ///
    /// Each key that validates a signature is appended to `good_keys`. A
    /// primitive error is returned only when no signature validated.
    pub fn verify(
        &self,
        rrset: &RRset,
        signatures: &[Rrsig],
        keys: &[DnsKey],
        good_keys: &mut GoodKeys,
    ) -> Result<Verification> {
        let now = self.current_time();
        let mut validated = false;
        let mut first_error = None;

        for rrsig in signatures {
            match self.verify_rrsig(rrset, rrsig, keys, now) {
                Ok(Some(key)) => {
                    validated = true;
                    good_keys.push(key);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(
                        "Signature by {} tag {} on {} {} failed: {}",
                        rrsig.signer_name,
                        rrsig.key_tag,
                        rrset.name(),
                        rrset.rtype(),
                        e
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        match (validated, first_error) {
            (true, Some(e)) => {
                warn!(
                    "{} {} validated despite a failing signature: {}",
                    rrset.name(),
                    rrset.rtype(),
                    e
                );
                Ok(Verification::Validated)
            }
            (true, None) => Ok(Verification::Validated),
            (false, Some(e)) => Err(e),
            (false, None) => Ok(Verification::NoValidSignature),
        }
    }

    /// One signature against a list of keys
    pub fn verify_with_keys(
        &self,
        rrset: &RRset,
        rrsig: &Rrsig,
        keys: &[DnsKey],
        good_keys: &mut GoodKeys,
    ) -> Result<Verification> {
        self.verify(rrset, std::slice::from_ref(rrsig), keys, good_keys)
    }

    /// One signature against one key
    pub fn verify_signature(&self, rrset: &RRset, rrsig: &Rrsig, key: &DnsKey) -> Result<Verification> {
        let mut good_keys = GoodKeys::new();
        self.verify(
            rrset,
            std::slice::from_ref(rrsig),
            std::slice::from_ref(key),
            &mut good_keys,
        )
    }

    // Returns the key that validated `rrsig`, if any
    fn verify_rrsig<'k>(
        &self,
        rrset: &RRset,
        rrsig: &Rrsig,
        keys: &'k [DnsKey],
        now: u32,
    ) -> Result<Option<&'k DnsKey>> {
        let owner = rrset.name();
        if rrsig.type_covered != rrset.rtype() {
            trace!("Skipping signature covering {}", rrsig.type_covered);
            return Ok(None);
        }
        if !owner.is_subdomain_of(&rrsig.signer_name) {
            trace!("Skipping signature by {} for {}", rrsig.signer_name, owner);
            return Ok(None);
        }
        if rrsig.labels > owner.rrsig_labels() {
            trace!("Skipping signature with {} labels for {}", rrsig.labels, owner);
            return Ok(None);
        }
        if !rrsig.is_current(now) {
            debug!(
                "Signature on {} outside its validity window {}..{} at {}",
                owner, rrsig.inception, rrsig.expiration, now
            );
            return Ok(None);
        }

        let candidates: Vec<&DnsKey> = keys
            .iter()
            .filter(|k| k.algorithm() == rrsig.algorithm && k.key_tag() == rrsig.key_tag)
            // RFC 4035 section 5.3.1 and RFC 5011 section 2.1
            .filter(|k| k.is_zone_key() && !k.is_revoked())
            .collect();
        if candidates.is_empty() {
            trace!("No key with tag {} for {}", rrsig.key_tag, owner);
            return Ok(None);
        }

        let scheme = SignatureScheme::from_u8(rrsig.algorithm)?;
        let data = signed_data(rrsig, rrset.records())?;

        let mut first_error = None;
        for key in candidates {
            match scheme.verify(&data, &rrsig.signature, key.public_key()) {
                Ok(true) => {
                    trace!("Signature on {} validated with key {}", owner, key.key_tag());
                    return Ok(Some(key));
                }
                Ok(false) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}
