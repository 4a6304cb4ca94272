use tracing::debug;

use super::canonical::signed_data;
use super::errors::{DnsSecError, Result};
use super::keys::SigningKey;
use super::rdata::Rrsig;
use super::random::RandomContext;
use crate::dns::{Name, RRset};

/// Default signature lifetime: 14 days
pub const DEFAULT_VALIDITY_PERIOD: u32 = 1_209_600;

/// Inception and expiration of a signature, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub inception: u32,
    pub expiration: u32,
}

impl ValidityWindow {
    pub fn new(inception: u32, expiration: u32) -> Result<Self> {
        let window = Self {
            inception,
            expiration,
        };
        window.check()?;
        Ok(window)
    }

    pub fn starting_at(inception: u32) -> Self {
        Self::with_period(inception, DEFAULT_VALIDITY_PERIOD)
    }

    pub fn with_period(inception: u32, period: u32) -> Self {
        Self {
            inception,
            expiration: inception.saturating_add(period),
        }
    }

    pub fn contains(&self, time: u32) -> bool {
        self.inception <= time && time <= self.expiration
    }

    fn check(&self) -> Result<()> {
        if self.expiration < self.inception {
            return Err(DnsSecError::InvalidValidityWindow {
                inception: self.inception,
                expiration: self.expiration,
            });
        }
        Ok(())
    }
}

/// Produces RRSIGs for rrsets
#[derive(Debug, Clone, Copy)]
pub struct Signer<'a> {
    random: &'a RandomContext,
    validity_period: u32,
}

impl<'a> Signer<'a> {
    pub fn new(random: &'a RandomContext) -> Self {
        Self {
            random,
            validity_period: DEFAULT_VALIDITY_PERIOD,
        }
    }

    pub fn with_validity_period(mut self, period: u32) -> Self {
        self.validity_period = period;
        self
    }

    pub fn validity_period(&self) -> u32 {
        self.validity_period
    }

    /// Window of the configured length starting at `inception`
    pub fn window_starting_at(&self, inception: u32) -> ValidityWindow {
        ValidityWindow::with_period(inception, self.validity_period)
    }

    /// Sign with the key's owner as signer name
    pub fn sign(&self, rrset: &RRset, key: &SigningKey, window: ValidityWindow) -> Result<Rrsig> {
        self.sign_as(rrset, key, window, key.owner())
    }

    pub fn sign_as(
        &self,
        rrset: &RRset,
        key: &SigningKey,
        window: ValidityWindow,
        signer_name: &Name,
    ) -> Result<Rrsig> {
        window.check()?;
        let algorithm = key.algorithm();
        let scheme = algorithm
            .scheme()
            .ok_or_else(|| DnsSecError::SigningKeyMismatch {
                algorithm: algorithm.to_u8(),
                reason: "no signing support for this algorithm".to_string(),
            })?;
        if !rrset.name().is_subdomain_of(signer_name) {
            return Err(DnsSecError::SignerNameMismatch {
                owner: rrset.name().clone(),
                signer: signer_name.clone(),
            });
        }

        let mut rrsig = Rrsig {
            type_covered: rrset.rtype(),
            algorithm: algorithm.to_u8(),
            labels: rrset.name().rrsig_labels(),
            original_ttl: rrset.ttl(),
            expiration: window.expiration,
            inception: window.inception,
            key_tag: key.key_tag(),
            signer_name: signer_name.clone(),
            signature: Vec::new(),
        };
        let data = signed_data(&rrsig, rrset.records())?;
        rrsig.signature = scheme.sign(&data, key.pair(), self.random)?;

        debug!(
            "Signed {} {} with {} key {}",
            rrset.name(),
            rrset.rtype(),
            algorithm,
            rrsig.key_tag
        );
        Ok(rrsig)
    }
}
