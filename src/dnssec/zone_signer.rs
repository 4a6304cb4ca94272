use chrono::Utc;
use tracing::{debug, info};

use super::errors::{DnsSecError, Result};
use super::keys::{DnsKey, SigningKey};
use super::nsec::build_chain;
use super::random::RandomContext;
use super::signer::{Signer, ValidityWindow};
use crate::config::DnsSecConfig;
use crate::dns::resource::group_into_rrsets;
use crate::dns::{DNSResourceType, Name};
use crate::zone::Zone;

/// Zone-level signing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSigningOptions {
    pub validity_period: u32,
    pub inception_offset: u32,
    pub dnskey_ttl: u32,
    pub default_nsec_ttl: u32,
    pub publish_dnskeys: bool,
}

impl Default for ZoneSigningOptions {
    fn default() -> Self {
        Self::from(&DnsSecConfig::default())
    }
}

impl From<&DnsSecConfig> for ZoneSigningOptions {
    fn from(config: &DnsSecConfig) -> Self {
        Self {
            validity_period: config.validity_period,
            inception_offset: config.inception_offset,
            dnskey_ttl: config.dnskey_ttl,
            default_nsec_ttl: config.default_nsec_ttl,
            publish_dnskeys: config.publish_dnskeys,
        }
    }
}

/// Signs whole zones: NSEC chain plus RRSIGs over every authoritative rrset
pub struct ZoneSigner<'a> {
    signer: Signer<'a>,
    options: ZoneSigningOptions,
}

impl<'a> ZoneSigner<'a> {
    pub fn new(random: &'a RandomContext, options: ZoneSigningOptions) -> Self {
        Self {
            signer: Signer::new(random).with_validity_period(options.validity_period),
            options,
        }
    }

    pub fn from_config(random: &'a RandomContext, config: &DnsSecConfig) -> Self {
        Self::new(random, ZoneSigningOptions::from(config))
    }

    pub fn options(&self) -> &ZoneSigningOptions {
        &self.options
    }

    /// Sign with a window starting now, less the configured inception offset
    pub fn sign_zone_now(&self, zone: &Zone, keys: &[SigningKey]) -> Result<Zone> {
        let now = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let window = self
            .signer
            .window_starting_at(now.saturating_sub(self.options.inception_offset));
        self.sign_zone(zone, keys, window)
    }

    /// Returns a new zone holding the original data, a fresh NSEC chain and
    /// RRSIGs. Existing RRSIG and NSEC records are replaced. Fails as a whole
    /// if any rrset cannot be signed.
    pub fn sign_zone(&self, zone: &Zone, keys: &[SigningKey], window: ValidityWindow) -> Result<Zone> {
        if zone.is_empty() {
            return Err(DnsSecError::EmptyZone);
        }
        if keys.is_empty() {
            return Err(DnsSecError::NoSigningKeys);
        }
        let origin = &zone.origin;
        if let Some(key) = keys.iter().find(|k| k.owner() != origin) {
            return Err(DnsSecError::SignerNameMismatch {
                owner: origin.clone(),
                signer: key.owner().clone(),
            });
        }
        if let Some(record) = zone.records().find(|r| !r.name.is_subdomain_of(origin)) {
            return Err(DnsSecError::OutOfZone(record.name.clone()));
        }

        let mut signed = Zone::new(origin.clone(), zone.class);
        for record in zone.records() {
            if !matches!(record.rtype, DNSResourceType::RRSIG | DNSResourceType::NSEC) {
                signed.add_record(record.clone());
            }
        }

        if self.options.publish_dnskeys {
            self.publish_dnskeys(&mut signed, keys);
        }

        let delegations: Vec<Name> = signed
            .owners()
            .filter(|owner| *owner != origin && signed.has_type_at(owner, DNSResourceType::NS))
            .cloned()
            .collect();
        let is_glue = |owner: &Name| {
            delegations
                .iter()
                .any(|cut| owner != cut && owner.is_subdomain_of(cut))
        };

        let authoritative: Vec<(Name, Vec<DNSResourceType>)> = signed
            .owners()
            .filter(|owner| !is_glue(owner))
            .map(|owner| {
                // only NS and DS are authoritative at a zone cut (RFC 4035 section 2.3)
                let at_cut = delegations.contains(owner);
                let mut types: Vec<DNSResourceType> = signed
                    .records_at(owner)
                    .iter()
                    .map(|r| r.rtype)
                    .filter(|t| !at_cut || matches!(t, DNSResourceType::NS | DNSResourceType::DS))
                    .collect();
                types.sort();
                types.dedup();
                (owner.clone(), types)
            })
            .collect();

        let nsec_ttl = zone.soa_minimum().unwrap_or(self.options.default_nsec_ttl);
        for (owner, nsec) in build_chain(&authoritative) {
            signed.add_record(nsec.to_record(owner, zone.class, nsec_ttl));
        }

        let zone_signing: Vec<&SigningKey> = keys.iter().filter(|k| !k.is_ksk()).collect();
        let mut signatures = Vec::new();
        let mut rrset_count = 0;
        for rrset in group_into_rrsets(signed.records()) {
            let owner = rrset.name();
            if is_glue(owner) {
                continue;
            }
            let rtype = rrset.rtype();
            if delegations.contains(owner)
                && !matches!(rtype, DNSResourceType::DS | DNSResourceType::NSEC)
            {
                continue;
            }

            let signing_keys: Vec<&SigningKey> =
                if rtype == DNSResourceType::DNSKEY || zone_signing.is_empty() {
                    keys.iter().collect()
                } else {
                    zone_signing.clone()
                };

            for key in signing_keys {
                let rrsig = self.signer.sign(&rrset, key, window).map_err(|e| {
                    DnsSecError::RrsetSigningFailed {
                        owner: owner.clone(),
                        rtype,
                        source: Box::new(e),
                    }
                })?;
                signatures.push(rrsig.to_record(owner.clone(), rrset.rclass()));
            }
            rrset_count += 1;
        }

        info!(
            "Signed zone {} (serial {}): {} rrsets, {} signatures, {} NSEC records",
            origin,
            zone.serial().map_or_else(|| "none".to_string(), |s| s.to_string()),
            rrset_count,
            signatures.len(),
            authoritative.len()
        );
        for rrsig in signatures {
            signed.add_record(rrsig);
        }
        Ok(signed)
    }

    fn publish_dnskeys(&self, zone: &mut Zone, keys: &[SigningKey]) {
        let apex = zone.origin.clone();
        let existing: Vec<(DnsKey, u32)> = zone
            .records_at(&apex)
            .iter()
            .filter(|r| r.rtype == DNSResourceType::DNSKEY)
            .filter_map(|r| DnsKey::from_record(r).ok().map(|k| (k, r.ttl)))
            .collect();
        let ttl = existing
            .first()
            .map(|(_, ttl)| *ttl)
            .unwrap_or(self.options.dnskey_ttl);

        for key in keys {
            if existing.iter().any(|(k, _)| k == key.dnskey()) {
                continue;
            }
            debug!("Publishing DNSKEY {} at {}", key.key_tag(), apex);
            zone.add_record(key.to_dnskey_record(zone.class, ttl));
        }
    }
}
