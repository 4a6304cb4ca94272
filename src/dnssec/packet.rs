use tracing::{debug, warn};

use super::errors::{DnsSecError, Result};
use super::keys::DnsKey;
use super::rdata::Rrsig;
use super::validator::{DnsSecValidator, GoodKeys, Verification};
use crate::config::DnsSecConfig;
use crate::dns::resource::group_into_rrsets;
use crate::dns::{DNSPacket, DNSResourceType, Name, RRset};

/// Per-rrset outcome of verifying a packet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketReport {
    pub validated: Vec<(Name, DNSResourceType)>,
    pub failed: Vec<(Name, DNSResourceType, DnsSecError)>,
    pub unsigned: Vec<(Name, DNSResourceType)>,
}

impl PacketReport {
    /// Every rrset was signed and validated
    pub fn is_secure(&self) -> bool {
        !self.validated.is_empty() && self.failed.is_empty() && self.unsigned.is_empty()
    }
}

/// Verifies the signed rrsets of a parsed packet
#[derive(Debug, Clone)]
pub struct PacketVerifier {
    validator: DnsSecValidator,
    use_packet_keys: bool,
}

impl PacketVerifier {
    pub fn new(validator: DnsSecValidator) -> Self {
        Self {
            validator,
            use_packet_keys: true,
        }
    }

    pub fn from_config(validator: DnsSecValidator, config: &DnsSecConfig) -> Self {
        Self {
            validator,
            use_packet_keys: config.use_packet_keys,
        }
    }

    /// Ignore DNSKEY records carried in the packet
    pub fn trusted_keys_only(mut self) -> Self {
        self.use_packet_keys = false;
        self
    }

    pub fn verify_packet(
        &self,
        packet: &DNSPacket,
        keys: &[DnsKey],
        good_keys: &mut GoodKeys,
    ) -> PacketReport {
        let signatures = parse_signatures(packet);
        let mut report = PacketReport::default();

        for rrset in packet.rrsets() {
            let entry = (rrset.name().clone(), rrset.rtype());
            let sigs = signatures_for(&signatures, &rrset);
            if sigs.is_empty() {
                report.unsigned.push(entry);
                continue;
            }
            let candidates = self.candidate_keys(packet, &sigs, keys);
            match self.validator.verify(&rrset, &sigs, &candidates, good_keys) {
                Ok(Verification::Validated) => report.validated.push(entry),
                Ok(Verification::NoValidSignature) => {
                    report
                        .failed
                        .push((entry.0, entry.1, DnsSecError::NoValidSignature))
                }
                Err(e) => report.failed.push((entry.0, entry.1, e)),
            }
        }

        debug!(
            "Packet {}: {} validated, {} failed, {} unsigned",
            packet.id,
            report.validated.len(),
            report.failed.len(),
            report.unsigned.len()
        );
        report
    }

    /// Verify the single rrset `owner`/`rtype` of the packet. A missing rrset
    /// or one without signatures yields `NoValidSignature`.
    pub fn verify_rrset(
        &self,
        packet: &DNSPacket,
        owner: &Name,
        rtype: DNSResourceType,
        keys: &[DnsKey],
        good_keys: &mut GoodKeys,
    ) -> Result<Verification> {
        let Some(rrset) = group_into_rrsets(
            packet
                .records()
                .filter(|r| r.rtype == rtype && &r.name == owner),
        )
        .into_iter()
        .next() else {
            return Ok(Verification::NoValidSignature);
        };

        let sigs = signatures_for(&parse_signatures(packet), &rrset);
        if sigs.is_empty() {
            return Ok(Verification::NoValidSignature);
        }
        let candidates = self.candidate_keys(packet, &sigs, keys);
        self.validator.verify(&rrset, &sigs, &candidates, good_keys)
    }

    // Caller keys, then packet DNSKEYs owned by one of the signers
    fn candidate_keys(&self, packet: &DNSPacket, sigs: &[Rrsig], keys: &[DnsKey]) -> Vec<DnsKey> {
        let mut candidates = keys.to_vec();
        if !self.use_packet_keys {
            return candidates;
        }
        for record in packet.records() {
            if record.rtype != DNSResourceType::DNSKEY
                || !sigs.iter().any(|s| s.signer_name == record.name)
            {
                continue;
            }
            match DnsKey::from_record(record) {
                Ok(key) if !candidates.contains(&key) => candidates.push(key),
                Ok(_) => {}
                Err(e) => debug!("Ignoring DNSKEY at {}: {}", record.name, e),
            }
        }
        candidates
    }
}

fn parse_signatures(packet: &DNSPacket) -> Vec<(Name, Rrsig)> {
    packet
        .signatures()
        .filter_map(|record| match Rrsig::from_record(record) {
            Ok(rrsig) => Some((record.name.clone(), rrsig)),
            Err(e) => {
                warn!("Skipping malformed RRSIG at {}: {}", record.name, e);
                None
            }
        })
        .collect()
}

fn signatures_for(signatures: &[(Name, Rrsig)], rrset: &RRset) -> Vec<Rrsig> {
    signatures
        .iter()
        .filter(|(owner, rrsig)| owner == rrset.name() && rrsig.type_covered == rrset.rtype())
        .map(|(_, rrsig)| rrsig.clone())
        .collect()
}
