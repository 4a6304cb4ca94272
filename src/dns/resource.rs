use std::collections::BTreeMap;

use super::{
    enums::{DNSResourceClass, DNSResourceType},
    name::Name,
};
use crate::dnssec::errors::{DnsSecError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DNSResource {
    pub name: Name,
    pub rtype: DNSResourceType,
    pub rclass: DNSResourceClass,
    pub ttl: u32,
    pub rdlength: u16,
    pub rdata: Vec<u8>,
}

impl DNSResource {
    pub fn new(
        name: Name,
        rtype: DNSResourceType,
        rclass: DNSResourceClass,
        ttl: u32,
        rdata: Vec<u8>,
    ) -> Self {
        let rdlength = u16::try_from(rdata.len()).unwrap_or(u16::MAX);
        Self {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata,
        }
    }

    /// Declared payload length agrees with the payload actually carried
    pub fn has_consistent_length(&self) -> bool {
        self.rdlength as usize == self.rdata.len()
    }
}

/// A non-empty set of records sharing owner, type and class
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RRset {
    records: Vec<DNSResource>,
}

impl RRset {
    pub fn new(records: Vec<DNSResource>) -> Result<Self> {
        check_members(&records)?;
        Ok(Self { records })
    }

    pub fn name(&self) -> &Name {
        &self.records[0].name
    }

    pub fn rtype(&self) -> DNSResourceType {
        self.records[0].rtype
    }

    pub fn rclass(&self) -> DNSResourceClass {
        self.records[0].rclass
    }

    /// Signing TTL: the smallest member TTL
    pub fn ttl(&self) -> u32 {
        self.records.iter().map(|r| r.ttl).min().unwrap_or(0)
    }

    pub fn records(&self) -> &[DNSResource] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DNSResource> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<DNSResource> {
        self.records
    }
}

/// Checks that `records` is non-empty and shares owner, type and class
pub fn check_members(records: &[DNSResource]) -> Result<()> {
    let first = records.first().ok_or_else(|| DnsSecError::MalformedRecord {
        owner: Name::root(),
        rtype: DNSResourceType::Unknown(0),
        reason: "empty rrset".to_string(),
    })?;
    for record in &records[1..] {
        if record.name != first.name {
            return Err(DnsSecError::TypeMismatch {
                owner: first.name.clone(),
                rtype: first.rtype,
                reason: format!("member owned by {}", record.name),
            });
        }
        if record.rtype != first.rtype {
            return Err(DnsSecError::TypeMismatch {
                owner: first.name.clone(),
                rtype: first.rtype,
                reason: format!("member of type {}", record.rtype),
            });
        }
        if record.rclass != first.rclass {
            return Err(DnsSecError::TypeMismatch {
                owner: first.name.clone(),
                rtype: first.rtype,
                reason: format!("member of class {}", record.rclass),
            });
        }
    }
    Ok(())
}

/// Groups records into rrsets ordered by owner (canonical), type and class
pub fn group_into_rrsets<'a, I>(records: I) -> Vec<RRset>
where
    I: IntoIterator<Item = &'a DNSResource>,
{
    let mut groups: BTreeMap<(Name, DNSResourceType, DNSResourceClass), Vec<DNSResource>> =
        BTreeMap::new();
    for record in records {
        groups
            .entry((record.name.clone(), record.rtype, record.rclass))
            .or_default()
            .push(record.clone());
    }
    groups
        .into_values()
        .map(|records| RRset { records })
        .collect()
}
