use std::fmt;

use super::errors::{DnsSecError, Result, malformed};
use super::rdata::TypeBitmap;
use crate::dns::{DNSResource, DNSResourceClass, DNSResourceType, Name};

/// NSEC payload: the next owner in canonical order and the types present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec {
    pub next_name: Name,
    pub types: TypeBitmap,
}

impl Nsec {
    /// NSEC and RRSIG are always added to `present`
    pub fn build<I>(next_name: Name, present: I) -> Self
    where
        I: IntoIterator<Item = DNSResourceType>,
    {
        let mut types: TypeBitmap = present.into_iter().collect();
        types.insert(DNSResourceType::NSEC);
        types.insert(DNSResourceType::RRSIG);
        Self { next_name, types }
    }

    pub fn from_rdata(owner: &Name, rdata: &[u8]) -> Result<Self> {
        let (next_name, used) =
            Name::from_wire(rdata).map_err(|e| malformed(owner, DNSResourceType::NSEC, e))?;
        let types = TypeBitmap::from_wire(&rdata[used..])
            .map_err(|e| malformed(owner, DNSResourceType::NSEC, e))?;
        Ok(Self { next_name, types })
    }

    pub fn from_record(record: &DNSResource) -> Result<Self> {
        if record.rtype != DNSResourceType::NSEC {
            return Err(DnsSecError::TypeMismatch {
                owner: record.name.clone(),
                rtype: record.rtype,
                reason: "expected NSEC".to_string(),
            });
        }
        Self::from_rdata(&record.name, &record.rdata)
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut rdata = self.next_name.to_wire();
        rdata.extend(self.types.to_wire());
        rdata
    }

    pub fn to_record(&self, owner: Name, class: DNSResourceClass, ttl: u32) -> DNSResource {
        DNSResource::new(owner, DNSResourceType::NSEC, class, ttl, self.to_rdata())
    }

    /// `name` sorts strictly between `owner` and the next owner. The last
    /// NSEC of a chain wraps around to the apex.
    pub fn covers(&self, owner: &Name, name: &Name) -> bool {
        let next = &self.next_name;
        if next > owner {
            name > owner && name < next
        } else {
            // last record of the chain, or a chain with a single owner
            name > owner || name < next
        }
    }

    /// `name` is this NSEC's owner and `rtype` is absent from it
    pub fn denies_type(&self, owner: &Name, name: &Name, rtype: DNSResourceType) -> bool {
        owner == name && !self.types.contains(rtype)
    }
}

impl fmt::Display for Nsec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.next_name, self.types)
    }
}

/// Builds the closed NSEC cycle over owners already in canonical order
pub fn build_chain(owners: &[(Name, Vec<DNSResourceType>)]) -> Vec<(Name, Nsec)> {
    owners
        .iter()
        .enumerate()
        .map(|(i, (owner, types))| {
            let next = &owners[(i + 1) % owners.len()].0;
            (owner.clone(), Nsec::build(next.clone(), types.iter().copied()))
        })
        .collect()
}
