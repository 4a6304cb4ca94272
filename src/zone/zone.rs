use crate::dns::enums::{DNSResourceClass, DNSResourceType};
use crate::dns::name::Name;
use crate::dns::resource::DNSResource;
use std::collections::BTreeMap;

/// A DNS zone: its origin, class and records indexed by owner in canonical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Zone origin (apex name)
    pub origin: Name,
    /// Zone class (usually IN)
    pub class: DNSResourceClass,
    /// All records in the zone, indexed by owner name
    records: BTreeMap<Name, Vec<DNSResource>>,
}

impl Zone {
    /// Create a new empty zone
    pub fn new(origin: Name, class: DNSResourceClass) -> Self {
        Self {
            origin,
            class,
            records: BTreeMap::new(),
        }
    }

    pub fn from_records<I>(origin: Name, class: DNSResourceClass, records: I) -> Self
    where
        I: IntoIterator<Item = DNSResource>,
    {
        let mut zone = Self::new(origin, class);
        for record in records {
            zone.add_record(record);
        }
        zone
    }

    /// Add a record to the zone. Exact duplicates are ignored.
    pub fn add_record(&mut self, record: DNSResource) {
        let entry = self.records.entry(record.name.clone()).or_default();
        if !entry.contains(&record) {
            entry.push(record);
        }
    }

    /// All records, owners in canonical order
    pub fn records(&self) -> impl Iterator<Item = &DNSResource> {
        self.records.values().flatten()
    }

    pub fn owners(&self) -> impl Iterator<Item = &Name> {
        self.records.keys()
    }

    pub fn records_at(&self, owner: &Name) -> &[DNSResource] {
        self.records.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_type_at(&self, owner: &Name, rtype: DNSResourceType) -> bool {
        self.records_at(owner).iter().any(|r| r.rtype == rtype)
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }

    /// The SOA record at the apex, if present
    pub fn soa(&self) -> Option<&DNSResource> {
        self.records_at(&self.origin)
            .iter()
            .find(|r| r.rtype == DNSResourceType::SOA)
    }

    /// MINIMUM field of the apex SOA
    pub fn soa_minimum(&self) -> Option<u32> {
        self.soa_field(4)
    }

    pub fn serial(&self) -> Option<u32> {
        self.soa_field(0)
    }

    // SOA rdata: MNAME RNAME SERIAL REFRESH RETRY EXPIRE MINIMUM
    fn soa_field(&self, index: usize) -> Option<u32> {
        let rdata = &self.soa()?.rdata;
        let (_, mname_len) = Name::from_wire(rdata).ok()?;
        let (_, rname_len) = Name::from_wire(rdata.get(mname_len..)?).ok()?;
        let start = mname_len + rname_len + index * 4;
        let bytes = rdata.get(start..start + 4)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
