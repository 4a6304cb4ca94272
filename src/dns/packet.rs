use super::{
    enums::DNSResourceType,
    resource::{DNSResource, RRset, group_into_rrsets},
};

/// The record sections of an already parsed DNS message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DNSPacket {
    pub id: u16,
    pub answers: Vec<DNSResource>,
    pub authorities: Vec<DNSResource>,
    pub resources: Vec<DNSResource>,
}

impl DNSPacket {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// All records of the answer, authority and additional sections, in that order
    pub fn records(&self) -> impl Iterator<Item = &DNSResource> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.resources.iter())
    }

    /// Every non-RRSIG record grouped into rrsets
    pub fn rrsets(&self) -> Vec<RRset> {
        group_into_rrsets(
            self.records()
                .filter(|r| r.rtype != DNSResourceType::RRSIG && r.rtype != DNSResourceType::OPT),
        )
    }

    pub fn signatures(&self) -> impl Iterator<Item = &DNSResource> {
        self.records()
            .filter(|r| r.rtype == DNSResourceType::RRSIG)
    }
}
