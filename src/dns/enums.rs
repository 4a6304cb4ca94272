use std::fmt;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DNSResourceType {
    #[default]
    A,
    NS,
    MD,
    MF,
    CNAME,
    SOA,
    MB,
    MG,
    MR,
    PTR,
    HINFO,
    MINFO,
    MX,
    TXT,
    RP,
    AFSDB,
    AAAA,
    SRV,
    NAPTR,
    KX,
    DNAME,
    OPT,
    DS,
    SSHFP,
    RRSIG,
    NSEC,
    DNSKEY,
    NSEC3,
    TLSA,
    HTTPS,
    CAA,
    Unknown(u16),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DNSResourceClass {
    #[default]
    IN,
    CS,
    CH,
    HS,
    NONE,
    ANY,
    Unknown(u16),
}

impl From<u16> for DNSResourceClass {
    fn from(value: u16) -> Self {
        match value {
            1 => DNSResourceClass::IN,
            2 => DNSResourceClass::CS,
            3 => DNSResourceClass::CH,
            4 => DNSResourceClass::HS,
            254 => DNSResourceClass::NONE,
            255 => DNSResourceClass::ANY,
            other => DNSResourceClass::Unknown(other),
        }
    }
}

impl From<DNSResourceClass> for u16 {
    fn from(class: DNSResourceClass) -> Self {
        match class {
            DNSResourceClass::IN => 1,
            DNSResourceClass::CS => 2,
            DNSResourceClass::CH => 3,
            DNSResourceClass::HS => 4,
            DNSResourceClass::NONE => 254,
            DNSResourceClass::ANY => 255,
            DNSResourceClass::Unknown(code) => code,
        }
    }
}

impl From<u16> for DNSResourceType {
    fn from(value: u16) -> Self {
        match value {
            1 => DNSResourceType::A,
            2 => DNSResourceType::NS,
            3 => DNSResourceType::MD,
            4 => DNSResourceType::MF,
            5 => DNSResourceType::CNAME,
            6 => DNSResourceType::SOA,
            7 => DNSResourceType::MB,
            8 => DNSResourceType::MG,
            9 => DNSResourceType::MR,
            12 => DNSResourceType::PTR,
            13 => DNSResourceType::HINFO,
            14 => DNSResourceType::MINFO,
            15 => DNSResourceType::MX,
            16 => DNSResourceType::TXT,
            17 => DNSResourceType::RP,
            18 => DNSResourceType::AFSDB,
            28 => DNSResourceType::AAAA,
            33 => DNSResourceType::SRV,
            35 => DNSResourceType::NAPTR,
            36 => DNSResourceType::KX,
            39 => DNSResourceType::DNAME,
            41 => DNSResourceType::OPT,
            43 => DNSResourceType::DS,
            44 => DNSResourceType::SSHFP,
            46 => DNSResourceType::RRSIG,
            47 => DNSResourceType::NSEC,
            48 => DNSResourceType::DNSKEY,
            50 => DNSResourceType::NSEC3,
            52 => DNSResourceType::TLSA,
            65 => DNSResourceType::HTTPS,
            257 => DNSResourceType::CAA,
            other => DNSResourceType::Unknown(other),
        }
    }
}

impl From<DNSResourceType> for u16 {
    fn from(rtype: DNSResourceType) -> Self {
        match rtype {
            DNSResourceType::A => 1,
            DNSResourceType::NS => 2,
            DNSResourceType::MD => 3,
            DNSResourceType::MF => 4,
            DNSResourceType::CNAME => 5,
            DNSResourceType::SOA => 6,
            DNSResourceType::MB => 7,
            DNSResourceType::MG => 8,
            DNSResourceType::MR => 9,
            DNSResourceType::PTR => 12,
            DNSResourceType::HINFO => 13,
            DNSResourceType::MINFO => 14,
            DNSResourceType::MX => 15,
            DNSResourceType::TXT => 16,
            DNSResourceType::RP => 17,
            DNSResourceType::AFSDB => 18,
            DNSResourceType::AAAA => 28,
            DNSResourceType::SRV => 33,
            DNSResourceType::NAPTR => 35,
            DNSResourceType::KX => 36,
            DNSResourceType::DNAME => 39,
            DNSResourceType::OPT => 41,
            DNSResourceType::DS => 43,
            DNSResourceType::SSHFP => 44,
            DNSResourceType::RRSIG => 46,
            DNSResourceType::NSEC => 47,
            DNSResourceType::DNSKEY => 48,
            DNSResourceType::NSEC3 => 50,
            DNSResourceType::TLSA => 52,
            DNSResourceType::HTTPS => 65,
            DNSResourceType::CAA => 257,
            DNSResourceType::Unknown(code) => code,
        }
    }
}

impl DNSResourceType {
    pub fn code(self) -> u16 {
        self.into()
    }

    /// Mnemonic as used in presentation format, None for unknown codes
    pub fn mnemonic(self) -> Option<&'static str> {
        let name = match self {
            DNSResourceType::A => "A",
            DNSResourceType::NS => "NS",
            DNSResourceType::MD => "MD",
            DNSResourceType::MF => "MF",
            DNSResourceType::CNAME => "CNAME",
            DNSResourceType::SOA => "SOA",
            DNSResourceType::MB => "MB",
            DNSResourceType::MG => "MG",
            DNSResourceType::MR => "MR",
            DNSResourceType::PTR => "PTR",
            DNSResourceType::HINFO => "HINFO",
            DNSResourceType::MINFO => "MINFO",
            DNSResourceType::MX => "MX",
            DNSResourceType::TXT => "TXT",
            DNSResourceType::RP => "RP",
            DNSResourceType::AFSDB => "AFSDB",
            DNSResourceType::AAAA => "AAAA",
            DNSResourceType::SRV => "SRV",
            DNSResourceType::NAPTR => "NAPTR",
            DNSResourceType::KX => "KX",
            DNSResourceType::DNAME => "DNAME",
            DNSResourceType::OPT => "OPT",
            DNSResourceType::DS => "DS",
            DNSResourceType::SSHFP => "SSHFP",
            DNSResourceType::RRSIG => "RRSIG",
            DNSResourceType::NSEC => "NSEC",
            DNSResourceType::DNSKEY => "DNSKEY",
            DNSResourceType::NSEC3 => "NSEC3",
            DNSResourceType::TLSA => "TLSA",
            DNSResourceType::HTTPS => "HTTPS",
            DNSResourceType::CAA => "CAA",
            DNSResourceType::Unknown(_) => return None,
        };
        Some(name)
    }
}

impl DNSResourceClass {
    pub fn code(self) -> u16 {
        self.into()
    }
}

// Ordering by numeric code, which is what NSEC bitmaps and rrset grouping need
impl PartialOrd for DNSResourceType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DNSResourceType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.code().cmp(&other.code())
    }
}

impl PartialOrd for DNSResourceClass {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DNSResourceClass {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.code().cmp(&other.code())
    }
}

impl fmt::Display for DNSResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "TYPE{}", self.code()),
        }
    }
}

impl fmt::Display for DNSResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DNSResourceClass::IN => write!(f, "IN"),
            DNSResourceClass::CS => write!(f, "CS"),
            DNSResourceClass::CH => write!(f, "CH"),
            DNSResourceClass::HS => write!(f, "HS"),
            DNSResourceClass::NONE => write!(f, "NONE"),
            DNSResourceClass::ANY => write!(f, "ANY"),
            DNSResourceClass::Unknown(code) => write!(f, "CLASS{code}"),
        }
    }
}
