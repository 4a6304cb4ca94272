pub mod algorithm;
pub mod canonical;
pub mod digest;
pub mod ds;
pub mod errors;
pub mod key_tag;
pub mod keys;
pub mod legacy;
pub mod nsec;
pub mod packet;
pub mod primitive;
pub mod random;
pub mod rdata;
pub mod signer;
pub mod validator;
pub mod zone_signer;

pub use algorithm::DnsSecAlgorithm;
pub use digest::DigestType;
pub use ds::Ds;
pub use errors::DnsSecError;
pub use key_tag::calculate_key_tag;
pub use keys::{DnsKey, SigningKey};
pub use nsec::Nsec;
pub use packet::{PacketReport, PacketVerifier};
pub use primitive::SignatureScheme;
pub use random::RandomContext;
pub use rdata::{Rrsig, TypeBitmap};
pub use signer::{Signer, ValidityWindow};
pub use validator::{DnsSecValidator, GoodKeys, Verification};
pub use zone_signer::{ZoneSigner, ZoneSigningOptions};

/// DNSSEC constants
pub mod constants {
    /// DNSKEY protocol value (RFC 4034 section 2.1.2)
    pub const DNSKEY_PROTOCOL: u8 = super::keys::DNSSEC_PROTOCOL;

    /// Default signature validity in seconds (14 days)
    pub const DEFAULT_VALIDITY_PERIOD: u32 = super::signer::DEFAULT_VALIDITY_PERIOD;

    /// Largest key length in bytes accepted as seed material
    pub const MAX_KEY_LEN: u16 = crate::config::MAX_SEED_LENGTH;
}
