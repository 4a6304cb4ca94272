use crate::dnssec::DigestType;
use crate::dnssec::signer::DEFAULT_VALIDITY_PERIOD;
use crate::error::ConfigError;
use crate::zone::constants::DEFAULT_TTL;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Largest seed length accepted from the entropy source
pub const MAX_SEED_LENGTH: u16 = 2048;
pub const MIN_SEED_LENGTH: u16 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct DnsSecConfig {
    /// Lifetime of generated signatures in seconds
    pub validity_period: u32,

    /// Seconds to backdate signature inception, absorbing clock skew
    pub inception_offset: u32,

    /// TTL of DNSKEY records published by the zone signer
    pub dnskey_ttl: u32,

    /// NSEC TTL used when the zone has no SOA
    pub default_nsec_ttl: u32,

    /// Digest type for derived DS records
    pub ds_digest_type: DigestType,

    /// File the random source is seeded from
    pub entropy_source: PathBuf,

    /// Number of seed bytes read from the entropy source
    pub seed_length: u16,

    /// Whether the zone signer adds missing DNSKEY records
    pub publish_dnskeys: bool,

    /// Whether DNSKEYs found in a packet are candidate keys
    pub use_packet_keys: bool,
}

impl Default for DnsSecConfig {
    fn default() -> Self {
        Self {
            validity_period: DEFAULT_VALIDITY_PERIOD,
            inception_offset: 0,
            dnskey_ttl: DEFAULT_TTL,
            default_nsec_ttl: DEFAULT_TTL,
            ds_digest_type: DigestType::Sha256,
            entropy_source: PathBuf::from("/dev/urandom"),
            seed_length: 32,
            publish_dnskeys: true,
            use_packet_keys: true,
        }
    }
}

/// On-disk form; every key is optional and falls back to the default
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    validity_period: Option<u32>,
    inception_offset: Option<u32>,
    dnskey_ttl: Option<u32>,
    default_nsec_ttl: Option<u32>,
    ds_digest_type: Option<String>,
    entropy_source: Option<PathBuf>,
    seed_length: Option<u16>,
    publish_dnskeys: Option<bool>,
    use_packet_keys: Option<bool>,
}

impl DnsSecConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(period) = std::env::var("BIFROST_VALIDITY_PERIOD") {
            config.validity_period = period
                .parse()
                .map_err(|_| ConfigError::InvalidValidityPeriod(period))?;
        }

        if let Ok(offset) = std::env::var("BIFROST_INCEPTION_OFFSET") {
            config.inception_offset = offset
                .parse()
                .map_err(|_| ConfigError::InvalidValidityPeriod(offset))?;
        }

        if let Ok(ttl) = std::env::var("BIFROST_DNSKEY_TTL") {
            config.dnskey_ttl = ttl.parse().map_err(|_| ConfigError::InvalidTtl(ttl))?;
        }

        if let Ok(ttl) = std::env::var("BIFROST_NSEC_TTL") {
            config.default_nsec_ttl = ttl.parse().map_err(|_| ConfigError::InvalidTtl(ttl))?;
        }

        if let Ok(digest) = std::env::var("BIFROST_DS_DIGEST") {
            config.ds_digest_type = parse_digest(&digest)?;
        }

        if let Ok(path) = std::env::var("BIFROST_ENTROPY_SOURCE") {
            config.entropy_source = PathBuf::from(path);
        }

        if let Ok(len) = std::env::var("BIFROST_SEED_LENGTH") {
            config.seed_length = len
                .parse()
                .map_err(|_| ConfigError::InvalidSeedLength(len))?;
        }

        if let Ok(publish) = std::env::var("BIFROST_PUBLISH_DNSKEYS") {
            config.publish_dnskeys = parse_bool(&publish, config.publish_dnskeys);
        }

        if let Ok(packet_keys) = std::env::var("BIFROST_USE_PACKET_KEYS") {
            config.use_packet_keys = parse_bool(&packet_keys, config.use_packet_keys);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let defaults = Self::default();
        let config = Self {
            validity_period: file.validity_period.unwrap_or(defaults.validity_period),
            inception_offset: file.inception_offset.unwrap_or(defaults.inception_offset),
            dnskey_ttl: file.dnskey_ttl.unwrap_or(defaults.dnskey_ttl),
            default_nsec_ttl: file.default_nsec_ttl.unwrap_or(defaults.default_nsec_ttl),
            ds_digest_type: match file.ds_digest_type {
                Some(digest) => parse_digest(&digest)?,
                None => defaults.ds_digest_type,
            },
            entropy_source: file.entropy_source.unwrap_or(defaults.entropy_source),
            seed_length: file.seed_length.unwrap_or(defaults.seed_length),
            publish_dnskeys: file.publish_dnskeys.unwrap_or(defaults.publish_dnskeys),
            use_packet_keys: file.use_packet_keys.unwrap_or(defaults.use_packet_keys),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validity_period == 0 {
            return Err(ConfigError::InvalidValidityPeriod(
                "Validity period must be positive".to_string(),
            ));
        }

        if !(MIN_SEED_LENGTH..=MAX_SEED_LENGTH).contains(&self.seed_length) {
            return Err(ConfigError::InvalidSeedLength(format!(
                "Seed length {} outside {}..={}",
                self.seed_length, MIN_SEED_LENGTH, MAX_SEED_LENGTH
            )));
        }

        if !self.ds_digest_type.is_supported() {
            return Err(ConfigError::InvalidDigestType(
                self.ds_digest_type.to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_digest(s: &str) -> Result<DigestType, ConfigError> {
    s.parse::<DigestType>()
        .map_err(|_| ConfigError::InvalidDigestType(s.to_string()))
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = DnsSecConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.validity_period, 1_209_600);
    }

    #[test]
    fn test_invalid_validity_period() {
        let config = DnsSecConfig {
            validity_period: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValidityPeriod(_))
        ));
    }

    #[test]
    fn test_invalid_seed_length() {
        for seed_length in [8, 4096] {
            let config = DnsSecConfig {
                seed_length,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidSeedLength(_))
            ));
        }
    }

    #[test]
    fn test_gost_digest_rejected() {
        let config = DnsSecConfig {
            ds_digest_type: DigestType::Gost94,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDigestType(_))
        ));
    }

    #[test]
    fn test_from_toml() {
        let config = DnsSecConfig::from_toml_str(
            r#"
            validity_period = 86400
            ds_digest_type = "SHA-384"
            publish_dnskeys = false
            "#,
        )
        .unwrap();
        assert_eq!(config.validity_period, 86400);
        assert_eq!(config.ds_digest_type, DigestType::Sha384);
        assert!(!config.publish_dnskeys);
        assert_eq!(config.seed_length, 32);

        assert!(matches!(
            DnsSecConfig::from_toml_str("unknown_key = 1"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            DnsSecConfig::from_toml_str("ds_digest_type = \"MD5\""),
            Err(ConfigError::InvalidDigestType(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dnskey_ttl = 7200").unwrap();
        writeln!(file, "seed_length = 64").unwrap();
        let config = DnsSecConfig::from_file(file.path()).unwrap();
        assert_eq!(config.dnskey_ttl, 7200);
        assert_eq!(config.seed_length, 64);

        assert!(matches!(
            DnsSecConfig::from_file("/nonexistent/bifrost.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true", false));
        assert!(parse_bool("YES", false));
        assert!(parse_bool("1", false));
        assert!(!parse_bool("off", true));
        assert!(!parse_bool("0", true));
        assert!(parse_bool("maybe", true));
    }
}
