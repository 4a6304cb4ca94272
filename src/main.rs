use std::fs::File;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bifrost::config::DnsSecConfig;
use bifrost::dns::{DNSResourceClass, Name};
use bifrost::dnssec::keys::{SEP_FLAG, ZONE_KEY_FLAG};
use bifrost::dnssec::{DnsKey, DnsSecAlgorithm, Ds, SigningKey, random};
use clap::{Arg, ArgMatches, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("bifrost")
        .version(env!("CARGO_PKG_VERSION"))
        .about("DNSSEC key and DS record tool")
        .subcommand_required(true)
        .subcommand(
            Command::new("keygen")
                .about("Generate a signing key and print its DNSKEY and DS records")
                .arg(Arg::new("owner").required(true).value_name("OWNER"))
                .arg(
                    Arg::new("algorithm")
                        .short('a')
                        .long("algorithm")
                        .value_name("ALGORITHM")
                        .help("Key algorithm")
                        .default_value("ED25519")
                        .value_parser(["ED25519", "ECDSAP256SHA256", "ECDSAP384SHA384"]),
                )
                .arg(
                    Arg::new("ksk")
                        .long("ksk")
                        .help("Set the SEP flag (key-signing key)")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Load a PKCS#8 private key and print its DNSKEY and DS records")
                .arg(Arg::new("owner").required(true).value_name("OWNER"))
                .arg(Arg::new("algorithm").required(true).value_name("ALGORITHM"))
                .arg(Arg::new("pkcs8").required(true).value_name("DER_FILE"))
                .arg(
                    Arg::new("ksk")
                        .long("ksk")
                        .help("Set the SEP flag (key-signing key)")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("ds")
                .about("Derive the DS record of a DNSKEY")
                .arg(Arg::new("owner").required(true).value_name("OWNER"))
                .arg(
                    Arg::new("flags")
                        .required(true)
                        .value_name("FLAGS")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(Arg::new("algorithm").required(true).value_name("ALGORITHM"))
                .arg(Arg::new("public_key").required(true).value_name("BASE64")),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli().get_matches()) {
        eprintln!("bifrost: {e}");
        std::process::exit(1);
    }
}

fn run(matches: ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = DnsSecConfig::from_env()?;

    match matches.subcommand() {
        Some(("keygen", args)) => keygen(&config, args),
        Some(("import", args)) => import(&config, args),
        Some(("ds", args)) => ds(&config, args),
        _ => Ok(()),
    }
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a String, String> {
    args.get_one::<String>(id)
        .ok_or_else(|| format!("missing argument {id}"))
}

fn key_flags(args: &ArgMatches) -> u16 {
    if args.get_flag("ksk") {
        ZONE_KEY_FLAG | SEP_FLAG
    } else {
        ZONE_KEY_FLAG
    }
}

fn seeded_random(config: &DnsSecConfig) -> Result<&'static random::RandomContext, Box<dyn std::error::Error>> {
    let entropy = File::open(&config.entropy_source)?;
    let random = random::init(entropy, config.seed_length)?;
    info!(
        "Seeded random source from {} ({} bytes)",
        config.entropy_source.display(),
        config.seed_length
    );
    Ok(random)
}

fn print_key(config: &DnsSecConfig, key: &SigningKey) -> Result<(), Box<dyn std::error::Error>> {
    let owner = key.owner();
    let ds = Ds::from_dnskey(owner, key.dnskey(), config.ds_digest_type)?;
    println!("{owner} {} IN DNSKEY {}", config.dnskey_ttl, key.dnskey());
    println!("{owner} {} IN DS {}", config.dnskey_ttl, ds);
    Ok(())
}

fn keygen(config: &DnsSecConfig, args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let owner: Name = required(args, "owner")?.parse()?;
    let algorithm: DnsSecAlgorithm = required(args, "algorithm")?.parse()?;
    let random = seeded_random(config)?;

    let key = SigningKey::generate(owner, algorithm, key_flags(args), random)?;
    info!("Generated {} key with tag {}", algorithm, key.key_tag());
    print_key(config, &key)
}

fn import(config: &DnsSecConfig, args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let owner: Name = required(args, "owner")?.parse()?;
    let algorithm: DnsSecAlgorithm = required(args, "algorithm")?.parse()?;
    let pkcs8 = std::fs::read(required(args, "pkcs8")?)?;
    let random = seeded_random(config)?;

    let key = SigningKey::from_pkcs8(owner, algorithm, key_flags(args), &pkcs8, random)?;
    if !algorithm.is_recommended() {
        warn!("{} is not a recommended signing algorithm (RFC 8624)", algorithm);
    }
    info!("Loaded {} key with tag {}", algorithm, key.key_tag());
    print_key(config, &key)
}

fn ds(config: &DnsSecConfig, args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let owner: Name = required(args, "owner")?.parse()?;
    let flags = *args
        .get_one::<u16>("flags")
        .ok_or_else(|| "missing argument flags".to_string())?;
    let algorithm: DnsSecAlgorithm = required(args, "algorithm")?.parse()?;
    let public_key = STANDARD.decode(required(args, "public_key")?)?;

    if !algorithm.is_supported() {
        warn!("No signature support for {}; its DNSKEY cannot be validated", algorithm);
    }

    let key = DnsKey::new(flags, algorithm.to_u8(), public_key);
    let ds = Ds::from_dnskey(&owner, &key, config.ds_digest_type)?;
    let record = ds.to_record(owner.clone(), DNSResourceClass::IN, config.dnskey_ttl);

    println!("; key tag {}", key.key_tag());
    println!(
        "{} {} {} DS {}",
        record.name, record.ttl, record.rclass, ds
    );
    Ok(())
}
