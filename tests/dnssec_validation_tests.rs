mod common;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bifrost::dns::{DNSResourceClass, DNSResourceType};
use bifrost::dnssec::keys::{REVOKE_FLAG, SEP_FLAG, ZONE_KEY_FLAG};
use bifrost::dnssec::{
    DigestType, DnsKey, DnsSecAlgorithm, DnsSecError, DnsSecValidator, Ds, GoodKeys, Rrsig,
    Signer, SigningKey, ValidityWindow, Verification, calculate_key_tag,
};
use common::*;

const RFC4034_KEY: &str = "AQOeiiR0GOMYkDshWoSKz9XzfwJr1AYtsmx3TGkJaNXVbfi/2pHm822aJ5iI9BMzNXxeYCmZDRD99WYwYqUSdjMmmAphXdvxegXd/M5+X7OrzKBaMbCVdFLUUh6DhweJBjEVv5f2wwjM9XzcnOf+EPbtG9DMBmADjFDc2w/rljwvFw==";

fn rfc4034_key() -> DnsKey {
    DnsKey::new(256, 5, STANDARD.decode(RFC4034_KEY).unwrap())
}

#[test]
fn test_dnssec_algorithm_conversion() {
    assert_eq!(DnsSecAlgorithm::from_u8(5), Some(DnsSecAlgorithm::RsaSha1));
    assert_eq!(DnsSecAlgorithm::from_u8(8), Some(DnsSecAlgorithm::RsaSha256));
    assert_eq!(
        DnsSecAlgorithm::from_u8(13),
        Some(DnsSecAlgorithm::EcdsaP256Sha256)
    );
    assert_eq!(DnsSecAlgorithm::from_u8(15), Some(DnsSecAlgorithm::Ed25519));
    assert_eq!(DnsSecAlgorithm::from_u8(200), None);

    assert_eq!(DnsSecAlgorithm::RsaSha256.to_u8(), 8);
    assert_eq!(DnsSecAlgorithm::Ed25519.to_string(), "ED25519");
}

#[test]
fn test_dnssec_algorithm_support() {
    assert!(DnsSecAlgorithm::RsaSha256.is_supported());
    assert!(DnsSecAlgorithm::EcdsaP256Sha256.is_supported());
    assert!(DnsSecAlgorithm::Ed25519.is_supported());

    assert!(DnsSecAlgorithm::RsaMd5.is_supported());
    assert!(DnsSecAlgorithm::DSA.is_supported());
    assert!(!DnsSecAlgorithm::DH.is_supported());
    assert!(!DnsSecAlgorithm::EccGost.is_supported());

    // RFC 8624 recommendations
    assert!(DnsSecAlgorithm::EcdsaP256Sha256.is_recommended());
    assert!(!DnsSecAlgorithm::RsaSha1.is_recommended());
}

#[test]
fn test_digest_type_conversion() {
    assert_eq!(DigestType::from_u8(1), Some(DigestType::Sha1));
    assert_eq!(DigestType::from_u8(2), Some(DigestType::Sha256));
    assert_eq!(DigestType::from_u8(4), Some(DigestType::Sha384));
    assert_eq!(DigestType::from_u8(10), None);
    assert!(DigestType::Sha256.is_recommended());
    assert!(!DigestType::Gost94.is_supported());
}

#[test]
fn test_key_tag_rfc4034_vector() {
    let key = rfc4034_key();
    assert_eq!(key.key_tag(), 60485);
    assert_eq!(calculate_key_tag(256, 3, 5, key.public_key()), 60485);
}

#[test]
fn test_ds_rfc4034_vector() {
    let owner = name("dskey.example.com");
    let key = rfc4034_key();

    let sha1 = Ds::from_dnskey(&owner, &key, DigestType::Sha1).unwrap();
    assert_eq!(
        sha1.to_string(),
        "60485 5 1 2BB183AF5F22588179A53B0A98631FAD1A292118"
    );

    // RFC 4509 section 2.3
    let sha256 = Ds::from_dnskey(&owner, &key, DigestType::Sha256).unwrap();
    assert_eq!(
        hex::encode_upper(&sha256.digest),
        "D4B7D520E7BB5F0F67674A0CCEB1E3E0614B93C4F9E99B8383F6A1E4469DA50A"
    );

    // owner case does not change the digest
    let upper = Ds::from_dnskey(&name("DSKEY.Example.COM"), &key, DigestType::Sha1).unwrap();
    assert_eq!(upper, sha1);
}

#[test]
fn test_ds_against_independent_digest() {
    let owner = name("example.com");
    let key = ksk("example.com", 11);
    let ds = Ds::from_dnskey(&owner, key.dnskey(), DigestType::Sha384).unwrap();

    let mut data = owner.to_wire();
    data.extend(key.dnskey().to_rdata());
    let expected = ring::digest::digest(&ring::digest::SHA384, &data);
    assert_eq!(ds.digest, expected.as_ref());
    assert!(ds.matches_key(&owner, key.dnskey()));

    let record = ds.to_record(owner.clone(), DNSResourceClass::IN, 3600);
    assert_eq!(Ds::from_record(&record).unwrap(), ds);
}

#[test]
fn test_sign_then_verify() {
    let random = random();
    let validator = DnsSecValidator::with_current_time(NOW);
    let rrset = rrset(vec![
        a_record("www.example.com", 300, [192, 0, 2, 1]),
        a_record("www.example.com", 300, [192, 0, 2, 2]),
    ]);

    let keys = [
        zsk("example.com", 1),
        ecdsa_key("example.com", DnsSecAlgorithm::EcdsaP256Sha256, &random),
        ecdsa_key("example.com", DnsSecAlgorithm::EcdsaP384Sha384, &random),
    ];
    for key in &keys {
        let rrsig = Signer::new(&random).sign(&rrset, key, window()).unwrap();
        assert_eq!(rrsig.labels, 3);
        assert_eq!(rrsig.original_ttl, 300);
        assert_eq!(rrsig.key_tag, key.key_tag());

        let mut good_keys = GoodKeys::new();
        let result = validator
            .verify(&rrset, &[rrsig], &[key.dnskey().clone()], &mut good_keys)
            .unwrap();
        assert_eq!(result, Verification::Validated);
        assert_eq!(good_keys.into_vec(), vec![key.dnskey().clone()]);
    }
}

#[test]
fn test_verify_ignores_member_order_and_case() {
    let random = random();
    let key = zsk("example.com", 1);
    let signed = rrset(vec![
        a_record("www.example.com", 300, [192, 0, 2, 1]),
        a_record("www.example.com", 300, [192, 0, 2, 2]),
    ]);
    let rrsig = Signer::new(&random).sign(&signed, &key, window()).unwrap();

    // reordered, differently cased, lower TTL on the wire, with a duplicate
    let received = rrset(vec![
        a_record("WWW.Example.com", 120, [192, 0, 2, 2]),
        a_record("www.example.COM", 120, [192, 0, 2, 1]),
        a_record("www.example.com", 120, [192, 0, 2, 2]),
    ]);
    let validator = DnsSecValidator::with_current_time(NOW);
    assert_eq!(
        validator.verify_signature(&received, &rrsig, key.dnskey()),
        Ok(Verification::Validated)
    );
}

#[test]
fn test_tampered_payload_fails() {
    let random = random();
    let key = zsk("example.com", 1);
    let original = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let rrsig = Signer::new(&random).sign(&original, &key, window()).unwrap();

    let tampered = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 9])]);
    let validator = DnsSecValidator::with_current_time(NOW);
    assert_eq!(
        validator.verify_signature(&tampered, &rrsig, key.dnskey()),
        Ok(Verification::NoValidSignature)
    );
}

#[test]
fn test_tampered_signature_fails() {
    let random = random();
    let key = zsk("example.com", 1);
    let rrset = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let mut rrsig = Signer::new(&random).sign(&rrset, &key, window()).unwrap();
    rrsig.signature[5] ^= 0xFF;

    let validator = DnsSecValidator::with_current_time(NOW);
    let mut good_keys = GoodKeys::new();
    assert_eq!(
        validator.verify(&rrset, &[rrsig], &[key.dnskey().clone()], &mut good_keys),
        Ok(Verification::NoValidSignature)
    );
    assert!(good_keys.is_empty());
}

#[test]
fn test_validity_window_bounds() {
    let random = random();
    let key = zsk("example.com", 1);
    let rrset = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let window = ValidityWindow::new(NOW, NOW + 100).unwrap();
    let rrsig = Signer::new(&random).sign(&rrset, &key, window).unwrap();

    let cases = [
        (NOW - 1, Verification::NoValidSignature),
        (NOW, Verification::Validated),
        (NOW + 100, Verification::Validated),
        (NOW + 101, Verification::NoValidSignature),
    ];
    for (time, expected) in cases {
        let validator = DnsSecValidator::with_current_time(time);
        assert_eq!(
            validator.verify_signature(&rrset, &rrsig, key.dnskey()),
            Ok(expected),
            "at {time}"
        );
    }
}

#[test]
fn test_multi_key_matrix() {
    let random = random();
    let signer = Signer::new(&random);
    let (k1, k2, k3) = (
        zsk("example.com", 1),
        zsk("example.com", 2),
        zsk("example.com", 3),
    );
    let rrset = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let s1 = signer.sign(&rrset, &k1, window()).unwrap();
    let s2 = signer.sign(&rrset, &k2, window()).unwrap();

    let keys = [k1.dnskey().clone(), k2.dnskey().clone(), k3.dnskey().clone()];
    let validator = DnsSecValidator::with_current_time(NOW);
    let mut good_keys = GoodKeys::new();
    let result = validator
        .verify(&rrset, &[s1.clone(), s2], &keys, &mut good_keys)
        .unwrap();
    assert_eq!(result, Verification::Validated);
    assert_eq!(
        good_keys.clone().into_vec(),
        vec![k1.dnskey().clone(), k2.dnskey().clone()]
    );

    // accumulator is append-only across calls and stays duplicate free
    validator
        .verify_with_keys(&rrset, &s1, &keys, &mut good_keys)
        .unwrap();
    assert_eq!(good_keys.len(), 2);
    assert!(!good_keys.contains(k3.dnskey()));
}

#[test]
fn test_rsa_and_dsa_sign_then_verify() {
    let random = random();
    let validator = DnsSecValidator::with_current_time(NOW);
    let rrset = rrset(vec![
        a_record("www.example.com", 300, [192, 0, 2, 1]),
        a_record("www.example.com", 300, [192, 0, 2, 2]),
    ]);

    let keys = [
        pkcs8_key("example.com", DnsSecAlgorithm::RsaSha256, ZONE_KEY_FLAG, RSA2048_PKCS8),
        pkcs8_key("example.com", DnsSecAlgorithm::RsaSha512, ZONE_KEY_FLAG, RSA2048_PKCS8),
        pkcs8_key("example.com", DnsSecAlgorithm::RsaSha1, ZONE_KEY_FLAG, RSA1024_PKCS8),
        pkcs8_key("example.com", DnsSecAlgorithm::RsaSha1Nsec3Sha1, ZONE_KEY_FLAG, RSA512_PKCS8),
        pkcs8_key("example.com", DnsSecAlgorithm::RsaMd5, ZONE_KEY_FLAG, RSA1024_PKCS8),
        pkcs8_key("example.com", DnsSecAlgorithm::DSA, ZONE_KEY_FLAG, DSA1024_PKCS8),
    ];
    for key in &keys {
        let rrsig = Signer::new(&random).sign(&rrset, key, window()).unwrap();
        assert_eq!(rrsig.key_tag, key.key_tag());
        let published = [key.dnskey().clone()];
        assert_eq!(
            validator.verify(&rrset, std::slice::from_ref(&rrsig), &published, &mut GoodKeys::new()),
            Ok(Verification::Validated),
            "{}",
            key.algorithm()
        );

        let mut tampered = rrsig.clone();
        let last = tampered.signature.len() - 1;
        tampered.signature[last] ^= 0x01;
        assert_eq!(
            validator.verify(&rrset, &[tampered], &published, &mut GoodKeys::new()),
            Ok(Verification::NoValidSignature)
        );

        let mut short = rrsig;
        short.signature.pop();
        assert!(matches!(
            validator.verify(&rrset, &[short], &published, &mut GoodKeys::new()),
            Err(DnsSecError::MalformedSignature { .. })
        ));
    }
}

#[test]
fn test_non_zone_and_revoked_keys_are_skipped() {
    let random = random();
    let rrset = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let validator = DnsSecValidator::with_current_time(NOW);

    for flags in [0, ZONE_KEY_FLAG | REVOKE_FLAG, ZONE_KEY_FLAG | SEP_FLAG | REVOKE_FLAG] {
        let key = SigningKey::from_ed25519_seed(name("example.com"), flags, &[5; 32]).unwrap();
        let rrsig = Signer::new(&random).sign(&rrset, &key, window()).unwrap();
        let mut good_keys = GoodKeys::new();
        assert_eq!(
            validator.verify(&rrset, &[rrsig], &[key.dnskey().clone()], &mut good_keys),
            Ok(Verification::NoValidSignature),
            "flags {flags:#06x}"
        );
        assert!(good_keys.is_empty());
    }

    let key = SigningKey::from_ed25519_seed(name("example.com"), ZONE_KEY_FLAG | SEP_FLAG, &[5; 32])
        .unwrap();
    let rrsig = Signer::new(&random).sign(&rrset, &key, window()).unwrap();
    assert_eq!(
        validator.verify_signature(&rrset, &rrsig, key.dnskey()),
        Ok(Verification::Validated)
    );
}

#[test]
fn test_empty_key_list() {
    let random = random();
    let key = zsk("example.com", 1);
    let rrset = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let rrsig = Signer::new(&random).sign(&rrset, &key, window()).unwrap();

    let validator = DnsSecValidator::with_current_time(NOW);
    let mut good_keys = GoodKeys::new();
    let result = validator.verify(&rrset, &[rrsig], &[], &mut good_keys).unwrap();
    assert_eq!(result, Verification::NoValidSignature);
    assert_eq!(result.into_result(), Err(DnsSecError::NoValidSignature));
    assert!(good_keys.is_empty());
}

#[test]
fn test_signature_for_other_type_or_zone_is_skipped() {
    let random = random();
    let key = zsk("example.com", 1);
    let a = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let txt = rrset(vec![txt_record("www.example.com", "hello")]);
    let rrsig = Signer::new(&random).sign(&a, &key, window()).unwrap();
    let validator = DnsSecValidator::with_current_time(NOW);

    assert_eq!(
        validator.verify_signature(&txt, &rrsig, key.dnskey()),
        Ok(Verification::NoValidSignature)
    );

    let mut foreign = rrsig.clone();
    foreign.signer_name = name("example.org");
    assert_eq!(
        validator.verify_signature(&a, &foreign, key.dnskey()),
        Ok(Verification::NoValidSignature)
    );

    let mut wrong_algorithm = rrsig;
    wrong_algorithm.algorithm = 13;
    assert_eq!(
        validator.verify_signature(&a, &wrong_algorithm, key.dnskey()),
        Ok(Verification::NoValidSignature)
    );
}

#[test]
fn test_primitive_error_is_not_downgraded() {
    let random = random();
    let key = zsk("example.com", 1);
    let rrset = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let good = Signer::new(&random).sign(&rrset, &key, window()).unwrap();
    let mut truncated = good.clone();
    truncated.signature.truncate(40);

    let validator = DnsSecValidator::with_current_time(NOW);
    let keys = [key.dnskey().clone()];
    let mut good_keys = GoodKeys::new();
    assert_eq!(
        validator.verify(&rrset, &[truncated.clone()], &keys, &mut good_keys),
        Err(DnsSecError::MalformedSignature {
            algorithm: 15,
            len: 40
        })
    );

    // a second, valid signature wins
    assert_eq!(
        validator.verify(&rrset, &[truncated, good], &keys, &mut good_keys),
        Ok(Verification::Validated)
    );
}

#[test]
fn test_wildcard_expansion_verifies() {
    let random = random();
    let key = zsk("example.com", 1);
    let wildcard = rrset(vec![a_record("*.example.com", 300, [192, 0, 2, 1])]);
    let rrsig = Signer::new(&random).sign(&wildcard, &key, window()).unwrap();
    assert_eq!(rrsig.labels, 2);

    let expanded = rrset(vec![a_record("host.example.com", 300, [192, 0, 2, 1])]);
    let validator = DnsSecValidator::with_current_time(NOW);
    assert_eq!(
        validator.verify_signature(&expanded, &rrsig, key.dnskey()),
        Ok(Verification::Validated)
    );

    // a label count above the owner's can never match
    let mut too_many = rrsig;
    too_many.labels = 4;
    assert_eq!(
        validator.verify_signature(&expanded, &too_many, key.dnskey()),
        Ok(Verification::NoValidSignature)
    );
}

#[test]
fn test_rrsig_record_round_trip() {
    let random = random();
    let key = zsk("example.com", 1);
    let rrset = rrset(vec![mx_record("example.com", 10, "mail.example.com")]);
    let rrsig = Signer::new(&random).sign(&rrset, &key, window()).unwrap();

    let record = rrsig.to_record(name("example.com"), DNSResourceClass::IN);
    assert_eq!(record.rtype, DNSResourceType::RRSIG);
    assert_eq!(record.ttl, 300);
    assert_eq!(Rrsig::from_record(&record).unwrap(), rrsig);
}

#[test]
fn test_signer_errors() {
    let random = random();
    let key = zsk("example.com", 1);
    let rrset = rrset(vec![a_record("www.example.com", 300, [192, 0, 2, 1])]);
    let signer = Signer::new(&random);

    assert_eq!(
        signer.sign_as(&rrset, &key, window(), &name("example.org")),
        Err(DnsSecError::SignerNameMismatch {
            owner: name("www.example.com"),
            signer: name("example.org"),
        })
    );

    let backwards = ValidityWindow {
        inception: NOW,
        expiration: NOW - 1,
    };
    assert!(matches!(
        signer.sign(&rrset, &key, backwards),
        Err(DnsSecError::InvalidValidityWindow { .. })
    ));

    let short = signer.with_validity_period(60);
    assert_eq!(short.window_starting_at(NOW).expiration, NOW + 60);
}
