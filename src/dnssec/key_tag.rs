use super::algorithm::DnsSecAlgorithm;

/// Calculate the key tag for a DNSKEY (RFC 4034 Appendix B)
pub fn calculate_key_tag(flags: u16, protocol: u8, algorithm: u8, public_key: &[u8]) -> u16 {
    let mut rdata = Vec::with_capacity(4 + public_key.len());
    rdata.extend_from_slice(&flags.to_be_bytes());
    rdata.push(protocol);
    rdata.push(algorithm);
    rdata.extend_from_slice(public_key);
    key_tag_from_rdata(&rdata)
}

/// Key tag over an encoded DNSKEY payload (flags, protocol, algorithm, key)
pub fn key_tag_from_rdata(rdata: &[u8]) -> u16 {
    if rdata.get(3) == Some(&DnsSecAlgorithm::RsaMd5.to_u8()) {
        // RSA/MD5 uses bits 8-23 of the modulus, i.e. the third- and
        // second-to-last octets of the payload
        if rdata.len() > 4 {
            return u16::from_be_bytes([rdata[rdata.len() - 3], rdata[rdata.len() - 2]]);
        }
        return 0;
    }

    let mut accumulator: u32 = 0;
    for (i, &byte) in rdata.iter().enumerate() {
        if i % 2 == 0 {
            accumulator += u32::from(byte) << 8;
        } else {
            accumulator += u32::from(byte);
        }
    }

    accumulator += (accumulator >> 16) & 0xFFFF;
    (accumulator & 0xFFFF) as u16
}
