//! Canonical form of rrsets (RFC 4034 section 6) and the signed data built from it

use super::errors::{DnsSecError, Result, malformed};
use super::rdata::Rrsig;
use crate::dns::resource::check_members;
use crate::dns::{DNSResource, DNSResourceType, Name};
use crate::error::DnsError;

/// Payload with embedded domain names lowercased.
///
/// Applies to the types listed in RFC 4034 section 6.2 as amended by RFC 6840
/// section 5.1; NSEC next names and HINFO are left alone.
pub fn canonical_rdata(rtype: DNSResourceType, rdata: &[u8]) -> std::result::Result<Vec<u8>, DnsError> {
    let mut out = rdata.to_vec();
    match rtype.code() {
        // NS MD MF CNAME MB MG MR PTR NXT DNAME
        2 | 3 | 4 | 5 | 7 | 8 | 9 | 12 | 30 | 39 => {
            fold_name(&mut out, 0)?;
        }
        // SOA MINFO RP
        6 | 14 | 17 => {
            let next = fold_name(&mut out, 0)?;
            fold_name(&mut out, next)?;
        }
        // MX AFSDB RT KX
        15 | 18 | 21 | 36 => {
            fold_name(&mut out, 2)?;
        }
        // PX
        26 => {
            let next = fold_name(&mut out, 2)?;
            fold_name(&mut out, next)?;
        }
        // SRV
        33 => {
            fold_name(&mut out, 6)?;
        }
        // NAPTR: order, preference, flags, services, regexp, replacement
        35 => {
            let mut pos = 4;
            for _ in 0..3 {
                let len = *out.get(pos).ok_or(DnsError::BufferTooSmall {
                    need: pos + 1,
                    have: out.len(),
                })?;
                pos += 1 + usize::from(len);
            }
            fold_name(&mut out, pos)?;
        }
        // SIG RRSIG
        24 | 46 => {
            fold_name(&mut out, Rrsig::HEADER_LEN)?;
        }
        // A6: prefix length, address suffix, prefix name when the prefix is non-empty
        38 => {
            let prefix = *out.first().ok_or(DnsError::BufferTooSmall { need: 1, have: 0 })?;
            if prefix > 0 {
                let suffix_len = (128 - usize::from(prefix.min(128)) + 7) / 8;
                fold_name(&mut out, 1 + suffix_len)?;
            }
        }
        _ => {}
    }
    Ok(out)
}

// Lowercases the uncompressed name at `pos`, returning the offset just past it.
// Length octets are below 64 so folding the whole range leaves them intact.
fn fold_name(buf: &mut [u8], pos: usize) -> std::result::Result<usize, DnsError> {
    let have = buf.len();
    let tail = buf
        .get_mut(pos..)
        .ok_or(DnsError::BufferTooSmall { need: pos + 1, have })?;
    let (_, len) = Name::from_wire(tail)?;
    tail[..len].make_ascii_lowercase();
    Ok(pos + len)
}

/// Canonical members of an rrset: lowercased owners and payload names, the
/// given TTL, sorted by payload and free of duplicates. Idempotent.
pub fn canonicalize(records: &[DNSResource], original_ttl: u32) -> Result<Vec<DNSResource>> {
    check_members(records)?;
    let mut canonical = Vec::with_capacity(records.len());
    for record in records {
        if !record.has_consistent_length() {
            return Err(malformed(
                &record.name,
                record.rtype,
                format!("rdlength {} for {} bytes", record.rdlength, record.rdata.len()),
            ));
        }
        let rdata = canonical_rdata(record.rtype, &record.rdata)
            .map_err(|e| malformed(&record.name, record.rtype, e))?;
        canonical.push(DNSResource::new(
            record.name.to_lowercase(),
            record.rtype,
            record.rclass,
            original_ttl,
            rdata,
        ));
    }
    canonical.sort_by(|a, b| a.rdata.cmp(&b.rdata));
    canonical.dedup_by(|a, b| a.rdata == b.rdata);
    Ok(canonical)
}

/// The rrset part of the signed data: every canonical member as
/// owner | type | class | original TTL | rdlength | rdata.
///
/// A `labels` count below the owner's label count replaces the owner with
/// the wildcard it was expanded from.
pub fn encode_rrset(records: &[DNSResource], original_ttl: u32, labels: u8) -> Result<Vec<u8>> {
    let canonical = canonicalize(records, original_ttl)?;
    let first = &canonical[0];
    let owner = first.name.signing_owner(labels).ok_or_else(|| {
        malformed(
            &first.name,
            first.rtype,
            format!(
                "label count {labels} exceeds the owner's {}",
                first.name.rrsig_labels()
            ),
        )
    })?;

    let mut owner_wire = Vec::with_capacity(owner.wire_len());
    owner.write_canonical_wire(&mut owner_wire);

    let mut out = Vec::new();
    for record in &canonical {
        out.extend_from_slice(&owner_wire);
        out.extend_from_slice(&record.rtype.code().to_be_bytes());
        out.extend_from_slice(&record.rclass.code().to_be_bytes());
        out.extend_from_slice(&original_ttl.to_be_bytes());
        let rdlength = u16::try_from(record.rdata.len())
            .map_err(|_| malformed(&record.name, record.rtype, "payload exceeds 65535 bytes"))?;
        out.extend_from_slice(&rdlength.to_be_bytes());
        out.extend_from_slice(&record.rdata);
    }
    Ok(out)
}

/// Data a signature covers: the RRSIG header followed by the canonical rrset
pub fn signed_data(rrsig: &Rrsig, records: &[DNSResource]) -> Result<Vec<u8>> {
    if let Some(first) = records.first() {
        if first.rtype != rrsig.type_covered {
            return Err(DnsSecError::TypeMismatch {
                owner: first.name.clone(),
                rtype: first.rtype,
                reason: format!("signature covers {}", rrsig.type_covered),
            });
        }
    }
    let mut out = Vec::new();
    rrsig.write_signed_header(&mut out);
    out.extend(encode_rrset(records, rrsig.original_ttl, rrsig.labels)?);
    Ok(out)
}
