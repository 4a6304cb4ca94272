use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{DnsError, Result};

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

/// A domain name as a sequence of labels, leftmost first. The root has no labels.
///
/// Equality and hashing ignore ASCII case. `Ord` is the DNSSEC canonical
/// ordering: labels are compared right to left as lowercased octet strings and
/// a name sorts before its own subdomains.
#[derive(Clone, Debug, Default)]
pub struct Name {
    labels: Vec<Vec<u8>>,
}

impl Name {
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn from_labels<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let labels: Vec<Vec<u8>> = labels.into_iter().map(|l| l.as_ref().to_vec()).collect();
        let mut wire_len = 1;
        for label in &labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(DnsError::InvalidLabelLength(label.len()));
            }
            wire_len += label.len() + 1;
        }
        if wire_len > MAX_NAME_LEN {
            return Err(DnsError::NameTooLong);
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of labels, not counting the root
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn is_wildcard(&self) -> bool {
        self.labels.first().is_some_and(|l| l.as_slice() == b"*")
    }

    /// The label count recorded in an RRSIG: the root and a leading `*` do not count
    pub fn rrsig_labels(&self) -> u8 {
        let count = if self.is_wildcard() {
            self.labels.len() - 1
        } else {
            self.labels.len()
        };
        // a valid name has at most 127 labels
        count as u8
    }

    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Uncompressed wire form with case preserved
    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len());
        for label in &self.labels {
            out.push(label.len() as u8);
            out.extend_from_slice(label);
        }
        out.push(0);
        out
    }

    pub fn to_canonical_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len());
        self.write_canonical_wire(&mut out);
        out
    }

    /// Appends the lowercased uncompressed wire form
    pub fn write_canonical_wire(&self, out: &mut Vec<u8>) {
        for label in &self.labels {
            out.push(label.len() as u8);
            out.extend(label.iter().map(|b| b.to_ascii_lowercase()));
        }
        out.push(0);
    }

    /// Decodes an uncompressed name at the start of `data`, returning it with
    /// the number of bytes consumed.
    pub fn from_wire(data: &[u8]) -> Result<(Name, usize)> {
        let mut labels = Vec::new();
        let mut pos = 0;
        loop {
            let len = *data.get(pos).ok_or(DnsError::BufferTooSmall {
                need: pos + 1,
                have: data.len(),
            })? as usize;
            pos += 1;
            if len == 0 {
                break;
            }
            if len & 0xC0 == 0xC0 {
                return Err(DnsError::CompressedName);
            }
            if len > MAX_LABEL_LEN {
                return Err(DnsError::InvalidLabelLength(len));
            }
            let label = data.get(pos..pos + len).ok_or(DnsError::BufferTooSmall {
                need: pos + len,
                have: data.len(),
            })?;
            labels.push(label.to_vec());
            pos += len;
            if pos > MAX_NAME_LEN {
                return Err(DnsError::NameTooLong);
            }
        }
        Ok((Self::from_labels(labels)?, pos))
    }

    pub fn to_lowercase(&self) -> Name {
        Name {
            labels: self.labels.iter().map(|l| l.to_ascii_lowercase()).collect(),
        }
    }

    /// True when `self` equals `other` or lies below it
    pub fn is_subdomain_of(&self, other: &Name) -> bool {
        if other.labels.len() > self.labels.len() {
            return false;
        }
        let offset = self.labels.len() - other.labels.len();
        self.labels[offset..]
            .iter()
            .zip(&other.labels)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Keeps the rightmost `count` labels
    pub fn trim_to(&self, count: usize) -> Name {
        let skip = self.labels.len().saturating_sub(count);
        Name {
            labels: self.labels[skip..].to_vec(),
        }
    }

    /// The owner a signature with `labels` labels was computed over.
    ///
    /// Equal counts give the name itself, a smaller count gives the wildcard
    /// `*.<rightmost labels>`, a larger one is impossible and yields None.
    pub fn signing_owner(&self, labels: u8) -> Option<Name> {
        let own = self.rrsig_labels() as usize;
        let labels = labels as usize;
        match labels.cmp(&own) {
            Ordering::Equal => Some(self.clone()),
            Ordering::Greater => None,
            Ordering::Less => {
                let mut wildcard = self.trim_to(labels);
                wildcard.labels.insert(0, b"*".to_vec());
                Some(wildcard)
            }
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(&other.labels)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.labels.len());
        for label in &self.labels {
            state.write_usize(label.len());
            for b in label {
                state.write_u8(b.to_ascii_lowercase());
            }
        }
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.labels.iter().rev().zip(other.labels.iter().rev()) {
            let ord = a
                .iter()
                .map(u8::to_ascii_lowercase)
                .cmp(b.iter().map(u8::to_ascii_lowercase));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.labels.len().cmp(&other.labels.len())
    }
}

impl FromStr for Name {
    type Err = DnsError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "." || s.is_empty() {
            return Ok(Name::root());
        }
        let mut labels = Vec::new();
        let mut current = Vec::new();
        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    if current.is_empty() {
                        return Err(DnsError::InvalidLabelLength(0));
                    }
                    labels.push(std::mem::take(&mut current));
                    i += 1;
                }
                b'\\' => {
                    let rest = &bytes[i + 1..];
                    if rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) {
                        let value = rest[..3]
                            .iter()
                            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
                        let byte = u8::try_from(value)
                            .map_err(|_| DnsError::Parse(format!("escape out of range in {s}")))?;
                        current.push(byte);
                        i += 4;
                    } else if let Some(&c) = rest.first() {
                        current.push(c);
                        i += 2;
                    } else {
                        return Err(DnsError::Parse(format!("dangling escape in {s}")));
                    }
                }
                c => {
                    current.push(c);
                    i += 1;
                }
            }
        }
        if !current.is_empty() {
            labels.push(current);
        }
        Name::from_labels(labels)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        for label in &self.labels {
            for &b in label {
                match b {
                    b'.' | b'\\' | b'"' | b'(' | b')' | b';' | b'@' | b'$' => {
                        write!(f, "\\{}", b as char)?
                    }
                    0x21..=0x7E => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{b:03}")?,
                }
            }
            write!(f, ".")?;
        }
        Ok(())
    }
}
