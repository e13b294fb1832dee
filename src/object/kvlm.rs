//! Key-Value List with Message: the RFC-2822-like text format shared by
//! commit and tag objects. Parsing is an explicit cursor loop, not
//! recursion, so a merge commit with hundreds of `parent` lines or a huge
//! message doesn't grow the call stack.

use crate::error::{GitError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    /// Ordered headers: `(key, value)` pairs, in the exact order parsed or
    /// inserted. A repeated key (e.g. `parent` on a merge commit) simply
    /// appears more than once, in first-seen order.
    pub headers: Vec<(Vec<u8>, Vec<u8>)>,
    /// Everything after the blank line separating headers from the message.
    pub message: Vec<u8>,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &[u8], value: impl Into<Vec<u8>>) {
        self.headers.push((key.to_vec(), value.into()));
    }

    /// All values for `key`, in first-seen order.
    pub fn values<'a>(&'a self, key: &[u8]) -> impl Iterator<Item = &'a [u8]> {
        self.headers
            .iter()
            .filter_map(move |(k, v)| (k.as_slice() == key).then_some(v.as_slice()))
    }

    /// The first value for `key`, if present.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.values(key).next()
    }
}

pub fn parse(raw: &[u8]) -> Result<Kvlm> {
    let mut kvlm = Kvlm::new();
    let mut pos = 0usize;

    if raw.is_empty() {
        return Ok(kvlm);
    }

    let next_newline = |from: usize| -> Result<usize> {
        raw[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|off| from + off)
            .ok_or_else(|| GitError::malformed("kvlm", "expected newline before end of input"))
    };

    loop {
        let spc = raw[pos..].iter().position(|&b| b == b' ').map(|off| pos + off);
        let nl = raw[pos..].iter().position(|&b| b == b'\n').map(|off| pos + off);

        match (spc, nl) {
            (_, Some(nlpos)) if spc.is_none_or(|s| s > nlpos) => {
                if nlpos != pos {
                    return Err(GitError::malformed(
                        "kvlm",
                        "expected blank line at headers/message boundary",
                    ));
                }
                kvlm.message = raw.get(nlpos + 1..).unwrap_or(&[]).to_vec();
                break;
            }
            (Some(spcpos), Some(_)) => {
                let key = raw[pos..spcpos].to_vec();

                let mut end = spcpos;
                loop {
                    let nlpos = next_newline(end + 1)?;
                    if nlpos + 1 < raw.len() && raw[nlpos + 1] == b' ' {
                        end = nlpos;
                    } else {
                        end = nlpos;
                        break;
                    }
                }

                let slice = &raw[spcpos + 1..end];
                let mut value = Vec::with_capacity(slice.len());
                let mut i = 0usize;
                while i < slice.len() {
                    if slice[i] == b'\n' && i + 1 < slice.len() && slice[i + 1] == b' ' {
                        value.push(b'\n');
                        i += 2;
                    } else {
                        value.push(slice[i]);
                        i += 1;
                    }
                }

                kvlm.headers.push((key, value));

                pos = end + 1;
                if pos >= raw.len() {
                    kvlm.message.clear();
                    break;
                }
            }
            _ => return Err(GitError::malformed("kvlm", "missing space or newline in header")),
        }
    }

    Ok(kvlm)
}

pub fn serialize(kvlm: &Kvlm) -> Vec<u8> {
    let mut out = Vec::new();

    for (k, v) in &kvlm.headers {
        out.extend_from_slice(k);
        out.push(b' ');
        let mut i = 0usize;
        while i < v.len() {
            if v[i] == b'\n' {
                out.push(b'\n');
                out.push(b' ');
            } else {
                out.push(v[i]);
            }
            i += 1;
        }
        out.push(b'\n');
    }

    out.push(b'\n');
    out.extend_from_slice(&kvlm.message);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_commit() {
        let raw = b"tree abc123\nparent def456\nauthor A <a@b> 0 +0000\ncommitter A <a@b> 0 +0000\n\nmessage body\n";
        let kvlm = parse(raw).unwrap();
        assert_eq!(kvlm.get(b"tree"), Some(&b"abc123"[..]));
        assert_eq!(serialize(&kvlm), raw);
    }

    #[test]
    fn preserves_duplicate_keys_in_order() {
        let raw = b"parent aaa\nparent bbb\n\n";
        let kvlm = parse(raw).unwrap();
        let parents: Vec<&[u8]> = kvlm.values(b"parent").collect();
        assert_eq!(parents, vec![&b"aaa"[..], &b"bbb"[..]]);
        assert_eq!(serialize(&kvlm), raw);
    }

    #[test]
    fn round_trips_multiline_gpgsig() {
        let mut kvlm = Kvlm::new();
        kvlm.push(b"tree", &b"abc"[..]);
        kvlm.push(
            b"gpgsig",
            &b"-----BEGIN PGP SIGNATURE-----\n\niQEz\nsome sig data\n-----END PGP SIGNATURE-----"[..],
        );
        kvlm.message = b"commit message\n".to_vec();

        let wire = serialize(&kvlm);
        // every continuation line of the multi-line value gained a leading space
        assert!(wire.windows(2).filter(|w| w == b"\n ").count() >= 3);

        let reparsed = parse(&wire).unwrap();
        assert_eq!(reparsed, kvlm);
        assert_eq!(serialize(&reparsed), wire);
    }

    #[test]
    fn empty_input_is_empty_kvlm() {
        let kvlm = parse(b"").unwrap();
        assert!(kvlm.headers.is_empty());
        assert!(kvlm.message.is_empty());
    }

    #[test]
    fn message_only_no_headers() {
        let raw = b"\njust a message\n";
        let kvlm = parse(raw).unwrap();
        assert!(kvlm.headers.is_empty());
        assert_eq!(kvlm.message, b"just a message\n");
        assert_eq!(serialize(&kvlm), raw);
    }
}
