//! The object wire form: `<type> SP <len> NUL <payload>`, the bytes over
//! which an object's SHA-1 OID is computed (before zlib framing, which is
//! the store's concern, not the codec's).

use crate::error::{GitError, Result};
use crate::object::ObjectKind;

pub struct WireObject {
    pub kind: ObjectKind,
    pub payload: Vec<u8>,
}

pub fn encode(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + kind.as_str().len() + 12);
    out.extend_from_slice(kind.as_str().as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload.len().to_string().as_bytes());
    out.push(0);
    out.extend_from_slice(payload);
    out
}

pub fn decode(raw: &[u8]) -> Result<WireObject> {
    let space = raw
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| GitError::malformed("object header", "missing space after type"))?;

    let kind_str = std::str::from_utf8(&raw[..space])
        .map_err(|_| GitError::malformed("object header", "type is not valid UTF-8"))?;
    let kind = ObjectKind::parse(kind_str)?;

    let nul_rel = raw[space + 1..]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| GitError::malformed("object header", "missing NUL after length"))?;
    let nul = space + 1 + nul_rel;

    let len_str = std::str::from_utf8(&raw[space + 1..nul])
        .map_err(|_| GitError::malformed("object header", "length is not valid UTF-8"))?;
    let declared_len: usize = len_str
        .parse()
        .map_err(|_| GitError::malformed("object header", format!("invalid length {len_str:?}")))?;

    let payload = &raw[nul + 1..];
    if payload.len() != declared_len {
        return Err(GitError::malformed(
            "object header",
            format!(
                "declared length {declared_len} does not match payload length {}",
                payload.len()
            ),
        ));
    }

    Ok(WireObject {
        kind,
        payload: payload.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let wire = encode(ObjectKind::Blob, b"hi\n");
        assert_eq!(wire, b"blob 3\0hi\n");
        let decoded = decode(&wire).unwrap();
        assert_eq!(decoded.kind, ObjectKind::Blob);
        assert_eq!(decoded.payload, b"hi\n");
    }

    #[test]
    fn wire_type_is_lowercase() {
        let wire = encode(ObjectKind::Commit, b"");
        assert!(wire.starts_with(b"commit "));
    }

    #[test]
    fn rejects_bad_length() {
        let mut wire = encode(ObjectKind::Blob, b"hi\n");
        wire[5] = b'9'; // corrupt the declared length digit
        assert!(decode(&wire).is_err());
    }

    #[test]
    fn rejects_unknown_type() {
        let raw = b"widget 0\0";
        match decode(raw) {
            Err(GitError::UnknownKind(k)) => assert_eq!(k, "widget"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }
}
