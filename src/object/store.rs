//! The object store: content-addressed, zlib-framed files under
//! `objects/xx/yyyy...`, writes are idempotent by OID.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha1::{Digest, Sha1};

use crate::error::{GitError, Result};
use crate::object::codec;
use crate::object::Object;
use crate::repository::Repository;

/// Where `oid` (a 40-char hex SHA-1) would live under `repo`'s gitdir,
/// whether or not the file exists yet.
pub fn object_path(repo: &Repository, oid: &str) -> std::path::PathBuf {
    repo.gitdir.join("objects").join(&oid[0..2]).join(&oid[2..])
}

/// Read and fully decode the object named by `oid`.
pub fn read(repo: &Repository, oid: &str) -> Result<Object> {
    let path = object_path(repo, oid);
    let compressed = std::fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GitError::NotFound(oid.to_string())
        } else {
            GitError::Io(e)
        }
    })?;

    let mut raw = Vec::new();
    ZlibDecoder::new(&compressed[..])
        .read_to_end(&mut raw)
        .map_err(|_| GitError::malformed("object", format!("{oid} is not valid zlib data")))?;

    let wire = codec::decode(&raw)?;
    let object = Object::deserialize(wire.kind, &wire.payload)?;
    tracing::debug!(oid, kind = %wire.kind, "read object");
    Ok(object)
}

/// Compute `obj`'s OID and, if `repo` is given, persist it. Writing an OID
/// that already exists on disk is a no-op: the store never overwrites an
/// existing object, since two objects with the same OID must by construction
/// have identical content.
pub fn write(repo: Option<&Repository>, obj: &Object) -> Result<String> {
    let payload = obj.serialize();
    let wire = codec::encode(obj.kind(), &payload);

    let mut hasher = Sha1::new();
    hasher.update(&wire);
    let oid = hex::encode(hasher.finalize());

    if let Some(repo) = repo {
        let path = object_path(repo, &oid);
        if path.exists() {
            tracing::debug!(oid, "object already present, skipping write");
            return Ok(oid);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&wire)?;
        let compressed = encoder.finish()?;
        std::fs::write(&path, compressed)?;
        tracing::debug!(oid, kind = %obj.kind(), "wrote object");
    }

    Ok(oid)
}
