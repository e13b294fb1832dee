//! The name resolver: turns whatever a user typed on the command line —
//! `HEAD`, a short hash, a branch, a tag — into a single concrete OID,
//! following tag and commit indirection when the caller wants a specific
//! object kind.

use std::collections::BTreeSet;

use crate::error::{GitError, Result};
use crate::object::{self, ObjectKind};
use crate::refs;
use crate::repository::Repository;

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.len() <= 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Every hex-prefix match under `objects/`, however many start with `prefix`.
fn hash_prefix_candidates(repo: &Repository, prefix: &str) -> Result<Vec<String>> {
    if prefix.len() < 4 {
        return Ok(Vec::new());
    }
    let dir = repo.gitdir.join("objects").join(&prefix[0..2]);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let rest = &prefix[2..];
    let mut matches = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(rest) {
            matches.push(format!("{}{}", &prefix[0..2], name));
        }
    }
    Ok(matches)
}

/// Collect every distinct OID `name` could plausibly refer to, without
/// deciding yet whether that's zero, one, or too many.
fn candidates(repo: &Repository, name: &str) -> Result<BTreeSet<String>> {
    let mut found = BTreeSet::new();

    if name == "HEAD" {
        if let Some(oid) = refs::resolve(repo, "HEAD")? {
            found.insert(oid);
        }
    }

    if is_hex(name) {
        let lowered = name.to_ascii_lowercase();
        if lowered.len() == 40 {
            if repo.gitdir.join("objects").join(&lowered[0..2]).join(&lowered[2..]).exists() {
                found.insert(lowered);
            }
        } else {
            found.extend(hash_prefix_candidates(repo, &lowered)?);
        }
    }

    for prefix in ["refs/tags/", "refs/heads/", "refs/remotes/"] {
        if let Some(oid) = refs::resolve(repo, &format!("{prefix}{name}"))? {
            found.insert(oid);
        }
    }

    Ok(found)
}

/// Resolve `name` to a single OID, optionally following tag and commit
/// indirection until it names an object of `expected_kind`.
///
/// `follow = false` still checks the resolved object's kind against
/// `expected_kind` — it just refuses to walk through a tag or commit to get
/// there: `cat-file tag <name>` on something that isn't a tag fails rather
/// than silently printing whatever the name happened to resolve to.
pub fn find(repo: &Repository, name: &str, expected_kind: Option<ObjectKind>, follow: bool) -> Result<String> {
    let found = candidates(repo, name)?;

    let oid = match found.len() {
        0 => return Err(GitError::NoSuchRef(name.to_string())),
        1 => found.into_iter().next().expect("len checked above"),
        _ => {
            return Err(GitError::Ambiguous {
                name: name.to_string(),
                candidates: found.into_iter().collect(),
            })
        }
    };

    let Some(expected) = expected_kind else {
        return Ok(oid);
    };

    follow_to_kind(repo, oid, expected, follow)
}

fn follow_to_kind(repo: &Repository, start: String, expected: ObjectKind, follow: bool) -> Result<String> {
    let mut oid = start;
    loop {
        let obj = crate::object::store::read(repo, &oid)?;
        if obj.kind() == expected {
            return Ok(oid);
        }

        if !follow {
            return Err(GitError::malformed(
                "object",
                format!("{oid} is a {}, not a {expected}", obj.kind()),
            ));
        }

        match &obj {
            object::Object::Tag(tag) => {
                let target = tag
                    .kvlm
                    .get(b"object")
                    .ok_or_else(|| GitError::malformed("tag", "missing object header"))?;
                oid = String::from_utf8(target.to_vec())
                    .map_err(|_| GitError::malformed("tag", "object header is not valid UTF-8"))?;
            }
            object::Object::Commit(commit) if expected == ObjectKind::Tree => {
                let target = commit
                    .kvlm
                    .get(b"tree")
                    .ok_or_else(|| GitError::malformed("commit", "missing tree header"))?;
                oid = String::from_utf8(target.to_vec())
                    .map_err(|_| GitError::malformed("commit", "tree header is not valid UTF-8"))?;
            }
            _ => {
                return Err(GitError::malformed(
                    "object",
                    format!("{oid} is a {}, cannot be followed to a {expected}", obj.kind()),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{store, Blob, Commit, Object, Tag};
    use crate::object::kvlm::Kvlm;

    fn temp_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::create(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn resolves_head_through_branch() {
        let (_dir, repo) = temp_repo();
        let oid = store::write(Some(&repo), &Object::Blob(Blob { data: b"hi\n".to_vec() })).unwrap();
        refs::write(&repo, "refs/heads/master", &oid).unwrap();
        assert_eq!(find(&repo, "HEAD", None, true).unwrap(), oid);
    }

    #[test]
    fn unambiguous_short_hash_resolves() {
        let (_dir, repo) = temp_repo();
        let oid = store::write(Some(&repo), &Object::Blob(Blob { data: b"hi\n".to_vec() })).unwrap();
        assert_eq!(find(&repo, &oid[0..6], None, true).unwrap(), oid);
    }

    #[test]
    fn uppercase_hex_is_lowered_before_matching() {
        let (_dir, repo) = temp_repo();
        let oid = store::write(Some(&repo), &Object::Blob(Blob { data: b"hi\n".to_vec() })).unwrap();
        let upper_full = oid.to_ascii_uppercase();
        let upper_prefix = &upper_full[0..6];
        assert_eq!(find(&repo, &upper_full, None, true).unwrap(), oid);
        assert_eq!(find(&repo, upper_prefix, None, true).unwrap(), oid);
    }

    #[test]
    fn unknown_name_is_no_such_ref() {
        let (_dir, repo) = temp_repo();
        let err = find(&repo, "nonexistent-branch", None, true).unwrap_err();
        assert!(matches!(err, GitError::NoSuchRef(_)));
    }

    #[test]
    fn name_matching_both_a_tag_and_a_branch_is_ambiguous() {
        let (_dir, repo) = temp_repo();
        let oid_a = store::write(Some(&repo), &Object::Blob(Blob { data: b"a\n".to_vec() })).unwrap();
        let oid_b = store::write(Some(&repo), &Object::Blob(Blob { data: b"b\n".to_vec() })).unwrap();
        refs::write(&repo, "refs/heads/thing", &oid_a).unwrap();
        refs::write(&repo, "refs/tags/thing", &oid_b).unwrap();

        let err = find(&repo, "thing", None, true).unwrap_err();
        assert!(matches!(err, GitError::Ambiguous { .. }));
    }

    #[test]
    fn tag_object_follows_to_its_target_commit() {
        let (_dir, repo) = temp_repo();
        let mut commit_kvlm = Kvlm::new();
        commit_kvlm.push(b"tree", &b"4b825dc642cb6eb9a060e54bf8d69288fbee4904"[..]);
        commit_kvlm.message = b"initial\n".to_vec();
        let commit_oid = store::write(Some(&repo), &Object::Commit(Commit { kvlm: commit_kvlm })).unwrap();

        let mut tag_kvlm = Kvlm::new();
        tag_kvlm.push(b"object", commit_oid.clone().into_bytes());
        tag_kvlm.push(b"type", &b"commit"[..]);
        tag_kvlm.push(b"tag", &b"v1"[..]);
        tag_kvlm.message = b"release\n".to_vec();
        let tag_oid = store::write(Some(&repo), &Object::Tag(Tag { kvlm: tag_kvlm })).unwrap();
        refs::write(&repo, "refs/tags/v1", &tag_oid).unwrap();

        let resolved = find(&repo, "v1", Some(ObjectKind::Commit), true).unwrap();
        assert_eq!(resolved, commit_oid);
    }

    #[test]
    fn without_follow_the_tag_itself_is_returned() {
        let (_dir, repo) = temp_repo();
        let mut tag_kvlm = Kvlm::new();
        tag_kvlm.push(b"object", &b"4b825dc642cb6eb9a060e54bf8d69288fbee4904"[..]);
        tag_kvlm.push(b"type", &b"commit"[..]);
        tag_kvlm.push(b"tag", &b"v1"[..]);
        tag_kvlm.message = b"release\n".to_vec();
        let tag_oid = store::write(Some(&repo), &Object::Tag(Tag { kvlm: tag_kvlm })).unwrap();
        refs::write(&repo, "refs/tags/v1", &tag_oid).unwrap();

        assert_eq!(find(&repo, "v1", None, false).unwrap(), tag_oid);
    }

    #[test]
    fn without_follow_a_kind_mismatch_still_fails_instead_of_returning_the_wrong_object() {
        let (_dir, repo) = temp_repo();
        let mut tag_kvlm = Kvlm::new();
        tag_kvlm.push(b"object", &b"4b825dc642cb6eb9a060e54bf8d69288fbee4904"[..]);
        tag_kvlm.push(b"type", &b"commit"[..]);
        tag_kvlm.push(b"tag", &b"v1"[..]);
        tag_kvlm.message = b"release\n".to_vec();
        let tag_oid = store::write(Some(&repo), &Object::Tag(Tag { kvlm: tag_kvlm })).unwrap();
        refs::write(&repo, "refs/tags/v1", &tag_oid).unwrap();

        let err = find(&repo, "v1", Some(ObjectKind::Commit), false).unwrap_err();
        assert!(matches!(err, GitError::Malformed { .. }));
    }

    #[test]
    fn without_follow_a_matching_kind_still_succeeds() {
        let (_dir, repo) = temp_repo();
        let oid = store::write(Some(&repo), &Object::Blob(Blob { data: b"hi\n".to_vec() })).unwrap();
        assert_eq!(find(&repo, &oid, Some(ObjectKind::Blob), false).unwrap(), oid);
    }
}
