//! The reference store: `HEAD`, `refs/heads/*`, `refs/tags/*`, all backed by
//! small text files that are either a 40-char hex OID or a symbolic
//! indirection of the form `ref: <other ref path>`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{GitError, Result};
use crate::repository::Repository;

const SYMBOLIC_PREFIX: &str = "ref: ";
const MAX_INDIRECTION_DEPTH: u32 = 10;

fn is_hex_oid(s: &str) -> bool {
    s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn ref_path(repo: &Repository, name: &str) -> PathBuf {
    repo.gitdir.join(name)
}

/// Resolve `name` (a gitdir-relative path like `HEAD` or `refs/heads/master`)
/// to the OID it ultimately points at, following any chain of `ref:`
/// indirections. `Ok(None)` means the ref file doesn't exist, which is not
/// an error: a freshly initialized repository's `HEAD` points at a branch
/// that has no commits yet.
pub fn resolve(repo: &Repository, name: &str) -> Result<Option<String>> {
    resolve_inner(repo, name, 0)
}

fn resolve_inner(repo: &Repository, name: &str, depth: u32) -> Result<Option<String>> {
    if depth >= MAX_INDIRECTION_DEPTH {
        return Err(GitError::malformed("ref", format!("indirection chain starting at {name:?} is too deep")));
    }

    let path = ref_path(repo, name);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(GitError::Io(e)),
    };
    let content = content.trim_end_matches('\n');

    if let Some(target) = content.strip_prefix(SYMBOLIC_PREFIX) {
        return resolve_inner(repo, target.trim(), depth + 1);
    }

    if !is_hex_oid(content) {
        return Err(GitError::malformed("ref", format!("{name} does not contain a 40-hex OID or a ref: indirection")));
    }

    Ok(Some(content.to_string()))
}

/// Write `oid` directly into ref file `name`, overwriting whatever was
/// there. Never writes a symbolic indirection; that's `set_symbolic`'s job.
pub fn write(repo: &Repository, name: &str, oid: &str) -> Result<()> {
    let path = ref_path(repo, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, format!("{oid}\n"))?;
    Ok(())
}

/// Point ref file `name` at another ref, e.g. `HEAD` at `refs/heads/master`.
pub fn set_symbolic(repo: &Repository, name: &str, target: &str) -> Result<()> {
    let path = ref_path(repo, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, format!("{SYMBOLIC_PREFIX}{target}\n"))?;
    Ok(())
}

/// A node in the nested view of `refs/`: either a resolved OID leaf or a
/// further subdirectory of refs, mirroring the on-disk tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefNode {
    Leaf(String),
    Branch(BTreeMap<String, RefNode>),
}

/// The nested view of everything under `refs/`, sorted at every level.
pub fn list(repo: &Repository) -> Result<BTreeMap<String, RefNode>> {
    let refs_dir = repo.gitdir.join("refs");
    if !refs_dir.is_dir() {
        return Ok(BTreeMap::new());
    }
    list_dir(repo, &refs_dir)
}

fn list_dir(repo: &Repository, dir: &std::path::Path) -> Result<BTreeMap<String, RefNode>> {
    let mut out = BTreeMap::new();
    let mut names: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    names.sort_by_key(|e| e.file_name());

    for entry in names {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();

        if path.is_dir() {
            out.insert(file_name, RefNode::Branch(list_dir(repo, &path)?));
        } else {
            let relative = path
                .strip_prefix(&repo.gitdir)
                .expect("entries under gitdir always strip cleanly")
                .to_string_lossy()
                .to_string();
            if let Some(oid) = resolve(repo, &relative)? {
                out.insert(file_name, RefNode::Leaf(oid));
            }
        }
    }

    Ok(out)
}

/// `list` flattened to `refs/heads/master` style full names mapped to
/// resolved OIDs, the shape `show-ref` prints.
pub fn list_flat(repo: &Repository) -> Result<BTreeMap<String, String>> {
    let mut flat = BTreeMap::new();
    flatten(&list(repo)?, "refs", &mut flat);
    Ok(flat)
}

fn flatten(nodes: &BTreeMap<String, RefNode>, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (name, node) in nodes {
        let full = format!("{prefix}/{name}");
        match node {
            RefNode::Leaf(oid) => {
                out.insert(full, oid.clone());
            }
            RefNode::Branch(children) => flatten(children, &full, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;

    fn temp_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::create(dir.path()).unwrap();
        (dir, repo)
    }

    const OID: &str = "45b983be36b73c0788dc9cbcb76cbb80fc7bb057";

    #[test]
    fn head_on_fresh_repo_points_to_branch_with_no_commits() {
        let (_dir, repo) = temp_repo();
        assert_eq!(resolve(&repo, "HEAD").unwrap(), None);
    }

    #[test]
    fn write_then_resolve_direct_ref() {
        let (_dir, repo) = temp_repo();
        write(&repo, "refs/heads/master", OID).unwrap();
        assert_eq!(resolve(&repo, "refs/heads/master").unwrap(), Some(OID.to_string()));
    }

    #[test]
    fn head_follows_symbolic_indirection_to_branch() {
        let (_dir, repo) = temp_repo();
        write(&repo, "refs/heads/master", OID).unwrap();
        assert_eq!(resolve(&repo, "HEAD").unwrap(), Some(OID.to_string()));
    }

    #[test]
    fn chained_indirection_is_followed_to_the_end() {
        let (_dir, repo) = temp_repo();
        write(&repo, "refs/heads/master", OID).unwrap();
        set_symbolic(&repo, "refs/heads/alias", "refs/heads/master").unwrap();
        set_symbolic(&repo, "HEAD", "refs/heads/alias").unwrap();
        assert_eq!(resolve(&repo, "HEAD").unwrap(), Some(OID.to_string()));
    }

    #[test]
    fn self_referential_chain_fails_instead_of_looping_forever() {
        let (_dir, repo) = temp_repo();
        set_symbolic(&repo, "refs/heads/a", "refs/heads/b").unwrap();
        set_symbolic(&repo, "refs/heads/b", "refs/heads/a").unwrap();
        let err = resolve(&repo, "refs/heads/a").unwrap_err();
        assert!(matches!(err, GitError::Malformed { .. }));
    }

    #[test]
    fn list_flat_reports_full_ref_names() {
        let (_dir, repo) = temp_repo();
        write(&repo, "refs/heads/master", OID).unwrap();
        write(&repo, "refs/tags/v1", OID).unwrap();

        let flat = list_flat(&repo).unwrap();
        assert_eq!(flat.get("refs/heads/master"), Some(&OID.to_string()));
        assert_eq!(flat.get("refs/tags/v1"), Some(&OID.to_string()));
    }
}
