use std::fs;
use std::path::Path;

use crate::error::{GitError, Result};
use crate::object::{store, ObjectKind};
use crate::repository::Repository;
use crate::resolve;

fn checkout_tree(repo: &Repository, oid: &str, path: &Path) -> Result<()> {
    let obj = store::read(repo, oid)?;
    let tree = obj
        .as_tree()
        .ok_or_else(|| GitError::malformed("checkout", format!("{oid} is not a tree")))?;

    fs::create_dir_all(path)?;

    for entry in tree.sorted_entries() {
        let entry_oid = entry.oid_hex();
        let entry_path = path.join(&entry.path);

        match entry.display_type()? {
            "tree" => checkout_tree(repo, &entry_oid, &entry_path)?,
            "commit" => {
                // submodule gitlink: record the pointed-at commit, nothing to materialize
                fs::write(&entry_path, format!("{entry_oid}\n"))?;
            }
            "blob" => {
                let blob_obj = store::read(repo, &entry_oid)?;
                let blob = blob_obj
                    .as_blob()
                    .ok_or_else(|| GitError::malformed("checkout", format!("{entry_oid} is not a blob")))?;

                if entry.mode.starts_with("12") {
                    write_symlink(&blob.data, &entry_path)?;
                } else {
                    fs::write(&entry_path, &blob.data)?;
                }
            }
            other => return Err(GitError::malformed("checkout", format!("unexpected entry type {other}"))),
        }
    }

    Ok(())
}

#[cfg(unix)]
fn write_symlink(target: &[u8], path: &Path) -> Result<()> {
    let target = String::from_utf8_lossy(target).to_string();
    std::os::unix::fs::symlink(target, path)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_symlink(target: &[u8], path: &Path) -> Result<()> {
    fs::write(path, target)?;
    Ok(())
}

pub fn run(commit: &str, dest: &Path) -> Result<()> {
    let repo = Repository::find(".")?;
    let commit_oid = resolve::find(&repo, commit, Some(ObjectKind::Commit), true)?;
    let commit_obj = store::read(&repo, &commit_oid)?;
    let commit = commit_obj
        .as_commit()
        .ok_or_else(|| GitError::malformed("checkout", format!("{commit_oid} is not a commit")))?;

    let tree_oid = commit
        .kvlm
        .get(b"tree")
        .ok_or_else(|| GitError::malformed("commit", "missing tree header"))?;
    let tree_oid = String::from_utf8(tree_oid.to_vec())
        .map_err(|_| GitError::malformed("commit", "tree header is not valid UTF-8"))?;

    if dest.exists() {
        if !dest.is_dir() {
            return Err(GitError::NotADir(dest.to_path_buf()));
        }
        if fs::read_dir(dest)?.next().is_some() {
            return Err(GitError::NotEmpty(dest.to_path_buf()));
        }
    } else {
        fs::create_dir_all(dest)?;
    }

    checkout_tree(&repo, &tree_oid, dest)
}
