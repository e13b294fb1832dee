use std::fs;

use crate::error::Result;
use crate::object::kvlm::Kvlm;
use crate::object::{store, Object, Tag};
use crate::refs;
use crate::repository::Repository;
use crate::resolve;

fn list() -> Result<()> {
    let repo = Repository::find(".")?;
    let tags_dir = repo.gitdir.join("refs").join("tags");
    if !tags_dir.is_dir() {
        return Ok(());
    }

    let mut names: Vec<_> = fs::read_dir(&tags_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();

    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Create `name` pointing at `object` (default `HEAD`). With `annotate`, a
/// tag object is written first and the ref points at that instead of
/// directly at the target.
pub fn run(annotate: bool, name: Option<String>, object: Option<String>) -> Result<()> {
    let Some(name) = name else {
        return list();
    };

    let repo = Repository::find(".")?;
    let target_name = object.as_deref().unwrap_or("HEAD");
    let target_oid = resolve::find(&repo, target_name, None, true)?;

    let oid_to_point_at = if annotate {
        let target_obj = store::read(&repo, &target_oid)?;

        let identity = repo
            .user_identity()
            .ok_or_else(|| crate::error::GitError::malformed("tag", "no [user] name/email set in .git/config"))?;

        let mut kvlm = Kvlm::new();
        kvlm.push(b"object", target_oid.clone().into_bytes());
        kvlm.push(b"type", target_obj.kind().as_str().as_bytes());
        kvlm.push(b"tag", name.clone().into_bytes());
        kvlm.push(b"tagger", identity.into_bytes());
        kvlm.message = format!("{name}\n").into_bytes();

        store::write(Some(&repo), &Object::Tag(Tag { kvlm }))?
    } else {
        target_oid
    };

    refs::write(&repo, &format!("refs/tags/{name}"), &oid_to_point_at)?;
    Ok(())
}
