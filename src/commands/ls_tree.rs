use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::object::{store, ObjectKind};
use crate::repository::Repository;
use crate::resolve;

fn print_tree(repo: &Repository, oid: &str, recursive: bool, prefix: &Path) -> Result<()> {
    let obj = store::read(repo, oid)?;
    let Some(tree) = obj.as_tree() else {
        return Ok(());
    };

    for entry in tree.sorted_entries() {
        let display_type = entry.display_type()?;
        let path = prefix.join(&entry.path);

        if recursive && display_type == "tree" {
            print_tree(repo, &entry.oid_hex(), recursive, &path)?;
        } else {
            println!("{} {} {}\t{}", entry.mode, display_type, entry.oid_hex(), path.display());
        }
    }

    Ok(())
}

pub fn run(tree_ish: &str, recursive: bool) -> Result<()> {
    let repo = Repository::find(".")?;
    let oid = resolve::find(&repo, tree_ish, Some(ObjectKind::Tree), true)?;
    print_tree(&repo, &oid, recursive, &PathBuf::new())
}
