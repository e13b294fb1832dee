use std::collections::HashSet;

use crate::error::Result;
use crate::object::{store, ObjectKind};
use crate::repository::Repository;
use crate::resolve;

pub fn run(commit: &str) -> Result<()> {
    let repo = Repository::find(".")?;
    let start = resolve::find(&repo, commit, Some(ObjectKind::Commit), true)?;

    println!("digraph gitlog{{");
    println!("  node[shape=rect]");

    let mut seen = HashSet::new();
    let mut stack = vec![start];

    while let Some(oid) = stack.pop() {
        if !seen.insert(oid.clone()) {
            continue;
        }

        let obj = store::read(&repo, &oid)?;
        let Some(commit) = obj.as_commit() else {
            continue;
        };

        let message = String::from_utf8_lossy(&commit.kvlm.message).to_string();
        let first_line = message
            .lines()
            .next()
            .unwrap_or("")
            .replace('\\', "\\\\")
            .replace('"', "\\\"");
        println!(r#"  c_{oid} [label="{short}: {first_line}"]"#, short = &oid[..7]);

        for parent in commit.kvlm.values(b"parent") {
            let parent = String::from_utf8_lossy(parent).to_string();
            println!("  c_{oid} -> c_{parent};");
            stack.push(parent);
        }
    }

    println!("}}");
    Ok(())
}
