use std::env;
use std::path::PathBuf;

use crate::error::Result;
use crate::repository::Repository;

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let repo_path = match path {
        Some(p) => p,
        None => env::current_dir()?,
    };

    let repo = Repository::create(&repo_path)?;
    println!("Initialized empty repository in {}", repo.gitdir.display());
    Ok(())
}
