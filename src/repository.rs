//! Repository layout: the worktree/gitdir split, on-disk scaffolding for
//! `init`, and the INI-backed config `find` and object lookups need.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{GitError, Result};

#[derive(Debug)]
pub struct Repository {
    pub worktree: PathBuf,
    pub gitdir: PathBuf,
    pub config: Ini,
}

fn default_config() -> Ini {
    let mut config = Ini::new();
    config
        .with_section(Some("core"))
        .set("repositoryformatversion", "0")
        .set("filemode", "false")
        .set("bare", "false");
    config
}

impl Repository {
    /// Open an existing repository rooted at `worktree`. Fails unless
    /// `worktree/.git` exists and its `repositoryformatversion` is `0`.
    pub fn open(worktree: impl AsRef<Path>) -> Result<Self> {
        let worktree = worktree.as_ref().to_path_buf();
        let gitdir = worktree.join(".git");

        if !gitdir.is_dir() {
            return Err(GitError::NotARepo(worktree));
        }

        let config_path = gitdir.join("config");
        let config = if config_path.exists() {
            Ini::load_from_file(&config_path)
                .map_err(|e| GitError::malformed("config", e.to_string()))?
        } else {
            default_config()
        };

        let version: u32 = config
            .section(Some("core"))
            .and_then(|s| s.get("repositoryformatversion"))
            .unwrap_or("0")
            .parse()
            .map_err(|_| GitError::malformed("config", "repositoryformatversion is not a number"))?;

        if version != 0 {
            return Err(GitError::BadVersion(version));
        }

        Ok(Repository {
            worktree,
            gitdir,
            config,
        })
    }

    /// Create a fresh repository at `worktree`, which must not exist or must
    /// be an empty directory. Scaffolds `branches/`, `objects/`,
    /// `refs/{heads,tags}`, `description`, `HEAD`, and `config`.
    pub fn create(worktree: impl AsRef<Path>) -> Result<Self> {
        let worktree = worktree.as_ref().to_path_buf();

        if worktree.exists() {
            if !worktree.is_dir() {
                return Err(GitError::NotADir(worktree));
            }
            if fs::read_dir(&worktree)?.next().is_some() {
                return Err(GitError::NotEmpty(worktree));
            }
        } else {
            fs::create_dir_all(&worktree)?;
        }

        let gitdir = worktree.join(".git");
        fs::create_dir_all(&gitdir)?;

        for dir in ["branches", "objects", "refs/tags", "refs/heads"] {
            fs::create_dir_all(gitdir.join(dir))?;
        }

        fs::write(
            gitdir.join("description"),
            "Unnamed repository; edit this file 'description' to name the repository.\n",
        )?;
        fs::write(gitdir.join("HEAD"), "ref: refs/heads/master\n")?;

        let config = default_config();
        config
            .write_to_file(gitdir.join("config"))
            .map_err(GitError::Io)?;

        Ok(Repository {
            worktree,
            gitdir,
            config,
        })
    }

    /// Walk upward from `start` looking for a `.git` directory, the way
    /// every subcommand other than `init` locates its repository.
    pub fn find(start: impl AsRef<Path>) -> Result<Self> {
        let start = fs::canonicalize(start.as_ref())
            .map_err(|_| GitError::NotFound(start.as_ref().display().to_string()))?;

        let mut current = start.as_path();
        loop {
            if current.join(".git").is_dir() {
                return Repository::open(current);
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return Err(GitError::NotFound(start.display().to_string())),
            }
        }
    }

    /// A path rooted inside the gitdir, creating any missing parent
    /// directories along the way.
    pub fn repo_dir(&self, path: &str) -> Result<PathBuf> {
        let full = self.gitdir.join(path);
        fs::create_dir_all(&full)?;
        Ok(full)
    }

    pub fn repo_file(&self, path: &str) -> PathBuf {
        self.gitdir.join(path)
    }

    /// `tagger`/`author` identity from this repository's own `[user]`
    /// section. There is deliberately no fallback to a global
    /// `~/.gitconfig`: a repository's identity is self-contained.
    pub fn user_identity(&self) -> Option<String> {
        let section = self.config.section(Some("user"))?;
        let name = section.get("name")?;
        let email = section.get("email")?;
        Some(format!("{name} <{email}>"))
    }
}
