pub mod codec;
pub mod kvlm;
pub mod store;
pub mod tree;

use clap::ValueEnum;

use crate::error::{GitError, Result};
use kvlm::Kvlm;
use tree::Tree;

/// The four object kinds a wire header can name.
///
/// `ValueEnum` lets this double as a `clap` argument type (`cat-file <type>`,
/// `hash-object -t <type>`, `rev-parse --wyag-type <type>`) without a second enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum ObjectKind {
    Blob,
    Commit,
    Tree,
    Tag,
}

impl ObjectKind {
    /// The lowercase wire-form name. Never derive this from `Debug` — that
    /// capitalizes variant names and produces objects real Git cannot read.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
            ObjectKind::Tag => "tag",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "commit" => Ok(ObjectKind::Commit),
            "tree" => Ok(ObjectKind::Tree),
            "tag" => Ok(ObjectKind::Tag),
            other => Err(GitError::UnknownKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Blob {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Commit {
    pub kvlm: Kvlm,
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub kvlm: Kvlm,
}

/// A fully parsed object of any kind, tagged by the kind its wire header named.
#[derive(Debug, Clone)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Blob(_) => ObjectKind::Blob,
            Object::Tree(_) => ObjectKind::Tree,
            Object::Commit(_) => ObjectKind::Commit,
            Object::Tag(_) => ObjectKind::Tag,
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Object::Blob(b) => b.data.clone(),
            Object::Tree(t) => t.serialize(),
            Object::Commit(c) => kvlm::serialize(&c.kvlm),
            Object::Tag(t) => kvlm::serialize(&t.kvlm),
        }
    }

    pub fn deserialize(kind: ObjectKind, data: &[u8]) -> Result<Self> {
        Ok(match kind {
            ObjectKind::Blob => Object::Blob(Blob { data: data.to_vec() }),
            ObjectKind::Tree => Object::Tree(Tree::deserialize(data)?),
            ObjectKind::Commit => Object::Commit(Commit {
                kvlm: kvlm::parse(data)?,
            }),
            ObjectKind::Tag => Object::Tag(Tag {
                kvlm: kvlm::parse(data)?,
            }),
        })
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            Object::Commit(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Object::Tag(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Object::Tree(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Object::Blob(b) => Some(b),
            _ => None,
        }
    }
}
