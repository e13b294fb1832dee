//! The tree codec: a flat binary leaf stream with no separators between
//! entries, and a canonical sort order that is not a plain sort on `path`.

use crate::error::{GitError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Always exactly 6 ASCII octal bytes once constructed, e.g. `"100644"`.
    pub mode: String,
    pub path: String,
    pub oid: [u8; 20],
}

impl TreeEntry {
    pub fn new(mode: impl Into<String>, path: impl Into<String>, oid: [u8; 20]) -> Self {
        Self {
            mode: normalize_mode(mode.into()),
            path: path.into(),
            oid,
        }
    }

    pub fn oid_hex(&self) -> String {
        hex::encode(self.oid)
    }

    /// `tree`, `blob`, or `commit`, as Git's `ls-tree` would print it.
    pub fn display_type(&self) -> Result<&'static str> {
        match &self.mode[0..2] {
            "04" => Ok("tree"),
            "10" => Ok("blob"),
            "12" => Ok("blob"),
            "16" => Ok("commit"),
            other => Err(GitError::malformed("tree entry", format!("weird mode prefix {other:?}"))),
        }
    }

    /// The canonical sort key: a directory (or anything that isn't a plain
    /// regular file — symlinks included) sorts as though its name carried a
    /// trailing slash, which is what makes interleaved file/directory
    /// siblings land in Git's actual tree order rather than plain path order.
    fn sort_key(&self) -> String {
        if self.mode.starts_with("10") {
            self.path.clone()
        } else {
            format!("{}/", self.path)
        }
    }
}

fn normalize_mode(mode: String) -> String {
    if mode.len() == 5 {
        format!("0{mode}")
    } else {
        mode
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in canonical on-disk order (never trust insertion order).
    pub fn sorted_entries(&self) -> Vec<&TreeEntry> {
        let mut entries: Vec<&TreeEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        entries
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in self.sorted_entries() {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(entry.path.as_bytes());
            out.push(0);
            out.extend_from_slice(&entry.oid);
        }
        out
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut pos = 0usize;

        while pos < data.len() {
            let space = data[pos..]
                .iter()
                .position(|&b| b == b' ')
                .map(|off| pos + off)
                .ok_or_else(|| GitError::malformed("tree", "expected space after mode"))?;
            let mode_raw = std::str::from_utf8(&data[pos..space])
                .map_err(|_| GitError::malformed("tree", "mode is not valid UTF-8"))?;
            if mode_raw.len() != 5 && mode_raw.len() != 6 {
                return Err(GitError::malformed("tree", format!("mode has unexpected width {}", mode_raw.len())));
            }
            let mode = normalize_mode(mode_raw.to_string());

            let nul = data[space + 1..]
                .iter()
                .position(|&b| b == 0)
                .map(|off| space + 1 + off)
                .ok_or_else(|| GitError::malformed("tree", "expected NUL after path"))?;
            let path = String::from_utf8(data[space + 1..nul].to_vec())
                .map_err(|_| GitError::malformed("tree", "path is not valid UTF-8"))?;
            if path.is_empty() || path.contains('/') {
                return Err(GitError::malformed("tree", format!("invalid entry path {path:?}")));
            }

            let oid_start = nul + 1;
            let oid_end = oid_start + 20;
            if oid_end > data.len() {
                return Err(GitError::malformed("tree", format!("truncated oid for entry {path:?}")));
            }
            let mut oid = [0u8; 20];
            oid.copy_from_slice(&data[oid_start..oid_end]);

            entries.push(TreeEntry { mode, path, oid });
            pos = oid_end;
        }

        Ok(Tree { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> [u8; 20] {
        [byte; 20]
    }

    #[test]
    fn canonical_sort_places_directory_before_lexicographically_smaller_file() {
        // "a" (a directory) sorts as "a/", which still precedes "b".
        let tree = Tree {
            entries: vec![
                TreeEntry::new("100644", "b", oid(1)),
                TreeEntry::new("40000", "a", oid(2)),
            ],
        };
        let sorted = tree.sorted_entries();
        assert_eq!(sorted[0].path, "a");
        assert_eq!(sorted[1].path, "b");
    }

    #[test]
    fn sort_is_independent_of_insertion_order() {
        let a = Tree {
            entries: vec![
                TreeEntry::new("100644", "b", oid(1)),
                TreeEntry::new("40000", "a", oid(2)),
            ],
        };
        let b = Tree {
            entries: vec![
                TreeEntry::new("40000", "a", oid(2)),
                TreeEntry::new("100644", "b", oid(1)),
            ],
        };
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn five_byte_mode_is_zero_padded_on_parse() {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"40000 a\0");
        raw.extend_from_slice(&oid(3));
        let tree = Tree::deserialize(&raw).unwrap();
        assert_eq!(tree.entries[0].mode, "040000");
    }

    #[test]
    fn round_trips() {
        let mut tree = Tree::new();
        tree.entries.push(TreeEntry::new("100644", "b", oid(1)));
        tree.entries.push(TreeEntry::new("40000", "a", oid(2)));
        let wire = tree.serialize();
        let parsed = Tree::deserialize(&wire).unwrap();
        assert_eq!(parsed.serialize(), wire);
    }

    #[test]
    fn display_type_covers_all_known_prefixes() {
        assert_eq!(TreeEntry::new("040000", "d", oid(0)).display_type().unwrap(), "tree");
        assert_eq!(TreeEntry::new("100644", "f", oid(0)).display_type().unwrap(), "blob");
        assert_eq!(TreeEntry::new("120000", "l", oid(0)).display_type().unwrap(), "blob");
        assert_eq!(TreeEntry::new("160000", "s", oid(0)).display_type().unwrap(), "commit");
        assert!(TreeEntry::new("999999", "x", oid(0)).display_type().is_err());
    }
}
