//! References from a game object to external asset files.

use std::fmt;

use engine_component::{ReferenceKind, Uid};

/// One file path referenced by a component in a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRef {
    /// The object whose component holds the reference.
    pub owner: Uid,
    pub kind: ReferenceKind,
    /// Path relative to the asset root, as written in the asset.
    pub path: String,
}

impl AssetRef {
    #[must_use]
    pub fn new(owner: Uid, kind: ReferenceKind, path: impl Into<String>) -> Self {
        Self {
            owner,
            kind,
            path: path.into(),
        }
    }

    /// Returns `true` if the path is relative and cannot climb out of the
    /// asset root.
    #[must_use]
    pub fn is_contained(&self) -> bool {
        is_contained(&self.path)
    }
}

/// Returns `true` if `path` is relative and has no `..` segment.
///
/// Both `/` and `\` count as separators and drive prefixes such as `C:` are
/// rejected, whatever the host platform.
#[must_use]
pub fn is_contained(path: &str) -> bool {
    if path.starts_with(['/', '\\']) || has_drive_prefix(path) {
        return false;
    }
    path.split(['/', '\\']).all(|segment| segment != "..")
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8} {} (owner {})", self.kind, self.path, self.owner)
    }
}
