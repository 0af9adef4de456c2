//! Asset codec helpers.
//!
//! Assets are stored either as JSON (the authoring format) or as MessagePack
//! with named fields (the compact binary format). Both carry exactly the
//! same document structure.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// On-disk encoding of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    /// Pretty-printed JSON (`.go`, `.json`).
    Json,
    /// MessagePack with named fields (`.gob`, `.msgpack`).
    Binary,
}

impl AssetFormat {
    /// Infer the format from a file extension, ignoring case.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "go" | "json" => Some(Self::Json),
            "gob" | "msgpack" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Guess the format from content: a JSON document starts with `{`.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => Self::Json,
            _ => Self::Binary,
        }
    }

    /// Extension first, content second.
    #[must_use]
    pub fn detect(path: &Path, bytes: &[u8]) -> Self {
        Self::from_extension(path).unwrap_or_else(|| Self::sniff(bytes))
    }

    /// The preferred file extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "go",
            Self::Binary => "gob",
        }
    }
}

/// Encode a value in the given format.
///
/// # Errors
///
/// Returns [`AssetError::Json`] or [`AssetError::Encode`] if serialisation fails.
pub fn encode<T: Serialize>(value: &T, format: AssetFormat) -> Result<Vec<u8>, AssetError> {
    match format {
        AssetFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(value)?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        AssetFormat::Binary => rmp_serde::to_vec_named(value).map_err(AssetError::Encode),
    }
}

/// Decode a value from bytes in the given format.
///
/// # Errors
///
/// Returns [`AssetError::Json`] or [`AssetError::Decode`] if deserialisation fails.
pub fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8], format: AssetFormat) -> Result<T, AssetError> {
    match format {
        AssetFormat::Json => serde_json::from_slice(bytes).map_err(AssetError::Json),
        AssetFormat::Binary => rmp_serde::from_slice(bytes).map_err(AssetError::Decode),
    }
}
