//! Asset-layer error types.

use std::path::PathBuf;

use crate::reference::AssetRef;
use crate::validate::ValidationReport;

/// Errors that can occur while loading or saving game object assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Reading or writing an asset file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON document could not be parsed or produced.
    #[error("invalid JSON asset: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode an asset to MessagePack.
    #[error("failed to encode binary asset: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode an asset from MessagePack.
    #[error("failed to decode binary asset: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The asset decoded but failed validation.
    #[error("asset failed validation:\n{0}")]
    Invalid(ValidationReport),

    /// Files referenced by the asset do not exist under the asset root.
    #[error("{} referenced file(s) missing: {}", .0.len(), list_paths(.0))]
    MissingReferences(Vec<AssetRef>),
}

fn list_paths(references: &[AssetRef]) -> String {
    references
        .iter()
        .map(|reference| reference.path.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
