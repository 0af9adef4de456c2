//! Loading and saving game object assets.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec::{self, AssetFormat};
use crate::config::LoaderConfig;
use crate::error::AssetError;
use crate::game_object::GameObject;
use crate::reference::AssetRef;
use crate::validate::validate;

/// Reads, checks and writes game object files according to a [`LoaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    config: LoaderConfig,
}

impl AssetLoader {
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a game object from a file.
    ///
    /// The format is chosen from the extension, falling back to sniffing the
    /// content.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Io`] if the file cannot be read, a codec error if
    /// it cannot be decoded, or any error from [`prepare`](Self::prepare).
    pub fn load(&self, path: &Path) -> Result<GameObject, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format = AssetFormat::detect(path, &bytes);
        debug!(file = %path.display(), ?format, "loading game object");
        self.load_bytes(&bytes, format)
    }

    /// Load a game object from a JSON document.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_str(&self, source: &str) -> Result<GameObject, AssetError> {
        self.load_bytes(source.as_bytes(), AssetFormat::Json)
    }

    /// Load a game object from encoded bytes.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_bytes(&self, bytes: &[u8], format: AssetFormat) -> Result<GameObject, AssetError> {
        let object = codec::decode(bytes, format)?;
        self.prepare(object)
    }

    /// Validate a decoded hierarchy, then apply the configured fix-ups.
    ///
    /// Validation sees the data exactly as decoded. Rotations are normalised
    /// afterwards when [`LoaderConfig::normalize_rotations`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Invalid`] if validation finds errors, or
    /// [`AssetError::MissingReferences`] if reference checking is enabled and
    /// a referenced file does not exist.
    pub fn prepare(&self, mut object: GameObject) -> Result<GameObject, AssetError> {
        let report = validate(&object, &self.config);
        if !report.is_ok() {
            return Err(AssetError::Invalid(report));
        }
        for issue in report.warnings() {
            warn!(uid = %issue.uid, path = %issue.path, "{}", issue.message);
        }

        if self.config.normalize_rotations {
            object.normalize_rotations();
        }

        if self.config.check_references {
            let missing = self.missing_references(&object);
            if !missing.is_empty() {
                return Err(AssetError::MissingReferences(missing));
            }
        }

        debug!(
            uid = %object.uid,
            objects = object.object_count(),
            "game object ready"
        );
        Ok(object)
    }

    /// Write a game object to a file, choosing the format from the extension.
    /// Unknown extensions are written as JSON.
    ///
    /// # Errors
    ///
    /// Returns a codec error if encoding fails or [`AssetError::Io`] if the
    /// file cannot be written.
    pub fn save(&self, path: &Path, object: &GameObject) -> Result<(), AssetError> {
        let format = AssetFormat::from_extension(path).unwrap_or(AssetFormat::Json);
        let bytes = codec::encode(object, format)?;
        std::fs::write(path, bytes).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(file = %path.display(), ?format, "saved game object");
        Ok(())
    }

    /// Absolute location of a reference under the asset root.
    #[must_use]
    pub fn resolve(&self, reference: &AssetRef) -> PathBuf {
        self.config.asset_root.join(&reference.path)
    }

    /// References in the hierarchy whose file is not present under the asset
    /// root. References that escape the root are always reported.
    #[must_use]
    pub fn missing_references(&self, object: &GameObject) -> Vec<AssetRef> {
        object
            .asset_references()
            .into_iter()
            .filter(|reference| !reference.is_contained() || !self.resolve(reference).is_file())
            .collect()
    }
}
