//! Loader configuration.

use std::path::PathBuf;

/// Environment variable consulted by [`LoaderConfig::from_env`].
pub const ASSET_ROOT_ENV: &str = "ENGINE_ASSET_ROOT";

/// Default for [`LoaderConfig::max_depth`], below the JSON recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Configuration for an [`AssetLoader`](crate::AssetLoader).
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory that relative asset references resolve against.
    pub asset_root: PathBuf,
    /// Keep components with unrecognised tags instead of rejecting the asset.
    pub allow_unknown_components: bool,
    /// Normalise every rotation quaternion after loading.
    pub normalize_rotations: bool,
    /// Fail the load if a referenced file is missing under `asset_root`.
    pub check_references: bool,
    /// Deepest allowed child nesting (the root is depth 0).
    ///
    /// Each level costs two nesting steps in JSON, so serde_json's recursion
    /// limit of 128 rejects `.go` files at roughly 62 levels with an
    /// [`AssetError::Json`](crate::AssetError::Json) before validation runs.
    /// Values above that only take effect for binary assets.
    pub max_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            allow_unknown_components: true,
            normalize_rotations: true,
            check_references: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with the asset root taken from `ENGINE_ASSET_ROOT` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSET_ROOT_ENV) {
            config.asset_root = PathBuf::from(root);
        }
        config
    }

    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    #[must_use]
    pub fn with_unknown_components(mut self, allow: bool) -> Self {
        self.allow_unknown_components = allow;
        self
    }

    #[must_use]
    pub fn with_normalize_rotations(mut self, normalize: bool) -> Self {
        self.normalize_rotations = normalize;
        self
    }

    #[must_use]
    pub fn with_check_references(mut self, check: bool) -> Self {
        self.check_references = check;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.asset_root, PathBuf::from("."));
        assert!(config.allow_unknown_components);
        assert!(config.normalize_rotations);
        assert!(!config.check_references);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder() {
        let config = LoaderConfig::new()
            .with_asset_root("/data/assets")
            .with_unknown_components(false)
            .with_check_references(true)
            .with_max_depth(3);
        assert_eq!(config.asset_root, PathBuf::from("/data/assets"));
        assert!(!config.allow_unknown_components);
        assert!(config.check_references);
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn test_from_env_reads_asset_root() {
        // The only test in the workspace that touches this variable.
        unsafe { std::env::set_var(ASSET_ROOT_ENV, "/srv/game/assets") };
        let config = LoaderConfig::from_env();
        unsafe { std::env::remove_var(ASSET_ROOT_ENV) };
        assert_eq!(config.asset_root, PathBuf::from("/srv/game/assets"));
        assert!(config.allow_unknown_components);
    }
}
