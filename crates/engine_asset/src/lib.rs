//! # engine_asset
//!
//! Game object assets: the object hierarchy, its validation rules and the
//! JSON/MessagePack file formats.
//!
//! This crate provides:
//!
//! - [`game_object`]: the [`GameObject`] tree and traversal helpers.
//! - [`validate`]: structural checks producing a [`ValidationReport`].
//! - [`codec`]: JSON and MessagePack encode/decode helpers.
//! - [`loader`]: the [`AssetLoader`] tying decoding, validation and fix-ups together.
//! - [`reference`]: external file references and asset-root containment.
//! - [`config`]: the [`LoaderConfig`] knobs.
//! - [`error`]: asset-layer error types.

pub mod codec;
pub mod config;
pub mod error;
pub mod game_object;
pub mod loader;
pub mod reference;
pub mod validate;

pub use codec::{AssetFormat, decode, encode};
pub use config::{ASSET_ROOT_ENV, DEFAULT_MAX_DEPTH, LoaderConfig};
pub use error::AssetError;
pub use game_object::{GameObject, Walk};
pub use loader::AssetLoader;
pub use reference::AssetRef;
pub use validate::{Issue, Severity, ValidationReport, validate};
