//! # engine_component
//!
//! Identity and component data for game object assets.
//!
//! This crate provides:
//!
//! - [`Uid`] and [`UidGenerator`]: machine + time + random identifiers.
//! - [`Component`] trait: the contract every typed payload satisfies.
//! - [`AnyComponent`]: one tagged entry of an object's component list.
//! - [`PhysicsComponent`] and [`VisualComponent`]: the known payloads.

pub mod component;
pub mod error;
pub mod physics;
pub mod uid;
pub mod visual;

pub use component::{AnyComponent, Component, ComponentTypeId, RawComponent};
pub use error::{ComponentError, UidParseError};
pub use physics::{PhysicsComponent, ShapeType};
pub use uid::{Uid, UidGenerator, machine_fingerprint};
pub use visual::{ReferenceKind, VisualComponent};
