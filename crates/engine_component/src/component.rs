//! Core [`Component`] trait and the tagged [`AnyComponent`] record.
//!
//! On disk every component is a pair of a type tag and a payload:
//!
//! ```json
//! { "myCompType": "PhysicsComponent", "myCompData": { ... } }
//! ```
//!
//! Tags with a typed representation decode into the matching
//! [`AnyComponent`] variant. Any other tag is kept as a [`RawComponent`] so
//! that data written by newer tools survives a load/save cycle untouched.
//!
//! ## Type Identity
//!
//! [`ComponentTypeId`] is derived from the component's **tag string** using
//! the FNV-1a 64-bit hash algorithm. This is deterministic and
//! language-neutral, so the same tag always maps to the same ID.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ComponentError;
use crate::physics::PhysicsComponent;
use crate::visual::VisualComponent;

/// A unique identifier for a component type, derived from its tag using the
/// FNV-1a 64-bit hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ComponentTypeId`] from a component tag.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`ComponentTypeId`] for a typed component `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

impl std::fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The contract every typed component payload satisfies.
///
/// # Examples
///
/// ```rust
/// use engine_component::{Component, PhysicsComponent};
///
/// let any = PhysicsComponent::default().into_any();
/// assert_eq!(any.type_name(), PhysicsComponent::type_name());
/// assert!(PhysicsComponent::from_any(&any).is_some());
/// ```
pub trait Component: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The tag written to `myCompType`.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentTypeId`] for this component.
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }

    /// Borrow the payload if `component` holds this type.
    fn from_any(component: &AnyComponent) -> Option<&Self>;

    /// Mutably borrow the payload if `component` holds this type.
    fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self>;

    /// Wrap the payload in its tagged variant.
    fn into_any(self) -> AnyComponent;
}

/// A component whose tag has no typed representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComponent {
    /// The `myCompType` tag.
    #[serde(rename = "myCompType")]
    pub type_name: String,
    /// The opaque `myCompData` payload.
    #[serde(rename = "myCompData", default)]
    pub data: serde_json::Value,
}

/// One entry of a game object's component list.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyComponent {
    Physics(PhysicsComponent),
    Visual(VisualComponent),
    /// Any tag not listed above, preserved verbatim.
    Unknown(RawComponent),
}

impl AnyComponent {
    /// Decode a raw tagged record into its typed variant.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Payload`] if the tag is known but its payload
    /// does not match the schema.
    pub fn from_raw(raw: RawComponent) -> Result<Self, ComponentError> {
        let name = raw.type_name.as_str();
        if name == PhysicsComponent::type_name() {
            decode_payload::<PhysicsComponent>(raw.data).map(Self::Physics)
        } else if name == VisualComponent::type_name() {
            decode_payload::<VisualComponent>(raw.data).map(Self::Visual)
        } else {
            Ok(Self::Unknown(raw))
        }
    }

    /// The component's tag.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Physics(_) => PhysicsComponent::type_name(),
            Self::Visual(_) => VisualComponent::type_name(),
            Self::Unknown(raw) => &raw.type_name,
        }
    }

    #[must_use]
    pub fn component_type_id(&self) -> ComponentTypeId {
        ComponentTypeId::from_name(self.type_name())
    }

    /// Returns `false` for tags preserved as [`RawComponent`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

fn decode_payload<T: Component>(data: serde_json::Value) -> Result<T, ComponentError> {
    serde_json::from_value(data).map_err(|source| ComponentError::Payload {
        type_name: T::type_name(),
        source,
    })
}

impl Serialize for AnyComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Component", 2)?;
        record.serialize_field("myCompType", self.type_name())?;
        match self {
            Self::Physics(physics) => record.serialize_field("myCompData", physics)?,
            Self::Visual(visual) => record.serialize_field("myCompData", visual)?,
            Self::Unknown(raw) => record.serialize_field("myCompData", &raw.data)?,
        }
        record.end()
    }
}

impl<'de> Deserialize<'de> for AnyComponent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawComponent::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(D::Error::custom)
    }
}

impl From<PhysicsComponent> for AnyComponent {
    fn from(value: PhysicsComponent) -> Self {
        Self::Physics(value)
    }
}

impl From<VisualComponent> for AnyComponent {
    fn from(value: VisualComponent) -> Self {
        Self::Visual(value)
    }
}

impl From<RawComponent> for AnyComponent {
    fn from(value: RawComponent) -> Self {
        Self::Unknown(value)
    }
}
