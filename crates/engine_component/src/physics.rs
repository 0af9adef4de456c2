//! Physics component payload.
//!
//! Two payload layouts exist in the wild. The canonical one keeps the fields
//! flat inside `myCompData`; older exports wrap the same fields in a
//! `myPhysEntity` object. Both are accepted on read, only the flat layout is
//! written.

use engine_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::component::{AnyComponent, Component};
use crate::error::ComponentError;

/// Collision shape discriminant, stored as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ShapeType {
    Invalid = 0,
    #[default]
    Box = 1,
    Sphere = 2,
    Capsule = 3,
    ConvexHull = 4,
    Heightfield = 5,
}

impl ShapeType {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Box => "Box",
            Self::Sphere => "Sphere",
            Self::Capsule => "Capsule",
            Self::ConvexHull => "ConvexHull",
            Self::Heightfield => "Heightfield",
        }
    }
}

impl TryFrom<u8> for ShapeType {
    type Error = ComponentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Invalid,
            1 => Self::Box,
            2 => Self::Sphere,
            3 => Self::Capsule,
            4 => Self::ConvexHull,
            5 => Self::Heightfield,
            other => return Err(ComponentError::UnknownShape(other)),
        })
    }
}

impl From<ShapeType> for u8 {
    fn from(value: ShapeType) -> Self {
        value as u8
    }
}

/// Rigid body description attached to a game object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PhysicsPayload")]
pub struct PhysicsComponent {
    /// Body mass. Zero means the body is static.
    #[serde(rename = "myMass")]
    pub mass: f32,
    /// Collision shape.
    #[serde(rename = "myShape")]
    pub shape: ShapeType,
    /// Half size of the shape along each axis.
    #[serde(rename = "myHalfExtents")]
    pub half_extents: Vec3,
    /// Offset of the body from the owning object.
    #[serde(rename = "myOrigin")]
    pub origin: Vec3,
}

const DEFAULT_HALF_EXTENTS: Vec3 = Vec3::splat(0.5);

impl PhysicsComponent {
    /// A static box with the given half extents.
    #[must_use]
    pub fn static_box(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Returns `true` if the body does not move under simulation.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    /// Returns `true` if every numeric field is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.mass.is_finite() && self.half_extents.is_finite() && self.origin.is_finite()
    }
}

impl Default for PhysicsComponent {
    fn default() -> Self {
        Self {
            mass: 0.0,
            shape: ShapeType::Box,
            half_extents: DEFAULT_HALF_EXTENTS,
            origin: Vec3::ZERO,
        }
    }
}

impl Component for PhysicsComponent {
    fn type_name() -> &'static str {
        "PhysicsComponent"
    }

    fn from_any(component: &AnyComponent) -> Option<&Self> {
        match component {
            AnyComponent::Physics(physics) => Some(physics),
            _ => None,
        }
    }

    fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self> {
        match component {
            AnyComponent::Physics(physics) => Some(physics),
            _ => None,
        }
    }

    fn into_any(self) -> AnyComponent {
        AnyComponent::Physics(self)
    }
}

/// The fields of a physics payload, as found either flat or wrapped.
#[derive(Debug, Deserialize)]
struct PhysicsFields {
    #[serde(rename = "myMass", default)]
    mass: f32,
    #[serde(rename = "myShape")]
    shape: ShapeType,
    #[serde(rename = "myHalfExtents", default = "default_half_extents")]
    half_extents: Vec3,
    #[serde(rename = "myOrigin", default)]
    origin: Vec3,
}

fn default_half_extents() -> Vec3 {
    DEFAULT_HALF_EXTENTS
}

/// Accepts both payload layouts in a single pass.
#[derive(Debug, Deserialize)]
struct PhysicsPayload {
    #[serde(rename = "myPhysEntity")]
    wrapped: Option<PhysicsFields>,
    #[serde(rename = "myMass")]
    mass: Option<f32>,
    #[serde(rename = "myShape")]
    shape: Option<ShapeType>,
    #[serde(rename = "myHalfExtents")]
    half_extents: Option<Vec3>,
    #[serde(rename = "myOrigin")]
    origin: Option<Vec3>,
}

/// Error raised while reconciling the two payload layouts.
#[derive(Debug, thiserror::Error)]
enum PayloadError {
    #[error("physics payload mixes flat fields with a myPhysEntity wrapper")]
    Mixed,
    #[error("missing field `myShape`")]
    MissingShape,
}

impl TryFrom<PhysicsPayload> for PhysicsComponent {
    type Error = PayloadError;

    fn try_from(payload: PhysicsPayload) -> Result<Self, Self::Error> {
        let has_flat = payload.mass.is_some()
            || payload.shape.is_some()
            || payload.half_extents.is_some()
            || payload.origin.is_some();

        if let Some(fields) = payload.wrapped {
            if has_flat {
                return Err(PayloadError::Mixed);
            }
            return Ok(Self {
                mass: fields.mass,
                shape: fields.shape,
                half_extents: fields.half_extents,
                origin: fields.origin,
            });
        }

        Ok(Self {
            mass: payload.mass.unwrap_or(0.0),
            shape: payload.shape.ok_or(PayloadError::MissingShape)?,
            half_extents: payload.half_extents.unwrap_or(DEFAULT_HALF_EXTENTS),
            origin: payload.origin.unwrap_or(Vec3::ZERO),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> PhysicsComponent {
        PhysicsComponent {
            mass: 0.0,
            shape: ShapeType::Box,
            half_extents: Vec3::splat(0.5),
            origin: Vec3::ZERO,
        }
    }

    #[test]
    fn test_flat_payload() {
        let value = json!({
            "myMass": 0,
            "myShape": 1,
            "myHalfExtents": [0.5, 0.5, 0.5],
            "myOrigin": [0, 0, 0]
        });
        let physics: PhysicsComponent = serde_json::from_value(value).unwrap();
        assert_eq!(physics, sample());
    }

    #[test]
    fn test_wrapped_payload_matches_flat() {
        let value = json!({
            "myPhysEntity": {
                "myMass": 0,
                "myShape": 1,
                "myHalfExtents": [0.5, 0.5, 0.5],
                "myOrigin": [0, 0, 0]
            }
        });
        let physics: PhysicsComponent = serde_json::from_value(value).unwrap();
        assert_eq!(physics, sample());
    }

    #[test]
    fn test_mixed_payload_is_rejected() {
        let value = json!({
            "myMass": 3,
            "myPhysEntity": { "myShape": 1 }
        });
        let err = serde_json::from_value::<PhysicsComponent>(value).unwrap_err();
        assert!(err.to_string().contains("myPhysEntity"));
    }

    #[test]
    fn test_missing_shape_is_rejected() {
        let err = serde_json::from_value::<PhysicsComponent>(json!({ "myMass": 1 })).unwrap_err();
        assert!(err.to_string().contains("myShape"));
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let err = serde_json::from_value::<PhysicsComponent>(json!({ "myShape": 9 })).unwrap_err();
        assert!(err.to_string().contains("unknown collision shape 9"));
    }

    #[test]
    fn test_serializes_flat() {
        let value = serde_json::to_value(sample().with_mass(2.0)).unwrap();
        assert_eq!(
            value,
            json!({
                "myMass": 2.0,
                "myShape": 1,
                "myHalfExtents": [0.5, 0.5, 0.5],
                "myOrigin": [0.0, 0.0, 0.0]
            })
        );
    }

    #[test]
    fn test_static_body() {
        assert!(PhysicsComponent::default().is_static());
        assert!(!PhysicsComponent::default().with_mass(1.0).is_static());
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(ShapeType::try_from(4).unwrap().name(), "ConvexHull");
        assert_eq!(u8::from(ShapeType::Heightfield), 5);
    }
}
