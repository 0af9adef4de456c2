//! Local transform stored in game object assets.
//!
//! [`Transform`] represents position, rotation, and scale in 3D space using a
//! left-handed convention: `+Z` is forward, `+Y` is up and `+X` is right.
//!
//! On disk a transform is written as
//! `{"myPos": [x, y, z], "myScale": [x, y, z], "myRotation": [x, y, z, w]}`.
//! Missing fields fall back to the identity values.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Squared length under which a direction is treated as degenerate.
const DEGENERATE_LENGTH_SQUARED: f32 = 0.0001;

/// A 3D transform representing position, rotation, and per-axis scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position relative to the parent.
    #[serde(rename = "myPos", default = "default_position")]
    pub position: Vec3,
    /// Per-axis scale.
    #[serde(rename = "myScale", default = "default_scale")]
    pub scale: Vec3,
    /// Rotation as a quaternion, stored `[x, y, z, w]`.
    #[serde(rename = "myRotation", default = "default_rotation")]
    pub rotation: Quat,
}

fn default_position() -> Vec3 {
    Vec3::ZERO
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_rotation() -> Quat {
    Quat::IDENTITY
}

impl Transform {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        scale: Vec3::ONE,
        rotation: Quat::IDENTITY,
    };

    /// Create a new transform with the given position and default rotation/scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a new transform from all three parts.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    /// Compute the 4×4 model matrix for this transform.
    ///
    /// `center` is the model pivot: it is moved to the origin before scale,
    /// rotation and translation are applied, i.e.
    /// `T(position) * R(rotation) * S(scale) * T(-center)`.
    #[must_use]
    pub fn model_matrix(&self, center: Vec3) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
            * Mat4::from_translation(-center)
    }

    /// Compute the model matrix with no pivot offset.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        self.model_matrix(Vec3::ZERO)
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Translate in place.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.position += offset;
        self
    }

    /// Rotate the transform by the given quaternion (applied after the
    /// current rotation).
    #[must_use]
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation * self.rotation;
        self
    }

    /// Apply a uniform scale factor.
    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale *= factor;
        self
    }

    /// Orient the transform so that [`forward`](Self::forward) points at
    /// `target`, keeping `+Y` as the reference up.
    ///
    /// When looking (almost) straight up or down the world `+X` axis is used
    /// as the reference instead. Does nothing if `target` coincides with the
    /// position.
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        if to_target.length_squared() < DEGENERATE_LENGTH_SQUARED {
            return;
        }
        let forward = to_target.normalize();
        let reference_up = if forward.y.abs() >= 0.99 {
            Vec3::X
        } else {
            Vec3::Y
        };

        let right = reference_up.cross(forward).normalize();
        let up = forward.cross(right);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize();
    }

    /// Tilt the transform so that its up axis matches `new_up`.
    pub fn rotate_to_up(&mut self, new_up: Vec3) {
        let extra = Self::rotation_between(self.up(), new_up);
        self.rotation = (extra * self.rotation).normalize();
    }

    /// The shortest-arc rotation carrying `start` onto `dest`.
    ///
    /// Inputs need not be normalized. Opposite vectors produce a half turn
    /// around an arbitrary perpendicular axis; a zero-length input produces
    /// the identity.
    #[must_use]
    pub fn rotation_between(start: Vec3, dest: Vec3) -> Quat {
        let (Some(start), Some(dest)) = (start.try_normalize(), dest.try_normalize()) else {
            return Quat::IDENTITY;
        };
        Quat::from_rotation_arc(start, dest)
    }

    /// Rotate `point` around `pivot` by euler angles given in radians
    /// (applied X, then Y, then Z).
    #[must_use]
    pub fn rotate_around(point: Vec3, pivot: Vec3, euler_radians: Vec3) -> Vec3 {
        let rotation = euler_to_quat(euler_radians);
        rotation * (point - pivot) + pivot
    }

    /// Rotation as euler angles in degrees.
    #[must_use]
    pub fn euler_degrees(&self) -> Vec3 {
        let (z, y, x) = self.rotation.to_euler(EulerRot::ZYX);
        Vec3::new(x, y, z) * (180.0 / std::f32::consts::PI)
    }

    /// Replace the rotation with one built from euler angles in degrees.
    pub fn set_euler_degrees(&mut self, degrees: Vec3) {
        self.rotation = euler_to_quat(degrees * (std::f32::consts::PI / 180.0));
    }

    /// A copy with a unit-length rotation. A zero quaternion becomes the
    /// identity.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.rotation = if self.rotation.length_squared() > 0.0 {
            self.rotation.normalize()
        } else {
            Quat::IDENTITY
        };
        self
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.scale.is_finite() && self.rotation.is_finite()
    }
}

fn euler_to_quat(radians: Vec3) -> Quat {
    Quat::from_euler(EulerRot::ZYX, radians.z, radians.y, radians.x)
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
