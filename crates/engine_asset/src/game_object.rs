//! The game object record and its hierarchy.
//!
//! A [`GameObject`] is one placeable entity: a [`Uid`], a local
//! [`Transform`], a model pivot, an ordered component list and an ordered
//! list of child objects of the same type. Children are owned by value, so a
//! root object owns its entire subtree.

use engine_component::{AnyComponent, Component, ComponentTypeId, Uid, UidGenerator, VisualComponent};
use engine_math::{Mat4, Transform, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::reference::AssetRef;

/// A single entity record as stored in an asset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    #[serde(rename = "myUID")]
    pub uid: Uid,
    /// Placement relative to the parent (or the world, for a root).
    #[serde(rename = "myLocalTransf", default)]
    pub transform: Transform,
    /// Model pivot, subtracted before the transform is applied.
    #[serde(rename = "myCenter", default)]
    pub center: Vec3,
    #[serde(rename = "myComponents", default)]
    pub components: Vec<AnyComponent>,
    #[serde(rename = "myChildren", default)]
    pub children: Vec<GameObject>,
}

impl GameObject {
    /// An object with an identity transform and no components or children.
    #[must_use]
    pub fn new(uid: Uid) -> Self {
        Self {
            uid,
            transform: Transform::IDENTITY,
            center: Vec3::ZERO,
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: impl Into<AnyComponent>) -> Self {
        self.add_component(component);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: GameObject) -> Self {
        self.children.push(child);
        self
    }

    /// Append a component.
    ///
    /// Only the first [`VisualComponent`] acts as the object's renderer. A
    /// second one is still stored, but a warning is logged.
    pub fn add_component(&mut self, component: impl Into<AnyComponent>) {
        let component = component.into();
        if matches!(component, AnyComponent::Visual(_)) && self.component::<VisualComponent>().is_some()
        {
            warn!(uid = %self.uid, "object already has a renderer, extra VisualComponent will be ignored");
        }
        self.components.push(component);
    }

    /// The first component of type `T`.
    #[must_use]
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(T::from_any)
    }

    /// The first component of type `T`, mutably.
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(T::from_any_mut)
    }

    /// All components with the given type id, including unknown ones.
    pub fn components_of(&self, type_id: ComponentTypeId) -> impl Iterator<Item = &AnyComponent> {
        self.components
            .iter()
            .filter(move |component| component.component_type_id() == type_id)
    }

    pub fn add_child(&mut self, child: GameObject) {
        self.children.push(child);
    }

    /// Detach the direct child with the given UID.
    pub fn remove_child(&mut self, uid: Uid) -> Option<GameObject> {
        let index = self.children.iter().position(|child| child.uid == uid)?;
        Some(self.children.remove(index))
    }

    /// Depth-first, pre-order traversal of this object and its descendants.
    /// The root is yielded at depth 0.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Number of objects in the subtree, including this one.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.walk().count()
    }

    /// Depth of the deepest descendant (0 for a leaf).
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Find an object anywhere in the subtree.
    #[must_use]
    pub fn find(&self, uid: Uid) -> Option<&GameObject> {
        self.walk().map(|(_, object)| object).find(|object| object.uid == uid)
    }

    /// Find an object anywhere in the subtree, mutably.
    pub fn find_mut(&mut self, uid: Uid) -> Option<&mut GameObject> {
        if self.uid == uid {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(uid))
    }

    /// World matrix of every object in walk order, treating this object as
    /// a root.
    #[must_use]
    pub fn world_matrices(&self) -> Vec<(Uid, Mat4)> {
        let mut out = Vec::with_capacity(self.object_count());
        self.collect_world_matrices(Mat4::IDENTITY, &mut out);
        out
    }

    fn collect_world_matrices(&self, parent: Mat4, out: &mut Vec<(Uid, Mat4)>) {
        let world = parent * self.transform.model_matrix(self.center);
        out.push((self.uid, world));
        for child in &self.children {
            child.collect_world_matrices(world, out);
        }
    }

    /// Every external file referenced by visual components in the subtree.
    #[must_use]
    pub fn asset_references(&self) -> Vec<AssetRef> {
        self.walk()
            .flat_map(|(_, object)| {
                object
                    .components
                    .iter()
                    .filter_map(VisualComponent::from_any)
                    .flat_map(VisualComponent::references)
                    .map(move |(kind, path)| AssetRef::new(object.uid, kind, path))
            })
            .collect()
    }

    /// Give every object in the subtree a freshly generated UID.
    pub fn reassign_uids(&mut self, generator: &mut UidGenerator) {
        self.uid = generator.create();
        for child in &mut self.children {
            child.reassign_uids(generator);
        }
    }

    /// Normalise the rotation of every transform in the subtree, including
    /// the sub-transforms of visual components.
    pub fn normalize_rotations(&mut self) {
        self.transform = self.transform.normalized();
        for visual in self.components.iter_mut().filter_map(VisualComponent::from_any_mut) {
            visual.transform = visual.transform.normalized();
        }
        for child in &mut self.children {
            child.normalize_rotations();
        }
    }
}

/// Iterator returned by [`GameObject::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a GameObject)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a GameObject);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, object) = self.stack.pop()?;
        // Reverse so the first child is visited next.
        self.stack
            .extend(object.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, object))
    }
}
