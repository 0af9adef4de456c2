//! Visual component payload.

use engine_math::Transform;
use serde::{Deserialize, Serialize};

use crate::component::{AnyComponent, Component};

/// What kind of external file an asset path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceKind {
    Pipeline,
    Texture,
    Model,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pipeline => "pipeline",
            Self::Texture => "texture",
            Self::Model => "model",
        };
        f.pad(name)
    }
}

/// Renderable appearance of a game object.
///
/// All paths are relative to the asset root. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualComponent {
    /// Offset of the model relative to the owning object.
    #[serde(rename = "myTransf", default)]
    pub transform: Transform,
    /// Pipeline file describing shaders and render state.
    #[serde(rename = "myPipeline", default)]
    pub pipeline: String,
    #[serde(rename = "myTextures", default)]
    pub textures: Vec<String>,
    #[serde(rename = "myModel", default)]
    pub model: String,
}

impl VisualComponent {
    #[must_use]
    pub fn new(model: impl Into<String>, pipeline: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            pipeline: pipeline.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.textures.push(texture.into());
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Every non-empty file path this component references, pipeline first,
    /// then textures in order, then the model.
    pub fn references(&self) -> impl Iterator<Item = (ReferenceKind, &str)> {
        std::iter::once((ReferenceKind::Pipeline, self.pipeline.as_str()))
            .chain(
                self.textures
                    .iter()
                    .map(|texture| (ReferenceKind::Texture, texture.as_str())),
            )
            .chain(std::iter::once((ReferenceKind::Model, self.model.as_str())))
            .filter(|(_, path)| !path.is_empty())
    }
}

impl Component for VisualComponent {
    fn type_name() -> &'static str {
        "VisualComponent"
    }

    fn from_any(component: &AnyComponent) -> Option<&Self> {
        match component {
            AnyComponent::Visual(visual) => Some(visual),
            _ => None,
        }
    }

    fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self> {
        match component {
            AnyComponent::Visual(visual) => Some(visual),
            _ => None,
        }
    }

    fn into_any(self) -> AnyComponent {
        AnyComponent::Visual(self)
    }
}
