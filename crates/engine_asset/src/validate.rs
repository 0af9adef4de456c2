//! Structural validation of game object hierarchies.
//!
//! [`validate`] never fails; it returns a [`ValidationReport`] listing every
//! issue found. Errors make an asset unusable, warnings flag data that loads
//! but is probably not what the author intended.

use std::collections::HashMap;
use std::fmt;

use engine_component::{AnyComponent, PhysicsComponent, ShapeType, Uid, VisualComponent};
use engine_math::Transform;

use crate::config::LoaderConfig;
use crate::game_object::GameObject;
use crate::reference::AssetRef;

/// Allowed deviation of a rotation's length from 1.
const UNIT_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A single problem found in a hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    /// UID of the offending object.
    pub uid: Uid,
    /// Position in the hierarchy, e.g. `root/0/2` for the third child of the
    /// root's first child.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} ({}): {}", self.severity, self.path, self.uid, self.message)
    }
}

/// Every issue found by [`validate`], in hierarchy order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    /// Returns `true` if there are no errors (warnings are allowed).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Warning)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// Check a hierarchy against the structural rules of the asset format.
#[must_use]
pub fn validate(root: &GameObject, config: &LoaderConfig) -> ValidationReport {
    let mut validator = Validator {
        config,
        seen: HashMap::new(),
        report: ValidationReport::default(),
    };
    validator.visit(root, "root".to_string(), 0);
    validator.report
}

struct Validator<'a> {
    config: &'a LoaderConfig,
    /// First path each non-nil UID was seen at.
    seen: HashMap<Uid, String>,
    report: ValidationReport,
}

impl Validator<'_> {
    fn visit(&mut self, object: &GameObject, path: String, depth: usize) {
        let mut node = Node {
            uid: object.uid,
            path,
            issues: &mut self.report.issues,
        };

        if depth > self.config.max_depth {
            node.error(format!(
                "hierarchy is deeper than the allowed {} levels",
                self.config.max_depth
            ));
            return;
        }

        if object.uid.is_nil() {
            node.warning("object has a nil UID");
        } else if let Some(first) = self.seen.get(&object.uid) {
            node.error(format!("duplicate UID, first used at {first}"));
        } else {
            self.seen.insert(object.uid, node.path.clone());
        }

        check_transform(&mut node, "local transform", &object.transform);
        if !object.center.is_finite() {
            node.error("center has a non-finite coordinate");
        }

        let mut physics_count = 0;
        let mut visual_count = 0;
        for component in &object.components {
            match component {
                AnyComponent::Physics(physics) => {
                    physics_count += 1;
                    check_physics(&mut node, physics);
                }
                AnyComponent::Visual(visual) => {
                    visual_count += 1;
                    check_visual(&mut node, visual);
                }
                AnyComponent::Unknown(raw) => {
                    let message = format!("unknown component type {:?}", raw.type_name);
                    if self.config.allow_unknown_components {
                        node.warning(message);
                    } else {
                        node.error(message);
                    }
                }
            }
        }
        if physics_count > 1 {
            node.warning(format!("{physics_count} physics components, only the first is used"));
        }
        if visual_count > 1 {
            node.warning(format!("{visual_count} visual components, only the first is rendered"));
        }

        let path = node.path;
        for (index, child) in object.children.iter().enumerate() {
            self.visit(child, format!("{path}/{index}"), depth + 1);
        }
    }
}

/// Issue sink for one object.
struct Node<'a> {
    uid: Uid,
    path: String,
    issues: &'a mut Vec<Issue>,
}

impl Node<'_> {
    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.issues.push(Issue {
            severity,
            uid: self.uid,
            path: self.path.clone(),
            message: message.into(),
        });
    }

    fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }
}

fn check_transform(node: &mut Node<'_>, label: &str, transform: &Transform) {
    if !transform.is_finite() {
        node.error(format!("{label} has a non-finite value"));
        return;
    }

    let length = transform.rotation.length();
    if length == 0.0 {
        node.error(format!("{label} has a zero-length rotation"));
    } else if (length - 1.0).abs() > UNIT_TOLERANCE {
        node.warning(format!("{label} rotation is not unit length ({length:.4})"));
    }

    if transform.scale.cmpeq(engine_math::Vec3::ZERO).any() {
        node.warning(format!("{label} has a zero scale axis"));
    }
}

fn check_physics(node: &mut Node<'_>, physics: &PhysicsComponent) {
    if !physics.is_finite() {
        node.error("physics component has a non-finite value");
        return;
    }
    if physics.mass < 0.0 {
        node.error(format!("negative mass {}", physics.mass));
    }
    match physics.shape {
        ShapeType::Invalid => node.error("physics component has an invalid collision shape"),
        ShapeType::Box if physics.half_extents.min_element() <= 0.0 => {
            node.error("box shape needs positive half extents on every axis");
        }
        _ => {}
    }
}

fn check_visual(node: &mut Node<'_>, visual: &VisualComponent) {
    check_transform(node, "visual transform", &visual.transform);

    if visual.textures.len() > 1 {
        node.warning(format!(
            "{} textures set, only the first is bound",
            visual.textures.len()
        ));
    }
    if visual.model.is_empty() {
        node.warning("visual component has no model");
    }
    if visual.pipeline.is_empty() {
        node.warning("visual component has no pipeline");
    }
    for (kind, path) in visual.references() {
        if !AssetRef::new(node.uid, kind, path).is_contained() {
            node.error(format!("{kind} path {path:?} escapes the asset root"));
        }
    }
}

#[cfg(test)]
mod tests {
    use engine_component::RawComponent;
    use engine_math::{Quat, Vec3};

    use super::*;

    fn uid(n: u32) -> Uid {
        Uid::new(1, 1, n)
    }

    fn messages(report: &ValidationReport, severity: Severity) -> Vec<String> {
        report
            .iter()
            .filter(|issue| issue.severity == severity)
            .map(|issue| issue.message.clone())
            .collect()
    }

    fn check(object: &GameObject) -> ValidationReport {
        validate(object, &LoaderConfig::default())
    }

    fn good_visual() -> VisualComponent {
        VisualComponent::new("a.bin", "p.ppl").with_texture("t.img")
    }

    #[test]
    fn test_clean_object_has_no_issues() {
        let object = GameObject::new(uid(1))
            .with_component(PhysicsComponent::default())
            .with_component(good_visual());
        assert!(check(&object).is_empty());
    }

    #[test]
    fn test_nil_uid_is_a_warning() {
        let report = check(&GameObject::new(Uid::NIL));
        assert!(report.is_ok());
        assert_eq!(messages(&report, Severity::Warning), vec!["object has a nil UID"]);
    }

    #[test]
    fn test_duplicate_uid_is_an_error() {
        let object = GameObject::new(uid(1))
            .with_child(GameObject::new(uid(2)))
            .with_child(GameObject::new(uid(2)));
        let report = check(&object);
        assert!(!report.is_ok());
        let error = report.errors().next().unwrap();
        assert_eq!(error.path, "root/1");
        assert!(error.message.contains("root/0"));
    }

    #[test]
    fn test_shared_nil_uids_are_not_duplicates() {
        let object = GameObject::new(Uid::NIL).with_child(GameObject::new(Uid::NIL));
        assert!(check(&object).is_ok());
    }

    #[test]
    fn test_transform_rules() {
        let zero_rotation = Transform::new(Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0), Vec3::ONE);
        let report = check(&GameObject::new(uid(1)).with_transform(zero_rotation));
        assert_eq!(messages(&report, Severity::Error), vec!["local transform has a zero-length rotation"]);

        let skewed = Transform::new(Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0), Vec3::ONE);
        let report = check(&GameObject::new(uid(1)).with_transform(skewed));
        assert!(report.is_ok());
        assert_eq!(report.warnings().count(), 1);

        let flat = Transform::IDENTITY.scaled(0.0);
        let report = check(&GameObject::new(uid(1)).with_transform(flat));
        assert_eq!(messages(&report, Severity::Warning), vec!["local transform has a zero scale axis"]);

        let broken = Transform::from_position(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(!check(&GameObject::new(uid(1)).with_transform(broken)).is_ok());
    }

    #[test]
    fn test_non_finite_center_is_an_error() {
        let object = GameObject::new(uid(1)).with_center(Vec3::splat(f32::INFINITY));
        assert!(!check(&object).is_ok());
    }

    #[test]
    fn test_physics_rules() {
        let negative = GameObject::new(uid(1)).with_component(PhysicsComponent::default().with_mass(-1.0));
        assert_eq!(messages(&check(&negative), Severity::Error), vec!["negative mass -1"]);

        let mut invalid = PhysicsComponent::default();
        invalid.shape = ShapeType::Invalid;
        assert!(!check(&GameObject::new(uid(1)).with_component(invalid)).is_ok());

        let flat_box = PhysicsComponent::static_box(Vec3::new(1.0, 0.0, 1.0));
        assert!(!check(&GameObject::new(uid(1)).with_component(flat_box)).is_ok());

        let mut sphere = PhysicsComponent::static_box(Vec3::ZERO);
        sphere.shape = ShapeType::Sphere;
        assert!(check(&GameObject::new(uid(1)).with_component(sphere)).is_ok());
    }

    #[test]
    fn test_duplicate_components_warn() {
        let object = GameObject::new(uid(1))
            .with_component(PhysicsComponent::default())
            .with_component(PhysicsComponent::default())
            .with_component(good_visual())
            .with_component(good_visual());
        let report = check(&object);
        assert!(report.is_ok());
        assert_eq!(report.warnings().count(), 2);
    }

    #[test]
    fn test_visual_rules() {
        let visual = VisualComponent::new("", "").with_texture("a.img").with_texture("b.img");
        let report = check(&GameObject::new(uid(1)).with_component(visual));
        assert!(report.is_ok());
        assert_eq!(
            messages(&report, Severity::Warning),
            vec![
                "2 textures set, only the first is bound",
                "visual component has no model",
                "visual component has no pipeline",
            ]
        );
    }

    #[test]
    fn test_escaping_reference_is_an_error() {
        let visual = VisualComponent::new("../outside.bin", "p.ppl");
        let report = check(&GameObject::new(uid(1)).with_component(visual));
        assert_eq!(
            messages(&report, Severity::Error),
            vec![r#"model path "../outside.bin" escapes the asset root"#]
        );
    }

    #[test]
    fn test_non_finite_physics_is_an_error() {
        let physics = PhysicsComponent::default().with_origin(Vec3::new(0.0, f32::NAN, 0.0));
        let report = check(&GameObject::new(uid(1)).with_component(physics));
        assert_eq!(
            messages(&report, Severity::Error),
            vec!["physics component has a non-finite value"]
        );

        let heavy = PhysicsComponent::default().with_mass(f32::INFINITY);
        assert!(!check(&GameObject::new(uid(1)).with_component(heavy)).is_ok());
    }

    #[test]
    fn test_visual_transform_rules() {
        let collapsed = Transform::new(Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0), Vec3::ONE);
        let visual = good_visual().with_transform(collapsed);
        let report = check(&GameObject::new(uid(1)).with_component(visual));
        assert_eq!(
            messages(&report, Severity::Error),
            vec!["visual transform has a zero-length rotation"]
        );

        let broken = Transform::from_position(Vec3::new(0.0, 0.0, f32::NAN));
        let visual = good_visual().with_transform(broken);
        let report = check(&GameObject::new(uid(1)).with_component(visual));
        assert_eq!(
            messages(&report, Severity::Error),
            vec!["visual transform has a non-finite value"]
        );
    }

    #[test]
    fn test_absolute_reference_is_an_error() {
        let visual = VisualComponent::new("a.bin", "p.ppl").with_texture("/etc/passwd");
        let report = check(&GameObject::new(uid(1)).with_component(visual));
        assert_eq!(
            messages(&report, Severity::Error),
            vec![r#"texture path "/etc/passwd" escapes the asset root"#]
        );

        let visual = VisualComponent::new("C:\\models\\a.bin", "p.ppl");
        assert!(!check(&GameObject::new(uid(1)).with_component(visual)).is_ok());
    }

    #[test]
    fn test_unknown_components_follow_config() {
        let object = GameObject::new(uid(1)).with_component(RawComponent {
            type_name: "TankComponent".into(),
            data: serde_json::Value::Null,
        });
        assert!(check(&object).is_ok());
        let strict = LoaderConfig::default().with_unknown_components(false);
        assert!(!validate(&object, &strict).is_ok());
    }

    #[test]
    fn test_max_depth() {
        let object = GameObject::new(uid(1))
            .with_child(GameObject::new(uid(2)).with_child(GameObject::new(uid(3))));
        let config = LoaderConfig::default().with_max_depth(1);
        let report = validate(&object, &config);
        let error = report.errors().next().unwrap();
        assert_eq!(error.path, "root/0/0");
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_report_display() {
        let report = check(&GameObject::new(Uid::NIL));
        assert_eq!(
            report.to_string(),
            format!("  warning at root ({}): object has a nil UID", "0".repeat(32))
        );
    }
}
