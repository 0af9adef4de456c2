//! Subcommand implementations.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use engine_asset::{AssetFormat, AssetLoader, GameObject, ValidationReport};
use engine_component::{AnyComponent, UidGenerator};

/// Decode and validate each file, printing every issue found.
///
/// A file that cannot be read or decoded counts as failed; the remaining
/// files are still checked.
pub fn validate(loader: &AssetLoader, files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for file in files {
        let report = match check_file(loader, file) {
            Ok(report) => report,
            Err(err) => {
                println!("{}: {err:#}", file.display());
                failed += 1;
                continue;
            }
        };
        if report.is_empty() {
            println!("{}: ok", file.display());
            continue;
        }
        let errors = report.errors().count();
        println!(
            "{}: {} error(s), {} warning(s)",
            file.display(),
            errors,
            report.len() - errors
        );
        println!("{report}");
        if errors > 0 {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} file(s) failed validation", files.len());
    }
    Ok(())
}

fn check_file(loader: &AssetLoader, file: &Path) -> Result<ValidationReport> {
    let bytes = std::fs::read(file).context("reading")?;
    let format = AssetFormat::detect(file, &bytes);
    let object: GameObject = engine_asset::decode(&bytes, format).context("decoding")?;
    Ok(engine_asset::validate(&object, loader.config()))
}

pub fn show(loader: &AssetLoader, file: &Path) -> Result<()> {
    let object = load(loader, file)?;
    print!("{}", render_tree(&object));
    Ok(())
}

pub fn refs(loader: &AssetLoader, file: &Path, check: bool) -> Result<()> {
    let object = load(loader, file)?;
    for reference in object.asset_references() {
        println!("{reference}");
    }

    if check {
        let missing = loader.missing_references(&object);
        for reference in &missing {
            println!("missing: {}", loader.resolve(reference).display());
        }
        if !missing.is_empty() {
            bail!("{} referenced file(s) missing", missing.len());
        }
    }
    Ok(())
}

/// Re-encode `input`. Without an explicit output the other format is
/// written next to the input.
pub fn convert(loader: &AssetLoader, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let object = load(loader, input)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(converted_format(input).extension()),
    };
    save(loader, &output, &object)?;
    info!(from = %input.display(), to = %output.display(), "converted");
    Ok(output)
}

fn converted_format(input: &Path) -> AssetFormat {
    match AssetFormat::from_extension(input) {
        Some(AssetFormat::Binary) => AssetFormat::Json,
        _ => AssetFormat::Binary,
    }
}

pub fn uid(count: usize) -> Result<()> {
    let mut generator = UidGenerator::new();
    info!(machine = %format!("{:016X}", generator.machine()), count, "generating UIDs");
    for _ in 0..count {
        println!("{}", generator.create());
    }
    Ok(())
}

pub fn reassign(loader: &AssetLoader, input: &Path, output: &Path) -> Result<()> {
    let mut object = load(loader, input)?;
    object.reassign_uids(&mut UidGenerator::new());
    save(loader, output, &object)?;
    info!(objects = object.object_count(), to = %output.display(), "reassigned UIDs");
    Ok(())
}

fn load(loader: &AssetLoader, file: &Path) -> Result<GameObject> {
    loader
        .load(file)
        .with_context(|| format!("loading {}", file.display()))
}

fn save(loader: &AssetLoader, file: &Path, object: &GameObject) -> Result<()> {
    loader
        .save(file, object)
        .with_context(|| format!("writing {}", file.display()))
}

/// One line per object, indented by depth.
fn render_tree(root: &GameObject) -> String {
    let mut out = String::new();
    for (depth, object) in root.walk() {
        let p = object.transform.position;
        let components = if object.components.is_empty() {
            "-".to_string()
        } else {
            object
                .components
                .iter()
                .map(describe_component)
                .collect::<Vec<_>>()
                .join(", ")
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{:indent$}{} pos [{}, {}, {}] {}",
            "",
            object.uid,
            p.x,
            p.y,
            p.z,
            components,
            indent = depth * 2
        );
    }
    out
}

fn describe_component(component: &AnyComponent) -> String {
    match component {
        AnyComponent::Physics(physics) => {
            format!("{}({})", component.type_name(), physics.shape.name())
        }
        _ => component.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use engine_asset::LoaderConfig;
    use engine_component::{PhysicsComponent, Uid};
    use engine_math::{Transform, Vec3};
    use tempfile::TempDir;

    use super::*;

    const SAMPLE: &str = include_str!("../../../assets/TestGameObject/testGO.go");

    fn loader() -> AssetLoader {
        AssetLoader::new(LoaderConfig::default())
    }

    #[test]
    fn test_render_tree() {
        let object = GameObject::new(Uid::new(0, 0, 1))
            .with_component(PhysicsComponent::default())
            .with_child(
                GameObject::new(Uid::new(0, 0, 2))
                    .with_transform(Transform::from_position(Vec3::new(1.0, 2.5, -3.0))),
            );
        let expected = format!(
            "{} pos [0, 0, 0] PhysicsComponent(Box)\n  {} pos [1, 2.5, -3] -\n",
            Uid::new(0, 0, 1),
            Uid::new(0, 0, 2)
        );
        assert_eq!(render_tree(&object), expected);
    }

    #[test]
    fn test_convert_and_reassign() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("testGO.go");
        std::fs::write(&source, SAMPLE).unwrap();

        let binary = dir.path().join("copy.msgpack");
        assert_eq!(convert(&loader(), &source, Some(&binary)).unwrap(), binary);
        let original = load(&loader(), &source).unwrap();
        assert_eq!(load(&loader(), &binary).unwrap(), original);

        let fresh = dir.path().join("fresh.go");
        reassign(&loader(), &binary, &fresh).unwrap();
        let reassigned = load(&loader(), &fresh).unwrap();
        assert!(!reassigned.uid.is_nil());
        assert_eq!(reassigned.components, original.components);
    }

    #[test]
    fn test_convert_defaults_to_other_format() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("testGO.go");
        std::fs::write(&source, SAMPLE).unwrap();

        let binary = convert(&loader(), &source, None).unwrap();
        assert_eq!(binary, dir.path().join("testGO.gob"));
        let bytes = std::fs::read(&binary).unwrap();
        assert_eq!(AssetFormat::sniff(&bytes), AssetFormat::Binary);

        std::fs::remove_file(&source).unwrap();
        let json = convert(&loader(), &binary, None).unwrap();
        assert_eq!(json, source);
        assert_eq!(load(&loader(), &json).unwrap(), load(&loader(), &binary).unwrap());
    }

    #[test]
    fn test_validate_fails_on_errors() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.go");
        let bad = dir.path().join("bad.go");
        std::fs::write(&good, SAMPLE).unwrap();
        std::fs::write(&bad, SAMPLE.replace(r#""myShape": 1"#, r#""myShape": 0"#)).unwrap();

        assert!(validate(&loader(), &[good.clone()]).is_ok());
        let err = validate(&loader(), &[good, bad]).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 file(s) failed validation");
    }

    #[test]
    fn test_validate_continues_past_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.go");
        let absent = dir.path().join("absent.go");
        let good = dir.path().join("good.go");
        std::fs::write(&broken, "{ not json").unwrap();
        std::fs::write(&good, SAMPLE).unwrap();

        let err = validate(&loader(), &[broken, absent, good]).unwrap_err();
        assert_eq!(err.to_string(), "2 of 3 file(s) failed validation");
    }

    #[test]
    fn test_check_file_reports_stage() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.go");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = check_file(&loader(), &broken).unwrap_err();
        assert!(format!("{err:#}").starts_with("decoding: invalid JSON asset"));
    }

    #[test]
    fn test_refs_check_reports_missing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("testGO.go");
        std::fs::write(&file, SAMPLE).unwrap();
        let loader = AssetLoader::new(LoaderConfig::default().with_asset_root(dir.path()));
        assert!(refs(&loader, &file, false).is_ok());
        assert!(refs(&loader, &file, true).is_err());
    }
}
