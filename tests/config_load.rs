use std::error::Error;
use std::fs;

use assetflow::config::{load_and_validate, load_or_default};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn full_config_round_trips() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Assetflow.toml");
    fs::write(
        &path,
        r#"
[package]
name = "mysite"
version = "1.2.0"
author = "Jane Doe"
description = "Marketing site"

[build]
source = "assets"
dest = "public"

[watch]
debounce_ms = 100
reload_port = 4000
"#,
    )?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.package.name, "mysite");
    assert_eq!(cfg.package.version, "1.2.0");
    assert_eq!(cfg.build.source, "assets");
    assert_eq!(cfg.build.dest, "public");
    assert_eq!(cfg.watch.debounce_ms, 100);
    assert_eq!(cfg.watch.reload_port, 4000);

    Ok(())
}

#[test]
fn missing_sections_fall_back_to_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Assetflow.toml");
    fs::write(&path, "[package]\nname = \"mysite\"\n")?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.package.name, "mysite");
    assert_eq!(cfg.package.version, "0.0.0");
    assert_eq!(cfg.build.source, "src");
    assert_eq!(cfg.build.dest, "dist");
    assert_eq!(cfg.watch.debounce_ms, 250);
    assert_eq!(cfg.watch.reload_port, 35729);

    Ok(())
}

#[test]
fn missing_file_falls_back_to_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = load_or_default(dir.path().join("Assetflow.toml"))?;
    assert_eq!(cfg.build.dest, "dist");
    Ok(())
}

#[test]
fn dest_equal_to_source_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Assetflow.toml");
    fs::write(&path, "[build]\nsource = \"www\"\ndest = \"www\"\n")?;

    assert!(load_and_validate(&path).is_err());

    Ok(())
}

#[test]
fn zero_debounce_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Assetflow.toml");
    fs::write(&path, "[watch]\ndebounce_ms = 0\n")?;

    assert!(load_and_validate(&path).is_err());

    Ok(())
}

#[test]
fn broken_toml_is_an_error_even_with_fallback() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Assetflow.toml");
    fs::write(&path, "not toml [[[")?;

    assert!(load_or_default(&path).is_err());

    Ok(())
}
