use std::error::Error;
use std::fs;
use std::path::Path;

use assetflow::config::{PackageMeta, ProjectConfig};
use assetflow::exec::execute;
use assetflow::graph::TaskGraph;
use assetflow::mode::Mode;
use assetflow::project::register_tasks;

type TestResult = Result<(), Box<dyn Error>>;

fn write_site(root: &Path) -> TestResult {
    fs::create_dir_all(root.join("src/css"))?;
    fs::create_dir_all(root.join("src/js"))?;
    fs::create_dir_all(root.join("src/img"))?;
    fs::create_dir_all(root.join("src/fonts"))?;

    fs::write(
        root.join("src/css/main.css"),
        "/* layout */\nbody {\n  margin: 0;\n}\n",
    )?;
    fs::write(root.join("src/js/a.js"), "var a = 1;")?;
    fs::write(root.join("src/js/b.js"), "var b = 2;")?;
    fs::write(root.join("src/img/logo.svg"), b"<svg/>")?;
    fs::write(root.join("src/fonts/site.woff"), b"\0font")?;
    Ok(())
}

fn config() -> ProjectConfig {
    ProjectConfig {
        package: PackageMeta {
            name: "mysite".into(),
            version: "1.2.0".into(),
            author: "Jane Doe".into(),
            description: "Marketing site".into(),
        },
        ..ProjectConfig::default()
    }
}

#[tokio::test]
async fn development_build_copies_sources_untouched() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_site(root)?;

    let mut graph = TaskGraph::new();
    register_tasks(&mut graph, Mode::Development, root, &config())?;

    let record = execute(&graph, "default").await?;
    assert!(record.success());

    // Dev styles are byte-identical to the source.
    let css = fs::read(root.join("dist/css/main.css"))?;
    assert_eq!(css, fs::read(root.join("src/css/main.css"))?);

    // Scripts concat in sorted order, nothing else in dev.
    let js = fs::read_to_string(root.join("dist/js/main.js"))?;
    assert_eq!(js, "var a = 1;\nvar b = 2;");

    assert!(root.join("dist/img/logo.svg").exists());
    assert!(root.join("dist/fonts/site.woff").exists());

    Ok(())
}

#[tokio::test]
async fn production_build_stamps_banner_and_compacts() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_site(root)?;

    let mut graph = TaskGraph::new();
    register_tasks(&mut graph, Mode::Production, root, &config())?;

    let record = execute(&graph, "default").await?;
    assert!(record.success());

    let js = fs::read_to_string(root.join("dist/js/main.js"))?;
    assert!(js.starts_with("/*!"));
    assert!(js.contains("mysite 1.2.0"));
    assert!(js.contains("Jane Doe"));

    let css = fs::read_to_string(root.join("dist/css/main.css"))?;
    assert!(css.starts_with("/*!"));
    // The source block comment was stripped by the compact stage.
    assert!(!css.contains("layout"));
    assert!(!css.contains("\n\n"));

    // Binary assets are never stamped.
    let svg = fs::read(root.join("dist/img/logo.svg"))?;
    assert_eq!(svg, b"<svg/>");

    Ok(())
}

#[tokio::test]
async fn clean_removes_stale_artifacts_first() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_site(root)?;

    fs::create_dir_all(root.join("dist/css"))?;
    fs::write(root.join("dist/css/stale.css"), "old")?;

    let mut graph = TaskGraph::new();
    register_tasks(&mut graph, Mode::Development, root, &config())?;

    let record = execute(&graph, "default").await?;
    assert!(record.success());

    assert!(!root.join("dist/css/stale.css").exists());
    assert!(root.join("dist/css/main.css").exists());

    Ok(())
}

#[tokio::test]
async fn missing_source_directories_yield_an_empty_build() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    // No src tree at all; every pipeline sees an empty stream.

    let mut graph = TaskGraph::new();
    register_tasks(&mut graph, Mode::Development, root, &config())?;

    let record = execute(&graph, "default").await?;
    assert!(record.success());
    assert!(!root.join("dist/js/main.js").exists());

    Ok(())
}
