//! Configuration loading tests.

use bedtime::{
    BedtimeConfig, BedtimeErrorKind, ConfigErrorKind, LogFormat, StorageBackend, build_pipeline,
};
use std::io::Write;

fn write_config(contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_defaults_load_without_user_files() -> anyhow::Result<()> {
    let config = BedtimeConfig::load(None)?;
    assert_eq!(config.pipeline.default_theme, "a fun adventure");
    assert_eq!(config.pipeline.max_concurrent_illustrations, 4);
    assert_eq!(config.pipeline.voice.language_code, "en-US");
    Ok(())
}

#[test]
fn test_explicit_file_overrides_defaults() -> anyhow::Result<()> {
    let file = write_config(
        r#"
        [pipeline]
        art_style = "in soft watercolor"
        max_concurrent_illustrations = 2

        [storage]
        backend = "memory"

        [logging]
        format = "json"
        "#,
    )?;

    let config = BedtimeConfig::load(Some(file.path()))?;

    assert_eq!(config.pipeline.art_style, "in soft watercolor");
    assert_eq!(config.pipeline.max_concurrent_illustrations, 2);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.logging.format, LogFormat::Json);
    // Untouched keys keep bundled values
    assert_eq!(config.pipeline.image_model, "gemini-2.5-flash-image");
    Ok(())
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let err = BedtimeConfig::load(Some(std::path::Path::new("/nonexistent/bedtime.toml")))
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        BedtimeErrorKind::Config(e) if matches!(e.kind, ConfigErrorKind::Sources(_))
    ));
}

#[test]
fn test_from_file_fills_missing_sections_with_defaults() -> anyhow::Result<()> {
    let file = write_config("[gemini]\nmax_retries = 5\n")?;
    let config = BedtimeConfig::from_file(file.path())?;

    assert_eq!(config.gemini.max_retries, 5);
    assert_eq!(config.pipeline.default_theme, "a fun adventure");
    Ok(())
}

#[test]
fn test_from_file_layers_over_bundled_values() -> anyhow::Result<()> {
    // Bundled retries differ from the field default of zero
    let file = write_config("[pipeline]\ndefault_theme = \"a picnic\"\n")?;
    let config = BedtimeConfig::from_file(file.path())?;

    assert_eq!(config.pipeline.default_theme, "a picnic");
    assert_eq!(config.gemini.max_retries, 3);
    assert_eq!(config.storage.root, std::path::PathBuf::from("bedtime-artifacts"));
    Ok(())
}

#[test]
fn test_wrong_value_type_is_a_shape_error() -> anyhow::Result<()> {
    let file = write_config("[pipeline]\nmax_concurrent_illustrations = \"many\"\n")?;
    let err = BedtimeConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        err.kind(),
        BedtimeErrorKind::Config(e) if matches!(e.kind, ConfigErrorKind::Shape(_))
    ));
    Ok(())
}

#[test]
fn test_build_pipeline_with_memory_store() -> anyhow::Result<()> {
    let file = write_config(
        r#"
        [storage]
        backend = "memory"

        [gemini]
        api_key = "test-key"
        "#,
    )?;
    let config = BedtimeConfig::from_file(file.path())?;

    let pipeline = build_pipeline(&config)?;
    assert_eq!(pipeline.steps().count(), 4);
    Ok(())
}
