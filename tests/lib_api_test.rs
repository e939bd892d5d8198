//! Integration tests for the hassls library public API.
//!
//! These tests verify that the library can be used as an external dependency,
//! ensuring the lib+bin separation works correctly.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Import from the hassls library crate (external consumer perspective)
use hassls::config::Settings;
use hassls::error::IncludeError;
use hassls::includes::{FileAccessor, FsFileAccessor, IncludeKind, NestedYamlParser};
use hassls::schema::{self, FileShape};

/// Helper: Create a temporary configuration directory for testing.
///
/// Returns (TempDir, PathBuf) - keep TempDir alive for test duration.
fn create_test_workspace_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let workspace_dir = temp_dir.path().join("config");
    fs::create_dir(&workspace_dir).expect("Failed to create workspace subdirectory");
    (temp_dir, workspace_dir)
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

// ============================================================================
// Public API Accessibility Tests
// ============================================================================

#[tokio::test]
async fn test_parser_construction_from_external_crate() {
    let (_temp_dir, root) = create_test_workspace_dir();
    write(&root, "configuration.yaml", "homeassistant:\n  name: Home\n");

    let settings = Settings::default();
    let parser = NestedYamlParser::new(FsFileAccessor::new(&root, &settings));
    let result = parser
        .parse(&settings.entry_files, &settings.base_path)
        .await;

    assert!(result.is_ok(), "Parsing a plain configuration should succeed");
    assert!(result.unwrap().file_path_mappings.is_empty());
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.entry_files, vec!["configuration.yaml"]);
    assert_eq!(settings.base_path, "");
    assert!(settings.skip_hidden);
    assert!(!settings.follow_links);
}

#[test]
fn test_unified_path_is_stable_from_outside() {
    let (_temp_dir, root) = create_test_workspace_dir();
    let accessor = FsFileAccessor::new(&root, &Settings::default());

    let once = accessor.unified_path("./packages/../automations.yaml");
    let twice = accessor.unified_path(&once.to_string_lossy());

    assert_eq!(once, twice);
    assert_eq!(once, accessor.root().join("automations.yaml"));
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_configuration_with_file_and_folder_includes() {
    let (_temp_dir, root) = create_test_workspace_dir();
    write(
        &root,
        "configuration.yaml",
        "automation: !include automations.yaml\nsensor: !include_dir_list sensors/\n",
    );
    write(&root, "automations.yaml", "[]");
    write(&root, "sensors/a.yaml", "platform: sun");
    write(&root, "sensors/b.yaml", "platform: moon");

    let accessor = FsFileAccessor::new(&root, &Settings::default());
    let base = accessor.root().to_path_buf();
    let parser = NestedYamlParser::new(accessor);
    let mappings = parser
        .parse(&["configuration.yaml"], "")
        .await
        .unwrap()
        .file_path_mappings;

    assert_eq!(mappings.len(), 3);
    let automations = &mappings[&base.join("automations.yaml")];
    assert_eq!(automations.path, "automation");
    assert_eq!(automations.include_type, IncludeKind::Include);
    for sensor in ["sensors/a.yaml", "sensors/b.yaml"] {
        let reference = &mappings[&base.join(sensor)];
        assert_eq!(reference.path, "sensor");
        assert_eq!(reference.include_type, IncludeKind::IncludeDirList);
    }
}

#[tokio::test]
async fn test_folder_listing_skips_hidden_and_foreign_files() {
    let (_temp_dir, root) = create_test_workspace_dir();
    write(
        &root,
        "configuration.yaml",
        "script: !include_dir_merge_named scripts\n",
    );
    write(&root, "scripts/morning.yaml", "wake_up: {}");
    write(&root, "scripts/README.md", "# scripts");
    write(&root, "scripts/.old/evening.yaml", "sleep: {}");

    let accessor = FsFileAccessor::new(&root, &Settings::default());
    let base = accessor.root().to_path_buf();
    let parser = NestedYamlParser::new(accessor);
    let mappings = parser
        .parse(&["configuration.yaml"], "")
        .await
        .unwrap()
        .file_path_mappings;

    assert_eq!(
        mappings.keys().collect::<Vec<_>>(),
        vec![&base.join("scripts/morning.yaml")]
    );
}

#[tokio::test]
async fn test_schema_association_for_parsed_mapping() {
    let (_temp_dir, root) = create_test_workspace_dir();
    write(
        &root,
        "configuration.yaml",
        "homeassistant:\n  packages: !include_dir_named packages\nautomation manual: !include_dir_merge_list automations\n",
    );
    write(&root, "packages/garden.yaml", "switch: []");
    write(&root, "automations/lights.yaml", "- alias: lights");

    let accessor = FsFileAccessor::new(&root, &Settings::default());
    let base = accessor.root().to_path_buf();
    let parser = NestedYamlParser::new(accessor);
    let mappings = parser
        .parse(&["configuration.yaml"], "")
        .await
        .unwrap()
        .file_path_mappings;

    let associations = schema::associate_all(&mappings, "");
    let package = &associations[&base.join("packages/garden.yaml")];
    assert_eq!(package.schema, "packages");
    assert_eq!(package.shape, FileShape::NamedValue);
    let automation = &associations[&base.join("automations/lights.yaml")];
    assert_eq!(automation.schema, "automations");
    assert_eq!(automation.shape, FileShape::ListFragment);
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_include_tag_error_is_public() {
    let (_temp_dir, root) = create_test_workspace_dir();
    write(
        &root,
        "configuration.yaml",
        "sensor: !include_dir_bogus sensors\n",
    );

    let parser = NestedYamlParser::new(FsFileAccessor::new(&root, &Settings::default()));
    let err = parser
        .parse(&["configuration.yaml"], "")
        .await
        .unwrap_err();

    assert!(matches!(err, IncludeError::UnknownIncludeTag { .. }));
    assert!(err.to_string().contains("include_dir_bogus"));
}

#[tokio::test]
async fn test_missing_folder_error_names_the_folder() {
    let (_temp_dir, root) = create_test_workspace_dir();
    write(
        &root,
        "configuration.yaml",
        "group: !include_dir_named groups\n",
    );

    let accessor = FsFileAccessor::new(&root, &Settings::default());
    let folder = accessor.root().join("groups");
    let parser = NestedYamlParser::new(accessor);
    let err = parser
        .parse(&["configuration.yaml"], "")
        .await
        .unwrap_err();

    assert!(matches!(err, IncludeError::FolderList { .. }));
    assert_eq!(err.path(), &folder);
}
