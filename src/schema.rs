//! Schema association for included files.
//!
//! An included file is only a fragment of the configuration, so it cannot
//! be validated against the top-level schema. Its logical path says which
//! integration's schema applies, and its include kind says whether the file
//! holds the whole section, one item of it, or a piece to be merged.
//!
//! | Include kind | File shape |
//! |--------------|------------|
//! | `include` | [`FileShape::Whole`] |
//! | `include_dir_list` | [`FileShape::ListItem`] |
//! | `include_dir_named` | [`FileShape::NamedValue`] |
//! | `include_dir_merge_list` | [`FileShape::ListFragment`] |
//! | `include_dir_merge_named` | [`FileShape::MappingFragment`] |

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::includes::{IncludeKind, IncludeReference, PathMapping};

/// What a single included file contains relative to its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileShape {
    /// The complete value of the section
    Whole,
    /// One element of a list-valued section
    ListItem,
    /// The value for the key named after the file
    NamedValue,
    /// A list concatenated with its siblings
    ListFragment,
    /// A mapping merged with its siblings
    MappingFragment,
}

impl From<IncludeKind> for FileShape {
    fn from(kind: IncludeKind) -> Self {
        match kind {
            IncludeKind::Include => FileShape::Whole,
            IncludeKind::IncludeDirList => FileShape::ListItem,
            IncludeKind::IncludeDirNamed => FileShape::NamedValue,
            IncludeKind::IncludeDirMergeList => FileShape::ListFragment,
            IncludeKind::IncludeDirMergeNamed => FileShape::MappingFragment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaAssociation {
    pub schema: &'static str,
    pub shape: FileShape,
}

/// Logical path (relative to the base path) -> schema identifier.
static SECTION_SCHEMAS: &[(&str, &str)] = &[
    ("alert", "alerts"),
    ("automation", "automations"),
    ("binary_sensor", "binary-sensors"),
    ("camera", "cameras"),
    ("counter", "counters"),
    ("cover", "covers"),
    ("group", "groups"),
    ("homeassistant", "homeassistant"),
    ("homeassistant/customize", "customize"),
    ("homeassistant/customize_domain", "customize"),
    ("homeassistant/customize_glob", "customize"),
    ("homeassistant/packages", "packages"),
    ("input_boolean", "input-booleans"),
    ("input_button", "input-buttons"),
    ("input_datetime", "input-datetimes"),
    ("input_number", "input-numbers"),
    ("input_select", "input-selects"),
    ("input_text", "input-texts"),
    ("light", "lights"),
    ("lovelace", "lovelace"),
    ("notify", "notifiers"),
    ("scene", "scenes"),
    ("script", "scripts"),
    ("sensor", "sensors"),
    ("shell_command", "shell-commands"),
    ("switch", "switches"),
    ("template", "templates"),
    ("timer", "timers"),
    ("views", "lovelace-views"),
    ("zone", "zones"),
];

/// Strip `base_path` as a whole leading segment sequence and reduce each
/// labelled section key such as `automation manual` to its integration name.
fn section_path(logical_path: &str, base_path: &str) -> String {
    let relative = if base_path.is_empty() {
        logical_path
    } else {
        match logical_path.strip_prefix(base_path) {
            Some("") => "",
            Some(rest) => rest.strip_prefix('/').unwrap_or(logical_path),
            None => logical_path,
        }
    };

    relative
        .split('/')
        .enumerate()
        .map(|(depth, segment)| match depth {
            0 => segment.split_whitespace().next().unwrap_or(segment),
            _ => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The schema for one included file, if its section is known.
pub fn associate(reference: &IncludeReference, base_path: &str) -> Option<SchemaAssociation> {
    let section = section_path(&reference.path, base_path);
    SECTION_SCHEMAS
        .iter()
        .find(|(path, _)| *path == section)
        .map(|(_, schema)| SchemaAssociation {
            schema: *schema,
            shape: reference.include_type.into(),
        })
}

/// Schemas for every file in `mapping` whose section is known.
pub fn associate_all(
    mapping: &PathMapping,
    base_path: &str,
) -> BTreeMap<PathBuf, SchemaAssociation> {
    mapping
        .iter()
        .filter_map(|(file, reference)| Some((file.clone(), associate(reference, base_path)?)))
        .collect()
}
