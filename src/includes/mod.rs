//! Include discovery for Home Assistant YAML configurations.
//!
//! Home Assistant splits its configuration across files with custom tags:
//!
//! | Tag | Target | Each file holds |
//! |-----|--------|-----------------|
//! | `!include` | file | the value at that point |
//! | `!include_dir_list` | folder | one list item |
//! | `!include_dir_named` | folder | the value for the key named after the file |
//! | `!include_dir_merge_list` | folder | a list merged into the parent list |
//! | `!include_dir_merge_named` | folder | a mapping merged into the parent mapping |
//!
//! [`NestedYamlParser`] parses the entry files, replaces each directive with
//! an [`IncludeMarker`], records where in the tree each marker sits, and
//! expands folder directives into per-file entries. The result maps every
//! included file to its logical path, which is what schema association
//! needs to validate a file that is only a fragment of the configuration.
//!
//! # Pipeline
//!
//! 1. [`custom_tags`] binds one [`TagDefinition`] per directive to the file
//!    being parsed.
//! 2. [`parse_document`] builds a [`YamlNode`] tree; every directive calls
//!    [`resolve_include`], which records an [`IncludeEdge`] in the
//!    [`IncludeTable`] and leaves a marker behind.
//! 3. [`assign_paths`] walks the tree and stores each marker's logical path
//!    on its edge.
//! 4. [`expand_folder_includes`] lists folders through the
//!    [`FileAccessor`] and rewrites folder edges into file edges.
//! 5. [`IncludeTable::to_path_mapping`] flattens the table into a
//!    [`PathMapping`].

mod document;
mod expansion;
mod file_accessor;
mod kind;
mod parser;
mod paths;
mod tags;
mod types;


pub use document::{parse_document, IncludeMarker, YamlNode};
pub use expansion::expand_folder_includes;
pub use file_accessor::{normalize_path, FileAccessor, FsFileAccessor};
pub use kind::IncludeKind;
pub use parser::NestedYamlParser;
pub use paths::{assign_paths, join_path};
pub use tags::{custom_tags, resolve_include, TagDefinition, TagOccurrence};
pub use types::{
    ByteRange, EdgeId, IncludeEdge, IncludeReference, IncludeTable, ParseResult, PathMapping,
};
