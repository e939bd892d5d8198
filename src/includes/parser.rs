use std::path::Path;

use super::document::parse_document;
use super::expansion::expand_folder_includes;
use super::file_accessor::FileAccessor;
use super::paths::assign_paths;
use super::tags::custom_tags;
use super::types::{IncludeTable, ParseResult};
use crate::error::Result;

/// Discovers which files a configuration includes and where in the
/// configuration tree each of them lands.
///
/// Only the entry files are parsed. Include directives inside included files
/// are not followed.
#[derive(Debug, Clone)]
pub struct NestedYamlParser<F> {
    accessor: F,
}

impl<F: FileAccessor> NestedYamlParser<F> {
    pub fn new(accessor: F) -> NestedYamlParser<F> {
        NestedYamlParser { accessor }
    }

    pub fn accessor(&self) -> &F {
        &self.accessor
    }

    /// Map every file reachable from `entry_files` through an include
    /// directive to its logical path, with entry roots mounted at
    /// `base_path`.
    ///
    /// Entry files are processed one after another, in order, and folder
    /// includes are expanded only once all of them are path-tracked. Each
    /// call works on its own table, so concurrent calls do not interact.
    pub async fn parse<P: AsRef<Path>>(
        &self,
        entry_files: &[P],
        base_path: &str,
    ) -> Result<ParseResult> {
        let table = self.collect_includes(entry_files, base_path).await?;
        let table = expand_folder_includes(&self.accessor, table).await?;

        Ok(ParseResult {
            file_path_mappings: table.to_path_mapping(),
        })
    }

    /// Tag resolution and path tracking over all entry files, before any
    /// folder expansion.
    pub async fn collect_includes<P: AsRef<Path>>(
        &self,
        entry_files: &[P],
        base_path: &str,
    ) -> Result<IncludeTable> {
        let mut table = IncludeTable::new();

        for entry in entry_files {
            let path = self
                .accessor
                .unified_path(&entry.as_ref().to_string_lossy());
            let text = self.accessor.read_file(&path).await?;

            let tags = custom_tags(&self.accessor, &path);
            let root = parse_document(&text, &path, &tags, &mut table)?;
            assign_paths(&root, base_path, &mut table)?;

            tracing::debug!(
                file = %path.display(),
                targets = table.target_count(),
                "parsed entry file"
            );
        }

        Ok(table)
    }
}
