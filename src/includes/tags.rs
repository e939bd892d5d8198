//! Custom YAML tags for the include directives and the resolver they invoke.

use std::path::{Path, PathBuf};

use super::document::{IncludeMarker, YamlNode};
use super::file_accessor::FileAccessor;
use super::kind::IncludeKind;
use super::types::{ByteRange, IncludeTable};
use crate::error::{IncludeError, Result};

/// One tag occurrence handed to a resolution callback.
#[derive(Debug, Clone, Copy)]
pub struct TagOccurrence<'t> {
    /// The scalar following the tag, i.e. the referenced file or folder.
    pub raw_target: &'t str,
    pub range: ByteRange,
}

type ResolveFn<'a> = dyn Fn(&mut IncludeTable, TagOccurrence<'_>) -> Result<YamlNode> + 'a;

/// A tag name paired with the callback that resolves it.
pub struct TagDefinition<'a> {
    pub kind: IncludeKind,
    resolve: Box<ResolveFn<'a>>,
}

impl<'a> TagDefinition<'a> {
    pub fn name(&self) -> &'static str {
        self.kind.tag_name()
    }

    pub fn resolve(
        &self,
        table: &mut IncludeTable,
        occurrence: TagOccurrence<'_>,
    ) -> Result<YamlNode> {
        (self.resolve)(table, occurrence)
    }
}

impl std::fmt::Debug for TagDefinition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagDefinition")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The include tags, each bound to the file being parsed.
pub fn custom_tags<'a, F: FileAccessor>(
    accessor: &'a F,
    source_file: &'a Path,
) -> Vec<TagDefinition<'a>> {
    IncludeKind::ALL
        .into_iter()
        .map(|kind| {
            let resolve: Box<ResolveFn<'a>> = Box::new(move |table, occurrence| {
                resolve_include(table, accessor, source_file, kind.tag_name(), occurrence)
            });
            TagDefinition { kind, resolve }
        })
        .collect()
}

/// Record the edge for one include occurrence and return its placeholder.
///
/// Fails before touching the table with [`IncludeError::UnknownIncludeTag`]
/// when `tag_suffix` is not one of the five include directives, and with
/// [`IncludeError::EmptyIncludeTarget`] when the directive names nothing.
pub fn resolve_include<F: FileAccessor>(
    table: &mut IncludeTable,
    accessor: &F,
    source_file: &Path,
    tag_suffix: &str,
    occurrence: TagOccurrence<'_>,
) -> Result<YamlNode> {
    let kind =
        IncludeKind::from_tag_name(tag_suffix).ok_or_else(|| IncludeError::UnknownIncludeTag {
            tag: tag_suffix.to_string(),
            source_file: source_file.to_path_buf(),
            range: occurrence.range,
        })?;

    if occurrence.raw_target.trim().is_empty() {
        return Err(IncludeError::EmptyIncludeTarget {
            tag: tag_suffix.to_string(),
            source_file: source_file.to_path_buf(),
            range: occurrence.range,
        });
    }

    let source_file: PathBuf = accessor.unified_path(&source_file.to_string_lossy());
    let target = accessor.resolve_target(&source_file, occurrence.raw_target);

    tracing::trace!(
        from = %source_file.display(),
        to = %target.display(),
        %kind,
        range = %occurrence.range,
        "recording include edge"
    );

    let id = table.record(&source_file, &target, kind, occurrence.range);
    Ok(YamlNode::Include(IncludeMarker { id, kind }))
}
