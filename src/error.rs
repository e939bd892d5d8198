use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::includes::ByteRange;

pub type Result<T> = std::result::Result<T, IncludeError>;

/// Failures raised while discovering and resolving include directives.
///
/// Every variant is fatal for the `parse()` call that raised it. Nothing is
/// retried; the caller decides whether a partial result is still useful.
#[derive(Debug, Error)]
pub enum IncludeError {
    #[error("unknown include tag `!{tag}` in {} at {range}", source_file.display())]
    UnknownIncludeTag {
        tag: String,
        source_file: PathBuf,
        range: ByteRange,
    },

    #[error("`!{tag}` without a target in {} at {range}", source_file.display())]
    EmptyIncludeTarget {
        tag: String,
        source_file: PathBuf,
        range: ByteRange,
    },

    #[error("`!{tag}` needs a path, not a {node}, in {} at {range}", source_file.display())]
    NonScalarIncludeTarget {
        tag: String,
        node: &'static str,
        source_file: PathBuf,
        range: ByteRange,
    },

    #[error("failed to read {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list include folder {}", path.display())]
    FolderList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid YAML in {}: {message}", path.display())]
    YamlSyntax { path: PathBuf, message: String },

    #[error(
        "include marker for {} in {} has no recorded edge",
        target.display(),
        source_file.display()
    )]
    InternalConsistency {
        target: PathBuf,
        source_file: PathBuf,
    },
}

impl IncludeError {
    /// The file the failure is attributed to.
    pub fn path(&self) -> &PathBuf {
        match self {
            IncludeError::UnknownIncludeTag { source_file, .. } => source_file,
            IncludeError::EmptyIncludeTarget { source_file, .. } => source_file,
            IncludeError::NonScalarIncludeTarget { source_file, .. } => source_file,
            IncludeError::FileRead { path, .. } => path,
            IncludeError::FolderList { path, .. } => path,
            IncludeError::YamlSyntax { path, .. } => path,
            IncludeError::InternalConsistency { source_file, .. } => source_file,
        }
    }
}
