use std::path::PathBuf;

use super::file_accessor::FileAccessor;
use super::types::{IncludeEdge, IncludeTable};
use crate::error::Result;

/// Replace every folder-level include with one edge per file in the folder.
///
/// Each new edge keeps the kind, source, range, logical path and recording
/// position of the folder edge it came from, so a direct include of the
/// same file recorded later still takes precedence. The folder's bucket is removed as a whole,
/// including any non-folder edge that happened to point at it. A folder
/// that cannot be listed aborts the expansion; edges already rewritten
/// stay rewritten.
pub async fn expand_folder_includes<F: FileAccessor>(
    accessor: &F,
    mut table: IncludeTable,
) -> Result<IncludeTable> {
    let folders: Vec<PathBuf> = table
        .targets()
        .filter(|target| {
            table
                .bucket(target)
                .is_some_and(|edges| edges.iter().any(|edge| edge.kind.is_directory()))
        })
        .map(PathBuf::from)
        .collect();

    for folder in folders {
        let files = accessor.list_files(&folder).await?;
        let folder_edges: Vec<IncludeEdge> = table
            .remove_target(&folder)
            .unwrap_or_default()
            .into_iter()
            .filter(|edge| edge.kind.is_directory())
            .collect();

        tracing::debug!(
            folder = %folder.display(),
            files = files.len(),
            edges = folder_edges.len(),
            "expanding folder include"
        );

        for edge in &folder_edges {
            for file in &files {
                table.insert(edge.retarget(file.clone()));
            }
        }
    }

    Ok(table)
}
