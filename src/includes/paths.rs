//! Logical path assignment for include markers.
//!
//! A logical path is the `/`-joined chain of mapping keys from the document
//! root down to a node. Sequence positions are not part of it, so every
//! element of a list shares the path of the list itself.

use super::document::YamlNode;
use super::types::IncludeTable;
use crate::error::{IncludeError, Result};

/// Walk `node` depth-first and store the logical path of every include
/// marker on its edge in `table`.
pub fn assign_paths(node: &YamlNode, path: &str, table: &mut IncludeTable) -> Result<()> {
    match node {
        YamlNode::Scalar(_) => Ok(()),
        YamlNode::Sequence(items) => items
            .iter()
            .try_for_each(|item| assign_paths(item, path, table)),
        YamlNode::Mapping(entries) => entries.iter().try_for_each(|(key, value)| {
            // A marker used as a key sits at the mapping's own path
            assign_paths(key, path, table)?;
            match key.as_scalar() {
                Some(key) => assign_paths(value, &join_path(path, key), table),
                None => assign_paths(value, path, table),
            }
        }),
        YamlNode::Include(marker) => {
            let edge =
                table
                    .get_mut(&marker.id)
                    .ok_or_else(|| IncludeError::InternalConsistency {
                        target: marker.id.target.clone(),
                        source_file: marker.id.source_file.clone(),
                    })?;
            tracing::trace!(
                include = %edge.target.display(),
                logical_path = path,
                "assigned include path"
            );
            edge.logical_path = Some(path.to_string());
            Ok(())
        }
    }
}

/// `parent/key`, or just `key` at the root.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}/{key}")
    }
}
