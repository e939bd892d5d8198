use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::kind::IncludeKind;

/// Byte offsets of a directive occurrence in its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> ByteRange {
        ByteRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Identity of an include edge: the `(target, source)` pair it is keyed by.
///
/// Placeholder nodes carry this instead of resolved content so the path
/// tracker can find their bookkeeping entry again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    pub target: PathBuf,
    pub source_file: PathBuf,
}

/// One directed reference from a YAML file to a file or folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeEdge {
    pub source_file: PathBuf,
    pub target: PathBuf,
    pub kind: IncludeKind,
    pub range: ByteRange,
    /// Unset between tag resolution and path tracking.
    pub logical_path: Option<String>,
    /// Position of the directive in recording order across the whole
    /// parse. Edges expanded from a folder keep their directive's position.
    pub sequence: u64,
}

impl IncludeEdge {
    pub fn id(&self) -> EdgeId {
        EdgeId {
            target: self.target.clone(),
            source_file: self.source_file.clone(),
        }
    }

    /// A copy of this edge pointing at one file discovered in its folder.
    pub fn retarget(&self, target: PathBuf) -> IncludeEdge {
        IncludeEdge {
            target,
            ..self.clone()
        }
    }
}

/// Target path -> one edge per distinct including file.
///
/// Sources stay in insertion order within a bucket. Owned by a single
/// `parse()` call and never shared between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeTable {
    buckets: BTreeMap<PathBuf, Vec<IncludeEdge>>,
    next_sequence: u64,
}

impl IncludeTable {
    pub fn new() -> IncludeTable {
        IncludeTable::default()
    }

    /// Insert an edge, or overwrite `kind` and `range` of the edge already
    /// recorded for the same `(target, source)` pair. Either way the edge
    /// becomes the most recently recorded one.
    pub fn record(
        &mut self,
        source_file: &Path,
        target: &Path,
        kind: IncludeKind,
        range: ByteRange,
    ) -> EdgeId {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let bucket = self.buckets.entry(target.to_path_buf()).or_default();
        match bucket.iter_mut().find(|edge| edge.source_file == source_file) {
            Some(edge) => {
                edge.kind = kind;
                edge.range = range;
                edge.sequence = sequence;
            }
            None => bucket.push(IncludeEdge {
                source_file: source_file.to_path_buf(),
                target: target.to_path_buf(),
                kind,
                range,
                logical_path: None,
                sequence,
            }),
        }

        EdgeId {
            target: target.to_path_buf(),
            source_file: source_file.to_path_buf(),
        }
    }

    /// Insert a fully formed edge. When the pair is already present, the
    /// edge with the higher sequence stays.
    pub fn insert(&mut self, edge: IncludeEdge) {
        self.next_sequence = self.next_sequence.max(edge.sequence + 1);

        let bucket = self.buckets.entry(edge.target.clone()).or_default();
        match bucket
            .iter_mut()
            .find(|existing| existing.source_file == edge.source_file)
        {
            Some(existing) if existing.sequence > edge.sequence => {}
            Some(existing) => *existing = edge,
            None => bucket.push(edge),
        }
    }

    pub fn get(&self, id: &EdgeId) -> Option<&IncludeEdge> {
        self.buckets
            .get(&id.target)?
            .iter()
            .find(|edge| edge.source_file == id.source_file)
    }

    pub fn get_mut(&mut self, id: &EdgeId) -> Option<&mut IncludeEdge> {
        self.buckets
            .get_mut(&id.target)?
            .iter_mut()
            .find(|edge| edge.source_file == id.source_file)
    }

    pub fn bucket(&self, target: &Path) -> Option<&[IncludeEdge]> {
        self.buckets.get(target).map(Vec::as_slice)
    }

    /// Drop every edge pointing at `target`, whichever file included it.
    pub fn remove_target(&mut self, target: &Path) -> Option<Vec<IncludeEdge>> {
        self.buckets.remove(target)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Path> {
        self.buckets.keys().map(PathBuf::as_path)
    }

    pub fn edges(&self) -> impl Iterator<Item = &IncludeEdge> {
        self.buckets.values().flatten()
    }

    pub fn target_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Flatten into one reference per target file.
    ///
    /// When several directives lead to the same target, the one recorded
    /// last wins. A file reached through a folder directive counts as
    /// recorded when that folder directive was.
    pub fn to_path_mapping(&self) -> PathMapping {
        self.buckets
            .iter()
            .filter_map(|(target, edges)| {
                let edge = edges.iter().max_by_key(|edge| edge.sequence)?;
                Some((
                    target.clone(),
                    IncludeReference {
                        path: edge.logical_path.clone().unwrap_or_default(),
                        include_type: edge.kind,
                    },
                ))
            })
            .collect()
    }
}

/// Where an included file is spliced into the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeReference {
    pub path: String,
    pub include_type: IncludeKind,
}

/// Absolute file path -> where and how it is included.
pub type PathMapping = BTreeMap<PathBuf, IncludeReference>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub file_path_mappings: PathMapping,
}
