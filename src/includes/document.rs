//! YAML document trees with include directives replaced by markers.
//!
//! Documents are built from the `yaml-rust2` event stream rather than its
//! `Yaml` loader, which gives access to tags and source positions.

use std::path::Path;

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use super::kind::{looks_like_include, IncludeKind};
use super::tags::{TagDefinition, TagOccurrence};
use super::types::{ByteRange, EdgeId, IncludeTable};
use crate::error::{IncludeError, Result};

/// Placeholder left where an include directive appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeMarker {
    pub id: EdgeId,
    pub kind: IncludeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlNode {
    Scalar(String),
    Sequence(Vec<YamlNode>),
    /// Entries in source order.
    Mapping(Vec<(YamlNode, YamlNode)>),
    Include(IncludeMarker),
}

impl YamlNode {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            YamlNode::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_include(&self) -> Option<&IncludeMarker> {
        match self {
            YamlNode::Include(marker) => Some(marker),
            _ => None,
        }
    }

    /// Value stored under `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        match self {
            YamlNode::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.as_scalar() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Parse `text` (the contents of `path`), resolving include tags through
/// `tags` as they are encountered.
///
/// Parsing stops at the first failing tag; edges recorded before it stay in
/// `table`. Empty documents yield an empty scalar. A stream of several
/// documents yields a sequence of them, so each document's keys hang off the
/// same logical path.
pub fn parse_document(
    text: &str,
    path: &Path,
    tags: &[TagDefinition<'_>],
    table: &mut IncludeTable,
) -> Result<YamlNode> {
    let mut parser = Parser::new_from_str(text);
    let mut builder = DocumentBuilder::new(text, path, tags, table);

    parser
        .load(&mut builder, true)
        .map_err(|err| IncludeError::YamlSyntax {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    builder.finish()
}

enum Frame {
    Sequence(Vec<YamlNode>),
    Mapping {
        entries: Vec<(YamlNode, YamlNode)>,
        key: Option<YamlNode>,
    },
}

struct DocumentBuilder<'b, 't> {
    text: &'b str,
    path: &'b Path,
    tags: &'b [TagDefinition<'t>],
    table: &'b mut IncludeTable,
    /// Byte offset of every char; `None` when the text is ASCII.
    char_offsets: Option<Vec<usize>>,
    stack: Vec<Frame>,
    root: Option<YamlNode>,
    documents: Vec<YamlNode>,
    error: Option<IncludeError>,
}

impl<'b, 't> DocumentBuilder<'b, 't> {
    fn new(
        text: &'b str,
        path: &'b Path,
        tags: &'b [TagDefinition<'t>],
        table: &'b mut IncludeTable,
    ) -> Self {
        let char_offsets = (!text.is_ascii()).then(|| {
            text.char_indices()
                .map(|(offset, _)| offset)
                .chain(std::iter::once(text.len()))
                .collect()
        });

        DocumentBuilder {
            text,
            path,
            tags,
            table,
            char_offsets,
            stack: Vec::new(),
            root: None,
            documents: Vec::new(),
            error: None,
        }
    }

    fn finish(self) -> Result<YamlNode> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut documents = self.documents;
        documents.extend(self.root);
        Ok(match documents.len() {
            0 => YamlNode::Scalar(String::new()),
            1 => documents.swap_remove(0),
            _ => YamlNode::Sequence(documents),
        })
    }

    /// Markers count chars; ranges are reported in bytes.
    fn byte_offset(&self, marker: &Marker) -> usize {
        let index = marker.index();
        match &self.char_offsets {
            Some(offsets) => offsets.get(index).copied().unwrap_or(self.text.len()),
            None => index.min(self.text.len()),
        }
    }

    fn push_complete(&mut self, node: YamlNode) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence(items)) => items.push(node),
            Some(Frame::Mapping { entries, key }) => match key.take() {
                Some(k) => entries.push((k, node)),
                None => *key = Some(node),
            },
        }
    }

    fn scalar(
        &mut self,
        value: String,
        style: TScalarStyle,
        tag: Option<(&str, &str)>,
        marker: &Marker,
    ) -> Result<YamlNode> {
        let suffix = match tag {
            Some(("!", suffix)) => suffix,
            _ => return Ok(YamlNode::Scalar(value)),
        };

        let start = self.byte_offset(marker);
        let range = directive_range(self.text, start, suffix, style, &value);

        let tags = self.tags;
        match tags.iter().find(|def| def.name() == suffix) {
            Some(def) => def.resolve(
                self.table,
                TagOccurrence {
                    raw_target: &value,
                    range,
                },
            ),
            None if looks_like_include(suffix) => Err(self.unknown_tag(suffix, range)),
            // !secret, !env_var, !input and friends are plain values here
            None => Ok(YamlNode::Scalar(value)),
        }
    }

    /// Include tags only ever take a path; on a sequence or mapping they are
    /// rejected instead of silently dropped.
    fn collection_tag(
        &self,
        tag: Option<(&str, &str)>,
        node: &'static str,
        marker: &Marker,
    ) -> Result<()> {
        let suffix = match tag {
            Some(("!", suffix)) if looks_like_include(suffix) => suffix,
            _ => return Ok(()),
        };

        let at = self.byte_offset(marker);
        let range = ByteRange::new(tag_start(self.text, at, suffix), at);
        match IncludeKind::from_tag_name(suffix) {
            Some(_) => Err(IncludeError::NonScalarIncludeTarget {
                tag: suffix.to_string(),
                node,
                source_file: self.path.to_path_buf(),
                range,
            }),
            None => Err(self.unknown_tag(suffix, range)),
        }
    }

    fn unknown_tag(&self, suffix: &str, range: ByteRange) -> IncludeError {
        tracing::warn!(
            file = %self.path.display(),
            tag = suffix,
            %range,
            "unknown include tag"
        );
        IncludeError::UnknownIncludeTag {
            tag: suffix.to_string(),
            source_file: self.path.to_path_buf(),
            range,
        }
    }

    fn open(&mut self, frame: Frame, result: Result<()>) {
        match result {
            Ok(()) => self.stack.push(frame),
            Err(err) => self.error = Some(err),
        }
    }
}

impl MarkedEventReceiver for DocumentBuilder<'_, '_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing | Event::StreamStart | Event::StreamEnd | Event::DocumentStart => {}

            Event::DocumentEnd => self.documents.extend(self.root.take()),

            Event::Scalar(value, style, _anchor_id, tag) => {
                let tag = tag
                    .as_ref()
                    .map(|t| (t.handle.as_str(), t.suffix.as_str()));
                match self.scalar(value, style, tag, &marker) {
                    Ok(node) => self.push_complete(node),
                    Err(err) => self.error = Some(err),
                }
            }

            Event::SequenceStart(_anchor_id, tag) => {
                let tag = tag
                    .as_ref()
                    .map(|t| (t.handle.as_str(), t.suffix.as_str()));
                let checked = self.collection_tag(tag, "sequence", &marker);
                self.open(Frame::Sequence(Vec::new()), checked);
            }

            Event::MappingStart(_anchor_id, tag) => {
                let tag = tag
                    .as_ref()
                    .map(|t| (t.handle.as_str(), t.suffix.as_str()));
                let checked = self.collection_tag(tag, "mapping", &marker);
                self.open(
                    Frame::Mapping {
                        entries: Vec::new(),
                        key: None,
                    },
                    checked,
                );
            }

            Event::SequenceEnd | Event::MappingEnd => {
                let node = match self.stack.pop() {
                    Some(Frame::Sequence(items)) => YamlNode::Sequence(items),
                    Some(Frame::Mapping { entries, .. }) => YamlNode::Mapping(entries),
                    None => return,
                };
                self.push_complete(node);
            }

            // Aliases are not followed
            Event::Alias(_anchor_id) => self.push_complete(YamlNode::Scalar(String::new())),
        }
    }
}

/// Offset of `!suffix` when only whitespace and anchors separate it from
/// the node at `node_start`; otherwise `node_start` itself.
fn tag_start(text: &str, node_start: usize, suffix: &str) -> usize {
    let tag_text = format!("!{suffix}");
    text[..node_start]
        .rfind(&tag_text)
        .filter(|&at| {
            text[at + tag_text.len()..node_start]
                .split_whitespace()
                .all(|token| token.starts_with('&'))
        })
        .unwrap_or(node_start)
}

/// Byte range covering `!tag value`, starting at the tag when it can be
/// found right before the scalar.
fn directive_range(
    text: &str,
    scalar_start: usize,
    suffix: &str,
    style: TScalarStyle,
    value: &str,
) -> ByteRange {
    let start = tag_start(text, scalar_start, suffix);

    let end = match style {
        TScalarStyle::SingleQuoted => closing_quote(text, scalar_start, '\''),
        TScalarStyle::DoubleQuoted => closing_quote(text, scalar_start, '"'),
        _ => None,
    }
    .unwrap_or(scalar_start + value.len())
    .min(text.len());

    ByteRange::new(start, end)
}

/// Offset just past the quote closing the scalar that opens at `open`.
fn closing_quote(text: &str, open: usize, quote: char) -> Option<usize> {
    let body = text.get(open + 1..)?;
    let mut chars = body.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        match c {
            '\\' if quote == '"' => {
                chars.next();
            }
            '\'' if quote == '\'' && chars.peek().is_some_and(|(_, next)| *next == '\'') => {
                chars.next();
            }
            c if c == quote => return Some(open + 1 + at + c.len_utf8()),
            _ => {}
        }
    }
    None
}
