use std::fmt;

use serde::{Deserialize, Serialize};

/// The five include directives understood by Home Assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeKind {
    Include,
    IncludeDirList,
    IncludeDirNamed,
    IncludeDirMergeList,
    IncludeDirMergeNamed,
}

/// Tag names as they appear after the `!` in YAML source.
static TAG_NAMES: [(IncludeKind, &str); 5] = [
    (IncludeKind::Include, "include"),
    (IncludeKind::IncludeDirList, "include_dir_list"),
    (IncludeKind::IncludeDirNamed, "include_dir_named"),
    (IncludeKind::IncludeDirMergeList, "include_dir_merge_list"),
    (IncludeKind::IncludeDirMergeNamed, "include_dir_merge_named"),
];

impl IncludeKind {
    pub const ALL: [IncludeKind; 5] = [
        IncludeKind::Include,
        IncludeKind::IncludeDirList,
        IncludeKind::IncludeDirNamed,
        IncludeKind::IncludeDirMergeList,
        IncludeKind::IncludeDirMergeNamed,
    ];

    pub fn tag_name(self) -> &'static str {
        TAG_NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }

    pub fn from_tag_name(name: &str) -> Option<IncludeKind> {
        TAG_NAMES
            .iter()
            .find(|(_, tag)| *tag == name)
            .map(|(kind, _)| *kind)
    }

    /// Whether the directive names a folder rather than a single file.
    pub fn is_directory(self) -> bool {
        !matches!(self, IncludeKind::Include)
    }

    /// Whether each discovered file is merged into its parent instead of
    /// standing for a single item.
    pub fn is_merge(self) -> bool {
        matches!(
            self,
            IncludeKind::IncludeDirMergeList | IncludeKind::IncludeDirMergeNamed
        )
    }
}

/// A tag suffix that claims to be an include but may not be a known one.
pub fn looks_like_include(suffix: &str) -> bool {
    suffix.starts_with("include")
}

impl fmt::Display for IncludeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}
