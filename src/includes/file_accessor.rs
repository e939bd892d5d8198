//! Filesystem access for include resolution.
//!
//! The resolver only ever talks to the [`FileAccessor`] trait, so the parser
//! can run against the real workspace ([`FsFileAccessor`]) or an in-memory
//! fixture in tests.

use std::io;
use std::path::{Component, Path, PathBuf};

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use crate::config::Settings;
use crate::error::{IncludeError, Result};

/// Normalization, reads and folder listings needed by the include parser.
#[allow(async_fn_in_trait)]
pub trait FileAccessor {
    /// Turn a possibly relative, possibly `file://` input into an absolute,
    /// lexically normalized path. Applying it twice changes nothing.
    fn unified_path(&self, input: &str) -> PathBuf;

    /// Resolve a directive target relative to the directory of the file
    /// that contains it.
    fn resolve_target(&self, source_file: &Path, raw_target: &str) -> PathBuf {
        let raw_target = raw_target.trim();
        if has_scheme(raw_target) || Path::new(raw_target).is_absolute() {
            return self.unified_path(raw_target);
        }

        let source_file = self.unified_path(&source_file.to_string_lossy());
        let joined = match source_file.parent() {
            Some(dir) => dir.join(raw_target),
            None => PathBuf::from(raw_target),
        };
        self.unified_path(&joined.to_string_lossy())
    }

    async fn read_file(&self, path: &Path) -> Result<String>;

    /// All files below `folder`, recursively, sorted by path.
    async fn list_files(&self, folder: &Path) -> Result<Vec<PathBuf>>;
}

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]+://").expect("scheme regex"));

fn has_scheme(input: &str) -> bool {
    SCHEME_RE.is_match(input)
}

/// Strip a `file://` scheme, anchor at `root` and fold `.`/`..` segments.
pub fn normalize_path(root: &Path, input: &str) -> PathBuf {
    let decoded = match input.strip_prefix("file://") {
        Some(rest) => urlencoding::decode(rest)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| rest.to_string()),
        None => input.to_string(),
    };

    let path = Path::new(&decoded);
    let anchored = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in anchored.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    normalized.components().next_back(),
                    Some(Component::RootDir) | Some(Component::Prefix(_)) | None
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// [`FileAccessor`] backed by the local filesystem, rooted at a workspace.
#[derive(Debug, Clone)]
pub struct FsFileAccessor {
    root: PathBuf,
    include_extensions: Vec<String>,
    skip_hidden: bool,
    follow_links: bool,
}

impl FsFileAccessor {
    pub fn new(root: &Path, settings: &Settings) -> FsFileAccessor {
        let root = normalize_path(
            &std::env::current_dir().unwrap_or_default(),
            &root.to_string_lossy(),
        );
        FsFileAccessor {
            root,
            include_extensions: settings.include_extensions.clone(),
            skip_hidden: settings.skip_hidden,
            follow_links: settings.follow_links,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn keeps(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }
        if self.include_extensions.is_empty() {
            return true;
        }
        entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.include_extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

impl FileAccessor for FsFileAccessor {
    fn unified_path(&self, input: &str) -> PathBuf {
        normalize_path(&self.root, input)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| IncludeError::FileRead {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn list_files(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let folder_list_error = |source: io::Error| IncludeError::FolderList {
            path: folder.to_path_buf(),
            source,
        };

        let metadata = tokio::fs::metadata(folder).await.map_err(folder_list_error)?;
        if !metadata.is_dir() {
            return Err(folder_list_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        let accessor = self.clone();
        let root = folder.to_path_buf();
        let listed = tokio::task::spawn_blocking(move || -> io::Result<Vec<PathBuf>> {
            let skip_hidden = accessor.skip_hidden;
            let entries: Vec<DirEntry> = WalkDir::new(&root)
                .follow_links(accessor.follow_links)
                .into_iter()
                .filter_entry(|e| !(skip_hidden && is_hidden(e)))
                .collect::<std::result::Result<_, walkdir::Error>>()?;

            Ok(entries
                .into_iter()
                .filter(|e| accessor.keeps(e))
                .map(DirEntry::into_path)
                .sorted()
                .collect())
        })
        .await
        .map_err(|join_err| folder_list_error(io::Error::other(join_err)))?;

        listed.map_err(folder_list_error)
    }
}
