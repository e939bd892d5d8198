//! hassls: include-aware YAML intelligence for Home Assistant
//!
//! This crate provides the core functionality behind editor support for
//! Home Assistant configurations: working out which file of a split
//! configuration ends up where, so each file can be validated against the
//! right schema.
//!
//! # Overview
//!
//! Home Assistant configurations are split across files with custom YAML
//! tags (`!include`, `!include_dir_list`, `!include_dir_named`,
//! `!include_dir_merge_list`, `!include_dir_merge_named`). This crate:
//!
//! - **Discovers includes**: parses entry files and records every directive
//! - **Tracks logical paths**: where in the configuration tree each
//!   included file is spliced
//! - **Expands folders**: turns folder directives into per-file entries
//! - **Associates schemas**: picks the schema and file shape for each
//!   included file
//!
//! # Architecture
//!
//! - [`includes`]: include discovery ([`includes::NestedYamlParser`])
//! - [`schema`]: schema association for included files
//! - [`config`]: configuration management and settings
//! - [`cli`]: the `hassls` command-line interface
//! - [`error`]: error taxonomy for include resolution
//!
//! # Usage
//!
//! ```ignore
//! use hassls::config::Settings;
//! use hassls::includes::{FsFileAccessor, NestedYamlParser};
//!
//! let settings = Settings::new(&root)?;
//! let parser = NestedYamlParser::new(FsFileAccessor::new(&root, &settings));
//! let result = parser.parse(&settings.entry_files, &settings.base_path).await?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod includes;
pub mod schema;

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;
