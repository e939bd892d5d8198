//! Command-line interface for inspecting how a configuration is split.
//!
//! - `hassls includes [ROOT]` prints every included file with its logical
//!   path and include type
//! - `hassls schemas [ROOT]` prints the schema picked for every included file

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use serde::Serialize;

use crate::config::Settings;
use crate::includes::{FsFileAccessor, NestedYamlParser, ParseResult};
use crate::schema;

#[derive(Parser, Debug)]
#[command(name = "hassls", version, about = "Include-aware tooling for Home Assistant YAML")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Map every included file to its logical path
    Includes(ParseArgs),
    /// Show the schema associated with every included file
    Schemas(ParseArgs),
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Configuration root
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Entry file, relative to the root (repeatable; defaults to the settings)
    #[arg(short, long = "entry")]
    pub entries: Vec<String>,

    /// Logical path the entry files are mounted at
    #[arg(long)]
    pub base_path: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print paths relative to the root
    #[arg(long)]
    pub relative: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "hassls=debug",
            _ => "hassls=trace",
        }
    }

    pub async fn execute(self) -> anyhow::Result<String> {
        match self.command {
            Command::Includes(args) => {
                let (result, _) = run_parser(&args).await?;
                let result = display_paths(result, &args);
                render(&args, &result, || {
                    result
                        .file_path_mappings
                        .iter()
                        .map(|(file, reference)| {
                            format!(
                                "{}\t{}\t{}",
                                file.display(),
                                reference.include_type,
                                reference.path
                            )
                        })
                        .join("\n")
                })
            }
            Command::Schemas(args) => {
                let (result, base_path) = run_parser(&args).await?;
                let result = display_paths(result, &args);
                let associations = schema::associate_all(&result.file_path_mappings, &base_path);
                render(&args, &associations, || {
                    associations
                        .iter()
                        .map(|(file, association)| {
                            format!(
                                "{}\t{}\t{:?}",
                                file.display(),
                                association.schema,
                                association.shape
                            )
                        })
                        .join("\n")
                })
            }
        }
    }
}

async fn run_parser(args: &ParseArgs) -> anyhow::Result<(ParseResult, String)> {
    let settings = Settings::new(&args.root)
        .with_context(|| format!("loading settings for {}", args.root.display()))?;

    let entries = if args.entries.is_empty() {
        settings.entry_files.clone()
    } else {
        args.entries.clone()
    };
    if entries.is_empty() {
        return Err(anyhow!("no entry files configured"));
    }
    let base_path = args
        .base_path
        .clone()
        .unwrap_or_else(|| settings.base_path.clone());

    let parser = NestedYamlParser::new(FsFileAccessor::new(&args.root, &settings));
    let result = parser
        .parse(&entries, &base_path)
        .await
        .with_context(|| format!("resolving includes below {}", parser.accessor().root().display()))?;

    Ok((result, base_path))
}

fn display_paths(result: ParseResult, args: &ParseArgs) -> ParseResult {
    if !args.relative {
        return result;
    }
    let root = crate::includes::normalize_path(
        &std::env::current_dir().unwrap_or_default(),
        &args.root.to_string_lossy(),
    );
    ParseResult {
        file_path_mappings: result
            .file_path_mappings
            .into_iter()
            .map(|(file, reference)| (relative_to(&file, &root), reference))
            .collect(),
    }
}

fn relative_to(file: &Path, root: &Path) -> PathBuf {
    pathdiff::diff_paths(file, root).unwrap_or_else(|| file.to_path_buf())
}

fn render<T: Serialize>(
    args: &ParseArgs,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<String> {
    Ok(match args.format {
        OutputFormat::Text => text(),
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_workspace_dir, write_workspace_files};

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("hassls").chain(args.iter().copied()))
    }

    #[test]
    fn test_verbosity_controls_filter() {
        assert_eq!(cli(&["includes"]).log_filter(), "warn");
        assert_eq!(cli(&["-vv", "includes"]).log_filter(), "hassls=trace");
    }

    #[tokio::test]
    async fn test_includes_as_json() {
        let (_temp_dir, root) = create_test_workspace_dir();
        write_workspace_files(
            &root,
            &[
                ("configuration.yaml", "script: !include scripts.yaml\n"),
                ("scripts.yaml", "{}"),
            ],
        );
        let root_arg = root.to_string_lossy().to_string();

        let output = cli(&["includes", &root_arg, "--format", "json", "--relative"])
            .execute()
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["filePathMappings"]["scripts.yaml"]["path"], "script");
        assert_eq!(
            json["filePathMappings"]["scripts.yaml"]["includeType"],
            "include"
        );
    }

    #[tokio::test]
    async fn test_schemas_as_text() {
        let (_temp_dir, root) = create_test_workspace_dir();
        write_workspace_files(
            &root,
            &[
                (
                    "configuration.yaml",
                    "automation: !include_dir_list automations\nscript: !include scripts.yaml\n",
                ),
                ("automations/lights.yaml", "alias: lights"),
                ("scripts.yaml", "{}"),
            ],
        );
        let root_arg = root.to_string_lossy().to_string();

        let output = cli(&["schemas", &root_arg, "--relative"])
            .execute()
            .await
            .unwrap();

        assert_eq!(
            output,
            "automations/lights.yaml\tautomations\tListItem\nscripts.yaml\tscripts\tWhole"
        );
    }

    #[tokio::test]
    async fn test_missing_entry_file_is_an_error() {
        let (_temp_dir, root) = create_test_workspace_dir();
        let root_arg = root.to_string_lossy().to_string();

        let result = cli(&["includes", &root_arg, "--entry", "missing.yaml"])
            .execute()
            .await;

        assert!(result.is_err());
    }
}
