use std::path::Path;

use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Entry points of the configuration, relative to the workspace root
    pub entry_files: Vec<String>,
    /// Logical path the entry files are mounted at
    pub base_path: String,
    /// Extensions kept when listing include folders; empty keeps every file
    pub include_extensions: Vec<String>,
    pub skip_hidden: bool,
    pub follow_links: bool,
}

impl Settings {
    pub fn new(root_dir: &Path) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/hassls/settings");
        let settings = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.hassls",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            )
            .set_default("entry_files", vec!["configuration.yaml"])?
            .set_default("base_path", "")?
            .set_default("include_extensions", vec!["yaml", "yml"])?
            .set_default("skip_hidden", true)?
            .set_default("follow_links", false)?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            entry_files: vec!["configuration.yaml".to_string()],
            base_path: "".to_string(),
            include_extensions: vec!["yaml".to_string(), "yml".to_string()],
            skip_hidden: true,
            follow_links: false,
        }
    }
}
