//! Ordered directive configuration.
//!
//! The configuration file is an array of `[[directive]]` tables, each
//! holding exactly one key:
//!
//! ```toml
//! [[directive]]
//! tap = ["homebrew/cask-fonts"]
//!
//! [[directive]]
//! brewfile = ["Brewfile", ["extra/Brewfile.work", "extra/Brewfile.home"]]
//! ```
pub mod toml_loader;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// One directive and its items, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBlock {
    /// Directive name as written (not validated here).
    pub name: String,
    /// Items with nested lists flattened.
    pub items: Vec<String>,
}

/// Loaded configuration file.
#[derive(Debug)]
pub struct Config {
    /// File the configuration was read from.
    pub path: PathBuf,
    /// Directive blocks in file order.
    pub blocks: Vec<DirectiveBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    directive: Vec<BTreeMap<String, Vec<ConfigItem>>>,
}

/// A configured item: a single value or a nested list of values.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigItem {
    One(String),
    Many(Vec<String>),
}

impl Config {
    /// Load the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, is not valid
    /// TOML of the expected shape, or contains a `[[directive]]` table that
    /// does not hold exactly one key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml_loader::load_config(path)?;
        let blocks = raw
            .directive
            .into_iter()
            .enumerate()
            .map(|(i, table)| into_block(i + 1, table))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            blocks,
        })
    }
}

fn into_block(
    index: usize,
    table: BTreeMap<String, Vec<ConfigItem>>,
) -> Result<DirectiveBlock, ConfigError> {
    if table.len() != 1 {
        return Err(ConfigError::InvalidBlock {
            index,
            found: table.len(),
        });
    }
    let Some((name, items)) = table.into_iter().next() else {
        return Err(ConfigError::InvalidBlock { index, found: 0 });
    };

    let items = items
        .into_iter()
        .flat_map(|item| match item {
            ConfigItem::One(value) => vec![value],
            ConfigItem::Many(values) => values,
        })
        .collect();

    Ok(DirectiveBlock { name, items })
}
