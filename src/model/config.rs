use serde::{Deserialize, Serialize};

use super::list::DEFAULT_LIST_NAME;

/// Contents of `lysta/lysta.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// The ordered list index
    #[serde(default)]
    pub lists: Vec<ListEntry>,
}

/// Settings applied to newly created lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_list_name")]
    pub list_name: String,
    #[serde(default)]
    pub sorted: bool,
    #[serde(default = "default_true")]
    pub show_checked: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            list_name: default_list_name(),
            sorted: false,
            show_checked: true,
        }
    }
}

/// One `[[lists]]` entry of the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sorted: bool,
    #[serde(default = "default_true")]
    pub show_checked: bool,
    /// Path of the list file, relative to the `lysta/` directory
    pub file: String,
}

fn default_true() -> bool {
    true
}

fn default_list_name() -> String {
    DEFAULT_LIST_NAME.to_string()
}
