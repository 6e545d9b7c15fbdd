use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io::CONFIG_FILE;
use crate::io::recovery::atomic_write;
use crate::model::{DefaultsConfig, List};
use crate::repo::{FileRepository, RepoError, Repository};

/// Name of the data directory created by `lysta init`
pub const DATA_DIR: &str = "lysta";

/// Error type for locating or creating the data directory
#[derive(Debug, thiserror::Error)]
pub enum DataDirError {
    #[error("not a lysta directory: no lysta/ found (run `lysta init`)")]
    NotFound,
    #[error("{0} already exists (use --force to reinitialize)")]
    AlreadyExists(PathBuf),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Walk up from `start` looking for a `lysta/` directory holding a
/// `lysta.toml`. Returns the path of the `lysta/` directory.
pub fn discover_data_dir(start: &Path) -> Result<PathBuf, DataDirError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join(CONFIG_FILE).exists() {
            return Ok(data_dir);
        }
        if !current.pop() {
            return Err(DataDirError::NotFound);
        }
    }
}

/// Render a fresh `lysta.toml` with the given defaults and no lists.
fn initial_config(defaults: &DefaultsConfig) -> String {
    format!(
        "[defaults]\nlist_name = {}\nsorted = {}\nshow_checked = {}\n",
        toml_edit::Value::from(defaults.list_name.as_str()),
        defaults.sorted,
        defaults.show_checked,
    )
}

/// Create `<root>/lysta/` with an empty index, then add `seed` lists.
///
/// With `force`, an existing index is replaced; existing list files are left
/// on disk but no longer referenced.
pub fn init_data_dir(root: &Path, force: bool, seed: &[List]) -> Result<PathBuf, DataDirError> {
    let data_dir = root.join(DATA_DIR);
    let config_path = data_dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(DataDirError::AlreadyExists(data_dir));
    }

    fs::create_dir_all(data_dir.join("lists"))?;
    atomic_write(&config_path, initial_config(&DefaultsConfig::default()).as_bytes())?;
    tracing::info!(path = %data_dir.display(), "initialized data directory");

    let repo = FileRepository::open(&data_dir)?;
    for list in seed {
        repo.add_list(list)?;
    }
    Ok(data_dir)
}
