use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::data_dir::{self, DATA_DIR};
use crate::repo::memory::example_lists;

pub fn cmd_init(args: InitArgs, root: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = root.parent()
        && let Ok(parent_dir) = data_dir::discover_data_dir(parent)
        && !json
    {
        eprintln!("Note: lists already exist at {}/", parent_dir.display());
        eprintln!("Creating a separate {}/ here", DATA_DIR);
    }

    let seed = if args.examples {
        example_lists()
    } else {
        Vec::new()
    };
    let created = data_dir::init_data_dir(root, args.force, &seed)?;

    if json {
        let out = serde_json::json!({
            "path": created.display().to_string(),
            "lists": seed.len(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Initialized {}/", created.display());
        for list in &seed {
            println!("  {} ({} items)", list.name, list.items.len());
        }
    }
    Ok(())
}
