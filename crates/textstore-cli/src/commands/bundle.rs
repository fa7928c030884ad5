//! Export/import command handlers

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use textstore_core::{FileStore, Kv};

use crate::output::Output;

/// Export the whole store as a bundle, to a file or stdout
pub fn export<S: Kv>(
    store: &FileStore<S>,
    target: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let bundle = store.export()?;
    let json = serde_json::to_string_pretty(&bundle).context("Failed to serialize bundle")?;

    match target {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("Failed to write bundle to {:?}", path))?;
            output.success(&format!(
                "Exported {} file(s) to {}",
                bundle.files.len(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Merge a bundle file into the store
pub fn import<S: Kv>(store: &FileStore<S>, path: PathBuf, output: &Output) -> Result<()> {
    let json =
        fs::read_to_string(&path).with_context(|| format!("Failed to read bundle {:?}", path))?;

    let summary = store.import_json(&json)?;
    output.print_summary(&summary);
    Ok(())
}
