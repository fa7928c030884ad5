//! File command handlers

use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use textstore_core::{FileInput, FileStore, Kv};

use crate::output::Output;

/// List all files
pub fn list<S: Kv>(store: &FileStore<S>, output: &Output) -> Result<()> {
    let records = store.list()?;
    output.print_records(&records);
    Ok(())
}

/// Create a new file
pub fn create<S: Kv>(
    store: &FileStore<S>,
    filename: Option<String>,
    title: Option<String>,
    content: Option<String>,
    use_stdin: bool,
    output: &Output,
) -> Result<()> {
    let content = resolve_content(content, use_stdin)?;

    let file = store.create(FileInput {
        filename,
        title,
        content,
    })?;

    output.success(&format!(
        "Created {} ({})",
        file.record.filename, file.record.id
    ));
    output.print_file(&file);
    Ok(())
}

/// Show a single file with its content
pub fn show<S: Kv>(store: &FileStore<S>, id: String, output: &Output) -> Result<()> {
    let uuid = parse_file_id(&id, store)?;
    let file = store.get(uuid)?;
    output.print_file(&file);
    Ok(())
}

/// Print the body of a file by its public filename (raw, no metadata)
pub fn cat<S: Kv>(store: &FileStore<S>, filename: String) -> Result<()> {
    let content = store.get_by_filename(&filename)?;
    print!("{}", content);
    io::stdout().flush()?;
    Ok(())
}

/// Update a file in place
pub fn update<S: Kv>(
    store: &FileStore<S>,
    id: String,
    filename: Option<String>,
    title: Option<String>,
    content: Option<String>,
    use_stdin: bool,
    output: &Output,
) -> Result<()> {
    let uuid = parse_file_id(&id, store)?;
    let content = resolve_content(content, use_stdin)?;

    let file = store.update(
        uuid,
        FileInput {
            filename,
            title,
            content,
        },
    )?;

    output.success(&format!("Updated {}", file.record.filename));
    output.print_file(&file);
    Ok(())
}

/// Delete a file
pub fn delete<S: Kv>(
    store: &FileStore<S>,
    id: String,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let uuid = parse_file_id(&id, store)?;

    if !yes && output.should_prompt() {
        let file = store.get(uuid)?;
        println!("Delete {} - {}", file.record.filename, file.record.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(uuid)?;
    output.success(&format!("Deleted {}", uuid));
    Ok(())
}

/// Read content from the flag or stdin
fn resolve_content(content: Option<String>, use_stdin: bool) -> Result<Option<String>> {
    if use_stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read content from stdin")?;
        return Ok(Some(buf));
    }
    Ok(content)
}

/// Parse a file ID (supports full UUID or prefix)
fn parse_file_id<S: Kv>(id: &str, store: &FileStore<S>) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    // Try prefix match
    let records = store.list()?;
    let matches: Vec<_> = records
        .iter()
        .filter(|r| r.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No file found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple files match '{}':", id);
            for record in &matches {
                eprintln!("  {} - {}", record.id, record.filename);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Prompt for confirmation
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
