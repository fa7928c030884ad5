//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use textstore_core::{FileRecord, FileWithContent, ImportSummary};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the file listing.
    ///
    /// Human output is sorted most-recently-updated first; JSON and quiet
    /// output keep storage order.
    pub fn print_records(&self, records: &[FileRecord]) {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("No files found.");
                    return;
                }
                let mut sorted: Vec<&FileRecord> = records.iter().collect();
                sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                for record in sorted {
                    println!(
                        "{} | {} | {} | {} | {}",
                        &record.id.to_string()[..8],
                        truncate(&record.filename, 30),
                        truncate(&record.title, 30),
                        format_size(record.size),
                        record.updated_at.format("%Y-%m-%d %H:%M")
                    );
                }
                println!("\n{} file(s)", records.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(records).unwrap());
            }
            OutputFormat::Quiet => {
                for record in records {
                    println!("{}", record.id);
                }
            }
        }
    }

    /// Print a single file with its content
    pub fn print_file(&self, file: &FileWithContent) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", file.record.id);
                println!("Filename: {}", file.record.filename);
                println!("Title:    {}", file.record.title);
                println!("Type:     {}", file.record.content_type);
                println!("Size:     {}", format_size(file.record.size));
                println!(
                    "Created:  {}",
                    file.record.created_at.format("%Y-%m-%d %H:%M")
                );
                println!(
                    "Updated:  {}",
                    file.record.updated_at.format("%Y-%m-%d %H:%M")
                );
                if !file.content.is_empty() {
                    println!();
                    println!("{}", file.content);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(file).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", file.record.id);
            }
        }
    }

    /// Print an import summary
    pub fn print_summary(&self, summary: &ImportSummary) {
        match self.format {
            OutputFormat::Human => {
                println!("Imported: {}", summary.imported);
                println!("Skipped:  {}", summary.skipped);
                println!("Failed:   {}", summary.failed);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(summary).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{} {} {}", summary.imported, summary.skipped, summary.failed);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Format a byte count for display
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
