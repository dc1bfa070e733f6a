// Output formatting and display for CLI

use colored::*;
use std::path::Path;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// One row of the service listing
#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    identifier: String,
    #[tabled(rename = "Log File")]
    path: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Print the registered services and the state of their log files
pub fn print_service_table<'a, I>(entries: I)
where
    I: IntoIterator<Item = (&'a str, &'a Path)>,
{
    let rows: Vec<ServiceRow> = entries
        .into_iter()
        .map(|(identifier, path)| ServiceRow {
            identifier: identifier.cyan().to_string(),
            path: path.display().to_string(),
            size: match std::fs::metadata(path) {
                Ok(meta) if meta.is_file() => format_bytes(meta.len()),
                _ => "-".dimmed().to_string(),
            },
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "No log services are configured".yellow());
        return;
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("{}", table);
}

/// Print tailed log text as-is
pub fn print_tail(text: &str) {
    if text.is_empty() {
        println!("{}", "No logs available".yellow());
        return;
    }

    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
}

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a byte count for display
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
