//! Output formatting and styling module.
//!
//! Provides a centralized interface for the shell's output: colored messages,
//! the progress bar handed to the engine, and the tables that describe what a
//! pass did.

use crate::file_category::FileEntry;
use crate::file_organizer::SortReport;
use crate::video_triage::TrashReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

/// Manages all shell output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars and summary tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use videolog::output::OutputFormatter;
    /// OutputFormatter::success("Files sorted by type.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a prompt without a trailing newline.
    pub fn prompt(prompt: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt.bold())?;
        stdout.flush()
    }

    /// Creates a progress bar for a pass; the engine sets its length.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use videolog::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Prints the entries of the working directory, directories first.
    pub fn listing(entries: &[FileEntry]) {
        if entries.is_empty() {
            Self::info("(empty)");
            return;
        }
        for entry in entries.iter().filter(|e| e.is_dir) {
            println!("{}/", entry.name.blue().bold());
        }
        for entry in entries.iter().filter(|e| !e.is_dir) {
            println!("{}", entry.name);
        }
    }

    /// Prints how many entries each bucket received.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use videolog::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Videos".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(bucket_counts: &BTreeMap<String, usize>, total_moved: usize) {
        Self::header("SUMMARY");

        let width = bucket_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // "Folder"

        println!("{:<width$} | {}", "Folder".bold(), "Moved".bold(), width = width);
        println!("{}", "-".repeat(width + 10));
        for (bucket, count) in bucket_counts {
            println!(
                "{:<width$} | {} {}",
                bucket,
                count.to_string().green(),
                entries_word(*count),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_moved.to_string().green().bold(),
            entries_word(total_moved),
            width = width
        );
    }

    /// Prints the outcome of a folder sort or date bucketing pass.
    pub fn sort_report(report: &SortReport) {
        if report.moved > 0 {
            Self::summary_table(&report.destinations, report.moved);
        }
        if report.unmoved > 0 {
            Self::info(&format!("{} left in place.", describe(report.unmoved)));
        }
        Self::skipped(&report.skipped);
        Self::success(report.summary());
    }

    /// Prints every probed video with its duration, then the summary.
    pub fn trash_report(report: &TrashReport) {
        if !report.videos.is_empty() {
            let width = report
                .videos
                .iter()
                .map(|v| v.name.len())
                .max()
                .unwrap_or(0)
                .max(5); // "Video"

            Self::header("VIDEOS");
            println!("{:<width$} | {:>10} | {}", "Video".bold(), "Duration".bold(), "", width = width);
            println!("{}", "-".repeat(width + 24));
            for video in &report.videos {
                let status = if video.trashed {
                    "trashed".red()
                } else {
                    "kept".green()
                };
                println!(
                    "{:<width$} | {:>9.2}s | {}",
                    video.name,
                    video.duration,
                    status,
                    width = width
                );
            }
        }
        for (path, reason) in &report.unreadable {
            Self::warning(&format!("Kept {}: {}", path.display(), reason));
        }
        Self::skipped(&report.skipped);
        Self::success(&report.summary());
    }

    /// Warns about every entry a pass had to skip.
    pub fn skipped(skipped: &[(PathBuf, String)]) {
        for (path, reason) in skipped {
            Self::warning(&format!("Skipped {}: {}", path.display(), reason));
        }
    }
}

fn entries_word(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}

fn describe(count: usize) -> String {
    format!("{} {}", count, entries_word(count))
}
