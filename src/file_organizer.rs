//! File organization engine.
//!
//! This module moves the entries of a working directory into category or date
//! bucket subdirectories. It provides:
//! - The directory mover ([`move_into`]), which creates a bucket on demand and
//!   refuses bucket names that are taken by regular files
//! - Snapshot scanning of the working directory ([`scan_directory`])
//! - The [`Organizer`] context and the folder sort and date bucketing passes
//!
//! The video duration gate and the interactive rename pass live in
//! [`crate::video_triage`] and [`crate::rename`] and extend [`Organizer`].

use crate::file_category::{Category, ExtensionTable, FileEntry, date_bucket_label};
use indicatif::ProgressBar;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Nothing in the working directory qualifies for the operation.
    #[error("Nothing to do here, this folder {}.", describe_empty(.category.as_deref()))]
    EmptyDirectory { category: Option<String> },
    /// The video duration gate found no video files.
    #[error("Nothing to do here, this folder does not contain any video.")]
    EmptyVideoSet,
    /// A bucket name is taken by a regular file.
    #[error(
        "You have a file named '{name}' in {}, which is not a valid file name because this tool uses it as a directory name. Rename that file or change the folder names in the configuration.",
        .dir.display()
    )]
    NameConflict { name: String, dir: PathBuf },
    /// The working directory contains the tool's own installation files.
    #[error(
        "Found {} inside the working directory: this looks like the tool's own installation, so nothing was moved. Use 'sudo' to override.",
        .marker.display()
    )]
    GuardViolation { marker: PathBuf },
    /// A category label that the extension table does not declare.
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    /// A duration threshold that is not a positive number of seconds.
    #[error("Invalid time limit {0}: expected a positive number of seconds")]
    InvalidThreshold(f64),
    /// The working directory could not be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to create a bucket directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move or rename a single entry.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The destination already holds an entry with the same name.
    #[error("{} already exists, not overwriting it", .path.display())]
    DestinationExists { path: PathBuf },
    /// Reading the user's answer failed.
    #[error("Failed to read the new name: {0}")]
    Prompt(#[source] io::Error),
}

fn describe_empty(category: Option<&str>) -> String {
    match category {
        Some(category) => format!("does not contain any element of the type '{}'", category),
        None => "is empty".to_string(),
    }
}

impl OrganizeError {
    /// Returns true for "nothing to do" outcomes that are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::EmptyDirectory { .. } | Self::EmptyVideoSet)
    }

    /// Returns true for failures that only concern one entry.
    ///
    /// Passes record these as skipped and carry on with the next entry.
    pub fn is_per_entry(&self) -> bool {
        matches!(
            self,
            Self::FileMoveFailed { .. } | Self::DestinationExists { .. }
        )
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What [`move_into`] did with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The entry now lives at `to`.
    Moved { to: PathBuf },
    /// No destination was given, the entry stays where it is.
    Unmoved,
}

/// Moves `entry_name` from `dir` into the subdirectory `destination` of `dir`.
///
/// The destination directory is created (one level) when missing. A `None`
/// destination is a successful no-op.
///
/// # Errors
///
/// - `NameConflict` if `destination` exists and is not a directory. Callers
///   must abort their whole pass on this error.
/// - `DirectoryCreationFailed` if the destination cannot be created.
/// - `DestinationExists` if the destination already holds `entry_name`.
/// - `FileMoveFailed` if the rename itself fails, e.g. because the entry
///   vanished since the directory was listed.
///
/// # Examples
///
/// ```no_run
/// use videolog::file_organizer::{MoveOutcome, move_into};
/// use std::path::Path;
///
/// let outcome = move_into(Path::new("/footage/day1"), "take1.mp4", Some("Videos"));
/// match outcome {
///     Ok(MoveOutcome::Moved { to }) => println!("Moved to {}", to.display()),
///     Ok(MoveOutcome::Unmoved) => println!("Left in place"),
///     Err(e) => eprintln!("Organization failed: {}", e),
/// }
/// ```
pub fn move_into(
    dir: &Path,
    entry_name: &str,
    destination: Option<&str>,
) -> OrganizeResult<MoveOutcome> {
    let Some(destination) = destination else {
        return Ok(MoveOutcome::Unmoved);
    };

    let destination_dir = dir.join(destination);
    match fs::metadata(&destination_dir) {
        Ok(metadata) if !metadata.is_dir() => {
            return Err(OrganizeError::NameConflict {
                name: destination.to_string(),
                dir: dir.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(&destination_dir).map_err(|e| {
                OrganizeError::DirectoryCreationFailed {
                    path: destination_dir.clone(),
                    source: e,
                }
            })?;
            debug!(dir = %destination_dir.display(), "created bucket directory");
        }
        Err(e) => {
            return Err(OrganizeError::DirectoryCreationFailed {
                path: destination_dir,
                source: e,
            });
        }
    }

    let from = dir.join(entry_name);
    let to = destination_dir.join(entry_name);
    if fs::symlink_metadata(&to).is_ok() {
        return Err(OrganizeError::DestinationExists { path: to });
    }

    fs::rename(&from, &to).map_err(|e| OrganizeError::FileMoveFailed {
        from: from.clone(),
        to: to.clone(),
        source: e,
    })?;

    Ok(MoveOutcome::Moved { to })
}

/// Fails with `NameConflict` if any of `labels` names a regular file in `dir`.
///
/// Passes call this on their whole plan before moving anything, so a conflict
/// leaves the directory untouched.
pub fn ensure_bucket_names_free<'l>(
    dir: &Path,
    labels: impl IntoIterator<Item = &'l str>,
) -> OrganizeResult<()> {
    let labels: BTreeSet<&str> = labels.into_iter().collect();
    for label in labels {
        if let Ok(metadata) = fs::metadata(dir.join(label))
            && !metadata.is_dir()
        {
            return Err(OrganizeError::NameConflict {
                name: label.to_string(),
                dir: dir.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Lists the entries of `dir`, sorted by name.
///
/// Entries whose metadata cannot be read (for instance because they vanished
/// during the listing) are left out.
pub fn scan_directory(dir: &Path) -> OrganizeResult<Vec<FileEntry>> {
    let entries = fs::read_dir(dir).map_err(|e| OrganizeError::ReadDirFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        match FileEntry::from_path(&path) {
            Ok(file) => files.push(file),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable entry"),
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// The pass a [`SortReport`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Folder sort by category.
    ByType,
    /// Date bucketing.
    ByDate,
}

/// Outcome of a folder sort or date bucketing pass.
#[derive(Debug, Clone)]
pub struct SortReport {
    /// Which pass produced this report.
    pub kind: SortKind,
    /// Number of entries moved into a bucket.
    pub moved: usize,
    /// Number of entries deliberately left in place.
    pub unmoved: usize,
    /// Number of entries moved into each bucket.
    pub destinations: BTreeMap<String, usize>,
    /// Entries that could not be moved, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

impl SortReport {
    /// Creates an empty report.
    pub fn new(kind: SortKind) -> Self {
        Self {
            kind,
            moved: 0,
            unmoved: 0,
            destinations: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    fn record_move(&mut self, destination: &str) {
        self.moved += 1;
        *self
            .destinations
            .entry(destination.to_string())
            .or_insert(0) += 1;
    }

    fn record_skip(&mut self, path: PathBuf, reason: String) {
        self.skipped.push((path, reason));
    }

    /// One-line description of the pass.
    pub fn summary(&self) -> &'static str {
        match self.kind {
            SortKind::ByType => "Files sorted by type.",
            SortKind::ByDate => "Files sorted by date.",
        }
    }
}

/// Runs organization passes over one working directory.
///
/// The working directory and the extension table are passed in explicitly;
/// nothing here reads the process working directory.
pub struct Organizer<'a> {
    pub(crate) dir: &'a Path,
    pub(crate) table: &'a ExtensionTable,
    pub(crate) progress: ProgressBar,
}

impl<'a> Organizer<'a> {
    /// Creates an organizer for `dir` with a hidden progress bar.
    pub fn new(dir: &'a Path, table: &'a ExtensionTable) -> Self {
        Self {
            dir,
            table,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports one unit of progress per processed entry on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Resolves an optional category label against the table.
    pub(crate) fn category_filter(
        &self,
        category: Option<&str>,
    ) -> OrganizeResult<Option<&'a Category>> {
        let table = self.table;
        category
            .map(|label| {
                table
                    .get(label)
                    .ok_or_else(|| OrganizeError::UnknownCategory(label.to_string()))
            })
            .transpose()
    }

    /// Keeps the non-directory entries that belong to `filter` (all if `None`).
    pub(crate) fn files_matching(
        entries: Vec<FileEntry>,
        filter: Option<&Category>,
    ) -> Vec<FileEntry> {
        entries
            .into_iter()
            .filter(|entry| !entry.is_dir && filter.map_or(true, |c| c.contains(&entry.extension)))
            .collect()
    }

    /// Moves one entry and records the result, skipping per-entry failures.
    pub(crate) fn apply(
        &self,
        entry: &FileEntry,
        destination: Option<&str>,
        report: &mut SortReport,
    ) -> OrganizeResult<()> {
        match move_into(self.dir, &entry.name, destination) {
            Ok(MoveOutcome::Moved { to }) => {
                debug!(from = %entry.name, to = %to.display(), "moved");
                report.record_move(destination.unwrap_or_default());
                Ok(())
            }
            Ok(MoveOutcome::Unmoved) => {
                debug!(entry = %entry.name, "left in place");
                report.unmoved += 1;
                Ok(())
            }
            Err(e) if e.is_per_entry() => {
                warn!(entry = %entry.name, error = %e, "skipping entry");
                report.record_skip(entry.path.clone(), e.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Moves every planned entry, one progress unit each.
    fn run_plan<'p>(
        &self,
        mut plan: impl ExactSizeIterator<Item = (&'p FileEntry, Option<&'p str>)>,
        report: &mut SortReport,
    ) -> OrganizeResult<()> {
        self.progress.set_length(plan.len() as u64);
        self.progress.set_position(0);
        let result = plan.try_for_each(|(entry, destination)| -> OrganizeResult<()> {
            self.apply(entry, destination, report)?;
            self.progress.inc(1);
            Ok(())
        });
        self.progress.finish_and_clear();
        result
    }

    /// Sorts every entry of the working directory into its category directory.
    ///
    /// Files go to the first matching category or to `Other`; directories go
    /// to `Folders` unless their name is one of the tool's own bucket names.
    /// The listing is taken before anything moves, so buckets created by the
    /// pass are not visited again.
    ///
    /// # Errors
    ///
    /// - `EmptyDirectory` if the directory has no entries
    /// - `NameConflict` if a bucket name is taken by a regular file; this is
    ///   checked for the whole plan before the first move
    /// - `DirectoryCreationFailed` if a bucket cannot be created, leaving the
    ///   entries moved so far in place
    pub fn folder_sort(&self) -> OrganizeResult<SortReport> {
        let entries = scan_directory(self.dir)?;
        if entries.is_empty() {
            return Err(OrganizeError::EmptyDirectory { category: None });
        }

        let plan: Vec<(FileEntry, Option<&str>)> = entries
            .into_iter()
            .map(|entry| {
                let label = self.table.classify(&entry);
                (entry, label)
            })
            .collect();
        ensure_bucket_names_free(self.dir, plan.iter().filter_map(|(_, label)| *label))?;

        info!(dir = %self.dir.display(), entries = plan.len(), "sorting files by type");
        self.progress.set_message("Sorting files...");
        let mut report = SortReport::new(SortKind::ByType);
        self.run_plan(
            plan.iter().map(|(entry, label)| (entry, *label)),
            &mut report,
        )?;
        Ok(report)
    }

    /// Moves files into `YYMMDD-Ddd` buckets by their modification date.
    ///
    /// With a `category` only the files of that category are moved.
    /// Directories are never moved.
    ///
    /// # Errors
    ///
    /// - `UnknownCategory` if `category` is not in the table
    /// - `EmptyDirectory` if no file qualifies
    /// - `NameConflict` if a bucket name is taken by a regular file
    pub fn sort_by_date(&self, category: Option<&str>) -> OrganizeResult<SortReport> {
        let filter = self.category_filter(category)?;
        let files = Self::files_matching(scan_directory(self.dir)?, filter);
        if files.is_empty() {
            return Err(OrganizeError::EmptyDirectory {
                category: category.map(str::to_string),
            });
        }

        let mut report = SortReport::new(SortKind::ByDate);
        let mut plan = Vec::with_capacity(files.len());
        for entry in files {
            match entry.modified() {
                Ok(modified) => {
                    let label = date_bucket_label(modified);
                    plan.push((entry, label));
                }
                Err(e) => {
                    warn!(entry = %entry.name, error = %e, "cannot read modification time");
                    report.record_skip(entry.path.clone(), e.to_string());
                }
            }
        }
        ensure_bucket_names_free(self.dir, plan.iter().map(|(_, label)| label.as_str()))?;

        info!(dir = %self.dir.display(), files = plan.len(), "sorting files by date");
        self.progress.set_message("Sorting files by date...");
        self.run_plan(
            plan.iter().map(|(entry, label)| (entry, Some(label.as_str()))),
            &mut report,
        )?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::fs::File;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, name).expect("Failed to write test file");
        path
    }

    fn set_mtime(path: &Path, year: i32, month: u32, day: u32) {
        let time = Local.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        File::options()
            .write(true)
            .open(path)
            .and_then(|f| f.set_modified(SystemTime::from(time)))
            .expect("Failed to set modification time");
    }

    #[test]
    fn test_move_into_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        touch(base_path, "take.mp4");

        let outcome = move_into(base_path, "take.mp4", Some("Videos")).expect("Failed to move");

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                to: base_path.join("Videos").join("take.mp4")
            }
        );
        assert!(base_path.join("Videos").is_dir());
        assert!(!base_path.join("take.mp4").exists());
    }

    #[test]
    fn test_move_into_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Images")).unwrap();
        touch(base_path, "still.png");

        move_into(base_path, "still.png", Some("Images")).expect("Failed to move");

        assert!(base_path.join("Images").join("still.png").exists());
    }

    #[test]
    fn test_move_into_without_destination_is_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        touch(base_path, "keep.txt");

        let outcome = move_into(base_path, "keep.txt", None).unwrap();

        assert_eq!(outcome, MoveOutcome::Unmoved);
        assert!(base_path.join("keep.txt").exists());
    }

    #[test]
    fn test_move_into_name_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        touch(base_path, "Trash");
        touch(base_path, "short.mp4");

        let result = move_into(base_path, "short.mp4", Some("Trash"));

        assert!(matches!(result, Err(OrganizeError::NameConflict { ref name, .. }) if name == "Trash"));
        assert!(base_path.join("short.mp4").exists());
        assert_eq!(fs::read_to_string(base_path.join("Trash")).unwrap(), "Trash");
    }

    #[test]
    fn test_move_into_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Documents")).unwrap();
        fs::write(base_path.join("Documents").join("notes.txt"), "old").unwrap();
        fs::write(base_path.join("notes.txt"), "new").unwrap();

        let result = move_into(base_path, "notes.txt", Some("Documents"));

        assert!(matches!(result, Err(OrganizeError::DestinationExists { .. })));
        assert_eq!(
            fs::read_to_string(base_path.join("Documents").join("notes.txt")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_move_into_vanished_entry_is_per_entry_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let err = move_into(base_path, "gone.mp4", Some("Videos")).unwrap_err();

        assert!(err.is_per_entry());
        assert!(matches!(err, OrganizeError::FileMoveFailed { .. }));
    }

    #[test]
    fn test_scan_directory_is_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        touch(base_path, "b.mp4");
        touch(base_path, "a.png");
        fs::create_dir(base_path.join("c")).unwrap();

        let entries = scan_directory(base_path).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["a.png", "b.mp4", "c"]);
        assert!(entries[2].is_dir);
    }

    #[test]
    fn test_scan_directory_missing_dir() {
        let result = scan_directory(Path::new("/non/existent/path"));
        assert!(matches!(result, Err(OrganizeError::ReadDirFailed { .. })));
    }

    #[test]
    fn test_folder_sort_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = ExtensionTable::default();

        let result = Organizer::new(temp_dir.path(), &table).folder_sort();

        let err = result.unwrap_err();
        assert!(err.is_informational());
        assert_eq!(err.to_string(), "Nothing to do here, this folder is empty.");
    }

    #[test]
    fn test_folder_sort_moves_files_and_folders() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        touch(base_path, "take.mp4");
        touch(base_path, "still.jpg");
        touch(base_path, "notes.unknown");
        fs::create_dir(base_path.join("holidays")).unwrap();
        fs::create_dir(base_path.join("Videos")).unwrap();

        let report = Organizer::new(base_path, &table).folder_sort().unwrap();

        assert!(base_path.join("Videos/take.mp4").exists());
        assert!(base_path.join("Images/still.jpg").exists());
        assert!(base_path.join("Other/notes.unknown").exists());
        assert!(base_path.join("Folders/holidays").is_dir());
        assert!(base_path.join("Videos").is_dir());
        assert_eq!(report.moved, 4);
        assert_eq!(report.unmoved, 1);
        assert_eq!(report.destinations.get("Folders"), Some(&1));
        assert_eq!(report.summary(), "Files sorted by type.");
    }

    #[test]
    fn test_folder_sort_conflict_moves_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        fs::write(base_path.join("Images"), "precious").unwrap();
        touch(base_path, "a.jpg");
        touch(base_path, "b.mp4");

        let result = Organizer::new(base_path, &table).folder_sort();

        assert!(matches!(result, Err(OrganizeError::NameConflict { ref name, .. }) if name == "Images"));
        assert_eq!(fs::read_to_string(base_path.join("Images")).unwrap(), "precious");
        assert!(base_path.join("a.jpg").exists());
        assert!(base_path.join("b.mp4").exists());
        assert!(!base_path.join("Videos").exists());
    }

    #[test]
    fn test_folder_sort_skips_existing_destination_and_continues() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        fs::create_dir(base_path.join("Images")).unwrap();
        fs::write(base_path.join("Images/a.jpg"), "old").unwrap();
        touch(base_path, "a.jpg");
        touch(base_path, "b.mp4");

        let report = Organizer::new(base_path, &table).folder_sort().unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert!(base_path.join("a.jpg").exists());
        assert!(base_path.join("Videos/b.mp4").exists());
    }

    #[test]
    fn test_folder_sort_twice_is_stable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        touch(base_path, "take.mp4");
        touch(base_path, "song.mp3");

        let organizer = Organizer::new(base_path, &table);
        organizer.folder_sort().unwrap();
        let second = organizer.folder_sort().unwrap();

        assert_eq!(second.moved, 0);
        assert_eq!(second.unmoved, 2);
        assert!(base_path.join("Videos/take.mp4").exists());
        assert!(base_path.join("Audio/song.mp3").exists());
    }

    #[test]
    fn test_sort_by_date_buckets_by_mtime() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        let clip = touch(base_path, "clip.mp4");
        let doc = touch(base_path, "memo.txt");
        set_mtime(&clip, 2024, 1, 31);
        set_mtime(&doc, 2024, 2, 1);
        fs::create_dir(base_path.join("subdir")).unwrap();

        let report = Organizer::new(base_path, &table).sort_by_date(None).unwrap();

        assert!(base_path.join("240131-Wed/clip.mp4").exists());
        assert!(base_path.join("240201-Thu/memo.txt").exists());
        assert!(base_path.join("subdir").is_dir());
        assert_eq!(report.moved, 2);
        assert_eq!(report.summary(), "Files sorted by date.");
    }

    #[test]
    fn test_sort_by_date_with_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        let clip = touch(base_path, "clip.mp4");
        set_mtime(&clip, 2024, 1, 31);
        touch(base_path, "memo.txt");

        Organizer::new(base_path, &table)
            .sort_by_date(Some("Videos"))
            .unwrap();

        assert!(base_path.join("240131-Wed/clip.mp4").exists());
        assert!(base_path.join("memo.txt").exists());
    }

    #[test]
    fn test_sort_by_date_empty_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        touch(base_path, "memo.txt");

        let err = Organizer::new(base_path, &table)
            .sort_by_date(Some("Videos"))
            .unwrap_err();

        assert!(err.is_informational());
        assert!(err.to_string().contains("'Videos'"));
    }

    #[test]
    fn test_sort_by_date_only_directories_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = ExtensionTable::default();
        fs::create_dir(temp_dir.path().join("Videos")).unwrap();

        let result = Organizer::new(temp_dir.path(), &table).sort_by_date(None);

        assert!(matches!(result, Err(OrganizeError::EmptyDirectory { category: None })));
    }

    #[test]
    fn test_sort_by_date_unknown_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = ExtensionTable::default();
        touch(temp_dir.path(), "a.mp4");

        let result = Organizer::new(temp_dir.path(), &table).sort_by_date(Some("Vids"));

        assert!(matches!(result, Err(OrganizeError::UnknownCategory(ref c)) if c == "Vids"));
    }
}
