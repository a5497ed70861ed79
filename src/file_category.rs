//! File categorization by extension.
//!
//! This module maps file names to category labels using an ordered extension
//! table. The table is declared in configuration, validated once, and then only
//! ever read: the first category whose extension list contains a file's
//! extension wins.
//!
//! # Examples
//!
//! ```
//! use videolog::file_category::{ExtensionTable, FileEntry};
//! use std::path::PathBuf;
//!
//! let table = ExtensionTable::default();
//! let clip = FileEntry::new(PathBuf::from("rushes/take1.mp4"), false);
//! assert_eq!(table.classify(&clip), Some("Videos"));
//!
//! let unknown = FileEntry::new(PathBuf::from("rushes/notes.xyz"), false);
//! assert_eq!(table.classify(&unknown), Some("Other"));
//! ```

use crate::config::ConfigError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Label for files that match no category.
pub const FALLBACK_LABEL: &str = "Other";

/// Label of the directory that collects non-category subfolders.
pub const FOLDERS_LABEL: &str = "Folders";

/// Label of the category scanned by the video duration gate.
pub const VIDEOS_LABEL: &str = "Videos";

/// `strftime` layout of date buckets, e.g. `240131-Wed`.
pub const DATE_BUCKET_FORMAT: &str = "%y%m%d-%a";

/// A named group of file extensions.
///
/// Extensions keep their leading dot and are compared case-sensitively,
/// so `.MOV` and `.mov` are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The label, which is also the name of the category directory.
    pub name: String,
    /// Extensions belonging to this category, e.g. `".mp4"`.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Category {
    /// Creates a category from a label and a list of extensions.
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Returns true if `extension` (with its dot) belongs to this category.
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }
}

/// Ordered, validated mapping from category labels to extensions.
///
/// Declaration order is the tie-break priority. Labels are unique and every
/// extension appears in at most one category. The fallback category
/// ([`FALLBACK_LABEL`]) is always present.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    categories: Vec<Category>,
}

impl ExtensionTable {
    /// Validates `categories` and builds a table from them.
    ///
    /// The fallback category is appended when the input does not declare it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategory` for an empty label or an
    /// extension without a leading dot, `ConfigError::DuplicateCategory` for a
    /// repeated label and `ConfigError::DuplicateExtension` when two
    /// categories claim the same extension.
    pub fn new(mut categories: Vec<Category>) -> Result<Self, ConfigError> {
        let mut labels = HashSet::new();
        let mut extensions = HashSet::new();

        for category in &categories {
            if category.name.trim().is_empty() {
                return Err(ConfigError::InvalidCategory {
                    category: category.name.clone(),
                    reason: "category labels cannot be empty".to_string(),
                });
            }
            if !labels.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            for ext in &category.extensions {
                if !ext.starts_with('.') {
                    return Err(ConfigError::InvalidCategory {
                        category: category.name.clone(),
                        reason: format!("extension '{}' must start with a dot", ext),
                    });
                }
                if !extensions.insert(ext.as_str()) {
                    return Err(ConfigError::DuplicateExtension {
                        extension: ext.clone(),
                        category: category.name.clone(),
                    });
                }
            }
        }

        if !categories.iter().any(|c| c.name == FALLBACK_LABEL) {
            categories.push(Category::new(FALLBACK_LABEL, &[]));
        }

        Ok(Self { categories })
    }

    /// Returns the categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by its exact label.
    pub fn get(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == label)
    }

    /// Returns the label of the first category containing `extension`.
    pub fn category_for_extension(&self, extension: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.contains(extension))
            .map(|c| c.name.as_str())
    }

    /// Returns true if `name` is one of the directory names the tool manages.
    ///
    /// Such directories are never moved by a folder sort.
    pub fn is_reserved(&self, name: &str) -> bool {
        name == FOLDERS_LABEL || name == FALLBACK_LABEL || self.get(name).is_some()
    }

    /// Determines the destination directory label for an entry.
    ///
    /// Directories go to [`FOLDERS_LABEL`] unless their name is reserved, in
    /// which case `None` is returned and the directory stays where it is.
    /// Files always get a label: the first matching category, or
    /// [`FALLBACK_LABEL`].
    ///
    /// # Examples
    ///
    /// ```
    /// use videolog::file_category::{ExtensionTable, FileEntry};
    /// use std::path::PathBuf;
    ///
    /// let table = ExtensionTable::default();
    /// let own_dir = FileEntry::new(PathBuf::from("Videos"), true);
    /// let other_dir = FileEntry::new(PathBuf::from("holidays"), true);
    /// assert_eq!(table.classify(&own_dir), None);
    /// assert_eq!(table.classify(&other_dir), Some("Folders"));
    /// ```
    pub fn classify(&self, entry: &FileEntry) -> Option<&str> {
        if entry.is_dir {
            if self.is_reserved(&entry.name) {
                None
            } else {
                Some(FOLDERS_LABEL)
            }
        } else {
            Some(
                self.category_for_extension(&entry.extension)
                    .unwrap_or(FALLBACK_LABEL),
            )
        }
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

/// The built-in extension table.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Audio",
            &[
                ".wav", ".mp3", ".raw", ".wma", ".aif", ".cda", ".mid", ".midi", ".mpa", ".ogg",
                ".wpl",
            ],
        ),
        Category::new(
            VIDEOS_LABEL,
            &[
                ".mp4", ".m4a", ".m4v", ".f4v", ".f4a", ".f4b", ".m4b", ".m4r", ".avi", ".wmv",
                ".flv", ".mkv", ".mov", ".MOV",
            ],
        ),
        Category::new(
            "Images",
            &[
                ".ai", ".bmp", ".gif", ".ico", ".jpeg", ".jpg", ".png", ".ps", ".svg", ".tif",
                ".tiff",
            ],
        ),
        Category::new(
            "Documents",
            &[
                ".txt", ".pdf", ".doc", ".docx", ".odt", ".html", ".md", ".rtf", ".xlsx", ".pptx",
                ".tex", ".key", ".odp", ".pps", ".ppt", ".ods",
            ],
        ),
        Category::new(FOLDERS_LABEL, &[".rar", ".zip", ".7z", ".pkg", ".z"]),
        Category::new("Python", &[".py", ".pyc"]),
        Category::new("Internet", &[".css", ".htm", ".js", ".php", ".xhtml"]),
        Category::new(
            "Data",
            &[
                ".csv", ".dat", ".db", ".dbf", ".log", ".mdb", ".sav", ".sql", ".tar", ".xml",
            ],
        ),
        Category::new("Fonts", &[".fnt", ".fon", ".otf", ".ttf"]),
        Category::new(FALLBACK_LABEL, &[]),
    ]
}

/// A directory entry as seen by one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// The entry's file name.
    pub name: String,
    /// The full path to the entry.
    pub path: PathBuf,
    /// The extension including its dot, or an empty string.
    pub extension: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl FileEntry {
    /// Builds an entry from a path and a known directory flag.
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = extension_of(&name).to_string();
        Self {
            name,
            path,
            extension,
            is_dir,
        }
    }

    /// Builds an entry by querying the filesystem for `path`.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self::new(path.to_path_buf(), metadata.is_dir()))
    }

    /// Reads the entry's last-modified time.
    pub fn modified(&self) -> io::Result<SystemTime> {
        fs::metadata(&self.path)?.modified()
    }
}

/// Splits the extension off a file name at its last dot.
///
/// Leading dots do not start an extension, so `.bashrc` has none, and a
/// trailing dot yields the extension `"."`.
///
/// # Examples
///
/// ```
/// use videolog::file_category::extension_of;
///
/// assert_eq!(extension_of("clip.final.MOV"), ".MOV");
/// assert_eq!(extension_of(".bashrc"), "");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(name: &str) -> &str {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(index) if index > stem_start => &name[index..],
        _ => "",
    }
}

/// Returns true if `name` can name an entry directly inside a directory.
///
/// `.`, `..` and names holding `/`, `\` or NUL are refused.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

/// Formats a modification time as a date bucket label in local time.
pub fn date_bucket_label(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format(DATE_BUCKET_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn file(name: &str) -> FileEntry {
        FileEntry::new(PathBuf::from(name), false)
    }

    fn dir(name: &str) -> FileEntry {
        FileEntry::new(PathBuf::from(name), true)
    }

    #[test]
    fn test_is_plain_name() {
        assert!(is_plain_name("clip 1"));
        assert!(is_plain_name(".hidden"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("a/b"));
        assert!(!is_plain_name("a\\b"));
        assert!(!is_plain_name("nul\0"));
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = ExtensionTable::new(default_categories()).expect("default table is valid");
        assert_eq!(table.categories().len(), default_categories().len());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("take.mp4"), ".mp4");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("file."), ".");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("..double"), "");
        assert_eq!(extension_of(".config.toml"), ".toml");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_classify_files_by_extension() {
        let table = ExtensionTable::default();
        assert_eq!(table.classify(&file("a.mp4")), Some("Videos"));
        assert_eq!(table.classify(&file("a.MOV")), Some("Videos"));
        assert_eq!(table.classify(&file("a.png")), Some("Images"));
        assert_eq!(table.classify(&file("a.zip")), Some("Folders"));
        assert_eq!(table.classify(&file("a.py")), Some("Python"));
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let table = ExtensionTable::default();
        assert_eq!(table.classify(&file("a.PNG")), Some("Other"));
        assert_eq!(table.classify(&file("a.Mp4")), Some("Other"));
    }

    #[test]
    fn test_classify_never_returns_none_for_files() {
        let table = ExtensionTable::default();
        for name in ["x", ".x", "x.", "Videos", "Folders", "a.unknown", "b.tar.gz"] {
            assert!(table.classify(&file(name)).is_some(), "{} had no label", name);
        }
    }

    #[test]
    fn test_classify_directories() {
        let table = ExtensionTable::default();
        assert_eq!(table.classify(&dir("Videos")), None);
        assert_eq!(table.classify(&dir("Folders")), None);
        assert_eq!(table.classify(&dir("Other")), None);
        assert_eq!(table.classify(&dir("videos")), Some("Folders"));
        assert_eq!(table.classify(&dir("Trash")), Some("Folders"));
        assert_eq!(table.classify(&dir("shoot.mp4")), Some("Folders"));
    }

    #[test]
    fn test_first_declared_category_wins() {
        let table = ExtensionTable::new(vec![
            Category::new("Clips", &[".mp4"]),
            Category::new("Stills", &[".jpg"]),
        ])
        .unwrap();
        assert_eq!(table.classify(&file("a.mp4")), Some("Clips"));
        assert_eq!(table.category_for_extension(".jpg"), Some("Stills"));
    }

    #[test]
    fn test_fallback_is_appended() {
        let table = ExtensionTable::new(vec![Category::new("Clips", &[".mp4"])]).unwrap();
        assert!(table.get(FALLBACK_LABEL).is_some());
        assert_eq!(table.classify(&file("a.txt")), Some(FALLBACK_LABEL));
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let result = ExtensionTable::new(vec![
            Category::new("A", &[".mp4"]),
            Category::new("B", &[".mp4"]),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateExtension { ref extension, ref category })
                if extension == ".mp4" && category == "B"
        ));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let result = ExtensionTable::new(vec![
            Category::new("A", &[".mp4"]),
            Category::new("A", &[".mov"]),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateCategory(ref label)) if label == "A"));
    }

    #[test]
    fn test_extension_without_dot_rejected() {
        let result = ExtensionTable::new(vec![Category::new("A", &["mp4"])]);
        assert!(matches!(result, Err(ConfigError::InvalidCategory { .. })));
    }

    #[test]
    fn test_date_bucket_label_format() {
        let noon = Local.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        assert_eq!(date_bucket_label(SystemTime::from(noon)), "240131-Wed");

        let new_year = Local.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(date_bucket_label(SystemTime::from(new_year)), "231231-Sun");
    }
}
