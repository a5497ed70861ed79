//! videolog - an interactive tool for derushing video logging footage
//!
//! This library sorts the entries of a folder by type, moves files into
//! per-day folders, trashes videos that are too short to be worth keeping,
//! and renames files one by one while they play in a viewer. The extension
//! table and the trash folder name come from a TOML configuration file.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod rename;
pub mod shell;
pub mod video_triage;

pub use config::{Config, ConfigError};
pub use file_category::{Category, ExtensionTable, FileEntry};
pub use file_organizer::{OrganizeError, OrganizeResult, Organizer, SortReport};
pub use rename::{NamePrompt, RenameInterrupt, RenameOptions, RenameReport, ViewerCommand};
pub use shell::{Command, Shell};
pub use video_triage::{DurationProbe, FfprobeProbe, TrashReport};

pub use cli::{Args, run_cli};
