//! Interactive command shell.
//!
//! Reads one command per line, runs it against the session's working
//! directory and prints the outcome. The shell owns the configuration, the
//! extension table and the sudo flag; the engine only ever sees the working
//! directory and the table it is handed.

use crate::config::{Config, ConfigError};
use crate::file_category::ExtensionTable;
use crate::file_organizer::{OrganizeError, OrganizeResult, Organizer, scan_directory};
use crate::output::OutputFormatter;
use crate::rename::{EXIT_KEYWORD, NamePrompt, RenameInterrupt, RenameOptions, TRASH_KEYWORD};
use crate::video_triage::{DurationProbe, FfprobeProbe};
use indicatif::ProgressBar;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// File whose presence marks a directory tree as the tool's own installation.
pub const INSTALL_MARKER: &str = ".videolog";

const HELP_TEXT: &str = "\
Available commands:
  cd <directory>        change the working directory (also: change)
  folder                sort every entry into a folder named after its type
  trash <seconds>       move videos shorter than <seconds> into the trash folder
  date [category]       move files into YYMMDD-Ddd folders by modification date (also: time)
  rename [category]     open each file and type its new name
  all <seconds>         folder, trash and date in a row
  ls                    list the working directory (also: dir, show)
  sudo                  toggle the installation guard
  help                  show this message (also: h, ?)
  exit                  leave the tool (also: e, quit, q, leave, l)";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ChangeDir(PathBuf),
    Folder,
    Trash(f64),
    Date(Option<String>),
    Rename(Option<String>),
    All(f64),
    List,
    Sudo,
    Help,
    Exit,
}

/// Why a command line was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(
        "The input command '{line}' could not be parsed, because the tool did not understand the term '{term}'. Type 'help' for the list of available commands."
    )]
    UnknownCommand { line: String, term: String },
    #[error("Missing argument. The syntax is: '>> {usage}'")]
    MissingArgument { usage: &'static str },
    #[error(
        "The tool could not use '{value}' as a time limit: it has to be a positive number of seconds. The syntax is: '>> {usage}'"
    )]
    InvalidTimeLimit { value: String, usage: &'static str },
}

fn parse_time_limit(value: &str, usage: &'static str) -> Result<f64, ParseError> {
    if value.is_empty() {
        return Err(ParseError::MissingArgument { usage });
    }
    match value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => Ok(seconds),
        _ => Err(ParseError::InvalidTimeLimit {
            value: value.to_string(),
            usage,
        }),
    }
}

impl Command {
    /// Parses a command line; `Ok(None)` for a blank line.
    ///
    /// Keywords are case-insensitive. The argument is the rest of the line, so
    /// directory names may contain spaces.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (keyword, rest) = line
            .split_once(char::is_whitespace)
            .map(|(keyword, rest)| (keyword, rest.trim()))
            .unwrap_or((line, ""));
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match keyword.to_lowercase().as_str() {
            "cd" | "change" => match argument {
                Some(dir) => Self::ChangeDir(PathBuf::from(dir)),
                None => {
                    return Err(ParseError::MissingArgument {
                        usage: "cd <directory>",
                    });
                }
            },
            "folder" => Self::Folder,
            "trash" => Self::Trash(parse_time_limit(rest, "trash <time limit>")?),
            "date" | "time" => Self::Date(argument),
            "rename" => Self::Rename(argument),
            "all" => Self::All(parse_time_limit(rest, "all <time limit>")?),
            "ls" | "dir" | "show" => Self::List,
            "sudo" => Self::Sudo,
            "help" | "h" | "?" => Self::Help,
            "exit" | "e" | "quit" | "q" | "leave" | "l" => Self::Exit,
            _ => {
                return Err(ParseError::UnknownCommand {
                    line: line.to_string(),
                    term: keyword.to_string(),
                });
            }
        };
        Ok(Some(command))
    }
}

/// Looks for [`INSTALL_MARKER`] anywhere below `dir`.
///
/// Symbolic links are not followed and unreadable entries are skipped.
pub fn find_install_marker(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_name() == INSTALL_MARKER)
        .map(|e| e.into_path())
}

/// What the shell does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Reads new names from the shell's input during a rename pass.
struct LinePrompt<'r, R> {
    input: &'r mut R,
}

impl<R: BufRead> NamePrompt for LinePrompt<'_, R> {
    fn ask(&mut self, file_name: &str) -> io::Result<Option<String>> {
        OutputFormatter::plain(&format!("    {}", file_name));
        OutputFormatter::prompt("       >> new name: ")?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn help(&mut self) {
        OutputFormatter::info(&format!(
            "Type the new name without its extension, which is kept. \
             '{}' moves the file to the trash folder, '{}' stops renaming, \
             an empty line asks again.",
            TRASH_KEYWORD, EXIT_KEYWORD
        ));
    }

    fn reject(&mut self, file_name: &str, reason: &str) {
        OutputFormatter::warning(&format!("Cannot rename {}: {}", file_name, reason));
    }
}

/// An interactive session over one input stream.
pub struct Shell<R> {
    input: R,
    cwd: PathBuf,
    config: Config,
    table: ExtensionTable,
    sudo: bool,
    probe: Box<dyn DurationProbe>,
    show_progress: bool,
    interrupt: RenameInterrupt,
}

impl<R: BufRead> Shell<R> {
    /// Creates a session in `cwd`, validating the configuration.
    pub fn new(input: R, cwd: PathBuf, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = config.extension_table()?;
        let probe = Box::new(FfprobeProbe::new(config.ffprobe.clone()));
        Ok(Self {
            input,
            cwd,
            config,
            table,
            sudo: false,
            probe,
            show_progress: false,
            interrupt: RenameInterrupt::new(),
        })
    }

    /// Replaces the duration probe used by `trash` and `all`.
    pub fn with_probe(mut self, probe: Box<dyn DurationProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Starts the session with the installation guard disabled.
    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    /// Draws progress bars while passes run.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Shares `interrupt` with a Ctrl-C handler so it can stop a rename pass.
    pub fn with_interrupt(mut self, interrupt: RenameInterrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_sudo(&self) -> bool {
        self.sudo
    }

    /// Reads and runs commands until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        OutputFormatter::header("videolog: sort, triage and rename your footage");
        OutputFormatter::plain("Type 'help' for the list of commands.");
        loop {
            OutputFormatter::plain("");
            OutputFormatter::info(&self.cwd.display().to_string());
            OutputFormatter::prompt(">> ")?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                println!("exit");
                break;
            }
            if self.execute_line(&line) == Flow::Exit {
                break;
            }
        }
        OutputFormatter::plain("Leaving the tool...");
        Ok(())
    }

    /// Parses and runs one command line, printing its outcome.
    pub fn execute_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Flow::Continue,
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                Flow::Continue
            }
        }
    }

    /// Runs a parsed command, printing its outcome.
    pub fn execute(&mut self, command: Command) -> Flow {
        debug!(?command, cwd = %self.cwd.display(), "executing");
        let result = match command {
            Command::Exit => return Flow::Exit,
            Command::Help => {
                OutputFormatter::plain(HELP_TEXT);
                Ok(())
            }
            Command::Sudo => {
                self.sudo = !self.sudo;
                if self.sudo {
                    OutputFormatter::warning("Sudo mode on: the installation guard is disabled.");
                } else {
                    OutputFormatter::info("Sudo mode off.");
                }
                Ok(())
            }
            Command::ChangeDir(dir) => {
                self.change_dir(&dir);
                Ok(())
            }
            Command::List => scan_directory(&self.cwd).map(|entries| OutputFormatter::listing(&entries)),
            Command::Folder => self.guarded(|shell| shell.folder()),
            Command::Trash(seconds) => self.guarded(|shell| shell.trash(seconds)),
            Command::Date(category) => self.guarded(|shell| shell.date(category.as_deref())),
            Command::Rename(category) => self.guarded(|shell| shell.rename(category.as_deref())),
            Command::All(seconds) => self.guarded(|shell| {
                continue_if_empty(shell.folder())?;
                continue_if_empty(shell.trash(seconds))?;
                shell.date(None)
            }),
        };

        if let Err(e) = result {
            report_error(&e);
        }
        Flow::Continue
    }

    fn change_dir(&mut self, dir: &Path) {
        let target = self.cwd.join(dir);
        match fs::canonicalize(&target) {
            Ok(path) if path.is_dir() => {
                info!(dir = %path.display(), "changed working directory");
                self.cwd = path;
            }
            _ => OutputFormatter::error(&format!(
                "The tool could not find the {} directory. The syntax is: '>> cd <directory>'",
                dir.display()
            )),
        }
    }

    /// Refuses to touch a tree that holds the tool's own files, unless sudo.
    fn check_guard(&self) -> OrganizeResult<()> {
        if self.sudo {
            return Ok(());
        }
        match find_install_marker(&self.cwd) {
            Some(marker) => Err(OrganizeError::GuardViolation { marker }),
            None => Ok(()),
        }
    }

    fn progress(&self) -> ProgressBar {
        if self.show_progress {
            OutputFormatter::create_progress_bar(0)
        } else {
            ProgressBar::hidden()
        }
    }

    fn guarded(
        &mut self,
        pass: impl FnOnce(&mut Self) -> OrganizeResult<()>,
    ) -> OrganizeResult<()> {
        self.check_guard()?;
        pass(self)
    }

    fn folder(&self) -> OrganizeResult<()> {
        OutputFormatter::header("Sorting files by type...");
        let report = Organizer::new(&self.cwd, &self.table)
            .with_progress(self.progress())
            .folder_sort()?;
        OutputFormatter::sort_report(&report);
        Ok(())
    }

    fn trash(&self, seconds: f64) -> OrganizeResult<()> {
        OutputFormatter::header(&format!("Trashing videos shorter than {}s...", seconds));
        let report = Organizer::new(&self.cwd, &self.table)
            .with_progress(self.progress())
            .trash_short_videos(seconds, &self.config.trash_folder_name, &*self.probe)?;
        OutputFormatter::trash_report(&report);
        Ok(())
    }

    fn date(&self, category: Option<&str>) -> OrganizeResult<()> {
        let category = category.map(|c| self.resolve_category(c));
        OutputFormatter::header("Sorting files by date...");
        let report = Organizer::new(&self.cwd, &self.table)
            .with_progress(self.progress())
            .sort_by_date(category.as_deref())?;
        OutputFormatter::sort_report(&report);
        Ok(())
    }

    fn rename(&mut self, category: Option<&str>) -> OrganizeResult<()> {
        let options = RenameOptions {
            category: category.map(|c| self.resolve_category(c)),
            trash_name: self.config.trash_folder_name.clone(),
            viewer: self.config.viewer_command(),
            interrupt: self.interrupt.clone(),
        };
        OutputFormatter::header("Renaming files...");
        OutputFormatter::plain(&format!(
            "Type '{}' to move a file to the trash, '{}' to stop, 'help' for guidance.",
            TRASH_KEYWORD, EXIT_KEYWORD
        ));

        let mut prompt = LinePrompt {
            input: &mut self.input,
        };
        let report = Organizer::new(&self.cwd, &self.table).rename_files(&options, &mut prompt)?;
        if options.interrupt.is_requested() {
            OutputFormatter::warning("File renaming stopped.");
        }
        OutputFormatter::skipped(&report.skipped);
        OutputFormatter::success(&report.summary());
        Ok(())
    }

    /// Maps a typed category to the table's spelling, ignoring case.
    fn resolve_category(&self, typed: &str) -> String {
        self.table
            .categories()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(typed))
            .map_or_else(|| typed.to_string(), |c| c.name.clone())
    }
}

fn continue_if_empty(result: OrganizeResult<()>) -> OrganizeResult<()> {
    match result {
        Err(e) if e.is_informational() => {
            OutputFormatter::warning(&e.to_string());
            Ok(())
        }
        other => other,
    }
}

fn report_error(error: &OrganizeError) {
    if error.is_informational() {
        OutputFormatter::warning(&error.to_string());
    } else {
        OutputFormatter::error(&error.to_string());
    }
}
