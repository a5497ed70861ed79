//! Interactive rename pass.
//!
//! Each candidate file is opened in an external viewer while the user types its
//! new name. The original extension is always kept. Two answers are reserved:
//! [`TRASH_KEYWORD`] moves the file into the trash bucket and [`EXIT_KEYWORD`]
//! stops the pass, leaving the remaining files untouched.

use crate::file_category::{FileEntry, is_plain_name};
use crate::file_organizer::{OrganizeError, OrganizeResult, Organizer, move_into, scan_directory};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Answer that moves the current file into the trash bucket.
pub const TRASH_KEYWORD: &str = "trash";
/// Answer that stops the rename pass.
pub const EXIT_KEYWORD: &str = "exit";
/// Answer that shows the rename guidance again.
pub const HELP_KEYWORD: &str = "help";

/// Checks that `name` can be used as a file name inside the working directory.
fn check_new_name(name: &str) -> Result<(), &'static str> {
    if is_plain_name(name) {
        Ok(())
    } else {
        Err("a name cannot be '.' or '..', nor contain '/', '\\' or NUL characters")
    }
}

/// Holds the viewer process while it runs, shared with [`RenameInterrupt`].
type ViewerSlot = Arc<Mutex<Option<Child>>>;

fn lock_slot(slot: &Mutex<Option<Child>>) -> MutexGuard<'_, Option<Child>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Kills and reaps the viewer held in `slot`, if there still is one.
fn stop_viewer(slot: &Mutex<Option<Child>>) {
    let Some(mut child) = lock_slot(slot).take() else {
        return;
    };
    match child.try_wait() {
        Ok(Some(status)) => debug!(pid = child.id(), %status, "viewer already closed"),
        _ => {
            if let Err(e) = child.kill() {
                debug!(pid = child.id(), error = %e, "failed to kill viewer");
            }
            // Reap it so no zombie is left behind.
            let _ = child.wait();
        }
    }
}

/// An external program that shows a file while it is being renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerCommand {
    program: String,
    args: Vec<String>,
}

impl ViewerCommand {
    /// Runs `program` with `args`, followed by the path of the file to show.
    pub fn new(program: impl Into<String>, args: &[String]) -> Self {
        Self {
            program: program.into(),
            args: args.to_vec(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Starts the viewer on `path` without waiting for it.
    pub fn spawn(&self, path: &Path) -> io::Result<ViewerGuard> {
        self.spawn_in(path, ViewerSlot::default())
    }

    /// The viewer gets no stdin so it cannot compete with the prompt for input.
    fn spawn_in(&self, path: &Path, slot: ViewerSlot) -> io::Result<ViewerGuard> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let pid = child.id();
        *lock_slot(&slot) = Some(child);
        Ok(ViewerGuard { slot, pid })
    }
}

/// A running viewer process, killed and reaped when dropped.
#[derive(Debug)]
pub struct ViewerGuard {
    slot: ViewerSlot,
    pid: u32,
}

impl ViewerGuard {
    /// Process id of the viewer.
    pub fn id(&self) -> u32 {
        self.pid
    }
}

impl Drop for ViewerGuard {
    fn drop(&mut self) {
        stop_viewer(&self.slot);
    }
}

/// Lets a Ctrl-C handler stop a running rename pass.
///
/// Clones share their state. While a pass runs, [`RenameInterrupt::trigger`]
/// kills the open viewer at once; the pass then stops as soon as the pending
/// answer comes back, and that answer is discarded.
#[derive(Debug, Clone, Default)]
pub struct RenameInterrupt {
    inner: Arc<InterruptState>,
}

#[derive(Debug, Default)]
struct InterruptState {
    running: AtomicBool,
    requested: AtomicBool,
    viewer: ViewerSlot,
}

impl RenameInterrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the running pass to stop.
    ///
    /// Returns false, and does nothing, when no rename pass is running.
    pub fn trigger(&self) -> bool {
        if !self.inner.running.load(Ordering::SeqCst) {
            return false;
        }
        self.inner.requested.store(true, Ordering::SeqCst);
        stop_viewer(&self.inner.viewer);
        true
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Process id of the viewer currently open for the pass.
    pub fn viewer_pid(&self) -> Option<u32> {
        lock_slot(&self.inner.viewer).as_ref().map(Child::id)
    }

    fn viewer_slot(&self) -> ViewerSlot {
        Arc::clone(&self.inner.viewer)
    }

    fn start(&self) -> RunningPass<'_> {
        self.inner.requested.store(false, Ordering::SeqCst);
        self.inner.running.store(true, Ordering::SeqCst);
        RunningPass(self)
    }
}

/// Marks a pass as running until dropped.
struct RunningPass<'a>(&'a RenameInterrupt);

impl Drop for RunningPass<'_> {
    fn drop(&mut self) {
        self.0.inner.running.store(false, Ordering::SeqCst);
    }
}

/// Source of the new names typed by the user.
pub trait NamePrompt {
    /// Asks for the new name of `file_name`.
    ///
    /// Returns `Ok(None)` at end of input, which aborts the pass.
    fn ask(&mut self, file_name: &str) -> io::Result<Option<String>>;

    /// Shows how to answer the prompt.
    fn help(&mut self);

    /// Tells the user why an answer for `file_name` was refused.
    fn reject(&mut self, file_name: &str, reason: &str);
}

/// Settings of a rename pass.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Only rename files of this category; all files when `None`.
    pub category: Option<String>,
    /// Bucket that receives trashed files.
    pub trash_name: String,
    /// Viewer to open each file in; no viewer when `None`.
    pub viewer: Option<ViewerCommand>,
    /// Stop request shared with the Ctrl-C handler.
    pub interrupt: RenameInterrupt,
}

/// Outcome of a rename pass.
#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    pub renamed: usize,
    pub trashed: usize,
    /// Files that could not be renamed or trashed, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// The user left before the last file.
    pub aborted: bool,
}

impl RenameReport {
    /// Describes the pass, e.g. `"2 files renamed.\n1 file trashed."`.
    pub fn summary(&self) -> String {
        fn count(n: usize, what: &str) -> String {
            let plural = if n >= 2 { "s" } else { "" };
            format!("{} file{} {}.", n, plural, what)
        }

        let mut lines = Vec::new();
        if self.renamed > 0 {
            lines.push(count(self.renamed, "renamed"));
        }
        if self.trashed > 0 {
            lines.push(count(self.trashed, "trashed"));
        }
        if lines.is_empty() {
            "Nothing has been modified.".to_string()
        } else {
            lines.join("\n")
        }
    }
}

enum Step {
    Next,
    Abort,
}

impl Organizer<'_> {
    /// Asks for a new name for every file, optionally restricted to a category.
    ///
    /// # Errors
    ///
    /// - `UnknownCategory` if the category is not in the table
    /// - `EmptyDirectory` if no file qualifies
    /// - `NameConflict` if the trash bucket name is taken by a regular file
    /// - `Prompt` if reading an answer fails
    pub fn rename_files(
        &self,
        options: &RenameOptions,
        prompt: &mut dyn NamePrompt,
    ) -> OrganizeResult<RenameReport> {
        let filter = self.category_filter(options.category.as_deref())?;
        let files = Self::files_matching(scan_directory(self.dir)?, filter);
        if files.is_empty() {
            return Err(OrganizeError::EmptyDirectory {
                category: options.category.clone(),
            });
        }

        info!(dir = %self.dir.display(), files = files.len(), "renaming files");
        let _running = options.interrupt.start();
        let mut report = RenameReport::default();
        for entry in &files {
            if let Step::Abort = self.rename_one(entry, options, prompt, &mut report)? {
                info!(renamed = report.renamed, trashed = report.trashed, "rename stopped");
                report.aborted = true;
                break;
            }
        }
        Ok(report)
    }

    fn rename_one(
        &self,
        entry: &FileEntry,
        options: &RenameOptions,
        prompt: &mut dyn NamePrompt,
        report: &mut RenameReport,
    ) -> OrganizeResult<Step> {
        if options.interrupt.is_requested() {
            return Ok(Step::Abort);
        }

        // Lives until this file is done, whichever way the function returns.
        let _viewer = options
            .viewer
            .as_ref()
            .and_then(|viewer| match viewer.spawn_in(&entry.path, options.interrupt.viewer_slot()) {
                Ok(guard) => {
                    debug!(pid = guard.id(), file = %entry.name, "viewer opened");
                    Some(guard)
                }
                Err(e) => {
                    warn!(program = viewer.program(), error = %e, "cannot open viewer");
                    None
                }
            });

        loop {
            let answer = prompt.ask(&entry.name).map_err(OrganizeError::Prompt)?;
            if options.interrupt.is_requested() {
                debug!(file = %entry.name, "interrupted, discarding answer");
                return Ok(Step::Abort);
            }
            let Some(answer) = answer else {
                debug!("end of input");
                return Ok(Step::Abort);
            };
            let answer = answer.trim();

            match answer {
                "" => continue,
                HELP_KEYWORD => prompt.help(),
                EXIT_KEYWORD => return Ok(Step::Abort),
                TRASH_KEYWORD => {
                    match move_into(self.dir, &entry.name, Some(&options.trash_name)) {
                        Ok(_) => {
                            debug!(file = %entry.name, "trashed");
                            report.trashed += 1;
                        }
                        Err(e) if e.is_per_entry() => {
                            warn!(file = %entry.name, error = %e, "skipping file");
                            report.skipped.push((entry.path.clone(), e.to_string()));
                        }
                        Err(e) => return Err(e),
                    }
                    return Ok(Step::Next);
                }
                name => {
                    if let Err(reason) = check_new_name(name) {
                        prompt.reject(&entry.name, reason);
                        continue;
                    }
                    let new_name = format!("{}{}", name, entry.extension);
                    if new_name == entry.name {
                        debug!(file = %entry.name, "name unchanged");
                        return Ok(Step::Next);
                    }
                    let to = self.dir.join(&new_name);
                    if fs::symlink_metadata(&to).is_ok() {
                        prompt.reject(&entry.name, &format!("'{}' already exists", new_name));
                        continue;
                    }

                    match fs::rename(&entry.path, &to) {
                        Ok(()) => {
                            debug!(from = %entry.name, to = %new_name, "renamed");
                            report.renamed += 1;
                        }
                        Err(e) => {
                            let error = OrganizeError::FileMoveFailed {
                                from: entry.path.clone(),
                                to,
                                source: e,
                            };
                            warn!(file = %entry.name, error = %error, "skipping file");
                            report.skipped.push((entry.path.clone(), error.to_string()));
                        }
                    }
                    return Ok(Step::Next);
                }
            }
        }
    }
}
