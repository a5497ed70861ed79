//! Video duration triage.
//!
//! Moves videos shorter than a time limit into a trash bucket to get rid of
//! shooting errors. Durations come from a [`DurationProbe`]; the default
//! implementation asks `ffprobe` for the container duration.

use crate::file_category::{FileEntry, VIDEOS_LABEL};
use crate::file_organizer::{OrganizeError, OrganizeResult, Organizer, move_into, scan_directory};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while reading a video's duration.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe program could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },
    /// The probe program exited with an error.
    #[error("{program} failed on {}: {stderr}", .path.display())]
    Failed {
        program: String,
        path: PathBuf,
        stderr: String,
    },
    /// The probe output did not contain a usable duration.
    #[error("Unreadable duration for {}: {reason}", .path.display())]
    InvalidOutput { path: PathBuf, reason: String },
}

/// Reads the duration of a media file.
///
/// Implementations must release everything they open on the file before
/// returning, because the caller may move the file right afterwards.
pub trait DurationProbe {
    /// Returns the duration of the media file at `path`, in seconds.
    fn duration(&self, path: &Path) -> Result<f64, ProbeError>;
}

/// Probes durations with the `ffprobe` command-line tool.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: String,
}

impl FfprobeProbe {
    /// Uses `program` (a name on `PATH` or a full path) as ffprobe.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Extracts `format.duration` from ffprobe's JSON output.
fn parse_duration(stdout: &[u8]) -> Result<f64, String> {
    let output: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| e.to_string())?;
    let raw = output
        .format
        .duration
        .ok_or_else(|| "no duration in the format section".to_string())?;
    let duration: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("invalid duration '{}': {}", raw, e))?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(format!("invalid duration '{}'", raw));
    }
    Ok(duration)
}

impl DurationProbe for FfprobeProbe {
    fn duration(&self, path: &Path) -> Result<f64, ProbeError> {
        // `output` waits for ffprobe to exit and drops its pipes, so the file
        // is no longer open once this returns.
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ProbeError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                program: self.program.clone(),
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_duration(&output.stdout).map_err(|reason| ProbeError::InvalidOutput {
            path: path.to_path_buf(),
            reason,
        })
    }
}

/// A video the gate looked at.
#[derive(Debug, Clone, PartialEq)]
pub struct TriagedVideo {
    /// File name of the video.
    pub name: String,
    /// Probed duration in seconds.
    pub duration: f64,
    /// Whether the video was moved into the trash bucket.
    pub trashed: bool,
}

/// Outcome of the video duration gate.
#[derive(Debug, Clone, Default)]
pub struct TrashReport {
    /// Every successfully probed video, in scan order.
    pub videos: Vec<TriagedVideo>,
    /// Number of videos moved into the trash bucket.
    pub trashed: usize,
    /// Videos whose duration could not be read; they are kept.
    pub unreadable: Vec<(PathBuf, String)>,
    /// Short videos that could not be moved.
    pub skipped: Vec<(PathBuf, String)>,
}

impl TrashReport {
    /// Number of probed videos that stayed in place.
    pub fn kept(&self) -> usize {
        self.videos.iter().filter(|v| !v.trashed).count()
    }

    /// One-line description, e.g. `"3 videos trashed."`.
    pub fn summary(&self) -> String {
        let plural = if self.trashed >= 2 { "s" } else { "" };
        format!("{} video{} trashed.", self.trashed, plural)
    }
}

impl Organizer<'_> {
    /// Moves videos shorter than `threshold_seconds` into `trash_name`.
    ///
    /// Only files of the table's `Videos` category are probed, one at a time.
    /// A video lasting exactly `threshold_seconds` is kept.
    ///
    /// # Errors
    ///
    /// - `InvalidThreshold` unless the threshold is a positive number
    /// - `UnknownCategory` if the table has no `Videos` category
    /// - `EmptyVideoSet` if there is no video, the directory is left untouched
    /// - `NameConflict` if `trash_name` is a regular file
    pub fn trash_short_videos(
        &self,
        threshold_seconds: f64,
        trash_name: &str,
        probe: &dyn DurationProbe,
    ) -> OrganizeResult<TrashReport> {
        if !threshold_seconds.is_finite() || threshold_seconds <= 0.0 {
            return Err(OrganizeError::InvalidThreshold(threshold_seconds));
        }
        let videos_category = self.category_filter(Some(VIDEOS_LABEL))?;
        let videos = Self::files_matching(scan_directory(self.dir)?, videos_category);
        if videos.is_empty() {
            return Err(OrganizeError::EmptyVideoSet);
        }

        info!(
            dir = %self.dir.display(),
            videos = videos.len(),
            threshold_seconds,
            "trashing short videos"
        );
        self.progress.set_length(videos.len() as u64);
        self.progress.set_position(0);
        self.progress
            .set_message(format!("Trashing videos shorter than {}s...", threshold_seconds));

        let mut report = TrashReport::default();
        let result = videos.iter().try_for_each(|video| -> OrganizeResult<()> {
            self.triage(video, threshold_seconds, trash_name, probe, &mut report)?;
            self.progress.inc(1);
            Ok(())
        });
        self.progress.finish_and_clear();
        result?;
        Ok(report)
    }

    fn triage(
        &self,
        video: &FileEntry,
        threshold_seconds: f64,
        trash_name: &str,
        probe: &dyn DurationProbe,
        report: &mut TrashReport,
    ) -> OrganizeResult<()> {
        let duration = match probe.duration(&video.path) {
            Ok(duration) => duration,
            Err(e) => {
                warn!(video = %video.name, error = %e, "cannot read duration, keeping video");
                report.unreadable.push((video.path.clone(), e.to_string()));
                return Ok(());
            }
        };

        let mut trashed = false;
        if duration < threshold_seconds {
            match move_into(self.dir, &video.name, Some(trash_name)) {
                Ok(_) => {
                    debug!(video = %video.name, duration, "trashed");
                    report.trashed += 1;
                    trashed = true;
                }
                Err(e) if e.is_per_entry() => {
                    warn!(video = %video.name, error = %e, "skipping video");
                    report.skipped.push((video.path.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        } else {
            debug!(video = %video.name, duration, "kept");
        }

        report.videos.push(TriagedVideo {
            name: video.name.clone(),
            duration,
            trashed,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::{Category, ExtensionTable};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Answers durations from a fixed table keyed by file name.
    struct FakeProbe {
        durations: HashMap<String, f64>,
    }

    impl FakeProbe {
        fn new(durations: &[(&str, f64)]) -> Self {
            Self {
                durations: durations
                    .iter()
                    .map(|(name, d)| (name.to_string(), *d))
                    .collect(),
            }
        }
    }

    impl DurationProbe for FakeProbe {
        fn duration(&self, path: &Path) -> Result<f64, ProbeError> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            self.durations
                .get(&name)
                .copied()
                .ok_or_else(|| ProbeError::InvalidOutput {
                    path: path.to_path_buf(),
                    reason: "corrupt container".to_string(),
                })
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).expect("Failed to write test file");
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_threshold_is_strict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        touch(base_path, "exact.mp4");
        touch(base_path, "short.mp4");
        touch(base_path, "long.MOV");
        let probe = FakeProbe::new(&[
            ("exact.mp4", 2.0),
            ("short.mp4", 2.0 - 1e-9),
            ("long.MOV", 30.5),
        ]);

        let report = Organizer::new(base_path, &table)
            .trash_short_videos(2.0, "Trash", &probe)
            .unwrap();

        assert_eq!(report.trashed, 1);
        assert_eq!(report.kept(), 2);
        assert!(base_path.join("Trash/short.mp4").exists());
        assert!(base_path.join("exact.mp4").exists());
        assert!(base_path.join("long.MOV").exists());
        assert_eq!(report.summary(), "1 video trashed.");
    }

    #[test]
    fn test_empty_video_set_leaves_directory_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        touch(base_path, "notes.txt");
        fs::create_dir(base_path.join("clips.mp4")).unwrap();
        let before = listing(base_path);

        let result = Organizer::new(base_path, &table).trash_short_videos(
            5.0,
            "Trash",
            &FakeProbe::new(&[]),
        );

        assert!(matches!(result, Err(OrganizeError::EmptyVideoSet)));
        assert_eq!(listing(base_path), before);
    }

    #[test]
    fn test_trash_name_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        touch(base_path, "Rejects");
        touch(base_path, "blip.mp4");

        let result = Organizer::new(base_path, &table).trash_short_videos(
            5.0,
            "Rejects",
            &FakeProbe::new(&[("blip.mp4", 0.4)]),
        );

        assert!(matches!(result, Err(OrganizeError::NameConflict { ref name, .. }) if name == "Rejects"));
        assert!(base_path.join("blip.mp4").exists());
    }

    #[test]
    fn test_unreadable_video_is_kept() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let table = ExtensionTable::default();
        touch(base_path, "broken.mp4");
        touch(base_path, "blip.mp4");

        let report = Organizer::new(base_path, &table)
            .trash_short_videos(5.0, "Trash", &FakeProbe::new(&[("blip.mp4", 1.0)]))
            .unwrap();

        assert_eq!(report.trashed, 1);
        assert_eq!(report.unreadable.len(), 1);
        assert!(base_path.join("broken.mp4").exists());
    }

    #[test]
    fn test_invalid_threshold() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = ExtensionTable::default();
        let organizer = Organizer::new(temp_dir.path(), &table);
        let probe = FakeProbe::new(&[]);

        for threshold in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let result = organizer.trash_short_videos(threshold, "Trash", &probe);
            assert!(matches!(result, Err(OrganizeError::InvalidThreshold(_))));
        }
    }

    #[test]
    fn test_table_without_videos() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = ExtensionTable::new(vec![Category::new("Clips", &[".mp4"])]).unwrap();
        touch(temp_dir.path(), "a.mp4");

        let result = Organizer::new(temp_dir.path(), &table).trash_short_videos(
            1.0,
            "Trash",
            &FakeProbe::new(&[]),
        );

        assert!(matches!(result, Err(OrganizeError::UnknownCategory(ref c)) if c == "Videos"));
    }

    #[test]
    fn test_summary_wording() {
        let mut report = TrashReport::default();
        assert_eq!(report.summary(), "0 video trashed.");
        report.trashed = 2;
        assert_eq!(report.summary(), "2 videos trashed.");
    }

    #[test]
    fn test_parse_duration() {
        let stdout = br#"{"format": {"filename": "a.mp4", "duration": "12.480000"}}"#;
        assert_eq!(parse_duration(stdout), Ok(12.48));

        assert!(parse_duration(br#"{"format": {}}"#).is_err());
        assert!(parse_duration(br#"{"format": {"duration": "N/A"}}"#).is_err());
        assert!(parse_duration(b"not json").is_err());
    }

    #[test]
    fn test_ffprobe_missing_program() {
        let probe = FfprobeProbe::new("/non/existent/ffprobe");
        let result = probe.duration(Path::new("clip.mp4"));
        assert!(matches!(result, Err(ProbeError::Spawn { .. })));
    }
}
