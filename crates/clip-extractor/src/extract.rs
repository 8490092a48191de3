//! Extraction planning and the transcoder backend.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

use clipmark_common::error::{ClipmarkError, ClipmarkResult};
use clipmark_model::manifest::{read_manifest, ManifestRow};

/// A single clip cut, fully resolved against the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionJob {
    /// Source video to cut from.
    pub source_path: PathBuf,

    /// Clip start offset in seconds.
    pub start_secs: f64,

    /// Clip length in seconds.
    pub duration_secs: f64,

    /// Output file path (`<output_dir>/<artwork>/<clip_name>`).
    pub dest_path: PathBuf,
}

impl ExtractionJob {
    /// ffmpeg arguments: stream copy video, drop audio, overwrite output.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            self.source_path.to_string_lossy().into_owned(),
            "-ss".to_string(),
            self.start_secs.to_string(),
            "-t".to_string(),
            self.duration_secs.to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-an".to_string(),
            self.dest_path.to_string_lossy().into_owned(),
        ]
    }
}

/// Progress callback for extraction runs.
pub type ProgressCallback = Box<dyn Fn(ExtractProgress)>;

/// Progress report emitted after each clip.
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    /// Clips extracted so far.
    pub completed: usize,

    /// Clips in the plan.
    pub total: usize,

    /// Output file just written.
    pub dest_path: PathBuf,
}

/// Trait for transcoder backends.
pub trait TranscodeBackend {
    /// Cut one clip. Blocks until the transcoder exits.
    fn extract(&mut self, job: &ExtractionJob) -> ClipmarkResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Runs the `ffmpeg` binary found on PATH.
pub struct FfmpegBackend;

impl FfmpegBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscodeBackend for FfmpegBackend {
    fn extract(&mut self, job: &ExtractionJob) -> ClipmarkResult<()> {
        let args = job.ffmpeg_args();
        tracing::debug!(args = ?args, "Running ffmpeg");

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ClipmarkError::extract(format!("Failed to start ffmpeg: {e}")))?;

        if !output.status.success() {
            return Err(ClipmarkError::extract(format!(
                "ffmpeg failed on {} (status {}): {}",
                job.dest_path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Manifest names become path components; reject anything that would
/// escape the output directory.
fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Resolve manifest rows into jobs. Every source video must exist before
/// any clip is cut.
pub fn plan_extraction(
    rows: &[ManifestRow],
    source_dir: &Path,
    output_dir: &Path,
) -> ClipmarkResult<Vec<ExtractionJob>> {
    let mut jobs = Vec::with_capacity(rows.len());
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();

    for row in rows {
        row.validate()?;

        for name in [&row.video_id, &row.artwork, &row.clip_name] {
            if !is_plain_component(name) {
                return Err(ClipmarkError::manifest(format!(
                    "{:?} is not a plain file name",
                    name
                )));
            }
        }

        let source_path = source_dir.join(&row.video_id);
        if !source_path.is_file() {
            return Err(ClipmarkError::FileNotFound { path: source_path });
        }

        let dest_path = output_dir.join(&row.artwork).join(&row.clip_name);
        if let Some(previous) = claimed.insert(dest_path.clone(), &row.video_id) {
            return Err(ClipmarkError::manifest(format!(
                "{} and {} both map to {}",
                previous,
                row.video_id,
                dest_path.display()
            )));
        }

        jobs.push(ExtractionJob {
            source_path,
            start_secs: row.start,
            duration_secs: row.length,
            dest_path,
        });
    }

    Ok(jobs)
}

/// Run planned jobs in order, creating per-artwork directories as needed.
pub fn run_jobs(
    jobs: &[ExtractionJob],
    backend: &mut dyn TranscodeBackend,
    progress: Option<ProgressCallback>,
) -> ClipmarkResult<usize> {
    if !backend.is_available() {
        return Err(ClipmarkError::unsupported(format!(
            "Transcoder backend {} is not available (expected it in PATH)",
            backend.name()
        )));
    }

    tracing::info!(backend = backend.name(), clips = jobs.len(), "Starting extraction");

    for (index, job) in jobs.iter().enumerate() {
        if let Some(parent) = job.dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        backend.extract(job)?;

        tracing::info!(
            dest = %job.dest_path.display(),
            start = job.start_secs,
            duration = job.duration_secs,
            "Extracted clip"
        );

        if let Some(cb) = &progress {
            cb(ExtractProgress {
                completed: index + 1,
                total: jobs.len(),
                dest_path: job.dest_path.clone(),
            });
        }
    }

    Ok(jobs.len())
}

/// Extract every clip listed in the manifest.
///
/// This is the main entry point for extraction. Returns the number of clips
/// written.
pub fn extract_manifest(
    manifest_path: &Path,
    source_dir: &Path,
    output_dir: &Path,
    backend: &mut dyn TranscodeBackend,
    progress: Option<ProgressCallback>,
) -> ClipmarkResult<usize> {
    tracing::info!(
        manifest = %manifest_path.display(),
        output = %output_dir.display(),
        "Loading clip manifest"
    );

    let rows = read_manifest(manifest_path)?;
    let jobs = plan_extraction(&rows, source_dir, output_dir)?;
    run_jobs(&jobs, backend, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use clipmark_model::manifest::{write_manifest, ClipInterval};
    use clipmark_model::mark::{ClipKey, ClipType};

    /// Records jobs and writes a placeholder file instead of transcoding.
    #[derive(Default)]
    struct RecordingBackend {
        jobs: Vec<ExtractionJob>,
        fail_on: Option<usize>,
    }

    impl TranscodeBackend for RecordingBackend {
        fn extract(&mut self, job: &ExtractionJob) -> ClipmarkResult<()> {
            if self.fail_on == Some(self.jobs.len()) {
                return Err(ClipmarkError::extract("simulated failure"));
            }
            std::fs::write(&job.dest_path, b"clip")?;
            self.jobs.push(job.clone());
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn interval(artwork: &str, ct: ClipType, video: &str, start: f64, end: f64) -> ClipInterval {
        ClipInterval::new(
            ClipKey {
                artwork: artwork.to_string(),
                distance: "1m".to_string(),
                clip_type: ct,
                video_id: video.to_string(),
            },
            start,
            end,
        )
    }

    fn setup(intervals: &[ClipInterval], videos: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("testing_videos.csv");
        write_manifest(&manifest, intervals).unwrap();
        for video in videos {
            std::fs::write(dir.path().join(video), b"video").unwrap();
        }
        (dir, manifest)
    }

    #[test]
    fn test_ffmpeg_args_copy_video_and_drop_audio() {
        let job = ExtractionJob {
            source_path: PathBuf::from("/videos/v.mp4"),
            start_secs: 22.0,
            duration_secs: 5.5,
            dest_path: PathBuf::from("/videos/clips/A/A_1m_downwards.mp4"),
        };
        let args = job.ffmpeg_args();

        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-i") + 1], "/videos/v.mp4");
        assert_eq!(args[pos("-ss") + 1], "22");
        assert_eq!(args[pos("-t") + 1], "5.5");
        assert_eq!(args[pos("-c:v") + 1], "copy");
        assert!(args.contains(&"-an".to_string()));
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().unwrap(), "/videos/clips/A/A_1m_downwards.mp4");
    }

    #[test]
    fn test_extracts_into_per_artwork_directories() {
        let (dir, manifest) = setup(
            &[
                interval("A", ClipType::Forward, "v.mp4", 0.0, 12.0),
                interval("B", ClipType::Down, "w.mp4", 22.0, 27.5),
            ],
            &["v.mp4", "w.mp4"],
        );
        let output = dir.path().join("clips");
        let mut backend = RecordingBackend::default();

        let count =
            extract_manifest(&manifest, dir.path(), &output, &mut backend, None).unwrap();

        assert_eq!(count, 2);
        assert!(output.join("A").join("A_1m_forward.mp4").is_file());
        assert!(output.join("B").join("B_1m_downwards.mp4").is_file());
        assert_eq!(backend.jobs[1].start_secs, 22.0);
        assert!((backend.jobs[1].duration_secs - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_source_fails_before_any_extraction() {
        let (dir, manifest) = setup(
            &[
                interval("A", ClipType::Forward, "v.mp4", 0.0, 12.0),
                interval("B", ClipType::Down, "missing.mp4", 22.0, 27.5),
            ],
            &["v.mp4"],
        );
        let mut backend = RecordingBackend::default();

        let err = extract_manifest(&manifest, dir.path(), &dir.path().join("clips"), &mut backend, None)
            .unwrap_err();

        assert!(matches!(err, ClipmarkError::FileNotFound { .. }));
        assert!(backend.jobs.is_empty());
        assert!(!dir.path().join("clips").exists());
    }

    #[test]
    fn test_rerun_overwrites_outputs() {
        let (dir, manifest) = setup(
            &[interval("A", ClipType::Left, "v.mp4", 1.0, 2.0)],
            &["v.mp4"],
        );
        let output = dir.path().join("clips");

        extract_manifest(&manifest, dir.path(), &output, &mut RecordingBackend::default(), None)
            .unwrap();
        extract_manifest(&manifest, dir.path(), &output, &mut RecordingBackend::default(), None)
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(output.join("A")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_first_failure_stops_the_run() {
        let (dir, manifest) = setup(
            &[
                interval("A", ClipType::Forward, "v.mp4", 0.0, 12.0),
                interval("A", ClipType::Down, "v.mp4", 22.0, 27.5),
                interval("A", ClipType::Up, "v.mp4", 28.0, 33.0),
            ],
            &["v.mp4"],
        );
        let mut backend = RecordingBackend {
            fail_on: Some(1),
            ..Default::default()
        };

        let result = extract_manifest(&manifest, dir.path(), &dir.path().join("clips"), &mut backend, None);

        assert!(matches!(result, Err(ClipmarkError::Extract { .. })));
        assert_eq!(backend.jobs.len(), 1);
    }

    #[test]
    fn test_progress_reports_each_clip() {
        let (dir, manifest) = setup(
            &[
                interval("A", ClipType::Forward, "v.mp4", 0.0, 12.0),
                interval("A", ClipType::Right, "v.mp4", 40.0, 45.0),
            ],
            &["v.mp4"],
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let progress: ProgressCallback = Box::new(move |p| sink.borrow_mut().push((p.completed, p.total)));

        extract_manifest(
            &manifest,
            dir.path(),
            &dir.path().join("clips"),
            &mut RecordingBackend::default(),
            Some(progress),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_path_escaping_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("v.mp4"), b"video").unwrap();
        let mut row = clipmark_model::manifest::ManifestRow::from(&interval(
            "A",
            ClipType::Up,
            "v.mp4",
            1.0,
            2.0,
        ));
        row.artwork = "../escape".to_string();

        let err = plan_extraction(&[row], dir.path(), &dir.path().join("clips")).unwrap_err();
        assert!(matches!(err, ClipmarkError::Manifest { .. }));
    }

    #[test]
    fn test_colliding_destinations_fail_before_any_extraction() {
        let (dir, manifest) = setup(
            &[
                interval("A", ClipType::Forward, "v1.mp4", 0.0, 12.0),
                interval("A", ClipType::Forward, "v2.mp4", 0.0, 9.0),
            ],
            &["v1.mp4", "v2.mp4"],
        );
        let mut backend = RecordingBackend::default();

        let err = extract_manifest(&manifest, dir.path(), &dir.path().join("clips"), &mut backend, None)
            .unwrap_err();

        assert!(matches!(err, ClipmarkError::Manifest { .. }));
        assert!(err.to_string().contains("v1.mp4"));
        assert!(err.to_string().contains("v2.mp4"));
        assert!(backend.jobs.is_empty());
    }

    #[test]
    fn test_unavailable_backend_is_unsupported() {
        struct Missing;
        impl TranscodeBackend for Missing {
            fn extract(&mut self, _job: &ExtractionJob) -> ClipmarkResult<()> {
                unreachable!()
            }
            fn is_available(&self) -> bool {
                false
            }
            fn name(&self) -> &str {
                "missing"
            }
        }

        let err = run_jobs(&[], &mut Missing, None).unwrap_err();
        assert!(matches!(err, ClipmarkError::Unsupported { .. }));
    }
}
