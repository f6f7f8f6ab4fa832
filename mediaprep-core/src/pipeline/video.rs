use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::codec::ensure_parent_dir,
    encode::{
        ffmpeg::{
            FfmpegTool, HlsConfig, HlsPreset, fallback_mp4_args, faststart_mp4_args, hls_args,
            playlist_path, poster_args,
        },
        hls::fix_target_duration,
    },
    foundation::error::{MediaprepError, MediaprepResult},
};

/// Extensions accepted when the configured source video is missing.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Segment a video into an HLS playlist under `out_dir`.
pub fn convert_to_hls(
    tool: &FfmpegTool,
    input: &Path,
    out_dir: &Path,
    cfg: &HlsConfig,
) -> MediaprepResult<PathBuf> {
    if !input.is_file() {
        return Err(MediaprepError::not_found(input));
    }
    let args = hls_args(input, out_dir, cfg)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create hls directory '{}'", out_dir.display()))?;
    tool.run(&args)?;
    Ok(playlist_path(out_dir))
}

/// Re-encode to a fast-start MP4 without audio.
pub fn convert_to_faststart_mp4(
    tool: &FfmpegTool,
    input: &Path,
    output: &Path,
) -> MediaprepResult<()> {
    if !input.is_file() {
        return Err(MediaprepError::not_found(input));
    }
    ensure_parent_dir(output)?;
    tool.run(&faststart_mp4_args(input, output))
}

/// Paths and knobs for the hero background video job.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroJob {
    pub input: PathBuf,
    pub hls_dir: PathBuf,
    pub fallback_mp4: PathBuf,
    pub poster: PathBuf,
    pub segment_time: f64,
    pub fallback_duration_secs: u32,
}

impl HeroJob {
    /// Standard layout inside a site's `public/videos` directory.
    pub fn in_videos_dir(videos_dir: &Path) -> Self {
        Self {
            input: videos_dir.join("hero-optimized.webm"),
            hls_dir: videos_dir.join("hls"),
            fallback_mp4: videos_dir.join("hero-inline.mp4"),
            poster: videos_dir.join("hero-poster.jpg"),
            segment_time: 0.5,
            fallback_duration_secs: 12,
        }
    }

    pub fn hls_config(&self) -> HlsConfig {
        HlsConfig {
            preset: HlsPreset::Hero,
            segment_time: self.segment_time,
        }
    }

    pub fn validate(&self) -> MediaprepResult<()> {
        self.hls_config().validate()?;
        if self.fallback_duration_secs == 0 {
            return Err(MediaprepError::invalid_argument(
                "fallback mp4 duration must be non-zero",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Skipped(String),
    Failed(String),
}

impl StageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Clone, Debug)]
pub struct HeroReport {
    /// Source actually used (may differ from the configured one).
    pub input: PathBuf,
    pub playlist: PathBuf,
    pub stale_files_removed: usize,
    pub target_duration: Option<u64>,
    pub manifest: StageOutcome,
    pub fallback_mp4: StageOutcome,
    pub poster: StageOutcome,
}

impl HeroReport {
    pub fn has_failures(&self) -> bool {
        [&self.manifest, &self.fallback_mp4, &self.poster]
            .iter()
            .any(|s| s.is_failed())
    }
}

/// Configured input if present, else the first video (by name) next to it.
///
/// Paths in `exclude` (the job's own outputs) are never picked as a fallback.
pub fn resolve_input(input: &Path, exclude: &[&Path]) -> MediaprepResult<PathBuf> {
    if input.is_file() {
        return Ok(input.to_path_buf());
    }
    tracing::warn!("input file not found at {}", input.display());

    let dir = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Err(MediaprepError::not_found(input));
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_video_extension(p))
        .filter(|p| !exclude.contains(&p.as_path()))
        .collect();
    candidates.sort();

    let found = candidates
        .into_iter()
        .next()
        .ok_or_else(|| MediaprepError::not_found(input))?;
    tracing::info!("found alternative video: {}", found.display());
    Ok(found)
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VIDEO_EXTENSIONS.iter().any(|v| e.eq_ignore_ascii_case(v)))
}

/// Create `dir` and delete the regular files in it. Subdirectories are kept.
///
/// Returns how many files were removed; per-file failures are logged.
pub fn clear_directory_files(dir: &Path) -> MediaprepResult<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create directory '{}'", dir.display()))?;
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("list directory '{}'", dir.display()))?;

    let mut removed = 0usize;
    for path in entries.filter_map(Result::ok).map(|e| e.path()) {
        if !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("error deleting {}: {e}", path.display()),
        }
    }
    Ok(removed)
}

/// HLS segments, then best-effort manifest fix, fallback MP4 and poster frame.
///
/// Only input resolution and the HLS encode are fatal. Later stages are
/// recorded in the report and logged.
#[tracing::instrument(skip(tool, job), fields(input = %job.input.display()))]
pub fn run_hero_pipeline(tool: &FfmpegTool, job: &HeroJob) -> MediaprepResult<HeroReport> {
    job.validate()?;
    let input = resolve_input(&job.input, &[job.fallback_mp4.as_path()])?;

    tracing::info!("cleaning up old segments in {}", job.hls_dir.display());
    let stale_files_removed = clear_directory_files(&job.hls_dir)?;

    tracing::info!("running ffmpeg for HLS");
    let playlist = convert_to_hls(tool, &input, &job.hls_dir, &job.hls_config())?;
    tracing::info!("video splitting completed");

    let (manifest, target_duration) = match fix_target_duration(&playlist) {
        Ok(Some(target)) => {
            tracing::info!("adjusted TARGETDURATION to {target}");
            (StageOutcome::Completed, Some(target))
        }
        Ok(None) => (
            StageOutcome::Skipped("no segment durations in manifest".to_string()),
            None,
        ),
        Err(e) if e.is_not_found() => {
            tracing::warn!("{} not found for post-processing", playlist.display());
            (StageOutcome::Failed(e.to_string()), None)
        }
        Err(e) => {
            tracing::warn!("manifest post-processing failed: {e:#}");
            (StageOutcome::Failed(format!("{e:#}")), None)
        }
    };

    tracing::info!("generating fallback MP4 for browsers without HLS support");
    let fallback_mp4 = run_stage(
        tool,
        &job.fallback_mp4,
        fallback_mp4_args(&input, &job.fallback_mp4, job.fallback_duration_secs),
    );

    let poster = if fallback_mp4.is_failed() {
        tracing::warn!("skipping poster image: fallback MP4 was not generated");
        StageOutcome::Skipped("fallback mp4 unavailable".to_string())
    } else {
        tracing::info!("generating poster image from first frame");
        run_stage(
            tool,
            &job.poster,
            poster_args(&job.fallback_mp4, &job.poster),
        )
    };

    Ok(HeroReport {
        input,
        playlist,
        stale_files_removed,
        target_duration,
        manifest,
        fallback_mp4,
        poster,
    })
}

fn run_stage(tool: &FfmpegTool, output: &Path, args: Vec<std::ffi::OsString>) -> StageOutcome {
    let result = ensure_parent_dir(output).and_then(|()| tool.run(&args));
    match result {
        Ok(()) => {
            tracing::info!("generated {}", output.display());
            StageOutcome::Completed
        }
        Err(e) => {
            tracing::error!("error generating {}: {e:#}", output.display());
            StageOutcome::Failed(format!("{e:#}"))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/video.rs"]
mod tests;
