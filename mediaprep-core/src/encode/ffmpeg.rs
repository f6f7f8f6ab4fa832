use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::foundation::error::{MediaprepError, MediaprepResult};

/// Environment variable overriding the ffmpeg executable.
pub const FFMPEG_ENV: &str = "MEDIAPREP_FFMPEG";

pub const PLAYLIST_NAME: &str = "playlist.m3u8";
pub const SEGMENT_PATTERN: &str = "segment_%03d.ts";

/// Linearize, tone-map to BT.709 SDR, then scale to 1920 rows.
pub const TONEMAP_FILTER: &str = "zscale=t=linear:npl=100,format=gbrpf32le,zscale=primaries=bt709:transfer=bt709:matrix=bt709,tonemap=hable,zscale=t=bt709:m=bt709:r=tv,format=yuv420p,scale=-2:1920";

/// Lines of ffmpeg stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 20;

/// Handle on the external `ffmpeg` executable.
#[derive(Clone, Debug)]
pub struct FfmpegTool {
    exe: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegTool {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// `$MEDIAPREP_FFMPEG` if set and non-empty, otherwise `ffmpeg` from `PATH`.
    pub fn from_env() -> Self {
        match std::env::var_os(FFMPEG_ENV) {
            Some(exe) if !exe.is_empty() => Self::new(exe),
            _ => Self::default(),
        }
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.exe)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Shell-like rendering of an invocation, for logs.
    pub fn command_line(&self, args: &[OsString]) -> String {
        std::iter::once(self.exe.as_os_str())
            .chain(args.iter().map(OsString::as_os_str))
            .map(OsStr::to_string_lossy)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion. Only the exit status decides success.
    pub fn run(&self, args: &[OsString]) -> MediaprepResult<()> {
        tracing::debug!("running command: {}", self.command_line(args));

        let output = Command::new(&self.exe)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                MediaprepError::process(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.exe.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaprepError::process(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr_tail(&stderr)
            )));
        }
        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// HLS flag sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HlsPreset {
    /// H.264 + AAC, 15-frame GOP, explicit `-f hls`.
    #[default]
    Streaming,
    /// Fast 720p H.264 for the hero loop.
    Hero,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HlsConfig {
    pub preset: HlsPreset,
    /// Target segment length in seconds.
    pub segment_time: f64,
}

impl Default for HlsConfig {
    fn default() -> Self {
        Self {
            preset: HlsPreset::Streaming,
            segment_time: 0.5,
        }
    }
}

impl HlsConfig {
    pub fn validate(&self) -> MediaprepResult<()> {
        if !self.segment_time.is_finite() || self.segment_time <= 0.0 {
            return Err(MediaprepError::invalid_argument(format!(
                "hls segment time must be a positive number of seconds, got {}",
                self.segment_time
            )));
        }
        Ok(())
    }
}

pub fn playlist_path(out_dir: &Path) -> PathBuf {
    out_dir.join(PLAYLIST_NAME)
}

/// Segment the input into `<out_dir>/segment_NNN.ts` plus `<out_dir>/playlist.m3u8`.
pub fn hls_args(input: &Path, out_dir: &Path, cfg: &HlsConfig) -> MediaprepResult<Vec<OsString>> {
    cfg.validate()?;

    let mut args = ArgList::new();
    args.push_all(["-y", "-i"]).push(input);
    match cfg.preset {
        HlsPreset::Streaming => {
            args.push_all([
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-g",
                "15",
                "-keyint_min",
                "15",
                "-sc_threshold",
                "0",
            ]);
        }
        HlsPreset::Hero => {
            args.push_all([
                "-c:v",
                "libx264",
                "-preset",
                "ultrafast",
                "-crf",
                "26",
                "-vf",
                "scale=-2:720",
                "-g",
                "15",
                "-sc_threshold",
                "0",
            ]);
        }
    }
    args.push("-hls_time")
        .push(cfg.segment_time.to_string())
        .push_all(["-hls_list_size", "0", "-hls_segment_filename"])
        .push(out_dir.join(SEGMENT_PATTERN));
    if cfg.preset == HlsPreset::Streaming {
        args.push_all(["-f", "hls"]);
    }
    args.push(playlist_path(out_dir));
    Ok(args.into_inner())
}

/// Progressive-download MP4: metadata up front, audio dropped.
pub fn faststart_mp4_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = ArgList::new();
    args.push_all(["-y", "-i"])
        .push(input)
        .push_all([
            "-c:v",
            "libx264",
            "-preset",
            "slow",
            "-crf",
            "23",
            "-movflags",
            "+faststart",
            "-an",
        ])
        .push(output);
    args.into_inner()
}

/// Tone-mapped BT.709 MP4 for browsers without HLS support.
pub fn fallback_mp4_args(input: &Path, output: &Path, duration_secs: u32) -> Vec<OsString> {
    let mut args = ArgList::new();
    args.push_all(["-y", "-i"])
        .push(input)
        .push("-t")
        .push(duration_secs.to_string())
        .push_all([
            "-c:v",
            "libx264",
            "-profile:v",
            "main",
            "-level",
            "4.0",
            "-pix_fmt",
            "yuv420p",
            "-preset",
            "veryslow",
            "-crf",
            "20",
            "-vf",
            TONEMAP_FILTER,
            "-color_primaries",
            "bt709",
            "-color_trc",
            "bt709",
            "-colorspace",
            "bt709",
            "-g",
            "30",
            "-keyint_min",
            "30",
            "-sc_threshold",
            "0",
            "-movflags",
            "+faststart",
            "-an",
        ])
        .push(output);
    args.into_inner()
}

/// Single high-quality frame taken 0.1s in.
pub fn poster_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = ArgList::new();
    args.push_all(["-y", "-ss", "0.1", "-i"])
        .push(input)
        .push_all(["-frames:v", "1", "-q:v", "2", "-update", "1"])
        .push(output);
    args.into_inner()
}

#[derive(Default)]
struct ArgList(Vec<OsString>);

impl ArgList {
    fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.0.push(arg.into());
        self
    }

    fn push_all<const N: usize>(&mut self, args: [&str; N]) -> &mut Self {
        self.0.extend(args.into_iter().map(OsString::from));
        self
    }

    fn into_inner(self) -> Vec<OsString> {
        self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
