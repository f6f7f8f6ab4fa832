use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{MediaprepError, MediaprepResult};

const EXTINF: &str = "#EXTINF:";
const TARGET_DURATION: &str = "#EXT-X-TARGETDURATION:";

/// Result of normalizing `#EXT-X-TARGETDURATION`.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestRewrite {
    pub max_segment_secs: f64,
    pub target_duration: u64,
    pub text: String,
}

/// Longest `#EXTINF` duration. Unparsable entries are skipped.
pub fn max_segment_duration(manifest: &str) -> Option<f64> {
    manifest
        .lines()
        .filter_map(|line| line.strip_prefix(EXTINF))
        .filter_map(|rest| rest.split(',').next()?.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite())
        .reduce(f64::max)
}

/// Smallest whole second covering every segment, never below 1.
pub fn target_duration_for(max_segment_secs: f64) -> u64 {
    (max_segment_secs.ceil() as u64).max(1)
}

/// Rewrite every target-duration line to the ceiling of the longest segment.
///
/// Returns `None` when no positive segment duration is present. The output is
/// newline-joined with a trailing newline, so applying it again is a no-op.
pub fn rewrite_target_duration(manifest: &str) -> Option<ManifestRewrite> {
    let max_segment_secs = max_segment_duration(manifest).filter(|d| *d > 0.0)?;
    let target_duration = target_duration_for(max_segment_secs);

    let mut text = String::with_capacity(manifest.len() + 4);
    for line in manifest.lines() {
        if line.starts_with(TARGET_DURATION) {
            text.push_str(TARGET_DURATION);
            text.push_str(&target_duration.to_string());
        } else {
            text.push_str(line);
        }
        text.push('\n');
    }

    Some(ManifestRewrite {
        max_segment_secs,
        target_duration,
        text,
    })
}

/// Apply [`rewrite_target_duration`] to a manifest on disk.
///
/// Returns the new target duration, or `None` when the file was left alone.
pub fn fix_target_duration(path: &Path) -> MediaprepResult<Option<u64>> {
    if !path.is_file() {
        return Err(MediaprepError::not_found(path));
    }
    let manifest = std::fs::read_to_string(path)
        .with_context(|| format!("read manifest '{}'", path.display()))?;
    if !manifest.trim_start().starts_with("#EXTM3U") {
        return Err(MediaprepError::manifest(format!(
            "'{}' is missing the #EXTM3U header",
            path.display()
        )));
    }

    let Some(rewrite) = rewrite_target_duration(&manifest) else {
        return Ok(None);
    };
    std::fs::write(path, &rewrite.text)
        .with_context(|| format!("write manifest '{}'", path.display()))?;
    Ok(Some(rewrite.target_duration))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/hls.rs"]
mod tests;
