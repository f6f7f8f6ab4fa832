use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    assets::codec::{load_rgba, save_png},
    background::classify::{BackgroundOp, replace_background_in_place},
    foundation::error::MediaprepResult,
};

/// One source capture and the brand asset name it is published under.
pub type AssetPair = (&'static str, &'static str);

/// Client logo captures and their published names.
pub const CLIENT_LOGOS: &[AssetPair] = &[
    ("2024-11-22-12.20.41.png", "yauza.png"),
    ("2024-11-22-12.21.08.png", "wa-garden.png"),
    ("2024-11-22-12.21.14.png", "padron.png"),
    ("2024-11-22-12.21.20.png", "hitsunov.png"),
    ("2024-11-22-12.21.25.png", "margarita.png"),
    ("2024-11-22-12.21.30.png", "sei.png"),
    ("2024-11-22-12.21.34.png", "korobok.png"),
    ("2024-11-22-12.21.39.png", "345.png"),
    ("2024-11-22-12.21.43.png", "white-rabbit.png"),
    ("2024-11-22-12.21.48.png", "loona.png"),
    ("2024-11-22-12.21.55.png", "selfie.png"),
    ("2024-11-22-12.22.01.png", "peach.png"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    Processed { replaced_pixels: usize },
    Skipped,
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct BatchItem {
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: ItemOutcome,
}

#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// In mapping order.
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Processed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped))
    }

    pub fn failures(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    fn count(&self, f: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| f(&i.outcome)).count()
    }
}

/// Apply `op` to every `(source, target)` pair.
///
/// Only a failure to create `dst_dir` aborts the batch. Each pair is otherwise
/// independent: a missing source is skipped and a codec error is recorded.
#[tracing::instrument(skip(mapping), fields(items = mapping.len()))]
pub fn run_batch(
    src_dir: &Path,
    dst_dir: &Path,
    mapping: &[AssetPair],
    op: &BackgroundOp,
) -> MediaprepResult<BatchReport> {
    std::fs::create_dir_all(dst_dir)
        .with_context(|| format!("create target directory '{}'", dst_dir.display()))?;

    let items = mapping
        .par_iter()
        .map(|(src, dst)| {
            let source = src_dir.join(src);
            let target = dst_dir.join(dst);
            let outcome = process_one(&source, &target, op);
            BatchItem {
                source,
                target,
                outcome,
            }
        })
        .collect();

    Ok(BatchReport { items })
}

/// Decode `source`, apply `op` and write the result to `target` as PNG.
///
/// Returns the number of replaced pixels.
pub fn process_file(source: &Path, target: &Path, op: &BackgroundOp) -> MediaprepResult<usize> {
    let mut buf = load_rgba(source)?;
    let replaced = replace_background_in_place(&mut buf, op);
    save_png(&buf, target)?;
    Ok(replaced)
}

fn process_one(source: &Path, target: &Path, op: &BackgroundOp) -> ItemOutcome {
    if !source.is_file() {
        tracing::warn!("source file not found: {}", source.display());
        return ItemOutcome::Skipped;
    }

    match process_file(source, target, op) {
        Ok(replaced_pixels) => {
            tracing::info!(replaced_pixels, "processed: {}", target.display());
            ItemOutcome::Processed { replaced_pixels }
        }
        Err(e) => {
            tracing::error!("error processing {}: {e:#}", source.display());
            ItemOutcome::Failed(format!("{e:#}"))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/background/batch.rs"]
mod tests;
