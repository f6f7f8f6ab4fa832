//! mediaprep prepares static media for a web site: brand logos, profile icons
//! and the hero background video.
//!
//! # Pieces
//!
//! - **Background keying**: classify each pixel as near-white by a per-channel
//!   threshold and replace it with transparency or a solid brand color
//!   ([`replace_background`], [`run_batch`]).
//! - **Icon compositing**: stack a resized hat layer on a face layer and crop to
//!   content ([`compose_icon`]).
//! - **Inspection**: format, color model and pixel samples ([`inspect_file`]).
//! - **Video**: fixed ffmpeg invocations for HLS, fast-start MP4, a tone-mapped
//!   fallback MP4 and a poster frame, plus `#EXT-X-TARGETDURATION` repair
//!   ([`run_hero_pipeline`], [`rewrite_target_duration`]).
//!
//! Pixel transforms are pure and operate on an in-memory [`PixelBuffer`].
//! File IO happens at the edges through the `image` crate and the system
//! `ffmpeg` binary.
#![forbid(unsafe_code)]

mod assets;
mod background;
mod compose;
mod encode;
mod foundation;
mod inspect;
mod pipeline;

pub use assets::codec::{decode_rgba, ensure_parent_dir, load_rgba, save_png};
pub use background::batch::{
    AssetPair, BatchItem, BatchReport, CLIENT_LOGOS, ItemOutcome, process_file, run_batch,
};
pub use background::classify::{
    BackgroundOp, BackgroundRule, Replacement, Selection, TRANSPARENT_SENTINEL,
    replace_background, replace_background_in_place,
};
pub use compose::icon::{BoundingBox, IconLayout, compose_icon, compose_icon_files, content_bbox};
pub use encode::ffmpeg::{
    FFMPEG_ENV, FfmpegTool, HlsConfig, HlsPreset, PLAYLIST_NAME, SEGMENT_PATTERN, TONEMAP_FILTER,
    fallback_mp4_args, faststart_mp4_args, hls_args, playlist_path, poster_args,
};
pub use encode::hls::{
    ManifestRewrite, fix_target_duration, max_segment_duration, rewrite_target_duration,
    target_duration_for,
};
pub use foundation::buffer::PixelBuffer;
pub use foundation::core::{RgbColor, Rgba8, Threshold};
pub use foundation::error::{MediaprepError, MediaprepResult};
pub use inspect::report::{
    ColorCount, ImageReport, MAX_COUNTED_COLORS, PixelSamples, TOP_COLORS, inspect_file,
    sample_pixels, top_colors,
};
pub use pipeline::video::{
    HeroJob, HeroReport, StageOutcome, VIDEO_EXTENSIONS, clear_directory_files,
    convert_to_faststart_mp4, convert_to_hls, resolve_input, run_hero_pipeline,
};
