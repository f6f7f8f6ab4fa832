use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "mediaprep", version, about = "Prepare site images and videos")]
struct Cli {
    /// Enable debug logging (includes full ffmpeg command lines).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// ffmpeg executable. Defaults to $MEDIAPREP_FFMPEG, then `ffmpeg` on PATH.
    #[arg(long, global = true)]
    ffmpeg: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace near-white backgrounds of the client logos with a solid color.
    Recolor(RecolorArgs),
    /// Make near-white backgrounds of the client logos transparent.
    RemoveBg(RemoveBgArgs),
    /// Keep only near-white content of one image; everything else becomes transparent.
    Isolate(IsolateArgs),
    /// Stack the chef hat on the face icon.
    ComposeIcon(ComposeIconArgs),
    /// Print format, color model and pixel samples of images.
    Inspect(InspectArgs),
    /// Segment a video into an HLS playlist (requires `ffmpeg`).
    Hls(HlsArgs),
    /// Re-encode a video to a fast-start MP4 without audio (requires `ffmpeg`).
    Optimize(OptimizeArgs),
    /// Hero video job: HLS, manifest fix, fallback MP4 and poster (requires `ffmpeg`).
    Hero(HeroArgs),
}

#[derive(Args, Debug)]
struct BatchDirs {
    /// Directory holding the original captures.
    #[arg(long, default_value = "foto")]
    src_dir: PathBuf,

    /// Directory the brand assets are written to (created if missing).
    #[arg(long, default_value = "public/images/clients")]
    dst_dir: PathBuf,
}

#[derive(Args, Debug)]
struct RecolorArgs {
    #[command(flatten)]
    dirs: BatchDirs,

    /// Channels must all exceed this value (0-255) for a pixel to be recolored.
    #[arg(long, default_value_t = 230, allow_negative_numbers = true)]
    threshold: i64,

    /// Replacement color as #RRGGBB or r,g,b.
    #[arg(long, default_value = "#E1DDD6")]
    color: mediaprep::RgbColor,
}

#[derive(Args, Debug)]
struct RemoveBgArgs {
    #[command(flatten)]
    dirs: BatchDirs,

    /// Channels must all exceed this value (0-255) for a pixel to become transparent.
    #[arg(long, default_value_t = 200, allow_negative_numbers = true)]
    threshold: i64,
}

#[derive(Args, Debug)]
struct IsolateArgs {
    #[arg(long = "in", default_value = "foto/2024-11-22-12.22.01.png")]
    in_path: PathBuf,

    #[arg(long, default_value = "public/images/clients/peach.png")]
    out: PathBuf,

    /// Pixels with every channel above this value (0-255) are kept.
    #[arg(long, default_value_t = 240, allow_negative_numbers = true)]
    threshold: i64,
}

#[derive(Args, Debug)]
struct ComposeIconArgs {
    #[arg(long, default_value = "public/images/icons8-счастливый-48.png")]
    face: PathBuf,

    #[arg(long, default_value = "public/images/profile-chef.png")]
    hat: PathBuf,

    #[arg(long, default_value = "public/images/profile-chef-happy-v2.png")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Images to inspect.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Emit one JSON object per image instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct HlsArgs {
    #[arg(long = "in", default_value = "public/videos/hero-video.mov")]
    in_path: PathBuf,

    #[arg(long, default_value = "public/videos/hls")]
    out_dir: PathBuf,

    /// Target segment duration in seconds.
    #[arg(long, default_value_t = 0.5)]
    segment_time: f64,
}

#[derive(Args, Debug)]
struct OptimizeArgs {
    #[arg(long = "in", default_value = "public/videos/hero-video.mov")]
    in_path: PathBuf,

    #[arg(long, default_value = "public/videos/hero-optimized.mp4")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct HeroArgs {
    /// Directory containing the hero video and receiving all outputs.
    #[arg(long, default_value = "public/videos")]
    videos_dir: PathBuf,

    /// Source video. Defaults to `<videos-dir>/hero-optimized.webm`.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Target HLS segment duration in seconds.
    #[arg(long, default_value_t = 0.5)]
    segment_time: f64,

    /// Length of the fallback MP4 in seconds.
    #[arg(long, default_value_t = 12)]
    fallback_secs: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let tool = cli
        .ffmpeg
        .map(mediaprep::FfmpegTool::new)
        .unwrap_or_else(mediaprep::FfmpegTool::from_env);

    match cli.cmd {
        Command::Recolor(args) => {
            let op = mediaprep::BackgroundOp::to_solid(
                mediaprep::Threshold::new(args.threshold)?,
                args.color,
            );
            cmd_batch(&args.dirs, &op)
        }
        Command::RemoveBg(args) => {
            let op =
                mediaprep::BackgroundOp::to_transparent(mediaprep::Threshold::new(args.threshold)?);
            cmd_batch(&args.dirs, &op)
        }
        Command::Isolate(args) => cmd_isolate(args),
        Command::ComposeIcon(args) => cmd_compose_icon(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Hls(args) => cmd_hls(&tool, args),
        Command::Optimize(args) => cmd_optimize(&tool, args),
        Command::Hero(args) => cmd_hero(&tool, args),
    }
}

fn cmd_batch(dirs: &BatchDirs, op: &mediaprep::BackgroundOp) -> anyhow::Result<()> {
    let report = mediaprep::run_batch(&dirs.src_dir, &dirs.dst_dir, mediaprep::CLIENT_LOGOS, op)?;
    tracing::info!(
        processed = report.processed(),
        skipped = report.skipped(),
        failed = report.failures(),
        "batch finished"
    );
    if report.failures() > 0 {
        anyhow::bail!(
            "{} of {} images failed",
            report.failures(),
            report.items.len()
        );
    }
    Ok(())
}

fn cmd_isolate(args: IsolateArgs) -> anyhow::Result<()> {
    let op = mediaprep::BackgroundOp::isolate_light(mediaprep::Threshold::new(args.threshold)?);
    let replaced = mediaprep::process_file(&args.in_path, &args.out, &op)
        .with_context(|| format!("isolate '{}'", args.in_path.display()))?;
    tracing::info!(replaced, "successfully processed logo to {}", args.out.display());
    Ok(())
}

fn cmd_compose_icon(args: ComposeIconArgs) -> anyhow::Result<()> {
    mediaprep::compose_icon_files(
        &args.face,
        &args.hat,
        &args.out,
        &mediaprep::IconLayout::default(),
    )?;
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let mut failed = 0usize;
    for path in &args.paths {
        match inspect_one(path, args.json) {
            Ok(()) => {}
            Err(e) => {
                failed += 1;
                tracing::error!("error inspecting {}: {e:#}", path.display());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} images could not be inspected", args.paths.len());
    }
    Ok(())
}

fn inspect_one(path: &Path, json: bool) -> anyhow::Result<()> {
    let report = mediaprep::inspect_file(path)?;
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let sha = sha256_hex(&bytes);

    if json {
        let mut value = serde_json::to_value(&report).context("serialize image report")?;
        value["sha256"] = serde_json::Value::String(sha);
        println!("{value}");
    } else {
        println!("{report}");
        println!("SHA-256: {sha}");
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn cmd_hls(tool: &mediaprep::FfmpegTool, args: HlsArgs) -> anyhow::Result<()> {
    tracing::info!("input: {}", args.in_path.display());
    tracing::info!("output: {}", args.out_dir.display());
    let cfg = mediaprep::HlsConfig {
        preset: mediaprep::HlsPreset::Streaming,
        segment_time: args.segment_time,
    };
    let playlist = mediaprep::convert_to_hls(tool, &args.in_path, &args.out_dir, &cfg)?;
    tracing::info!("conversion completed, playlist: {}", playlist.display());
    Ok(())
}

fn cmd_optimize(tool: &mediaprep::FfmpegTool, args: OptimizeArgs) -> anyhow::Result<()> {
    tracing::info!("input: {}", args.in_path.display());
    tracing::info!("output: {}", args.out.display());
    mediaprep::convert_to_faststart_mp4(tool, &args.in_path, &args.out)?;
    tracing::info!("conversion completed: {}", args.out.display());
    Ok(())
}

fn cmd_hero(tool: &mediaprep::FfmpegTool, args: HeroArgs) -> anyhow::Result<()> {
    let mut job = mediaprep::HeroJob::in_videos_dir(&args.videos_dir);
    if let Some(input) = args.in_path {
        job.input = input;
    }
    job.segment_time = args.segment_time;
    job.fallback_duration_secs = args.fallback_secs;

    let report = mediaprep::run_hero_pipeline(tool, &job)?;
    if report.has_failures() {
        anyhow::bail!(
            "hero video job finished with errors (manifest: {:?}, fallback: {:?}, poster: {:?})",
            report.manifest,
            report.fallback_mp4,
            report.poster
        );
    }
    Ok(())
}
