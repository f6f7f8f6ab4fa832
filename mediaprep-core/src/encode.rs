pub(crate) mod ffmpeg;
pub(crate) mod hls;
