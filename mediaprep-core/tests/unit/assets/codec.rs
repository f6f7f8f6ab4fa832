use std::{io::Cursor, path::PathBuf};

use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_codec").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn decode_converts_rgb_png_to_opaque_rgba() {
    let img = image::RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    let buf = decode_rgba(&bytes).unwrap();
    assert_eq!(buf.dimensions(), (2, 1));
    assert_eq!(buf.as_raw(), &[10, 20, 30, 255, 40, 50, 60, 255]);
}

#[test]
fn save_then_load_preserves_alpha() {
    let dir = scratch("save_load");
    let path = dir.join("nested").join("out.png");
    let buf = PixelBuffer::from_pixels(2, 1, &[[255, 255, 255, 0], [1, 2, 3, 200]]).unwrap();

    save_png(&buf, &path).unwrap();
    assert_eq!(load_rgba(&path).unwrap(), buf);
}

#[test]
fn missing_file_reports_not_found() {
    let err = load_rgba(Path::new("target/unit_codec/definitely-missing.png")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn corrupt_file_reports_decode_error() {
    let dir = scratch("corrupt");
    let path = dir.join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let err = load_rgba(&path).unwrap_err();
    assert!(matches!(err, MediaprepError::Other(_)));
    assert!(err.to_string().contains("broken.png"));
}
