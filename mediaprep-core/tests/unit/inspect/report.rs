use std::path::PathBuf;

use super::*;

#[test]
fn samples_cover_corners_and_center() {
    let mut buf = PixelBuffer::filled(5, 3, [0, 0, 0, 255]).unwrap();
    buf.set_pixel(0, 0, [1, 0, 0, 255]).unwrap();
    buf.set_pixel(4, 0, [2, 0, 0, 255]).unwrap();
    buf.set_pixel(0, 2, [3, 0, 0, 255]).unwrap();
    buf.set_pixel(4, 2, [4, 0, 0, 255]).unwrap();
    buf.set_pixel(2, 1, [5, 0, 0, 255]).unwrap();

    let s = sample_pixels(&buf);
    assert_eq!(
        s.corners,
        [[1, 0, 0, 255], [2, 0, 0, 255], [3, 0, 0, 255], [4, 0, 0, 255]]
    );
    assert_eq!(s.center, [5, 0, 0, 255]);
}

#[test]
fn top_colors_sorted_by_frequency() {
    let beige = [225, 221, 214, 255];
    let white = [255, 255, 255, 255];
    let mut px = vec![beige; 6];
    px.extend([white; 3]);
    px.push([0, 0, 0, 255]);
    let buf = PixelBuffer::from_pixels(10, 1, &px).unwrap();

    let top = top_colors(&buf, 2).unwrap();
    assert_eq!(
        top,
        vec![
            ColorCount {
                count: 6,
                rgba: beige
            },
            ColorCount {
                count: 3,
                rgba: white
            },
        ]
    );
}

#[test]
fn large_palettes_are_not_counted() {
    let px: Vec<Rgba8> = (0..=MAX_COUNTED_COLORS as u32)
        .map(|i| [(i % 256) as u8, (i / 256) as u8, 0, 255])
        .collect();
    let buf = PixelBuffer::from_pixels(px.len() as u32, 1, &px).unwrap();
    assert!(top_colors(&buf, TOP_COLORS).is_none());
}

#[test]
fn inspect_file_reports_format_and_mode() {
    let dir = PathBuf::from("target").join("unit_inspect");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("logo.png");
    image::RgbImage::from_pixel(4, 2, image::Rgb([225, 221, 214]))
        .save(&path)
        .unwrap();

    let report = inspect_file(&path).unwrap();
    assert_eq!(report.file_name, "logo.png");
    assert_eq!(report.format.as_deref(), Some("PNG"));
    assert_eq!(report.color_type, "Rgb8");
    assert_eq!((report.width, report.height), (4, 2));
    assert_eq!(report.samples.center, [225, 221, 214, 255]);

    let text = report.to_string();
    assert!(text.starts_with("--- logo.png ---"));
    assert!(text.contains("Size: 4x2"));
    assert!(text.contains("8 x [225, 221, 214, 255]"));
}

#[test]
fn inspect_missing_file_is_not_found() {
    assert!(
        inspect_file(Path::new("target/unit_inspect/nope.png"))
            .unwrap_err()
            .is_not_found()
    );
}
