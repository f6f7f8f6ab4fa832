use std::path::PathBuf;

use super::*;
use crate::foundation::{buffer::PixelBuffer, core::Threshold};

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_batch").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_logo(path: &Path) {
    let buf = PixelBuffer::from_pixels(
        2,
        1,
        &[[250, 250, 250, 255], [20, 40, 60, 255]],
    )
    .unwrap();
    save_png(&buf, path).unwrap();
}

#[test]
fn client_logo_table_is_fixed() {
    assert_eq!(CLIENT_LOGOS.len(), 12);
    assert_eq!(CLIENT_LOGOS[0], ("2024-11-22-12.20.41.png", "yauza.png"));
    assert_eq!(CLIENT_LOGOS[11], ("2024-11-22-12.22.01.png", "peach.png"));
}

#[test]
fn one_bad_item_does_not_stop_the_batch() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let root = scratch("mixed");
    let src = root.join("foto");
    let dst = root.join("public").join("images").join("clients");
    std::fs::create_dir_all(&src).unwrap();

    write_logo(&src.join("a.png"));
    std::fs::write(src.join("corrupt.png"), b"garbage").unwrap();
    write_logo(&src.join("c.png"));

    let mapping: &[AssetPair] = &[
        ("a.png", "alpha.png"),
        ("missing.png", "beta.png"),
        ("corrupt.png", "gamma.png"),
        ("c.png", "delta.png"),
    ];
    let op = BackgroundOp::to_transparent(Threshold::from_u8(200));
    let report = run_batch(&src, &dst, mapping, &op).unwrap();

    assert_eq!(report.items.len(), 4);
    assert_eq!(report.processed(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failures(), 1);

    assert_eq!(
        report.items[0].outcome,
        ItemOutcome::Processed { replaced_pixels: 1 }
    );
    assert_eq!(report.items[1].outcome, ItemOutcome::Skipped);
    assert!(matches!(report.items[2].outcome, ItemOutcome::Failed(_)));
    assert_eq!(report.items[3].target, dst.join("delta.png"));

    let out = load_rgba(&dst.join("delta.png")).unwrap();
    assert_eq!(out.pixel(0, 0), Some([255, 255, 255, 0]));
    assert_eq!(out.pixel(1, 0), Some([20, 40, 60, 255]));
    assert!(!dst.join("beta.png").exists());
    assert!(!dst.join("gamma.png").exists());
}

#[test]
fn target_directory_is_created_even_when_nothing_matches() {
    let root = scratch("empty");
    let dst = root.join("out").join("clients");
    let op = BackgroundOp::to_transparent(Threshold::from_u8(200));

    let report = run_batch(&root.join("foto"), &dst, CLIENT_LOGOS, &op).unwrap();
    assert!(dst.is_dir());
    assert_eq!(report.skipped(), CLIENT_LOGOS.len());
}
