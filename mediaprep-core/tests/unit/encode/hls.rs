use std::path::PathBuf;

use super::*;

const HALF_SECOND: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:1
#EXT-X-MEDIA-SEQUENCE:0
#EXTINF:0.500000,
segment_000.ts
#EXTINF:0.480000,
segment_001.ts
#EXT-X-ENDLIST
";

#[test]
fn max_duration_scans_extinf_lines() {
    assert_eq!(max_segment_duration(HALF_SECOND), Some(0.5));
    assert_eq!(max_segment_duration("#EXTM3U\n"), None);
    assert_eq!(
        max_segment_duration("#EXTINF:abc,\n#EXTINF:0.25,title\n"),
        Some(0.25)
    );
}

#[test]
fn half_second_segments_keep_target_of_one() {
    let rewrite = rewrite_target_duration(HALF_SECOND).unwrap();
    assert_eq!(rewrite.target_duration, 1);
    assert!(rewrite.text.contains("\n#EXT-X-TARGETDURATION:1\n"));
    assert_eq!(rewrite.text, HALF_SECOND);
}

#[test]
fn long_segment_rounds_target_up() {
    let manifest = HALF_SECOND.replace("#EXTINF:0.480000,", "#EXTINF:1.200000,");
    let rewrite = rewrite_target_duration(&manifest).unwrap();
    assert_eq!(rewrite.max_segment_secs, 1.2);
    assert_eq!(rewrite.target_duration, 2);
    assert!(rewrite.text.contains("#EXT-X-TARGETDURATION:2\n"));
    assert!(!rewrite.text.contains("#EXT-X-TARGETDURATION:1\n"));
}

#[test]
fn rewrite_is_idempotent() {
    let manifest = HALF_SECOND.replace("#EXT-X-TARGETDURATION:1", "#EXT-X-TARGETDURATION:7");
    let once = rewrite_target_duration(&manifest).unwrap().text;
    let twice = rewrite_target_duration(&once).unwrap().text;
    assert_eq!(once, twice);
}

#[test]
fn manifests_without_positive_segments_are_left_alone() {
    assert!(rewrite_target_duration("#EXTM3U\n#EXT-X-TARGETDURATION:4\n").is_none());
    assert!(rewrite_target_duration("#EXTM3U\n#EXTINF:0.0,\na.ts\n").is_none());
}

#[test]
fn target_never_drops_below_one() {
    assert_eq!(target_duration_for(0.01), 1);
    assert_eq!(target_duration_for(2.0), 2);
    assert_eq!(target_duration_for(2.0001), 3);
}

#[test]
fn fix_on_disk_rewrites_and_reports() {
    let dir = PathBuf::from("target").join("unit_hls");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("playlist.m3u8");
    std::fs::write(
        &path,
        HALF_SECOND.replace("#EXTINF:0.480000,", "#EXTINF:1.200000,"),
    )
    .unwrap();

    assert_eq!(fix_target_duration(&path).unwrap(), Some(2));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("#EXT-X-TARGETDURATION:2"));
}

#[test]
fn fix_reports_missing_and_malformed_manifests() {
    let dir = PathBuf::from("target").join("unit_hls");
    std::fs::create_dir_all(&dir).unwrap();

    assert!(
        fix_target_duration(&dir.join("absent.m3u8"))
            .unwrap_err()
            .is_not_found()
    );

    let bogus = dir.join("bogus.m3u8");
    std::fs::write(&bogus, "hello\n").unwrap();
    assert!(matches!(
        fix_target_duration(&bogus).unwrap_err(),
        MediaprepError::Manifest(_)
    ));
}
