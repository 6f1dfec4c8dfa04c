use super::*;

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_pick_primary_prefers_folder_prefix() {
    let files = names(&["turntable.mp4", "ur12345_spin.mp4"]);
    assert_eq!(pick_primary("UR12345", &files), "ur12345_spin.mp4");
}

#[test]
fn test_pick_primary_falls_back_to_first() {
    let files = names(&["b.mp4", "a.mp4"]);
    assert_eq!(pick_primary("UR12345", &files), "b.mp4");
}

#[test]
fn test_pick_primary_is_case_insensitive() {
    let files = names(&["other.mp4", "UR1.mp4"]);
    assert_eq!(pick_primary("ur1", &files), "UR1.mp4");
}

#[test]
fn test_has_video_extension() {
    let exts = names(&["mp4"]);
    assert!(has_video_extension("clip.MP4", &exts));
    assert!(has_video_extension("clip.mp4", &exts));
    assert!(!has_video_extension("clip.mov", &exts));
    assert!(!has_video_extension("clipmp4", &exts));
}

#[test]
fn test_insert_folder_adds_both_keys() {
    let mut index = VideoIndex::default();
    index.insert_folder(VideoEntry {
        folder: "ur12345-x".to_string(),
        file: "a.mp4".to_string(),
        all_files: names(&["a.mp4"]),
    });
    assert_eq!(index.len(), 2);
    assert!(index.get("UR12345").is_some());
    assert!(index.get("UR12345-X").is_some());
    assert_eq!(index.unique_folders(), 1);
}

#[test]
fn test_insert_folder_without_suffix_shares_key() {
    let mut index = VideoIndex::default();
    index.insert_folder(VideoEntry {
        folder: "UR1".to_string(),
        file: "UR1.mp4".to_string(),
        all_files: names(&["UR1.mp4"]),
    });
    assert_eq!(index.len(), 1);
}
