use std::fs;
use std::path::Path;

use dataset::{
    build_manifests, load_manifest, move_tree, rename_tree, split_dataset, ConflictPolicy,
    SplitOptions, SplitRatios,
};
use tempfile::TempDir;
use utils::ExtensionSet;

fn write_clip(path: &Path, tag: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, tag).unwrap();
}

fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn seed_corpus(root: &Path, count: usize) {
    for i in 0..count {
        let sub = if i % 2 == 0 { "cam_a" } else { "cam_b/day2" };
        write_clip(&root.join(sub).join(format!("clip_{:02}.mp4", i)), &i.to_string());
    }
}

#[test]
fn test_split_ten_clips() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("raw");
    let dst = tmp.path().join("staged");
    seed_corpus(&src, 10);

    let mut opts = SplitOptions::new(&src, &dst);
    opts.ratios = SplitRatios::new(0.7, 0.15, 0.15);
    opts.seed = 42;

    let summary = split_dataset(&opts).unwrap();

    assert_eq!((summary.train, summary.val, summary.test), (7, 1, 2));
    assert_eq!(list_names(&dst.join("train/superstitious")).len(), 7);
    assert_eq!(list_names(&dst.join("val/superstitious")).len(), 1);
    assert_eq!(list_names(&dst.join("test/superstitious")).len(), 2);

    let mut all: Vec<String> = ["train", "val", "test"]
        .iter()
        .flat_map(|s| list_names(&dst.join(s).join("superstitious")))
        .collect();
    all.sort();
    let expected: Vec<String> = (0..10).map(|i| format!("clip_{:02}.mp4", i)).collect();
    assert_eq!(all, expected);

    assert!(utils::scan(&src, &ExtensionSet::videos()).unwrap().is_empty());
}

#[test]
fn test_split_is_reproducible() {
    let runs: Vec<Vec<String>> = (0..2)
        .map(|_| {
            let tmp = TempDir::new().unwrap();
            let src = tmp.path().join("raw");
            let dst = tmp.path().join("staged");
            seed_corpus(&src, 20);

            split_dataset(&SplitOptions::new(&src, &dst)).unwrap();
            list_names(&dst.join("train/superstitious"))
        })
        .collect();

    assert_eq!(runs[0], runs[1]);
}

#[test]
fn test_split_empty_source() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("raw");
    fs::create_dir_all(&src).unwrap();
    let dst = tmp.path().join("staged");

    let summary = split_dataset(&SplitOptions::new(&src, &dst)).unwrap();

    assert_eq!((summary.train, summary.val, summary.test), (0, 0, 0));
    assert!(dst.join("test/superstitious").is_dir());
}

#[test]
fn test_split_duplicate_basenames_move_nothing() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("raw");
    let dst = tmp.path().join("staged");
    for i in 0..6 {
        write_clip(&src.join(format!("cam_{}", i)).join("same.mp4"), &i.to_string());
    }

    let err = split_dataset(&SplitOptions::new(&src, &dst)).unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    assert_eq!(utils::scan(&src, &ExtensionSet::videos()).unwrap().len(), 6);
    assert!(!dst.exists());
}

#[test]
fn test_split_duplicate_basenames_overwrite_loses_files() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("raw");
    let dst = tmp.path().join("staged");
    for i in 0..4 {
        write_clip(&src.join(format!("cam_{}", i)).join("same.mp4"), &i.to_string());
    }

    let mut opts = SplitOptions::new(&src, &dst);
    opts.ratios = SplitRatios::new(1.0, 0.0, 0.0);
    opts.conflict = ConflictPolicy::Overwrite;
    let summary = split_dataset(&opts).unwrap();

    assert_eq!(summary.train, 4);
    assert_eq!(list_names(&dst.join("train/superstitious")), vec!["same.mp4"]);
}

#[test]
fn test_split_rejects_bad_ratios_before_touching_files() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("raw");
    seed_corpus(&src, 4);

    let mut opts = SplitOptions::new(&src, tmp.path().join("staged"));
    opts.ratios = SplitRatios::new(0.9, 0.2, 0.0);

    let err = split_dataset(&opts).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert_eq!(utils::scan(&src, &ExtensionSet::videos()).unwrap().len(), 4);
}

#[test]
fn test_full_staging_flow() {
    let tmp = TempDir::new().unwrap();
    let raw = tmp.path().join("raw");
    let flat = tmp.path().join("flat");
    let data = tmp.path().join("data");
    let manifests = tmp.path().join("manifests");
    seed_corpus(&raw, 10);

    let moved = move_tree(&raw, &flat, &ExtensionSet::mp4(), ConflictPolicy::Fail).unwrap();
    assert_eq!(moved.moved, 10);

    let mut opts = SplitOptions::new(&flat, &data);
    opts.subfolder = "normal".to_string();
    split_dataset(&opts).unwrap();

    let renamed = rename_tree(&data, &ExtensionSet::mp4()).unwrap();
    assert_eq!(renamed.groups, 3);
    assert_eq!(renamed.renamed, 10);
    assert_eq!(
        list_names(&data.join("test/normal")),
        vec!["test_normal_0.mp4", "test_normal_1.mp4"]
    );

    let summaries = build_manifests(&data, &manifests).unwrap();
    let counts: Vec<(String, usize)> = summaries
        .iter()
        .map(|s| (s.split.clone(), s.entries))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("test".to_string(), 2),
            ("train".to_string(), 7),
            ("val".to_string(), 1),
        ]
    );

    let train = load_manifest(&manifests.join("train.json")).unwrap();
    for (key, entry) in &train {
        assert!(key.starts_with("normal_train_normal_"));
        assert_eq!(entry.label, "normal");
        assert!(Path::new(&entry.url).is_file());
    }
}
