// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! End-to-end batches against temporary download directories

use std::fs;
use std::path::Path;

use videosort::{BatchJob, BatchOutcome, SceneNameEngine, SortConfig, Sorter};

fn config_for(root: &Path) -> SortConfig {
    let mut config = SortConfig::default();
    config.destinations.movies = root.join("movies").display().to_string();
    config.destinations.series = root.join("tv").display().to_string();
    config.formats.series = "%sn/Season %s/%sn - S%0sE%0e".to_string();
    config.rules.min_size_mb = 0;
    config
}

fn write_mib(path: &Path, mib: usize) {
    fs::write(path, vec![0u8; mib << 20]).unwrap();
}

#[test]
fn test_series_with_subtitle_is_sorted_and_cleaned_up() {
    let root = tempfile::tempdir().unwrap();
    let download = root.path().join("The.Show.S01E02.720p");
    fs::create_dir(&download).unwrap();
    fs::write(download.join("The.Show.S01E02.720p.HDTV.x264-GRP.mkv"), "video").unwrap();
    fs::write(download.join("The.Show.S01E02.720p.HDTV.x264-GRP.srt"), "sub").unwrap();

    let config = config_for(root.path());
    let report = Sorter::new(&config, &SceneNameEngine).run(&BatchJob::new(&download));

    assert_eq!(report.outcome, BatchOutcome::Success);
    assert_eq!(report.outcome.exit_code(), 93);

    let season = root.path().join("tv/The Show/Season 1");
    assert!(season.join("The Show - S01E02.mkv").is_file());
    assert!(season.join("The Show - S01E02.srt").is_file());
    assert_eq!(report.moves.len(), 2);
    assert_eq!(report.final_dirs, vec![season]);
    assert!(!download.exists());
}

#[test]
fn test_preview_leaves_files_in_place() {
    let root = tempfile::tempdir().unwrap();
    let download = root.path().join("Movie.Title.2010");
    fs::create_dir(&download).unwrap();
    let video = download.join("Movie.Title.2010.mkv");
    fs::write(&video, "video").unwrap();

    let mut config = config_for(root.path());
    config.rules.preview = true;
    config.rules.overwrite = true;
    let report = Sorter::new(&config, &SceneNameEngine).run(&BatchJob::new(&download));

    assert_eq!(report.outcome, BatchOutcome::Success);
    assert_eq!(report.moves.len(), 1);
    assert_eq!(
        report.moves[0].destination,
        root.path().join("movies/Movie Title (2010).mkv")
    );
    assert!(video.is_file());
    assert!(!root.path().join("movies").exists());
}

#[test]
fn test_cleanup_keeps_directory_with_large_leftovers() {
    let root = tempfile::tempdir().unwrap();
    let download = root.path().join("Movie.Title.2010");
    fs::create_dir(&download).unwrap();
    write_mib(&download.join("Movie.Title.2010.mkv"), 1);
    write_mib(&download.join("extras.bin"), 1);

    let mut config = config_for(root.path());
    config.rules.min_size_mb = 1;
    let report = Sorter::new(&config, &SceneNameEngine).run(&BatchJob::new(&download));

    assert_eq!(report.outcome, BatchOutcome::Success);
    assert!(root.path().join("movies/Movie Title (2010).mkv").is_file());
    assert!(download.join("extras.bin").is_file());
}

#[test]
fn test_cleanup_removes_small_leftovers() {
    let root = tempfile::tempdir().unwrap();
    let download = root.path().join("Movie.Title.2010");
    fs::create_dir(&download).unwrap();
    write_mib(&download.join("Movie.Title.2010.mkv"), 1);
    fs::write(download.join("release.txt"), "notes").unwrap();
    // Under the minimum size, so never sorted
    fs::write(download.join("sample.mkv"), "tiny").unwrap();

    let mut config = config_for(root.path());
    config.rules.min_size_mb = 1;
    let report = Sorter::new(&config, &SceneNameEngine).run(&BatchJob::new(&download));

    assert_eq!(report.outcome, BatchOutcome::Success);
    assert_eq!(report.moves.len(), 1);
    assert!(!download.exists());
}

#[test]
fn test_nothing_to_move() {
    let root = tempfile::tempdir().unwrap();
    let download = root.path().join("Some.Download");
    fs::create_dir(&download).unwrap();
    fs::write(download.join("readme.txt"), "text").unwrap();

    let config = config_for(root.path());
    let report = Sorter::new(&config, &SceneNameEngine).run(&BatchJob::new(&download));

    assert_eq!(report.outcome, BatchOutcome::NothingMoved);
    assert_eq!(report.outcome.exit_code(), 95);
    assert!(report.moves.is_empty());
    assert!(download.join("readme.txt").is_file());
}

#[test]
fn test_same_destination_in_one_batch_gets_suffix() {
    let root = tempfile::tempdir().unwrap();
    let download = root.path().join("Movie.Title.2010");
    fs::create_dir(&download).unwrap();
    fs::write(download.join("Movie.Title.2010.mkv"), "first").unwrap();
    fs::write(download.join("Movie.Title.2010.720p.mkv"), "second").unwrap();

    let config = config_for(root.path());
    let mut output = Vec::new();
    let report = Sorter::new(&config, &SceneNameEngine)
        .run_with_output(&BatchJob::new(&download), &mut output);

    assert_eq!(report.outcome, BatchOutcome::Success);
    let movies = root.path().join("movies");
    let first = movies.join("Movie Title (2010).mkv");
    let second = movies.join("Movie Title (2010) (2).mkv");
    assert!(first.is_file());
    assert!(second.is_file());

    // Host lines name the paths the files actually landed on
    let output = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("destination path: {}", first.display()),
            format!("destination path: {}", second.display()),
            format!("[NZB] FINALDIR={}", movies.display()),
        ]
    );
}

#[test]
fn test_unwritable_destination_fails_batch() {
    let root = tempfile::tempdir().unwrap();
    let download = root.path().join("Movie.Title.2010");
    fs::create_dir(&download).unwrap();
    let video = download.join("Movie.Title.2010.mkv");
    fs::write(&video, "video").unwrap();

    let blocker = root.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();
    let mut config = config_for(root.path());
    config.destinations.movies = blocker.display().to_string();

    let report = Sorter::new(&config, &SceneNameEngine).run(&BatchJob::new(&download));

    assert_eq!(report.outcome, BatchOutcome::Failed);
    assert_eq!(report.outcome.exit_code(), 94);
    assert!(video.is_file());
}
