//! Integration tests for the walkpool-walker crate.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use test_case::test_case;
use walkpool_walker::prelude::*;

/// Create `test1.txt`, `test2.txt` and `sub/test3.txt` in a temporary directory.
fn create_test_directory() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::create_dir_all(temp_dir.path().join("sub")).expect("Failed to create subdirectory");

    for (filename, content) in [
        ("test1.txt", "foo"),
        ("test2.txt", "bar"),
        ("sub/test3.txt", "baz"),
    ] {
        fs::write(temp_dir.path().join(filename), content).expect("Failed to write test file");
    }

    temp_dir
}

fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    let root = root.canonicalize().expect("Failed to canonicalize root");
    paths
        .iter()
        .map(|path| {
            path.strip_prefix(&root)
                .expect("Resolved path outside root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn txt_config(dir: &TempDir) -> WalkConfig {
    WalkConfig::new()
        .with_root(dir.path())
        .with_pattern("**/*.txt")
}

#[tokio::test]
async fn test_recursive_pattern_resolves_all_files() {
    let dir = create_test_directory();
    let walk = Walk::new(txt_config(&dir));

    let paths = walk
        .run(|ctx| async move { Ok(ctx.filepath().to_path_buf()) })
        .await
        .expect("Walk failed");

    assert_eq!(
        relative(dir.path(), &paths),
        vec!["sub/test3.txt", "test1.txt", "test2.txt"]
    );
    assert_eq!(walk.progress().total, 3);
    assert!(paths.iter().all(|path| path.is_absolute()));
}

#[tokio::test]
async fn test_top_level_pattern_uppercases_in_place() {
    let dir = create_test_directory();
    let walk = Walk::new(WalkConfig::new().with_root(dir.path()).with_pattern("*.txt"));

    walk.run(|ctx| async move {
        let text = ctx.read().await?;
        ctx.write(&text.to_uppercase()).await?;
        Ok(())
    })
    .await
    .expect("Walk failed");

    assert_eq!(fs::read_to_string(dir.path().join("test1.txt")).unwrap(), "FOO");
    assert_eq!(fs::read_to_string(dir.path().join("test2.txt")).unwrap(), "BAR");
    assert_eq!(
        fs::read_to_string(dir.path().join("sub/test3.txt")).unwrap(),
        "baz"
    );
    assert_eq!(walk.progress().total, 2);
}

#[tokio::test]
async fn test_failing_processor_is_absorbed() {
    let dir = create_test_directory();
    let walk = Walk::new(txt_config(&dir));

    let report = walk
        .run_report(|ctx| async move {
            Err::<(), _>(anyhow::anyhow!("cannot handle {}", ctx.filepath().display()))
        })
        .await
        .expect("Per-file failures must not fail the run");

    assert_eq!(report.progress.failed, 3);
    assert_eq!(report.progress.success, 0);
    assert_eq!(report.progress.total, 3);
    assert!(report.results.is_empty());
    assert_eq!(report.failures.len(), 3);
    assert!(report.failures[0].error.contains("cannot handle"));
}

#[tokio::test]
async fn test_concurrency_admits_tasks_together() {
    let dir = create_test_directory();
    let walk = Walk::new(txt_config(&dir).with_concurrency(3));
    let starts = Arc::new(Mutex::new(Vec::new()));

    let recorded = Arc::clone(&starts);
    walk.run(move |_| {
        let recorded = Arc::clone(&recorded);
        async move {
            recorded.lock().unwrap().push(Instant::now());
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        }
    })
    .await
    .expect("Walk failed");

    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 3);
    let first = *starts.iter().min().unwrap();
    let last = *starts.iter().max().unwrap();
    assert!(last.duration_since(first) < Duration::from_millis(50));
}

#[tokio::test]
async fn test_ignore_pattern_skips_matching_files() {
    let dir = create_test_directory();
    let walk = Walk::new(
        txt_config(&dir).with_ignore(IgnoreRule::pattern("test2").expect("Invalid regex")),
    );

    let paths = walk
        .run(|ctx| async move { Ok(ctx.filepath().to_path_buf()) })
        .await
        .expect("Walk failed");

    assert_eq!(relative(dir.path(), &paths), vec!["sub/test3.txt", "test1.txt"]);
    let progress = walk.progress();
    assert_eq!(progress.total, 3);
    assert_eq!(progress.ignored, 1);
    assert_eq!(progress.success, 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("test2.txt")).unwrap(),
        "bar"
    );
}

#[tokio::test]
async fn test_node_modules_ignored_by_default() {
    let dir = create_test_directory();
    fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
    fs::write(dir.path().join("node_modules/pkg/index.txt"), "dep").unwrap();

    let walk = Walk::new(txt_config(&dir));
    let contents = walk
        .run(|ctx| async move { Ok(ctx.read().await?) })
        .await
        .expect("Walk failed");

    assert!(!contents.contains(&"dep".to_string()));
    assert_eq!(walk.progress().total, 4);
    assert_eq!(walk.progress().ignored, 1);
}

#[test_case(1; "serial")]
#[test_case(2; "pair")]
#[test_case(3; "matching file count")]
#[test_case(16; "more than files")]
#[tokio::test]
async fn test_counts_do_not_depend_on_concurrency(concurrency: usize) {
    let dir = create_test_directory();
    let walk = Walk::new(
        txt_config(&dir)
            .with_concurrency(concurrency)
            .with_ignore(IgnoreRule::pattern("test1").unwrap()),
    );

    walk.run(|ctx| async move {
        let text = ctx.read().await?;
        anyhow::ensure!(text != "bar", "bar is not allowed");
        Ok(text)
    })
    .await
    .expect("Walk failed");

    let progress = walk.progress();
    assert_eq!(
        progress,
        WalkProgress {
            total: 3,
            success: 1,
            failed: 1,
            ignored: 1
        }
    );
    assert_eq!(
        progress.success + progress.failed + progress.ignored,
        progress.total
    );
    assert!(progress.is_complete());
}

#[tokio::test]
async fn test_hooks_bracket_every_task() {
    let dir = create_test_directory();
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut walk = Walk::new(txt_config(&dir).with_concurrency(2));

    let log = Arc::clone(&events);
    walk.on_start(move |walk| {
        let log = Arc::clone(&log);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            log.lock()
                .unwrap()
                .push(format!("start:{}", walk.progress().total));
            Ok(())
        }
    });
    let log = Arc::clone(&events);
    walk.on_end(move |walk| {
        let log = Arc::clone(&log);
        async move {
            log.lock()
                .unwrap()
                .push(format!("end:{}", walk.progress().processed()));
            Ok(())
        }
    });
    let log = Arc::clone(&events);
    walk.on_progress(move |snapshot| {
        let log = Arc::clone(&log);
        async move {
            log.lock()
                .unwrap()
                .push(format!("progress:{}/{}", snapshot.processed, snapshot.total));
            Ok(())
        }
    });

    let log = Arc::clone(&events);
    walk.run(move |_| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push("task".to_string());
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(())
        }
    })
    .await
    .expect("Walk failed");

    assert_eq!(
        *events.lock().unwrap(),
        vec!["start:3", "task", "task", "task", "end:3", "progress:3/3"]
    );
}

#[tokio::test]
async fn test_progress_snapshot_carries_settings() {
    let dir = create_test_directory();
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let mut walk = Walk::new(txt_config(&dir).with_concurrency(2));

    let seen = Arc::clone(&snapshots);
    walk.on_progress(move |snapshot| {
        let seen = Arc::clone(&seen);
        async move {
            seen.lock().unwrap().push(serde_json::to_value(&snapshot)?);
            Ok(())
        }
    });

    walk.run(|_| async { Ok(()) }).await.expect("Walk failed");

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0]["pattern"], "**/*.txt");
    assert_eq!(snapshots[0]["concurrency"], 2);
    assert_eq!(snapshots[0]["processed"], 3);
    assert_eq!(snapshots[0]["total"], 3);
    assert_eq!(snapshots[0]["success"], 3);
    assert_eq!(snapshots[0]["failed"], 0);
}

#[tokio::test]
async fn test_panicking_processor_counts_as_failed() {
    let dir = create_test_directory();
    let walk = Walk::new(txt_config(&dir).with_concurrency(3));

    let report = walk
        .run_report(|ctx| async move {
            let text = ctx.read().await?;
            assert!(text != "bar", "processor panicked on bar");
            Ok(text)
        })
        .await
        .expect("A panic must not fail the run");

    assert_eq!(report.results, vec!["baz".to_string(), "foo".to_string()]);
    assert_eq!(report.progress.failed, 1);
    assert_eq!(report.progress.success, 2);
    assert!(report.failures[0].error.contains("processor panicked on bar"));
}

#[tokio::test]
async fn test_results_keep_resolution_order() {
    let dir = TempDir::new().unwrap();
    for index in 0..8 {
        fs::write(dir.path().join(format!("file{index}.txt")), index.to_string()).unwrap();
    }
    let walk = Walk::new(txt_config(&dir).with_concurrency(4));

    let values = walk
        .run(|ctx| async move {
            let value: u64 = ctx.read().await?.parse()?;
            // Later files finish first.
            tokio::time::sleep(Duration::from_millis(5 * (8 - value))).await;
            Ok(value)
        })
        .await
        .expect("Walk failed");

    assert_eq!(values, (0..8).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_failing_hook_does_not_abort_run() {
    let dir = create_test_directory();
    let ends = Arc::new(AtomicUsize::new(0));
    let mut walk = Walk::new(txt_config(&dir));

    walk.on_start(|_| async { Err(anyhow::anyhow!("start hook broke")) });
    let counter = Arc::clone(&ends);
    walk.on_end(move |_| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    let results = walk
        .run(|_| async { Ok(()) })
        .await
        .expect("Hook failures must not fail the run");

    assert_eq!(results.len(), 3);
    assert_eq!(ends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_panicking_hook_does_not_abort_run() {
    let dir = create_test_directory();
    let options = WalkOptions::new(txt_config(&dir))
        .on_end(|_| async { panic!("end hook panicked") })
        .on_progress(|_| async { panic!("progress hook panicked") });

    let results = walk(options, |ctx| async move { Ok(ctx.read().await?) })
        .await
        .expect("Hook panics must not fail the run");

    assert_eq!(results, vec!["baz", "foo", "bar"]);
}

#[tokio::test]
async fn test_walks_can_be_spawned() {
    let dir = create_test_directory();

    let options = WalkOptions::new(txt_config(&dir));
    let contents = tokio::spawn(walk(options, |ctx| async move { Ok(ctx.read().await?) }))
        .await
        .expect("Spawned walk panicked")
        .expect("Walk failed");
    assert_eq!(contents, vec!["baz", "foo", "bar"]);

    let options = WalkOptions::new(txt_config(&dir))
        .exec(|ctx| async move { Ok(ctx.read().await?.len()) });
    let sizes = tokio::spawn(walk_with(options))
        .await
        .expect("Spawned walk panicked")
        .expect("Walk failed");
    assert_eq!(sizes, vec![3, 3, 3]);

    let walk = Arc::new(Walk::new(txt_config(&dir)));
    let shared = Arc::clone(&walk);
    let report = tokio::spawn(async move {
        shared
            .run_report(|ctx| async move { Ok(ctx.filepath().to_path_buf()) })
            .await
    })
    .await
    .expect("Spawned walk panicked")
    .expect("Walk failed");
    assert_eq!(report.results.len(), 3);
    assert_eq!(walk.progress().success, 3);
}

#[tokio::test]
async fn test_user_data_is_shared() {
    let dir = create_test_directory();
    let seen_in_end = Arc::new(AtomicUsize::new(0));
    let mut walk = Walk::with_data(txt_config(&dir).with_concurrency(3), AtomicUsize::new(0));

    let seen = Arc::clone(&seen_in_end);
    walk.on_end(move |walk| {
        let seen = Arc::clone(&seen);
        async move {
            seen.store(walk.data().load(Ordering::SeqCst), Ordering::SeqCst);
            Ok(())
        }
    });

    walk.run(|ctx| async move {
        ctx.data().fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .await
    .expect("Walk failed");

    assert_eq!(walk.data().load(Ordering::SeqCst), 3);
    assert_eq!(seen_in_end.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_empty_file_set_still_fires_hooks() {
    let dir = TempDir::new().unwrap();
    let fired = Arc::new(AtomicUsize::new(0));

    let on_start = Arc::clone(&fired);
    let on_end = Arc::clone(&fired);
    let options = WalkOptions::new(txt_config(&dir))
        .on_start(move |_| {
            let fired = Arc::clone(&on_start);
            async move {
                fired.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .on_end(move |_| {
            let fired = Arc::clone(&on_end);
            async move {
                fired.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

    let results = walk(options, |_| async { Ok(()) })
        .await
        .expect("Empty walks succeed");

    assert!(results.is_empty());
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_processor_is_configuration_error() {
    let dir = create_test_directory();
    let touched = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&touched);
    let options = WalkOptions::<()>::new(txt_config(&dir)).on_start(move |_| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    let err = walk_with(options).await.unwrap_err();
    assert!(matches!(err, WalkError::Configuration { .. }));
    assert_eq!(touched.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_root_is_resolution_error() {
    let dir = TempDir::new().unwrap();
    let walk = Walk::new(WalkConfig::new().with_root(dir.path().join("missing")));

    let err = walk.run(|_| async { Ok(()) }).await.unwrap_err();
    assert!(matches!(err, WalkError::Resolution { .. }));
    assert_eq!(walk.progress().total, 0);
}

#[tokio::test]
async fn test_invalid_glob_is_configuration_error() {
    let dir = create_test_directory();
    let walk = Walk::new(WalkConfig::new().with_root(dir.path()).with_pattern("a[b"));

    let err = walk.run(|_| async { Ok(()) }).await.unwrap_err();
    assert!(matches!(err, WalkError::Configuration { .. }));
}

#[tokio::test]
async fn test_timeout_drops_in_flight_tasks() {
    let dir = create_test_directory();
    let walk = Walk::new(txt_config(&dir).with_timeout(Duration::from_millis(30)));

    let err = walk
        .run(|_| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WalkError::Timeout { .. }));
    assert_eq!(walk.progress().processed(), 0);
}

#[tokio::test]
async fn test_write_to_savepath_keeps_original() {
    let dir = create_test_directory();
    let out = TempDir::new().unwrap();
    let out_root = out.path().to_path_buf();
    let walk = Walk::new(WalkConfig::new().with_root(dir.path()).with_pattern("*.txt"));

    walk.run(move |ctx| {
        let out_root = out_root.clone();
        async move {
            let text = ctx.read().await?;
            let name = ctx.filepath().file_name().expect("Files have names").to_owned();
            ctx.write_to(out_root.join(name), &text.to_uppercase()).await?;
            Ok(())
        }
    })
    .await
    .expect("Walk failed");

    assert_eq!(fs::read_to_string(dir.path().join("test1.txt")).unwrap(), "foo");
    assert_eq!(fs::read_to_string(out.path().join("test1.txt")).unwrap(), "FOO");
    assert_eq!(fs::read_to_string(out.path().join("test2.txt")).unwrap(), "BAR");
}

#[tokio::test]
async fn test_vanished_file_is_read_failure() {
    let dir = create_test_directory();
    let doomed = dir.path().join("test2.txt");
    let walk = Walk::new(txt_config(&dir));

    let report = walk
        .run_report(move |ctx| {
            let doomed = doomed.clone();
            async move {
                // The first file removes another one before it is read.
                let _ = tokio::fs::remove_file(&doomed).await;
                Ok(ctx.read().await?)
            }
        })
        .await
        .expect("Walk failed");

    assert_eq!(report.progress.failed, 1);
    assert_eq!(report.progress.success, 2);
    assert!(report.failures[0].path.ends_with("test2.txt"));
    assert!(report.failures[0].error.starts_with("Failed to read"));
}

#[tokio::test]
async fn test_settings_json_drives_a_walk() {
    let dir = create_test_directory();
    let json = format!(
        r#"{{"root": {}, "pattern": "*.txt", "concurrency": 2, "ignore": "test1"}}"#,
        serde_json::to_string(&dir.path()).unwrap()
    );

    let settings = WalkSettings::from_json_str(&json).expect("Invalid settings");
    let config = WalkConfig::try_from(settings).expect("Invalid config");
    let walk = Walk::new(config);

    let contents = walk
        .run(|ctx| async move { Ok(ctx.read().await?) })
        .await
        .expect("Walk failed");

    assert_eq!(contents, vec!["bar".to_string()]);
    assert_eq!(walk.progress().ignored, 1);
    assert_eq!(walk.handle().settings().concurrency, 2);
}
