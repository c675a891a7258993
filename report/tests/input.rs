use std::fs;

use report::{input, Error, Phase};
use tempfile::TempDir;

const RUN: &str = r#"{
    "threads_per_process": 2,
    "nx": 16, "ny": 16, "nz": 32,
    "matrix": { "total_rows": 16384.0, "total_nonzeros": 430000.0 },
    "niters": 50,
    "normr": 3.2e-9,
    "timings": [
        [1.5, 0.1, 0.2, 0.4, 0.01, 0.7, 0.02, 0.03],
        [1.5, 0.1, 0.2, 0.4, 0.03, 0.7, 0.02, 0.03]
    ]
}"#;

#[test]
fn test_load_run_input() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("run.json");
    fs::write(&path, RUN).unwrap();

    let run = input::load(&path).unwrap();
    assert_eq!(run.process_count(), 2);
    assert_eq!(run.niters, 50);
    assert_eq!(run.timings[1].get(Phase::DdotAllreduce), 0.03);

    let ctx = run.context_for(1);
    assert_eq!(ctx.rank, 1);
    assert_eq!(ctx.process_count, 2);
    assert_eq!((ctx.nx, ctx.ny, ctx.nz), (16, 16, 32));
}

#[test]
fn test_load_rejects_empty_timings() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("run.json");
    let empty = RUN.replace(
        "[1.5, 0.1, 0.2, 0.4, 0.01, 0.7, 0.02, 0.03],\n        [1.5, 0.1, 0.2, 0.4, 0.03, 0.7, 0.02, 0.03]",
        "",
    );
    fs::write(&path, empty).unwrap();

    assert!(matches!(input::load(&path), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_load_rejects_short_timing_sample() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("run.json");
    fs::write(&path, RUN.replace("0.02, 0.03]\n    ]", "0.02]\n    ]")).unwrap();

    assert!(matches!(input::load(&path), Err(Error::Serialize(_))));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.json");
    assert!(matches!(input::load(&path), Err(Error::Io(_))));
}
