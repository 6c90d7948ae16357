#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use audiofeatr::testgen;
use audiofeatr::Signal;

/// Path of the compiled CLI under test
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_audiofeatr"))
}

pub fn run_audiofeatr<P: AsRef<std::ffi::OsStr>>(input: P) -> Command {
    let mut cmd = Command::new(get_binary_path());
    cmd.arg(input);
    cmd.env_remove("AUDIOFEATR_CONFIG");
    cmd
}

pub fn run_json_analysis<P: AsRef<std::ffi::OsStr>>(input: P) -> Output {
    run_audiofeatr(input)
        .arg("--json")
        .output()
        .expect("Failed to execute with --json")
}

pub fn parse_json_output(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, stdout))
}

/// Fresh scratch directory under `target/` for one test
pub fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("test-fixtures")
        .join(name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("Failed to clear fixture dir");
    }
    std::fs::create_dir_all(&dir).expect("Failed to create fixture dir");
    dir
}

/// Write `signal` as a float WAV inside `dir`
pub fn write_fixture(dir: &Path, file_name: &str, signal: &Signal, sample_rate: u32) -> PathBuf {
    let path = dir.join(file_name);
    testgen::write_wav(&path, signal, sample_rate).expect("Failed to write WAV fixture");
    path
}

/// Stereo signal: a sine on the left, its half-amplitude octave on the right
pub fn stereo_tones(freq: f64, sample_rate: u32, len: usize) -> Signal {
    let left = testgen::sine(freq, sample_rate, len, 0.8);
    let right = testgen::sine(freq * 2.0, sample_rate, len, 0.4);
    Signal::from_channels(vec![
        left.channel(0).to_vec(),
        right.channel(0).to_vec(),
    ])
    .expect("Channels share a length")
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}

pub fn assert_all_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "index {}: {} vs {} (tolerance {})",
            i,
            a,
            e,
            tolerance
        );
    }
}
