// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::core::decoder::is_audio_file;
use crate::core::FeatureAnalyzer;

pub use args::Args;
pub use output::{format_failure, format_report, format_summary, report_json};

/// Run the CLI
pub fn run(args: &Args) -> Result<()> {
    let config = args.feature_config()?;
    let mut builder = FeatureAnalyzer::builder().config(config).mono(args.mono);
    if let Some(rate) = args.sample_rate {
        builder = builder.resample_to(rate);
    }
    let analyzer = builder.build()?;

    let files = collect_audio_files(&args.input)?;
    if files.is_empty() {
        bail!("No audio files found in {}", args.input.display());
    }
    log::info!("analyzing {} file(s)", files.len());

    let progress = if files.len() > 1 && !args.json {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<_> = files
        .par_iter()
        .progress_with(progress.clone())
        .map(|path| (path, analyzer.analyze_file(path)))
        .collect();
    progress.finish_and_clear();

    let mut json_reports = Vec::new();
    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(report) if args.json => json_reports.push(report_json(report, args.frames)),
            Ok(report) => print!("{}", format_report(report, args.verbose)),
            Err(e) => {
                failed += 1;
                log::error!("{}: {:#}", path.display(), e);
                eprintln!("{}", format_failure(&path.display().to_string(), e));
            }
        }
    }

    if args.json {
        let value = if json_reports.len() == 1 && files.len() == 1 {
            json_reports.remove(0)
        } else {
            serde_json::Value::Array(json_reports)
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if files.len() > 1 {
        print!("{}", format_summary(results.len() - failed, failed));
    }

    if failed == results.len() {
        bail!("All {} file(s) failed to analyze", failed);
    }
    Ok(())
}

/// A single audio file, or every audio file below a directory, sorted
pub fn collect_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if !is_audio_file(path) {
            log::warn!("{} has an unrecognised extension, trying anyway", path.display());
        }
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("Input not found: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    Ok(files)
}
