// src/testgen/mod.rs
//
// Synthetic test signals and WAV fixture writing.
// Used by the test suites and handy for producing reference files when
// checking feature output by ear or in other tools.

use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::buffer::Signal;

/// Mono sine of `amplitude` at `freq` Hz lasting `len` samples
pub fn sine(freq: f64, sample_rate: u32, len: usize, amplitude: f64) -> Signal {
    let step = 2.0 * PI * freq / sample_rate as f64;
    Signal::mono((0..len).map(|i| amplitude * (step * i as f64).sin()).collect())
}

/// Mono `+a, -a, +a, ...` sequence, a Nyquist-rate square wave
pub fn alternating(len: usize, amplitude: f64) -> Signal {
    Signal::mono(
        (0..len)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect(),
    )
}

/// Uniform white noise in `[-amplitude, amplitude]`, reproducible per seed
pub fn white_noise(len: usize, amplitude: f64, seed: u64) -> Signal {
    let mut rng = StdRng::seed_from_u64(seed);
    Signal::mono((0..len).map(|_| rng.gen_range(-amplitude..=amplitude)).collect())
}

/// Write `signal` as a 32-bit float WAV
pub fn write_wav(path: &Path, signal: &Signal, sample_rate: u32) -> Result<()> {
    let channels = u16::try_from(signal.channels()).context("Too many channels for WAV")?;
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for i in 0..signal.len() {
        for ch in signal.iter_channels() {
            writer.write_sample(ch[i] as f32)?;
        }
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))?;

    log::debug!(
        "wrote {} ({} ch, {} samples, {} Hz)",
        path.display(),
        signal.channels(),
        signal.len(),
        sample_rate
    );
    Ok(())
}
