// src/core/resample.rs
//
// Sample-rate conversion ahead of analysis, backed by rubato's sinc
// resampler.

use anyhow::{bail, Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::buffer::Signal;

const CHUNK_SIZE: usize = 1024;

/// Convert `signal` from `from_rate` to `to_rate`
///
/// The output has `round(len * to_rate / from_rate)` samples per channel
/// with the resampler's group delay removed.
pub fn resample(signal: &Signal, from_rate: u32, to_rate: u32) -> Result<Signal> {
    if from_rate == 0 || to_rate == 0 {
        bail!("Sample rates must be positive (got {} -> {})", from_rate, to_rate);
    }
    if from_rate == to_rate || signal.is_empty() {
        return Ok(signal.clone());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let expected_len = (signal.len() as f64 * ratio).round() as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f64>::new(ratio, 1.0, params, CHUNK_SIZE, signal.channels())
        .context("Failed to construct resampler")?;

    let delay = resampler.output_delay();
    let input: Vec<&[f64]> = signal.iter_channels().collect();
    let mut output: Vec<Vec<f64>> =
        vec![Vec::with_capacity(expected_len + delay); signal.channels()];

    let mut pos = 0;
    while pos + CHUNK_SIZE <= signal.len() {
        let chunk: Vec<&[f64]> = input.iter().map(|ch| &ch[pos..pos + CHUNK_SIZE]).collect();
        append(&mut output, resampler.process(&chunk, None)?);
        pos += CHUNK_SIZE;
    }
    if pos < signal.len() {
        let rest: Vec<&[f64]> = input.iter().map(|ch| &ch[pos..]).collect();
        append(&mut output, resampler.process_partial(Some(rest.as_slice()), None)?);
    }
    while output[0].len() < expected_len + delay {
        append(&mut output, resampler.process_partial::<&[f64]>(None, None)?);
    }

    for out in output.iter_mut() {
        out.drain(..delay);
        out.truncate(expected_len);
    }

    log::debug!(
        "resampled {} -> {} Hz: {} -> {} samples per channel",
        from_rate,
        to_rate,
        signal.len(),
        expected_len
    );

    Ok(Signal::from_channels(output)?)
}

fn append(output: &mut [Vec<f64>], chunk: Vec<Vec<f64>>) {
    for (out, part) in output.iter_mut().zip(chunk) {
        out.extend(part);
    }
}
