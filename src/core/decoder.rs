// src/core/decoder.rs
//
// Audio decoding into channel-major sample buffers.
// Uses Symphonia for format-agnostic decoding.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::buffer::Signal;

/// File extensions picked up when scanning directories
pub const AUDIO_EXTENSIONS: &[&str] = &["flac", "wav", "mp3", "ogg", "m4a", "aac", "aiff", "aif"];

/// Decoded audio and the stream facts the engine needs
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Samples normalized to [-1.0, 1.0], shape `[channels, samples]`
    pub signal: Signal,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: usize,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Original codec name
    pub codec_name: String,
}

/// Decode an audio file to floating-point samples
pub fn decode_audio(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe file format - may be corrupted or unsupported")?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No supported audio track found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("File does not specify sample rate")?;

    // Some containers only learn the layout from the first decoded packet
    let declared_channels = track.codec_params.channels.map(|c| c.count());

    let codec_name = symphonia::default::get_codecs()
        .get_codec(track.codec_params.codec)
        .map(|d| d.short_name.to_string())
        .unwrap_or_else(|| format!("{:?}", track.codec_params.codec));

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder for audio codec")?;

    let mut samples = InterleavedSamples::default();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("{}: skipping undecodable packet: {}", path.display(), msg);
                skipped_packets += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        samples
            .expect_channels(spec.channels.count())
            .with_context(|| format!("Inconsistent stream in {}", path.display()))?;
        if sample_buf.is_none() {
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend(buf.samples());
        }
    }

    let channels = samples.channels().context("No audio samples decoded from file")?;
    if let Some(declared) = declared_channels.filter(|&d| d != channels) {
        log::warn!(
            "{}: container declares {} channels, decoded {}",
            path.display(),
            declared,
            channels
        );
    }

    let signal = samples
        .into_signal()
        .with_context(|| format!("Decoded stream of {} is not rectangular", path.display()))?;
    let duration_secs = signal.len() as f64 / sample_rate as f64;

    log::info!(
        "decoded {}: {} ch, {} Hz, {:.2}s, codec {}{}",
        path.display(),
        channels,
        sample_rate,
        duration_secs,
        codec_name,
        if skipped_packets > 0 {
            format!(", {} packets skipped", skipped_packets)
        } else {
            String::new()
        }
    );

    Ok(DecodedAudio {
        signal,
        sample_rate,
        channels,
        duration_secs,
        codec_name,
    })
}

/// Interleaved decoder output whose channel count is fixed by the first
/// decoded packet
#[derive(Debug, Default)]
struct InterleavedSamples {
    samples: Vec<f32>,
    channels: Option<usize>,
}

impl InterleavedSamples {
    /// Fix the channel count on first use, reject any later change
    fn expect_channels(&mut self, channels: usize) -> Result<()> {
        if channels == 0 {
            bail!("Decoded packet has 0 audio channels");
        }
        match self.channels {
            Some(expected) if expected != channels => bail!(
                "channel count changed from {} to {} mid-stream",
                expected,
                channels
            ),
            Some(_) => {}
            None => self.channels = Some(channels),
        }
        Ok(())
    }

    fn extend(&mut self, interleaved: &[f32]) {
        self.samples.extend_from_slice(interleaved);
    }

    /// Channel count, once any non-empty packet has been seen
    fn channels(&self) -> Option<usize> {
        self.channels.filter(|_| !self.samples.is_empty())
    }

    fn into_signal(self) -> Result<Signal> {
        let channels = self.channels().context("No audio samples decoded")?;
        Ok(Signal::from_interleaved(&self.samples, channels)?)
    }
}

/// Average all channels into one
pub fn downmix_mono(signal: &Signal) -> Signal {
    if signal.channels() == 1 {
        return signal.clone();
    }
    let scale = 1.0 / signal.channels() as f64;
    let mut mono = vec![0.0f64; signal.len()];
    for ch in signal.iter_channels() {
        for (acc, &s) in mono.iter_mut().zip(ch) {
            *acc += s;
        }
    }
    mono.iter_mut().for_each(|s| *s *= scale);
    Signal::mono(mono)
}

/// Whether `path` has one of [`AUDIO_EXTENSIONS`]
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
