// Feature engine behaviour on synthetic signals, no files involved.

mod test_utils;

use audiofeatr::core::dsp::{build_ranges, frame, frame_count, frames_to_time, pad_amount, stft};
use audiofeatr::core::features::{
    flatness_of, rms, rms_overall, spectral_bandwidth, spectral_centroid,
    spectral_centroid_overall, spectral_flatness, spectral_rolloff, zero_crossing_rate,
    zero_crossing_rate_overall, DEFAULT_AMIN,
};
use audiofeatr::testgen::{alternating, sine, white_noise};
use audiofeatr::{ConfigPreset, FeatureAnalyzer, FeatureError, FeatureKind, Signal};
use test_utils::*;

const SR: u32 = 22050;

#[test]
fn test_ranges_cover_padded_signal() {
    for n in [1usize, 2047, 2048, 2049, 10_000, 22050, 44100] {
        for (fs, hop) in [(2048, 512), (1024, 256), (512, 512), (300, 7)] {
            let pad = pad_amount(n, fs, hop);
            let padded = n + pad;
            let ranges = build_ranges(padded, fs, hop);

            assert_eq!(ranges.len(), frame_count(n, fs, hop), "n={} fs={} hop={}", n, fs, hop);
            assert_eq!((padded - fs) % hop, 0);
            assert_eq!(ranges.last().unwrap().end, padded);
            for (t, range) in ranges.iter().enumerate() {
                assert_eq!(range.start, t * hop);
                assert_eq!(range.len(), fs);
            }
        }
    }
}

#[test]
fn test_rms_of_silence_is_zero() {
    let silence = Signal::new(vec![0.0; 2 * 5000], 2).unwrap();
    let matrix = rms(&silence, 2048, 512).unwrap();
    assert_eq!(matrix.shape(), (2, frame_count(5000, 2048, 512)));
    assert!(matrix.as_slice().iter().all(|&v| v == 0.0));
    assert_eq!(rms_overall(&silence), vec![0.0, 0.0]);
}

#[test]
fn test_zcr_constant_sign_is_zero() {
    let signal = Signal::from_channels(vec![vec![0.5; 4000], vec![-0.25; 4000]]).unwrap();
    let matrix = zero_crossing_rate(&signal, 1024, 256).unwrap();
    assert!(matrix.as_slice().iter().all(|&v| v == 0.0));
    assert_eq!(zero_crossing_rate_overall(&signal), vec![0.0, 0.0]);
}

#[test]
fn test_zcr_alternating_signal() {
    for len in [2usize, 17, 1001, 4096] {
        let overall = zero_crossing_rate_overall(&alternating(len, 1.0));
        assert_close(overall[0], (len - 1) as f64 / len as f64, 1e-12);
    }

    // Interior frames see frame_size - 1 crossings
    let framed = zero_crossing_rate(&alternating(4096, 1.0), 512, 512).unwrap();
    for t in 0..framed.frames() {
        assert_close(framed.get(0, t), 511.0 / 512.0, 1e-12);
    }
}

#[test]
fn test_spectral_shape_of_silence_is_zero() {
    let silence = Signal::mono(vec![0.0; 8000]);
    let centroid = spectral_centroid(&silence, SR, 2048, 512).unwrap();
    let bandwidth = spectral_bandwidth(&silence, SR, 2048, 512, 2.0).unwrap();
    let rolloff = spectral_rolloff(&silence, SR, 2048, 512, 0.85).unwrap();
    for matrix in [&centroid, &bandwidth, &rolloff] {
        assert_eq!(matrix.frames(), frame_count(8000, 2048, 512));
        assert!(matrix.as_slice().iter().all(|&v| v == 0.0));
    }

    // Every bin sits at the floor, so the spectrum is perfectly flat
    let flatness = spectral_flatness(&silence, 2048, 512, 2.0, DEFAULT_AMIN).unwrap();
    for &v in flatness.as_slice() {
        assert_close(v, 1.0, 1e-9);
    }
}

#[test]
fn test_frames_to_time_default_hop() {
    let times = frames_to_time(&41usize, 512, SR).unwrap();
    assert_eq!(times.len(), 41);
    for (t, &time) in times.iter().enumerate() {
        assert_close(time, t as f64 * 512.0 / 22050.0, 1e-12);
    }
}

#[test]
fn test_one_second_sine_round_trip() {
    let signal = sine(440.0, SR, 22050, 1.0);
    let report = FeatureAnalyzer::new().analyze(&signal, SR).unwrap();

    assert_eq!(report.frame_count, frame_count(22050, 2048, 512));
    assert_eq!(report.frame_count, 41);
    assert_eq!(report.times.len(), report.frame_count);

    let rms = report.feature(FeatureKind::Rms).unwrap();
    assert_eq!(rms.shape(), (1, 41));
    // Frames 0..=39 end inside the signal; frame 40 reaches into the padding
    for t in 0..40 {
        assert_close(rms.get(0, t), 1.0 / 2f64.sqrt(), 0.01);
    }
    assert!(rms.get(0, 40) < rms.get(0, 39));

    let overall_rms = report.overall(FeatureKind::Rms).unwrap();
    assert_close(overall_rms[0], 1.0 / 2f64.sqrt(), 1e-3);
}

#[test]
fn test_flatness_separates_noise_from_tone() {
    let tone = sine(1000.0, SR, 22050, 0.8);
    let noise = white_noise(22050, 0.8, 42);

    let tone_flatness = spectral_flatness(&tone, 2048, 512, 2.0, DEFAULT_AMIN).unwrap();
    let noise_flatness = spectral_flatness(&noise, 2048, 512, 2.0, DEFAULT_AMIN).unwrap();
    let tone_mean = mean(tone_flatness.row(0));
    let noise_mean = mean(noise_flatness.row(0));

    assert!(tone_mean < 0.01, "tone flatness {}", tone_mean);
    assert!(noise_mean > 0.3, "noise flatness {}", noise_mean);
    assert!(noise_mean > 100.0 * tone_mean);
    assert!(noise_flatness.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_flatness_of_near_flat_spectrum() {
    let magnitudes: Vec<f64> = (0..1025).map(|k| 1.0 + 0.1 * (k as f64).sin()).collect();
    let flatness = flatness_of(&magnitudes, 2.0, DEFAULT_AMIN);
    assert!(flatness > 0.95 && flatness <= 1.0, "flatness {}", flatness);

    let mut peaked = vec![0.0; 1025];
    peaked[100] = 1.0;
    assert!(flatness_of(&peaked, 2.0, DEFAULT_AMIN) < 1e-6);
}

#[test]
fn test_higher_tone_moves_spectral_shape_up() {
    let signal = stereo_tones(440.0, SR, 22050);
    let centroid = spectral_centroid(&signal, SR, 2048, 512).unwrap();
    let rolloff = spectral_rolloff(&signal, SR, 2048, 512, 0.85).unwrap();

    assert!(mean(centroid.row(1)) > mean(centroid.row(0)));
    assert!(mean(rolloff.row(1)) > mean(rolloff.row(0)));

    let overall = spectral_centroid_overall(&signal, SR).unwrap();
    assert_close(overall[0], 440.0, 1.0);
    assert_close(overall[1], 880.0, 1.0);
}

#[test]
fn test_channels_are_independent() {
    let stereo = stereo_tones(300.0, SR, 12000);
    let analyzer = FeatureAnalyzer::new();
    let joint = analyzer.analyze(&stereo, SR).unwrap();

    for ch in 0..2 {
        let mono = Signal::mono(stereo.channel(ch).to_vec());
        let single = analyzer.analyze(&mono, SR).unwrap();
        for kind in FeatureKind::all() {
            assert_all_close(
                joint.feature(kind).unwrap().row(ch),
                single.feature(kind).unwrap().row(0),
                1e-12,
            );
            assert_close(
                joint.overall(kind).unwrap()[ch],
                single.overall(kind).unwrap()[0],
                1e-12,
            );
        }
    }
}

#[test]
fn test_repeated_analysis_is_bit_identical() {
    let noise = white_noise(30_000, 0.5, 7);
    let stereo = Signal::from_channels(vec![
        noise.channel(0).to_vec(),
        sine(523.25, SR, 30_000, 0.6).channel(0).to_vec(),
    ])
    .unwrap();
    let analyzer = FeatureAnalyzer::new();

    let first = analyzer.analyze(&stereo, SR).unwrap();
    let second = analyzer.analyze(&stereo, SR).unwrap();

    assert_eq!(first.framed, second.framed);
    assert_eq!(first.overall, second.overall);
    assert_eq!(first.times, second.times);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_stft_agrees_with_frame_grid() {
    let signal = stereo_tones(1000.0, SR, 9000);
    let grid = frame(&signal, 1024, 256).unwrap();
    let spec = stft(&signal, 1024, 256).unwrap();
    assert_eq!(spec.shape(), (2, 513, grid.frame_count()));
}

#[test]
fn test_presets_drive_frame_layout() {
    let signal = sine(200.0, 16000, 16000, 0.5);
    let analyzer = FeatureAnalyzer::builder()
        .preset(ConfigPreset::Speech)
        .build()
        .unwrap();
    let report = analyzer.analyze(&signal, 16000).unwrap();
    assert_eq!(report.frame_size, 512);
    assert_eq!(report.hop_length, 128);
    assert_eq!(report.frame_count, frame_count(16000, 512, 128));
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let signal = sine(200.0, SR, 4096, 0.5);
    assert_eq!(
        FeatureAnalyzer::new().analyze(&signal, 0).unwrap_err(),
        FeatureError::InvalidSampleRate
    );
    assert_eq!(
        FeatureAnalyzer::builder().hop_length(0).build().unwrap_err(),
        FeatureError::InvalidHopLength(0)
    );
    assert_eq!(
        rms(&signal, 2048, 0).unwrap_err(),
        FeatureError::InvalidHopLength(0)
    );
    assert!(matches!(
        spectral_rolloff(&signal, SR, 2048, 512, 1.5),
        Err(FeatureError::InvalidParameter { .. })
    ));
    assert_eq!(
        stft(&signal, 1, 1).unwrap_err(),
        FeatureError::InvalidWindowLength(1)
    );
}
