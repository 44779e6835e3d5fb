//! End-to-end decode over generated PCM WAV files.
//!
//! WAV carries raw PCM, so the audio pipeline's output must match the
//! input sample-for-sample (lossless passthrough case).

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use media_decode::{decode_audio, decode_media, spawn_decode};
use media_types::{CancelToken, MediaKind, NullLog};

const SAMPLE_RATE: u32 = 8000;

/// Write a minimal RIFF/WAVE file with 16-bit PCM data.
fn write_wav(dir: &tempfile::TempDir, name: &str, samples: &[i16], channels: u16) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();

    let data_len = (samples.len() * 2) as u32;
    let byte_rate = SAMPLE_RATE * channels as u32 * 2;
    let block_align = channels * 2;

    file.write_all(b"RIFF").unwrap();
    file.write_all(&(36 + data_len).to_le_bytes()).unwrap();
    file.write_all(b"WAVE").unwrap();

    file.write_all(b"fmt ").unwrap();
    file.write_all(&16u32.to_le_bytes()).unwrap();
    file.write_all(&1u16.to_le_bytes()).unwrap(); // PCM
    file.write_all(&channels.to_le_bytes()).unwrap();
    file.write_all(&SAMPLE_RATE.to_le_bytes()).unwrap();
    file.write_all(&byte_rate.to_le_bytes()).unwrap();
    file.write_all(&block_align.to_le_bytes()).unwrap();
    file.write_all(&16u16.to_le_bytes()).unwrap(); // bits per sample

    file.write_all(b"data").unwrap();
    file.write_all(&data_len.to_le_bytes()).unwrap();
    for sample in samples {
        file.write_all(&sample.to_le_bytes()).unwrap();
    }
    path
}

/// One second of a stereo ramp, loud on the left, quiet on the right.
fn stereo_ramp(frames: usize) -> Vec<i16> {
    let mut samples = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let left = ((i % 200) as i32 * 160 - 16000) as i16;
        samples.push(left);
        samples.push(left / 4);
    }
    samples
}

#[test]
fn wav_passthrough_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let frames = SAMPLE_RATE as usize;
    let input = stereo_ramp(frames);
    let path = write_wav(&dir, "ramp.wav", &input, 2);

    let audio = decode_audio(&path, &CancelToken::new());

    assert_eq!(audio.channels, 2);
    assert_eq!(audio.sample_rate, SAMPLE_RATE);
    assert_eq!(audio.samples.len(), frames * 2);
    assert_eq!(audio.samples, input);
}

#[test]
fn mono_wav_stays_mono() {
    let dir = tempfile::tempdir().unwrap();
    let input: Vec<i16> = (0..4000).map(|i| (i % 128) as i16 * 250).collect();
    let path = write_wav(&dir, "mono.wav", &input, 1);

    let audio = decode_audio(&path, &CancelToken::new());

    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), input.len());
    assert_eq!(audio.samples, input);
}

#[test]
fn waveform_of_silence_is_all_zeros() {
    let dir = tempfile::tempdir().unwrap();
    let input = vec![0i16; SAMPLE_RATE as usize * 2];
    let path = write_wav(&dir, "silence.wav", &input, 2);

    let audio = decode_audio(&path, &CancelToken::new());

    assert!(!audio.waveform.is_empty());
    assert!(audio.waveform.len() <= 2000);
    assert!(audio.waveform.iter().all(|&v| v == 0.0));
}

#[test]
fn audio_only_file_classifies_as_audio() {
    let dir = tempfile::tempdir().unwrap();
    let input = stereo_ramp(2000);
    let path = write_wav(&dir, "classify.wav", &input, 2);

    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = {
        let lines = Arc::clone(&lines);
        move |msg: &str| lines.lock().unwrap().push(msg.to_owned())
    };

    let result = decode_media(&path, &CancelToken::new(), &sink).unwrap();

    assert_eq!(result.kind, MediaKind::Audio);
    assert!(result.video.is_none());
    let audio = result.audio.expect("audio content");
    assert_eq!(audio.samples.len(), 2000 * 2);
    assert!(result.duration_ms > 0);

    let lines = lines.lock().unwrap();
    assert!(lines.iter().any(|l| l.contains("streams:")));
    assert!(lines.iter().any(|l| l.contains("audio: samples=")));
    // 2000 frames at 8 kHz.
    assert!(lines.iter().any(|l| l.contains("content_ms=250")));
}

#[test]
fn cancelling_mid_decode_yields_partial_result() {
    let dir = tempfile::tempdir().unwrap();
    // Two minutes of stereo PCM, long enough that the worker is still
    // reading packets when the token flips.
    let frames = SAMPLE_RATE as usize * 120;
    let input = stereo_ramp(frames);
    let path = write_wav(&dir, "long.wav", &input, 2);

    let cancel = CancelToken::new();
    let handle = spawn_decode(&path, cancel.clone(), Arc::new(NullLog));
    std::thread::sleep(std::time::Duration::from_millis(2));
    cancel.cancel();

    while !handle.is_finished() {
        std::thread::sleep(std::time::Duration::from_millis(1));
    }

    match handle.join() {
        Ok(result) => {
            if let Some(audio) = &result.audio {
                assert!(audio.samples.len() <= frames * 2);
                assert_eq!(audio.samples.len() % 2, 0);
            }
        }
        // The token may flip before the worker starts any work at all.
        Err(e) => assert!(e.is_aborted()),
    }
}

#[test]
fn waveform_values_stay_normalized() {
    let dir = tempfile::tempdir().unwrap();
    // Full-scale content including the negative extreme.
    let input: Vec<i16> = (0..8000)
        .map(|i| if i % 2 == 0 { i16::MIN } else { i16::MAX })
        .collect();
    let path = write_wav(&dir, "fullscale.wav", &input, 1);

    let result = decode_media(&path, &CancelToken::new(), &NullLog).unwrap();
    let audio = result.audio.expect("audio content");

    assert!(audio.waveform.iter().all(|&v| (0.0..=1.0).contains(&v)));
    assert!(audio.waveform.iter().any(|&v| v == 1.0));
}
