/*!
    Audio transport over a cpal output stream.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::RwLock;

use media_types::LogSink;

use crate::cursor::PcmCursor;

/**
    State shared between the transport and the audio callback.
*/
struct Shared {
    pcm: RwLock<Option<PcmCursor>>,
    playing: AtomicBool,
}

/**
    Playback transport for one loaded PCM buffer.

    Wraps the default output device and a [`PcmCursor`] holding the
    loaded samples. Position is reported as *relative* elapsed seconds
    since the last load or seek; the caller checkpoints a base offset on
    pause and seek to recover an absolute timeline position.

    If the device cannot be opened or the stream cannot be built, the
    transport degrades to a silent no-op.
*/
pub struct AudioTransport {
    shared: Arc<Shared>,
    stream: Option<cpal::Stream>,
    device_failed: bool,
    log: Arc<dyn LogSink>,
}

impl AudioTransport {
    /**
        Create a transport with no device and no buffer.

        The output device is opened lazily on the first
        [`load_pcm`](Self::load_pcm).
    */
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        Self {
            shared: Arc::new(Shared {
                pcm: RwLock::new(None),
                playing: AtomicBool::new(false),
            }),
            stream: None,
            device_failed: false,
            log,
        }
    }

    /**
        Load an interleaved S16 buffer, replacing any previous one.

        Playback stops and the position resets to zero. An empty buffer
        or a zero sample rate unloads instead.
    */
    pub fn load_pcm(&mut self, samples: Vec<i16>, sample_rate: u32, channels: u16) {
        self.shared.playing.store(false, Ordering::Release);

        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            *self.shared.pcm.write() = None;
            return;
        }

        self.ensure_stream();

        let cursor = PcmCursor::new(Arc::new(samples), sample_rate, channels);
        self.log.log(&format!(
            "[transport] loaded {} frames at {sample_rate} Hz, {channels} ch",
            cursor.total_frames()
        ));
        *self.shared.pcm.write() = Some(cursor);
    }

    /**
        Start or resume playback from the current position.

        A buffer that has played to its end restarts from the last
        requeue point. No-op without a loaded buffer or working device.
    */
    pub fn play(&mut self) {
        if self.stream.is_none() {
            return;
        }
        let mut guard = self.shared.pcm.write();
        let Some(pcm) = guard.as_mut() else {
            return;
        };
        if pcm.is_exhausted() {
            pcm.rewind();
        }
        self.shared.playing.store(true, Ordering::Release);
    }

    /**
        Pause playback, keeping the current position.
    */
    pub fn pause(&mut self) {
        self.shared.playing.store(false, Ordering::Release);
    }

    /**
        Stop playback and rewind to the last requeue point.
    */
    pub fn stop(&mut self) {
        self.shared.playing.store(false, Ordering::Release);
        if let Some(pcm) = self.shared.pcm.write().as_mut() {
            pcm.rewind();
        }
    }

    /**
        Requeue playback at an absolute time into the buffer.

        Stops, requeues at the nearest sample-frame (clamped to the
        buffer), then resumes if playback was active. The reported
        relative position restarts at zero.
    */
    pub fn seek_seconds(&mut self, seconds: f64) {
        let was_playing = self.shared.playing.swap(false, Ordering::AcqRel);
        let mut guard = self.shared.pcm.write();
        let Some(pcm) = guard.as_mut() else {
            return;
        };
        pcm.seek_to_seconds(seconds);
        drop(guard);
        if was_playing {
            self.shared.playing.store(true, Ordering::Release);
        }
    }

    /**
        Elapsed seconds since the last load or seek, in source time.
    */
    pub fn position_seconds(&self) -> f64 {
        self.shared
            .pcm
            .read()
            .as_ref()
            .map(PcmCursor::position_seconds)
            .unwrap_or(0.0)
    }

    /**
        Duration of the loaded buffer in seconds, or zero if none.
    */
    pub fn duration_seconds(&self) -> f64 {
        self.shared
            .pcm
            .read()
            .as_ref()
            .map(PcmCursor::total_seconds)
            .unwrap_or(0.0)
    }

    /**
        True while the device is actively consuming the buffer.

        Turns false on its own when the buffer plays to its end.
    */
    pub fn is_playing(&self) -> bool {
        self.stream.is_some() && self.shared.playing.load(Ordering::Acquire)
    }

    /**
        Tear down the stream and unload the buffer.
    */
    pub fn close(&mut self) {
        self.shared.playing.store(false, Ordering::Release);
        *self.shared.pcm.write() = None;
        self.stream = None;
    }

    fn ensure_stream(&mut self) {
        if self.stream.is_some() || self.device_failed {
            return;
        }

        let Some(device) = cpal::default_host().default_output_device() else {
            self.log.log("[transport] no output device, running silent");
            self.device_failed = true;
            return;
        };

        let config = match device.default_output_config() {
            Ok(config) => config,
            Err(e) => {
                self.log
                    .log(&format!("[transport] no output config, running silent: {e}"));
                self.device_failed = true;
                return;
            }
        };

        if config.sample_format() != cpal::SampleFormat::F32 {
            self.log.log(&format!(
                "[transport] unsupported sample format {:?}, running silent",
                config.sample_format()
            ));
            self.device_failed = true;
            return;
        }

        let device_rate = config.sample_rate().0;
        let device_channels = config.channels().max(1) as usize;
        let shared = Arc::clone(&self.shared);
        let err_log = Arc::clone(&self.log);

        let built = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                fill_output(&shared, data, device_rate, device_channels);
            },
            move |err| {
                err_log.log(&format!("[transport] stream error: {err}"));
            },
            None,
        );

        let stream = match built {
            Ok(stream) => stream,
            Err(e) => {
                self.log
                    .log(&format!("[transport] stream build failed, running silent: {e}"));
                self.device_failed = true;
                return;
            }
        };

        if let Err(e) = stream.play() {
            self.log
                .log(&format!("[transport] stream start failed, running silent: {e}"));
            self.device_failed = true;
            return;
        }

        self.log.log(&format!(
            "[transport] output stream at {device_rate} Hz, {device_channels} ch"
        ));
        self.stream = Some(stream);
    }
}

impl Drop for AudioTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/**
    Audio callback body. Runs on the device thread and must not block,
    so a contended buffer lock emits silence for the callback instead of
    waiting.
*/
fn fill_output(shared: &Shared, data: &mut [f32], device_rate: u32, device_channels: usize) {
    data.fill(0.0);

    if !shared.playing.load(Ordering::Acquire) {
        return;
    }

    let Some(mut guard) = shared.pcm.try_write() else {
        return;
    };
    let Some(pcm) = guard.as_mut() else {
        shared.playing.store(false, Ordering::Release);
        return;
    };

    for frame in data.chunks_mut(device_channels) {
        match pcm.next_frame(device_rate) {
            Some((left, right)) => {
                if device_channels == 1 {
                    frame[0] = (left + right) * 0.5;
                } else {
                    frame[0] = left;
                    frame[1] = right;
                }
            }
            None => {
                shared.playing.store(false, Ordering::Release);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use media_types::NullLog;

    fn shared_with(frames: usize, rate: u32, channels: u16) -> Shared {
        let samples = vec![8192i16; frames * channels as usize];
        Shared {
            pcm: RwLock::new(Some(PcmCursor::new(Arc::new(samples), rate, channels))),
            playing: AtomicBool::new(true),
        }
    }

    #[test]
    fn callback_emits_silence_while_paused() {
        let shared = shared_with(100, 8000, 2);
        shared.playing.store(false, Ordering::Release);

        let mut data = vec![1.0f32; 64];
        fill_output(&shared, &mut data, 8000, 2);
        assert!(data.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn callback_fills_device_frames() {
        let shared = shared_with(100, 8000, 2);

        let mut data = vec![0.0f32; 32];
        fill_output(&shared, &mut data, 8000, 2);
        assert!(data.iter().all(|&s| (s - 0.25).abs() < 1e-3));
    }

    #[test]
    fn callback_downmixes_to_mono_device() {
        let samples = vec![16384i16, 0];
        let shared = Shared {
            pcm: RwLock::new(Some(PcmCursor::new(Arc::new(samples), 8000, 2))),
            playing: AtomicBool::new(true),
        };

        let mut data = vec![0.0f32; 1];
        fill_output(&shared, &mut data, 8000, 1);
        assert!((data[0] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn callback_zero_pads_extra_device_channels() {
        let shared = shared_with(100, 8000, 2);

        let mut data = vec![1.0f32; 6];
        fill_output(&shared, &mut data, 8000, 6);
        assert!(data[0] > 0.0);
        assert!(data[1] > 0.0);
        assert!(data[2..6].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn exhaustion_clears_playing_flag() {
        let shared = shared_with(4, 8000, 2);

        let mut data = vec![0.0f32; 16];
        fill_output(&shared, &mut data, 8000, 2);
        assert!(!shared.playing.load(Ordering::Acquire));
        // Frames past the end stay silent.
        assert!(data[8..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn operations_are_noops_without_a_device() {
        let mut transport = AudioTransport::new(Arc::new(NullLog));
        transport.device_failed = true;

        transport.load_pcm(vec![0i16; 800], 8000, 2);
        transport.play();
        assert!(!transport.is_playing());
        assert!((transport.duration_seconds() - 0.05).abs() < 1e-9);
        assert_eq!(transport.position_seconds(), 0.0);

        transport.seek_seconds(0.02);
        assert_eq!(transport.position_seconds(), 0.0);
        transport.close();
        assert_eq!(transport.duration_seconds(), 0.0);
    }

    #[test]
    fn empty_buffer_unloads() {
        let mut transport = AudioTransport::new(Arc::new(NullLog));
        transport.device_failed = true;

        transport.load_pcm(vec![0i16; 800], 8000, 2);
        transport.load_pcm(Vec::new(), 8000, 2);
        assert_eq!(transport.duration_seconds(), 0.0);
    }
}
