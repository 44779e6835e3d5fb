/*!
    Playback cursor over a loaded PCM buffer.
*/

use std::sync::Arc;

/**
    Read cursor over an immutable interleaved S16 buffer.

    All transport position math lives here, independent of the audio
    device: the cursor tracks how many *source* sample-frames have been
    consumed since the last requeue, and steps through the source at a
    fractional rate when the device runs at a different sample rate
    (nearest-neighbor resampling).
*/
pub(crate) struct PcmCursor {
    samples: Arc<Vec<i16>>,
    channels: usize,
    sample_rate: u32,
    /// Next interleaved sample index to read.
    cursor: usize,
    /// Interleaved sample index of the last requeue point.
    queued_base: usize,
    /// Fractional source-frame accumulator for rate adaptation.
    rate_acc: u32,
}

impl PcmCursor {
    pub fn new(samples: Arc<Vec<i16>>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            channels: channels.max(1) as usize,
            sample_rate,
            cursor: 0,
            queued_base: 0,
            rate_acc: 0,
        }
    }

    /// Total sample-frames in the buffer.
    pub fn total_frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Buffer duration in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.total_frames() as f64 / self.sample_rate as f64
    }

    /// True once no whole frame remains to read. A trailing partial
    /// frame in a malformed buffer counts as exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.cursor + self.channels > self.samples.len()
    }

    /**
        Elapsed seconds since the last requeue, in source time.
    */
    pub fn position_seconds(&self) -> f64 {
        let consumed = (self.cursor - self.queued_base) / self.channels;
        consumed as f64 / self.sample_rate as f64
    }

    /**
        Requeue playback at the given sample-frame offset.

        Replaces the pending read window: the relative position reported
        by [`position_seconds`](Self::position_seconds) restarts at zero.
        The offset is clamped to the last frame.
    */
    pub fn seek_to_frame(&mut self, frame: usize) {
        let clamped = frame.min(self.total_frames().saturating_sub(1));
        self.queued_base = clamped * self.channels;
        self.cursor = self.queued_base;
        self.rate_acc = 0;
    }

    /**
        Requeue at an absolute time, rounding to the nearest sample-frame.
    */
    pub fn seek_to_seconds(&mut self, seconds: f64) {
        let frame = (seconds.max(0.0) * self.sample_rate as f64).round() as usize;
        self.seek_to_frame(frame);
    }

    /**
        Rewind to the requeue point without changing it (stop semantics).
    */
    pub fn rewind(&mut self) {
        self.cursor = self.queued_base;
        self.rate_acc = 0;
    }

    /**
        Read one output frame as (left, right) in [-1, 1], then advance
        the source cursor at `source_rate / device_rate` frames per call.

        Returns `None` once the buffer is exhausted.
    */
    pub fn next_frame(&mut self, device_rate: u32) -> Option<(f32, f32)> {
        if self.is_exhausted() {
            return None;
        }

        let left = self.samples[self.cursor] as f32 / 32768.0;
        let right = if self.channels >= 2 {
            self.samples[self.cursor + 1] as f32 / 32768.0
        } else {
            left
        };

        self.rate_acc += self.sample_rate;
        while self.rate_acc >= device_rate && !self.is_exhausted() {
            self.rate_acc -= device_rate;
            self.cursor += self.channels;
        }

        Some((left, right))
    }
}
