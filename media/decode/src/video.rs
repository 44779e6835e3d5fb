/*!
    Video decode pipeline.

    Decodes the best video stream of a container into packed RGBA frames
    at source resolution, decimated to an approximately uniform target
    rate by presentation timestamp. Absence of a stream or of a usable
    decoder is a recoverable condition and yields an empty result.
*/

use std::path::Path;

use ffmpeg_next::{
    Rational, codec, format,
    format::Pixel,
    frame, media,
    software::scaling::{self, flag::Flags},
};

use media_types::{CancelToken, DecodedVideo, VideoFrame};

/// Target frame rate after decimation, in frames per second.
pub(crate) const TARGET_FPS: i64 = 10;

/**
    Timestamp-driven frame decimator.

    Maintains a monotonically advancing "next admissible timestamp"
    cursor starting at 0 and advancing by `1000 / target_fps` ms on every
    admitted frame. Frames whose timestamp falls short of the cursor are
    discarded. This yields an approximately uniform sequence regardless
    of the source's native or variable frame timing, and bounds memory
    for long videos.
*/
#[derive(Clone, Copy, Debug)]
pub struct FrameDecimator {
    next_due_ms: i64,
    interval_ms: i64,
}

impl FrameDecimator {
    /**
        Create a decimator targeting the given output rate.
    */
    pub fn new(target_fps: i64) -> Self {
        Self {
            next_due_ms: 0,
            interval_ms: 1000 / target_fps.max(1),
        }
    }

    /**
        Decide whether a frame at `timestamp_ms` is admitted; admitting
        advances the cursor by one interval.
    */
    pub fn admit(&mut self, timestamp_ms: i64) -> bool {
        if timestamp_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms += self.interval_ms;
        true
    }
}

/**
    Decode the best video stream of `path` into decimated RGBA frames.

    Never fails: any container- or stream-level problem yields
    `DecodedVideo::empty()`. Frames without a best-effort timestamp are
    discarded since they cannot be ordered. Cancellation is polled once
    per packet with partial-result semantics.
*/
pub fn decode_video<P: AsRef<Path>>(path: P, cancel: &CancelToken) -> DecodedVideo {
    let path = path.as_ref();

    if crate::ensure_init().is_err() {
        return DecodedVideo::empty();
    }

    let Ok(mut ictx) = format::input(&path) else {
        return DecodedVideo::empty();
    };

    let Some(stream) = ictx.streams().best(media::Type::Video) else {
        return DecodedVideo::empty();
    };
    let stream_index = stream.index();
    let time_base = stream.time_base();

    let Ok(context) = codec::context::Context::from_parameters(stream.parameters()) else {
        return DecodedVideo::empty();
    };
    let Ok(mut decoder) = context.decoder().video() else {
        return DecodedVideo::empty();
    };

    let width = decoder.width();
    let height = decoder.height();
    if width == 0 || height == 0 {
        return DecodedVideo::empty();
    }

    // Pixel format conversion only; rescaling for display is a consumer
    // concern. The scaler is lazily (re)initialized from the actual frame
    // format since decoders may emit a format other than the advertised one.
    let mut scaler: Option<scaling::Context> = None;

    let mut frames: Vec<VideoFrame> = Vec::new();
    let mut decimator = FrameDecimator::new(TARGET_FPS);
    let mut decoded = frame::Video::empty();
    let mut rgba = frame::Video::empty();
    let mut cancelled = false;

    let take_frame = |decoded: &frame::Video,
                          scaler: &mut Option<scaling::Context>,
                          rgba: &mut frame::Video,
                          frames: &mut Vec<VideoFrame>,
                          decimator: &mut FrameDecimator| {
        // Undefined timestamps cannot be ordered.
        let Some(ts) = decoded.timestamp() else {
            return;
        };
        let timestamp_ms = ts_to_ms(ts, time_base);
        if !decimator.admit(timestamp_ms) {
            return;
        }

        let needs_init = match scaler {
            Some(s) => s.input().format != decoded.format(),
            None => true,
        };
        if needs_init {
            match scaling::Context::get(
                decoded.format(),
                width,
                height,
                Pixel::RGBA,
                width,
                height,
                Flags::BILINEAR,
            ) {
                Ok(s) => *scaler = Some(s),
                Err(_) => return,
            }
        }

        let Some(scaler) = scaler.as_mut() else {
            return;
        };
        if scaler.run(decoded, rgba).is_err() {
            return;
        }

        frames.push(VideoFrame {
            timestamp_ms,
            rgba: copy_rgba_rows(rgba, width, height),
            width,
            height,
        });
    };

    for (stream, packet) in ictx.packets() {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        if stream.index() != stream_index {
            continue;
        }
        if decoder.send_packet(&packet).is_err() {
            continue;
        }
        while decoder.receive_frame(&mut decoded).is_ok() {
            take_frame(&decoded, &mut scaler, &mut rgba, &mut frames, &mut decimator);
        }
    }

    // Drain codec-internal buffers on a normal end of stream, with
    // decimation still applied.
    if !cancelled && decoder.send_eof().is_ok() {
        while decoder.receive_frame(&mut decoded).is_ok() {
            take_frame(&decoded, &mut scaler, &mut rgba, &mut frames, &mut decimator);
        }
    }

    if frames.is_empty() {
        return DecodedVideo::empty();
    }

    DecodedVideo {
        width,
        height,
        frames,
    }
}

/**
    Convert a raw stream timestamp to milliseconds.
*/
fn ts_to_ms(ts: i64, time_base: Rational) -> i64 {
    (ts as f64 * f64::from(time_base) * 1000.0) as i64
}

/**
    Copy the RGBA plane row by row, dropping any stride padding so the
    output satisfies `len == width * height * 4`.
*/
fn copy_rgba_rows(rgba: &frame::Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgba.stride(0);
    let data = rgba.data(0);
    let row_bytes = width as usize * 4;

    let mut out = Vec::with_capacity(row_bytes * height as usize);
    for y in 0..height as usize {
        let start = y * stride;
        out.extend_from_slice(&data[start..start + row_bytes]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimator_uniform_from_dense_input() {
        // Frames at 1 ms intervals for 5000 ms at 10 fps: ~50 admitted,
        // no two admitted frames closer together than 100 ms.
        let mut decimator = FrameDecimator::new(10);
        let admitted: Vec<i64> = (0..5000).filter(|&ts| decimator.admit(ts)).collect();

        assert_eq!(admitted.len(), 50);
        for pair in admitted.windows(2) {
            assert!(pair[1] - pair[0] >= 100);
        }
    }

    #[test]
    fn decimator_admits_first_frame_at_zero() {
        let mut decimator = FrameDecimator::new(10);
        assert!(decimator.admit(0));
        assert!(!decimator.admit(50));
        assert!(decimator.admit(100));
    }

    #[test]
    fn decimator_passes_sparse_input_through() {
        // A source slower than the target rate keeps every frame.
        let mut decimator = FrameDecimator::new(10);
        for ts in (0..2000).step_by(500) {
            assert!(decimator.admit(ts));
        }
    }

    #[test]
    fn decimator_rejects_negative_timestamps() {
        let mut decimator = FrameDecimator::new(10);
        assert!(!decimator.admit(-40));
        assert!(decimator.admit(0));
    }

    #[test]
    fn ts_to_ms_uses_time_base() {
        // 90000 ticks at 1/90000 is one second.
        assert_eq!(ts_to_ms(90000, Rational::new(1, 90000)), 1000);
        assert_eq!(ts_to_ms(500, Rational::new(1, 1000)), 500);
    }

    #[test]
    fn missing_file_is_empty_not_error() {
        let result = decode_video("/nonexistent/video.mp4", &CancelToken::new());
        assert!(result.is_empty());
    }
}
