/*!
    Decoded media types.
*/

/**
    Classification of a decode result.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// No playable stream was found in the container.
    None,
    /// Streams were found but neither pipeline produced any content.
    Unknown,
    /// Audio content only.
    Audio,
    /// Video content (possibly with accompanying audio for sync).
    Video,
}

/**
    Aggregate result of decoding one media file.

    Immutable once produced. `duration_ms` comes from container-level
    metadata, not from decoded content length; 0 means the container did
    not report a duration and consumers should lay out a default timeline.
*/
#[derive(Clone, Debug)]
pub struct DecodeResult {
    /// Classification of the decoded content.
    pub kind: MediaKind,
    /// Container-reported duration in milliseconds (0 if unknown).
    pub duration_ms: i64,
    /// Decoded audio, if an audio stream produced samples.
    pub audio: Option<DecodedAudio>,
    /// Decoded video, if a video stream produced frames.
    pub video: Option<DecodedVideo>,
}

/**
    Decoded audio content: interleaved 16-bit PCM plus a waveform summary.

    `samples.len()` is always a multiple of `channels`. The waveform holds
    at most 2000 bucket peaks, each normalized to [0, 1].
*/
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    /// Interleaved signed 16-bit PCM samples.
    pub samples: Vec<i16>,
    /// Sample rate in Hz (source rate; no rate conversion is performed).
    pub sample_rate: u32,
    /// Channel count, 1 or 2.
    pub channels: u16,
    /// Per-bucket peak amplitudes in [0, 1] for timeline rendering.
    pub waveform: Vec<f64>,
}

impl DecodedAudio {
    /**
        An empty result, used when no audio stream exists or the decoder
        cannot be instantiated. Not an error condition.
    */
    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
            sample_rate: 0,
            channels: 0,
            waveform: Vec::new(),
        }
    }

    /**
        Returns true if no samples were decoded.
    */
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /**
        Number of sample-frames (interleaved sample count / channels).
    */
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /**
        Duration of the decoded samples, in milliseconds.
    */
    pub fn content_duration_ms(&self) -> i64 {
        if self.sample_rate == 0 {
            0
        } else {
            (self.frames() as f64 * 1000.0 / self.sample_rate as f64) as i64
        }
    }
}

/**
    Decoded video content: a decimated sequence of RGBA frames.

    `frames` is strictly increasing by timestamp.
*/
#[derive(Clone, Debug)]
pub struct DecodedVideo {
    /// Frame width in pixels (source resolution).
    pub width: u32,
    /// Frame height in pixels (source resolution).
    pub height: u32,
    /// Admitted frames, ordered by timestamp.
    pub frames: Vec<VideoFrame>,
}

impl DecodedVideo {
    /**
        An empty result, used when no video stream exists or the decoder
        cannot be instantiated. Not an error condition.
    */
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            frames: Vec::new(),
        }
    }

    /**
        Returns true if no frames were decoded.
    */
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/**
    A single decoded video frame in packed RGBA.

    Invariant: `rgba.len() == width * height * 4`.
*/
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// Presentation timestamp in milliseconds from stream start.
    pub timestamp_ms: i64,
    /// Packed RGBA pixel data, 4 bytes per pixel.
    pub rgba: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl VideoFrame {
    /**
        Returns the expected pixel buffer length for this frame's size.
    */
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

// Decode results cross the worker-thread boundary.
static_assertions::assert_impl_all!(DecodeResult: Send, Sync);
static_assertions::assert_impl_all!(DecodedAudio: Send, Sync);
static_assertions::assert_impl_all!(DecodedVideo: Send, Sync);
