/*!
    Media probing and decoding for the media engine.

    This crate turns a media container into time-addressable decoded
    content: interleaved 16-bit PCM with a waveform summary, and a
    decimated sequence of timestamped RGBA frames.

    # Components

    - [`probe`] - Open a container and report stream presence and duration
    - [`decode_audio`] - Decode the best audio stream to interleaved S16 PCM
    - [`decode_video`] - Decode the best video stream to decimated RGBA frames
    - [`decode_media`] / [`spawn_decode`] - Run everything and aggregate
      into one [`DecodeResult`](media_types::DecodeResult)

    # Error model

    Only container-level failures are errors. A missing stream, an
    unavailable codec, or cancellation observed mid-decode all yield empty
    or partial results, which are valid. See `media_types::Error`.

    # Cancellation

    All pipelines poll a [`CancelToken`](media_types::CancelToken) once per
    input packet. A cancelled pipeline stops reading further packets and
    returns whatever was decoded so far.
*/

use std::sync::OnceLock;

mod audio;
mod orchestrate;
mod probe;
mod video;
mod waveform;

pub use audio::decode_audio;
pub use orchestrate::{DecodeHandle, decode_media, spawn_decode};
pub use probe::{ProbeInfo, probe};
pub use video::{FrameDecimator, decode_video};
pub use waveform::build_waveform;

/**
    Initialize the FFmpeg runtime exactly once per process.

    Repeated decode calls must not reattempt native-library resolution, so
    the outcome of the first attempt is latched and reused.
*/
pub(crate) fn ensure_init() -> media_types::Result<()> {
    static INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    match INIT.get_or_init(|| ffmpeg_next::init().map_err(|e| e.to_string())) {
        Ok(()) => Ok(()),
        Err(message) => Err(media_types::Error::open(format!(
            "FFmpeg initialization failed: {message}"
        ))),
    }
}
