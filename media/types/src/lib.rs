/*!
    Shared types for the media engine.

    This crate defines the vocabulary that crosses crate boundaries: the
    decode result types, the error type, the cancellation token, and the
    log sink. It has no dependency on FFmpeg or on any audio backend, so
    consumers can depend on it without pulling in native bindings.

    # Core Types

    - [`DecodeResult`] - Aggregate result of a media decode
    - [`DecodedAudio`] and [`DecodedVideo`] - Per-stream decoded content
    - [`VideoFrame`] - A single timestamped RGBA frame
    - [`MediaKind`] - Classification of decoded media

    # Control

    - [`CancelToken`] - Cooperative cancellation flag
    - [`LogSink`] - Observational logging callback

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod cancel;
mod error;
mod log;
mod result;

pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use log::{LogSink, NullLog};
pub use result::{DecodeResult, DecodedAudio, DecodedVideo, MediaKind, VideoFrame};
