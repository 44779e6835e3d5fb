/*!
    Container probing.
*/

use std::path::Path;

use ffmpeg_next::{ffi::AV_TIME_BASE, format, media};

use media_types::{Error, Result};

use crate::ensure_init;

/**
    Stream presence and duration metadata for one container.
*/
#[derive(Clone, Copy, Debug)]
pub struct ProbeInfo {
    /// Index of the best audio stream, if any.
    pub audio_stream: Option<usize>,
    /// Index of the best video stream, if any.
    pub video_stream: Option<usize>,
    /// Container-reported duration in milliseconds (0 if unknown).
    pub duration_ms: i64,
}

impl ProbeInfo {
    /**
        Returns true if the container has an audio stream.
    */
    pub fn has_audio(&self) -> bool {
        self.audio_stream.is_some()
    }

    /**
        Returns true if the container has a video stream.
    */
    pub fn has_video(&self) -> bool {
        self.video_stream.is_some()
    }
}

/**
    Open a container and report stream presence flags and total duration.

    Fails with [`Error::Open`] if the container cannot be parsed and with
    [`Error::StreamInfo`] if it parses but exposes no stream metadata.
    The only side effect is a transient file handle, released on every
    exit path by `ffmpeg-next`'s owned input context.
*/
pub fn probe<P: AsRef<Path>>(path: P) -> Result<ProbeInfo> {
    ensure_init()?;

    let path = path.as_ref();
    let ictx = format::input(&path).map_err(|e| Error::open(e.to_string()))?;

    if ictx.streams().count() == 0 {
        return Err(Error::stream_info("container reports no streams"));
    }

    let audio_stream = ictx.streams().best(media::Type::Audio).map(|s| s.index());
    let video_stream = ictx.streams().best(media::Type::Video).map(|s| s.index());

    Ok(ProbeInfo {
        audio_stream,
        video_stream,
        duration_ms: container_duration_ms(&ictx),
    })
}

/**
    Container duration in milliseconds, 0 when the container reports none.

    `Input::duration()` is in `AV_TIME_BASE` units (microseconds) and is
    negative when unknown.
*/
pub(crate) fn container_duration_ms(ictx: &format::context::Input) -> i64 {
    let duration = ictx.duration();
    if duration > 0 {
        (duration as f64 * 1000.0 / f64::from(AV_TIME_BASE)) as i64
    } else {
        0
    }
}
