/*!
    Decode orchestration.

    Runs probing plus both decode pipelines for one media file and
    aggregates the outcome into a single [`DecodeResult`]. The work runs
    on a dedicated worker thread so the interactive thread is never
    blocked; progress is reported through an injected [`LogSink`].
*/

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use media_types::{CancelToken, DecodeResult, Error, LogSink, MediaKind, Result};

use crate::{audio::decode_audio, probe::probe, video::decode_video};

/**
    Probe `path` and decode its audio and video streams.

    Both pipelines are attempted unconditionally when their stream exists;
    each may independently come back empty, which is not an error.

    Fails with [`Error::Aborted`] when `cancel` is already signaled before
    any work begins. Cancellation observed later degrades to partial
    results; the caller that cancelled is expected to discard them.
    Fails with [`Error::Open`] / [`Error::Unsupported`] when the
    container itself is unusable.
*/
pub fn decode_media<P: AsRef<Path>>(
    path: P,
    cancel: &CancelToken,
    log: &dyn LogSink,
) -> Result<DecodeResult> {
    let path = path.as_ref();

    if cancel.is_cancelled() {
        return Err(Error::Aborted);
    }

    if !path.exists() {
        return Err(Error::open(format!("no such file: {}", path.display())));
    }

    let info = match probe(path) {
        Ok(info) => info,
        // A container that parses but resolves no stream metadata is
        // unsupported media at this level, not a probing detail.
        Err(Error::StreamInfo { message }) => return Err(Error::unsupported(message)),
        Err(e) => return Err(e),
    };
    log.log(&format!(
        "[decode] streams: audio={}, video={}, duration_ms={}",
        fmt_stream(info.audio_stream),
        fmt_stream(info.video_stream),
        info.duration_ms,
    ));

    let audio = if info.has_audio() {
        let audio = decode_audio(path, cancel);
        log.log(&format!(
            "[decode] audio: samples={}, rate={}, channels={}, content_ms={}",
            audio.samples.len(),
            audio.sample_rate,
            audio.channels,
            audio.content_duration_ms(),
        ));
        Some(audio)
    } else {
        None
    };

    let video = if info.has_video() {
        let video = decode_video(path, cancel);
        log.log(&format!(
            "[decode] video: frames={}, size={}x{}",
            video.frames.len(),
            video.width,
            video.height,
        ));
        Some(video)
    } else {
        None
    };

    let audio = audio.filter(|a| !a.is_empty());
    let video = video.filter(|v| !v.is_empty());

    // Video wins whenever any decoded frame exists; a video result may
    // still carry audio for sync.
    let kind = if video.is_some() {
        MediaKind::Video
    } else if audio.is_some() {
        MediaKind::Audio
    } else if info.has_audio() || info.has_video() {
        MediaKind::Unknown
    } else {
        MediaKind::None
    };
    log.log(&format!("[decode] classified as {kind:?}"));

    Ok(DecodeResult {
        kind,
        duration_ms: info.duration_ms,
        audio,
        video,
    })
}

/**
    Handle to a decode running on a dedicated worker thread.
*/
pub struct DecodeHandle {
    handle: JoinHandle<Result<DecodeResult>>,
}

impl DecodeHandle {
    /**
        Wait for the worker to finish and surface its result.
    */
    pub fn join(self) -> Result<DecodeResult> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(Error::unsupported("decode worker panicked")))
    }

    /**
        Returns true once the worker has finished.
    */
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/**
    Run [`decode_media`] on a dedicated worker thread.

    The caller keeps the [`CancelToken`]; starting a new import must
    cancel and join the previous handle first so two decodes never race.
*/
pub fn spawn_decode(
    path: impl Into<PathBuf>,
    cancel: CancelToken,
    log: Arc<dyn LogSink>,
) -> DecodeHandle {
    let path = path.into();
    let handle = thread::spawn(move || decode_media(&path, &cancel, log.as_ref()));
    DecodeHandle { handle }
}

fn fmt_stream(index: Option<usize>) -> String {
    match index {
        Some(i) => i.to_string(),
        None => "none".to_owned(),
    }
}
