/*!
    Device-backed playback transport for the media engine.

    Owns the audio output device and tracks play/pause/seek state for one
    loaded PCM buffer. The transport reports *relative* elapsed seconds
    since the last load/seek; the caller converts that into an absolute
    timeline position by checkpointing a base offset on every pause and
    seek (the device clock is drift-free for audio but resets on every
    requeue, so it can only ever measure elapsed time).

    For video-only media, [`FallbackClock`] substitutes a wall-clock
    stopwatch with the same start/stop/offset-accumulation discipline.

    # Degraded mode

    If no output device exists or the stream cannot be built, the
    transport silently becomes a no-op: `is_playing` stays false and all
    operations do nothing, so a caller can still run without audio
    hardware.
*/

mod clock;
mod cursor;
mod transport;

pub use clock::FallbackClock;
pub use transport::AudioTransport;
