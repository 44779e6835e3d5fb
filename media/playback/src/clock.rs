/*!
    Wall-clock fallback for video-only media.
*/

use std::time::Instant;

/**
    Wall-clock stopwatch with a manually accumulated offset.

    Substitutes for the device clock when no audio is loaded, following
    the same discipline as the device path: the running segment measures
    elapsed wall time, and pausing folds that segment into the offset so
    a later start resumes from the same position.
*/
#[derive(Debug, Default)]
pub struct FallbackClock {
    started_at: Option<Instant>,
    offset_ms: i64,
}

impl FallbackClock {
    /**
        Create a stopped clock at position zero.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Start (or resume) the clock. No-op while already running.
    */
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /**
        Pause the clock, folding the running segment into the offset.
    */
    pub fn pause(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.offset_ms += started.elapsed().as_millis() as i64;
        }
    }

    /**
        Jump to an absolute position. Keeps the running/paused state.
    */
    pub fn seek_to_ms(&mut self, position_ms: i64) {
        self.offset_ms = position_ms.max(0);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    /**
        Stop and return to position zero.
    */
    pub fn reset(&mut self) {
        self.started_at = None;
        self.offset_ms = 0;
    }

    /**
        Current position in milliseconds.
    */
    pub fn position_ms(&self) -> i64 {
        let running = self
            .started_at
            .map(|s| s.elapsed().as_millis() as i64)
            .unwrap_or(0);
        self.offset_ms + running
    }

    /**
        True while the clock is advancing.
    */
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}
