/*!
    Cooperative cancellation.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/**
    Cooperative cancellation token shared between a caller and a decode
    worker.

    Cloning is cheap and all clones observe the same flag. Pipelines poll
    the token once per input packet, so cancellation latency is bounded by
    one packet's decode time rather than being instantaneous.
*/
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /**
        Create a new, unsignaled token.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Signal cancellation. Idempotent.
    */
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /**
        Returns true if cancellation has been signaled.
    */
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

static_assertions::assert_impl_all!(CancelToken: Send, Sync);
