/*!
    Observational logging sink.
*/

/**
    Sink for informational log lines emitted during a decode.

    Purely observational; messages never affect control flow. The decode
    worker calls the sink from its own thread, so implementations must be
    `Send + Sync`. Any `Fn(&str) + Send + Sync` closure is a sink.
*/
pub trait LogSink: Send + Sync {
    /// Receive one informational message.
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message);
    }
}

/**
    A sink that discards everything. Useful for tests and headless callers.
*/
pub struct NullLog;

impl LogSink for NullLog {
    fn log(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closure_is_a_sink() {
        let lines = Mutex::new(Vec::new());
        let sink = |msg: &str| {
            lines.lock().unwrap().push(msg.to_owned());
        };
        sink.log("stream indexes: audio=0, video=1");

        let lines = lines.into_inner().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("audio=0"));
    }

    #[test]
    fn null_log_discards() {
        NullLog.log("ignored");
    }
}
