use std::sync::Mutex;

/// Point-in-time copy of the engine counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_scored: usize,
    pub batch_errors: usize,
}

#[derive(Debug)]
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_scored(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.records_scored += count;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.batch_errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let recorder = MetricsRecorder::new();
        recorder.record_scored(3);
        recorder.record_scored(2);
        recorder.record_error();
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.records_scored, 5);
        assert_eq!(snapshot.batch_errors, 1);
    }
}
