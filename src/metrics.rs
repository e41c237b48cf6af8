//! Per-operation timing.

use std::time::Instant;
use tracing::info;

/// Running timer for an operation.
#[derive(Debug)]
pub struct OperationTimer {
    operation: &'static str,
    start: Instant,
}

impl OperationTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Stop the timer and emit duration and item count.
    pub fn finish(self, table: &str, items: usize) {
        info!(
            operation = self.operation,
            table,
            items,
            duration_ms = self.elapsed_ms(),
            "operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_only_grows() {
        let timer = OperationTimer::start("put_item");
        let first = timer.elapsed_ms();
        assert!(first >= 0.0);
        assert!(timer.elapsed_ms() >= first);
        timer.finish("users", 1);
    }
}
