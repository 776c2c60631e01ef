use tokio::time::Instant;

/// Monotonic millisecond time source for the control loop
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds elapsed since the clock was created
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Non-blocking periodic action: fires when a full interval has elapsed
/// since it last ran. The first run happens one interval after start.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    name: &'static str,
    interval_ms: u64,
    last_run_ms: u64,
}

impl PeriodicTask {
    pub fn new(name: &'static str, interval_ms: u64) -> Self {
        Self {
            name,
            interval_ms,
            last_run_ms: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.wrapping_sub(self.last_run_ms) >= self.interval_ms
    }

    /// Mark the task as run if it is due; returns whether it fired
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.last_run_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fire_after_one_interval() {
        let mut task = PeriodicTask::new("ingest", 5000);

        assert!(!task.try_fire(0));
        assert!(!task.try_fire(4999));
        assert!(task.try_fire(5000));
        assert!(!task.try_fire(9999));
        assert!(task.try_fire(10_000));
    }

    #[test]
    fn test_late_poll_reanchors_schedule() {
        let mut task = PeriodicTask::new("report", 60_000);

        assert!(task.try_fire(61_500));
        assert!(!task.try_fire(120_000));
        assert!(task.try_fire(121_500));
    }

    #[test]
    fn test_wrapping_clock() {
        let mut task = PeriodicTask::new("trend", 30_000);
        task.last_run_ms = u64::MAX - 10_000;

        assert!(!task.is_due(10_000));
        assert!(task.is_due(20_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_monotonic_clock_follows_tokio_time() {
        let clock = MonotonicClock::new();
        assert_eq!(clock.now_ms(), 0);

        tokio::time::advance(std::time::Duration::from_millis(1500)).await;

        assert_eq!(clock.now_ms(), 1500);
    }
}
