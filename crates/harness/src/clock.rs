use std::time::{Duration, Instant};

/// One reading of the [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Seconds since the previous reading.
    pub delta: f64,
}

/// Monotonic elapsed-time source, read once per frame.
#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    last: Duration,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: Duration::ZERO,
        }
    }

    /// Read elapsed time. Never smaller than the previous reading.
    pub fn read(&mut self) -> ClockReading {
        let now = self.start.elapsed().max(self.last);
        let delta = now - self.last;
        self.last = now;
        ClockReading {
            elapsed: now.as_secs_f64(),
            delta: delta.as_secs_f64(),
        }
    }

    /// Elapsed time at the last reading, without taking a new one.
    pub fn last_elapsed(&self) -> f64 {
        self.last.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_never_decrease() {
        let mut clock = Clock::new();
        let mut prev = clock.read();
        for _ in 0..1000 {
            let r = clock.read();
            assert!(r.elapsed >= prev.elapsed);
            assert!(r.delta >= 0.0);
            prev = r;
        }
        assert_eq!(clock.last_elapsed(), prev.elapsed);
    }

    #[test]
    fn delta_sums_to_elapsed() {
        let mut clock = Clock::new();
        let mut sum = 0.0;
        for _ in 0..10 {
            std::thread::sleep(Duration::from_millis(1));
            sum += clock.read().delta;
        }
        assert!((sum - clock.last_elapsed()).abs() < 1e-9);
        assert!(clock.last_elapsed() >= 0.010);
    }
}
