// SPDX-License-Identifier: MIT
//! Scoped wall-clock measurement

use std::time::{Duration, Instant};

/// Run `f` and return its output together with the elapsed wall-clock time
#[inline]
pub fn measure<T, F>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let output = f();
    (output, start.elapsed())
}

/// Duration in fractional milliseconds, for reporting
#[inline]
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_returns_output() {
        let (value, elapsed) = measure(|| 2 + 2);
        assert_eq!(value, 4);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_measure_covers_the_closure() {
        let (_, elapsed) = measure(|| std::thread::sleep(Duration::from_millis(5)));
        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_as_millis_f64() {
        assert_eq!(as_millis_f64(Duration::from_micros(1500)), 1.5);
        assert_eq!(as_millis_f64(Duration::ZERO), 0.0);
    }
}
