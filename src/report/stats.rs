use std::sync::Arc;
use std::time::Instant;

use crate::models::Mood;

/// Injected time capability. The reference is captured at construction so a
/// test double swapped in later cannot retroactively change recorded
/// timestamps.
pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Instant::now)
}

/// Aggregate counters for one run.
pub struct RunStats {
    passes: u64,
    failures: u64,
    started_at: Option<Instant>,
    mood: Mood,
    clock: Clock,
}

impl RunStats {
    pub fn new(clock: Clock) -> Self {
        Self {
            passes: 0,
            failures: 0,
            started_at: None,
            mood: Mood::Neutral,
            clock,
        }
    }

    /// Zero the counters and capture the start timestamp.
    pub fn start(&mut self) {
        self.passes = 0;
        self.failures = 0;
        self.mood = Mood::Neutral;
        self.started_at = Some((self.clock)());
    }

    pub fn record_pass(&mut self) {
        self.passes += 1;
    }

    /// The first failure flips the mood to sad; it never recovers.
    pub fn record_fail(&mut self) {
        self.failures += 1;
        self.mood = Mood::Sad;
    }

    /// Fix the terminal mood: happy only if the run never went sad.
    pub fn finish(&mut self) {
        if self.mood != Mood::Sad {
            self.mood = Mood::Happy;
        }
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    /// Elapsed seconds since start, rounded to two decimals. Zero before the
    /// run started.
    pub fn elapsed_seconds(&self) -> f64 {
        let Some(started) = self.started_at else {
            return 0.0;
        };
        let secs = ((self.clock)() - started).as_secs_f64();
        (secs * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use super::*;

    fn manual_clock() -> (Clock, Arc<AtomicU64>) {
        let base = Instant::now();
        let offset_ms = Arc::new(AtomicU64::new(0));
        let handle = Arc::clone(&offset_ms);
        let clock: Clock =
            Arc::new(move || base + Duration::from_millis(handle.load(Ordering::Relaxed)));
        (clock, offset_ms)
    }

    #[test]
    fn elapsed_rounds_to_two_decimals() {
        let (clock, offset) = manual_clock();
        let mut stats = RunStats::new(clock);
        stats.start();
        offset.store(1234, Ordering::Relaxed);
        assert_eq!(stats.elapsed_seconds(), 1.23);
        offset.store(1250, Ordering::Relaxed);
        assert_eq!(stats.elapsed_seconds(), 1.25);
    }

    #[test]
    fn elapsed_is_zero_before_start() {
        let (clock, _) = manual_clock();
        assert_eq!(RunStats::new(clock).elapsed_seconds(), 0.0);
    }

    #[test]
    fn mood_is_sticky_sad() {
        let (clock, _) = manual_clock();
        let mut stats = RunStats::new(clock);
        stats.start();
        stats.record_fail();
        stats.record_pass();
        stats.record_pass();
        stats.finish();
        assert_eq!(stats.mood(), Mood::Sad);
        assert_eq!(stats.passes(), 2);
        assert_eq!(stats.failures(), 1);
    }

    #[test]
    fn mood_turns_happy_only_at_finish() {
        let (clock, _) = manual_clock();
        let mut stats = RunStats::new(clock);
        stats.start();
        stats.record_pass();
        assert_eq!(stats.mood(), Mood::Neutral);
        stats.finish();
        assert_eq!(stats.mood(), Mood::Happy);
    }

    #[test]
    fn start_resets_counters() {
        let (clock, _) = manual_clock();
        let mut stats = RunStats::new(clock);
        stats.start();
        stats.record_pass();
        stats.record_fail();
        stats.start();
        assert_eq!(stats.passes(), 0);
        assert_eq!(stats.failures(), 0);
        assert_eq!(stats.mood(), Mood::Neutral);
    }
}
