use bevy::prelude::*;

/// Elapsed-time accounting with pause support. Every method takes "now" in
/// seconds so the logic stays independent of the clock driving it; the game
/// feeds it `Time::elapsed_secs_f64`.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Stopwatch {
    started_at: f64,
    paused_at: Option<f64>,
    total_paused: f64,
}

impl Stopwatch {
    pub const fn started_at(now: f64) -> Self {
        Self {
            started_at: now,
            paused_at: None,
            total_paused: 0.0,
        }
    }

    /// Records the pause instant. No-op if already paused.
    pub fn pause(&mut self, now: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Adds the time spent paused to the running total. No-op if not paused.
    pub fn resume(&mut self, now: f64) {
        if let Some(paused_at) = self.paused_at.take() {
            self.total_paused += now - paused_at;
        }
    }

    pub const fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Run time excluding paused intervals; frozen while paused.
    pub fn elapsed(&self, now: f64) -> f64 {
        self.paused_at.unwrap_or(now) - self.started_at - self.total_paused
    }

    /// `HH:MM:SS` display string.
    pub fn display(&self, now: f64) -> String {
        let total = self.elapsed(now).max(0.0) as u64;
        format!("{:02}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_interval_is_excluded_from_elapsed() {
        let mut stopwatch = Stopwatch::started_at(0.0);
        stopwatch.pause(5.0);
        stopwatch.resume(8.0);
        let elapsed = stopwatch.elapsed(10.0);
        assert!(
            (elapsed - 7.0).abs() < 1e-9,
            "5s run + 2s after resume must read 7s, got {elapsed}"
        );
    }

    #[test]
    fn elapsed_freezes_while_paused() {
        let mut stopwatch = Stopwatch::started_at(0.0);
        stopwatch.pause(3.0);
        assert!(stopwatch.is_paused());
        assert!((stopwatch.elapsed(100.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut stopwatch = Stopwatch::started_at(0.0);
        stopwatch.resume(1.0); // not paused, must do nothing
        stopwatch.pause(2.0);
        stopwatch.pause(4.0); // already paused, must keep the first instant
        stopwatch.resume(6.0);
        assert!((stopwatch.elapsed(6.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn display_formats_hours_minutes_seconds() {
        let stopwatch = Stopwatch::started_at(0.0);
        assert_eq!(stopwatch.display(0.0), "00:00:00");
        assert_eq!(stopwatch.display(65.0), "00:01:05");
        assert_eq!(stopwatch.display(3600.0 + 2.0 * 60.0 + 3.0), "01:02:03");
    }
}
