use chrono::{DateTime, Duration};
use chrono_tz::Tz;

/// A half-open scheduling window `[start, end)` in a single named timezone.
/// Invariant: `end > start`, upheld by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl TimeWindow {
    /// Builds a window from a start and a positive duration.
    pub fn from_start(start: DateTime<Tz>, duration: Duration) -> Self {
        debug_assert!(duration > Duration::zero());
        Self {
            start,
            end: start + duration.max(Duration::minutes(1)),
        }
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Same-length window shifted forward by `offset`.
    pub fn shifted(&self, offset: Duration) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%A %B %-d at %-I:%M %p"),
            self.end.format("%-I:%M %p %Z")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2025, 6, 16, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_from_start_duration() {
        let w = TimeWindow::from_start(start(), Duration::minutes(60));
        assert_eq!(w.duration(), Duration::minutes(60));
        assert!(w.end() > w.start());
    }

    #[test]
    fn test_shifted_preserves_duration() {
        let w = TimeWindow::from_start(start(), Duration::minutes(30));
        let s = w.shifted(Duration::hours(2));
        assert_eq!(s.start(), start() + Duration::hours(2));
        assert_eq!(s.duration(), Duration::minutes(30));
    }

    #[test]
    fn test_display_human_readable() {
        let w = TimeWindow::from_start(start(), Duration::hours(1));
        let text = w.to_string();
        assert!(text.contains("Monday June 16 at 3:00 PM"));
        assert!(text.contains("4:00 PM"));
    }
}
