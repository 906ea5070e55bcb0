//! Turns a natural-language time phrase into a concrete window.
//!
//! Two layers: a structured parse (ISO dates, clock times, day anchors)
//! that only succeeds when the phrase pins the time down, then a total
//! keyword fallback that always yields a window at a canonical hour.
//! Priority inside the fallback is fixed: explicit weekday name, then
//! "next week", then "tomorrow", then default-tomorrow.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::AppError;
use crate::models::TimeWindow;

/// Local hour used whenever a phrase gives a day but no clock time.
pub const FALLBACK_HOUR: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// The phrase pinned down an explicit date and/or clock time.
    Parsed,
    /// The keyword table picked the window; worth annotating in the reply.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Resolved {
    pub window: TimeWindow,
    pub confidence: Confidence,
}

lazy_static! {
    static ref ISO_DATETIME_RE: Regex =
        Regex::new(r"\b(\d{4}-\d{2}-\d{2})[T ](\d{1,2}):(\d{2})\b").unwrap();
    static ref ISO_DATE_RE: Regex = Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap();
    static ref CLOCK_RE: Regex = Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").unwrap();
    static ref CLOCK_24H_RE: Regex = Regex::new(r"\bat\s+(\d{1,2}):(\d{2})\b").unwrap();
}

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Resolves `phrase` relative to `reference`, producing a window of the
/// given duration. Total for any non-empty phrase; only blank input fails.
pub fn resolve(
    phrase: &str,
    reference: DateTime<Tz>,
    duration: Duration,
) -> Result<Resolved, AppError> {
    let trimmed = phrase.trim();
    if trimmed.is_empty() {
        return Err(AppError::TimeParse("empty time phrase".to_string()));
    }
    let lower = trimmed.to_lowercase();

    if let Some(start) = structured_parse(&lower, reference) {
        return Ok(Resolved {
            window: TimeWindow::from_start(start, duration),
            confidence: Confidence::Parsed,
        });
    }

    let start = keyword_fallback(&lower, reference);
    Ok(Resolved {
        window: TimeWindow::from_start(start, duration),
        confidence: Confidence::Fallback,
    })
}

fn structured_parse(lower: &str, reference: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = reference.timezone();

    // Full ISO datetime wins outright.
    if let Some(c) = ISO_DATETIME_RE.captures(lower) {
        let date = NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok()?;
        let time = NaiveTime::from_hms_opt(c[2].parse().ok()?, c[3].parse().ok()?, 0)?;
        return localize(tz, date.and_time(time));
    }

    let clock = extract_clock(lower);

    // ISO date, with the clock time if one accompanies it.
    if let Some(c) = ISO_DATE_RE.captures(lower) {
        let date = NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok()?;
        let time = clock.or_else(|| NaiveTime::from_hms_opt(FALLBACK_HOUR, 0, 0))?;
        return localize(tz, date.and_time(time));
    }

    // Past here the phrase must carry an explicit clock time; day-words
    // on their own are the keyword fallback's job. Anchor priority matches
    // keyword_fallback: weekday > "next week" > "tomorrow".
    let time = clock?;

    let date = if let Some(weekday) = find_weekday(lower) {
        next_occurrence(reference.date_naive(), weekday)
    } else if lower.contains("next week") {
        reference.date_naive() + Duration::days(7)
    } else if lower.contains("tomorrow") {
        reference.date_naive() + Duration::days(1)
    } else {
        // "today" or a bare clock time: today if still ahead of the
        // reference, else tomorrow.
        let candidate = localize(tz, reference.date_naive().and_time(time))?;
        return Some(if candidate > reference {
            candidate
        } else {
            candidate + Duration::days(1)
        });
    };

    localize(tz, date.and_time(time))
}

/// Always yields a start; ambiguity collapses to tomorrow at the fixed hour.
fn keyword_fallback(lower: &str, reference: DateTime<Tz>) -> DateTime<Tz> {
    let date = if let Some(weekday) = find_weekday(lower) {
        next_occurrence(reference.date_naive(), weekday)
    } else if lower.contains("next week") {
        reference.date_naive() + Duration::days(7)
    } else {
        // "tomorrow" and the no-match default coincide.
        reference.date_naive() + Duration::days(1)
    };

    NaiveTime::from_hms_opt(FALLBACK_HOUR, 0, 0)
        .and_then(|t| localize(reference.timezone(), date.and_time(t)))
        .unwrap_or_else(|| reference + Duration::days(1))
}

fn extract_clock(lower: &str) -> Option<NaiveTime> {
    if let Some(c) = CLOCK_RE.captures(lower) {
        let mut hour: u32 = c[1].parse().ok()?;
        let minute: u32 = c.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        if hour == 0 || hour > 12 {
            return None;
        }
        match &c[3] {
            "pm" if hour != 12 => hour += 12,
            "am" if hour == 12 => hour = 0,
            _ => {}
        }
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    if let Some(c) = CLOCK_24H_RE.captures(lower) {
        return NaiveTime::from_hms_opt(c[1].parse().ok()?, c[2].parse().ok()?, 0);
    }

    None
}

fn find_weekday(lower: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map(|(_, weekday)| *weekday)
}

/// Next calendar occurrence of `target`, at least one day ahead: naming
/// the reference's own weekday means next week, never today.
fn next_occurrence(from: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (target.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    from + Duration::days(if ahead == 0 { 7 } else { ahead })
}

/// Localizes a naive datetime, nudging forward an hour if it falls in a
/// DST gap.
fn localize(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    // 2025-06-16 is a Monday.
    fn reference() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2025, 6, 16, 9, 0, 0).unwrap()
    }

    fn resolve_ok(phrase: &str) -> Resolved {
        resolve(phrase, reference(), Duration::minutes(60)).unwrap()
    }

    #[test]
    fn test_tomorrow_is_reference_plus_one_day() {
        for phrase in ["tomorrow", "sometime tomorrow", "book me tomorrow at 3pm"] {
            let r = resolve_ok(phrase);
            assert_eq!(
                r.window.start().date_naive(),
                reference().date_naive() + Duration::days(1),
                "phrase: {phrase}"
            );
        }
    }

    #[test]
    fn test_tomorrow_with_clock_time() {
        let r = resolve_ok("tomorrow at 3pm");
        assert_eq!(r.confidence, Confidence::Parsed);
        assert_eq!(r.window.start().hour(), 15);
        assert_eq!(r.window.start().minute(), 0);
    }

    #[test]
    fn test_same_weekday_resolves_next_week() {
        // Reference is a Monday; "monday" must mean the one seven days out.
        let r = resolve_ok("monday");
        assert_eq!(
            r.window.start().date_naive(),
            reference().date_naive() + Duration::days(7)
        );

        let r = resolve_ok("monday at 10am");
        assert_eq!(
            r.window.start().date_naive(),
            reference().date_naive() + Duration::days(7)
        );
        assert_eq!(r.window.start().hour(), 10);
    }

    #[test]
    fn test_weekday_ahead_in_same_week() {
        let r = resolve_ok("friday");
        assert_eq!(
            r.window.start().date_naive(),
            NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
        );
        assert_eq!(r.window.start().hour(), FALLBACK_HOUR);
        assert_eq!(r.confidence, Confidence::Fallback);
    }

    #[test]
    fn test_next_week_keyword() {
        let r = resolve_ok("next week");
        assert_eq!(
            r.window.start().date_naive(),
            reference().date_naive() + Duration::days(7)
        );
    }

    #[test]
    fn test_anchor_priority_same_with_and_without_clock() {
        // The named weekday wins over "tomorrow" in both layers, so the
        // clock time only changes the hour, never the day.
        let with_clock = resolve_ok("friday tomorrow at 3pm");
        let without_clock = resolve_ok("friday tomorrow");
        assert_eq!(
            with_clock.window.start().date_naive(),
            NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
        );
        assert_eq!(
            with_clock.window.start().date_naive(),
            without_clock.window.start().date_naive()
        );
    }

    #[test]
    fn test_today_with_passed_time_rolls_to_tomorrow() {
        // 2pm is still ahead of the 9am reference: today.
        let r = resolve_ok("today at 2pm");
        assert_eq!(r.window.start().date_naive(), reference().date_naive());

        // Uttered at 3pm, "today at 2pm" has already passed: tomorrow.
        let afternoon = chrono_tz::UTC.with_ymd_and_hms(2025, 6, 16, 15, 0, 0).unwrap();
        let r = resolve("today at 2pm", afternoon, Duration::minutes(60)).unwrap();
        assert_eq!(
            r.window.start().date_naive(),
            afternoon.date_naive() + Duration::days(1)
        );
        assert_eq!(r.window.start().hour(), 14);
    }

    #[test]
    fn test_weekday_outranks_next_week() {
        // Fixed priority: the named weekday wins over "next week".
        let r = resolve_ok("friday next week");
        assert_eq!(
            r.window.start().date_naive(),
            NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
        );
    }

    #[test]
    fn test_iso_date_and_datetime() {
        let r = resolve_ok("2025-07-04");
        assert_eq!(r.confidence, Confidence::Parsed);
        assert_eq!(
            r.window.start().date_naive(),
            NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
        );
        assert_eq!(r.window.start().hour(), FALLBACK_HOUR);

        let r = resolve_ok("2025-07-04 14:30");
        assert_eq!(r.window.start().hour(), 14);
        assert_eq!(r.window.start().minute(), 30);
    }

    #[test]
    fn test_bare_clock_time_prefers_future() {
        // 10am is ahead of the 9am reference: today.
        let r = resolve_ok("at 10am");
        assert_eq!(r.window.start().date_naive(), reference().date_naive());

        // 8am already passed: tomorrow.
        let r = resolve_ok("8am");
        assert_eq!(
            r.window.start().date_naive(),
            reference().date_naive() + Duration::days(1)
        );
    }

    #[test]
    fn test_24h_clock() {
        let r = resolve_ok("tomorrow at 14:30");
        assert_eq!(r.window.start().hour(), 14);
        assert_eq!(r.window.start().minute(), 30);
        assert_eq!(r.confidence, Confidence::Parsed);
    }

    #[test]
    fn test_noon_and_midnight() {
        let r = resolve_ok("tomorrow at 12pm");
        assert_eq!(r.window.start().hour(), 12);
        let r = resolve_ok("tomorrow at 12am");
        assert_eq!(r.window.start().hour(), 0);
    }

    #[test]
    fn test_gibberish_falls_back_to_tomorrow() {
        let r = resolve_ok("whenever works for the team");
        assert_eq!(r.confidence, Confidence::Fallback);
        assert_eq!(
            r.window.start().date_naive(),
            reference().date_naive() + Duration::days(1)
        );
        assert_eq!(r.window.start().hour(), FALLBACK_HOUR);
    }

    #[test]
    fn test_resolve_is_total_for_non_empty_input() {
        for phrase in ["x", "??", "soonish", "after the thing", "13pm"] {
            assert!(resolve(phrase, reference(), Duration::minutes(30)).is_ok());
        }
    }

    #[test]
    fn test_empty_phrase_is_the_only_failure() {
        assert!(resolve("", reference(), Duration::minutes(30)).is_err());
        assert!(resolve("   ", reference(), Duration::minutes(30)).is_err());
    }

    #[test]
    fn test_window_duration_comes_from_caller() {
        let r = resolve("tomorrow", reference(), Duration::minutes(30)).unwrap();
        assert_eq!(r.window.duration(), Duration::minutes(30));
    }

    #[test]
    fn test_localized_to_named_timezone() {
        let ref_ny = chrono_tz::America::New_York
            .with_ymd_and_hms(2025, 6, 16, 9, 0, 0)
            .unwrap();
        let r = resolve("tomorrow at 3pm", ref_ny, Duration::minutes(60)).unwrap();
        assert_eq!(r.window.start().hour(), 15);
        assert_eq!(r.window.start().timezone(), chrono_tz::America::New_York);
    }
}
