use chrono::Duration;

use crate::errors::AppError;
use crate::models::TimeWindow;
use crate::services::availability;
use crate::services::calendar::CalendarProvider;

/// Bounded forward search for a free alternative after a conflict.
///
/// Probes windows shifted by `step`, `2*step`, ... up to `max_attempts`
/// candidates, duration preserved, and returns the first free one. `None`
/// means the search was exhausted; the caller must say so explicitly
/// rather than keep looking.
pub async fn negotiate(
    calendar: &dyn CalendarProvider,
    window: &TimeWindow,
    max_attempts: u32,
    step: Duration,
) -> Result<Option<TimeWindow>, AppError> {
    let mut offset = step;
    for attempt in 1..=max_attempts {
        let candidate = window.shifted(offset);
        if availability::is_free(calendar, &candidate).await? {
            tracing::debug!(attempt, candidate = %candidate, "found free alternative");
            return Ok(Some(candidate));
        }
        offset = offset + step;
    }

    tracing::debug!(max_attempts, "no free alternative within bounds");
    Ok(None)
}
