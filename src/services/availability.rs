use crate::errors::AppError;
use crate::models::{CalendarEvent, TimeWindow};
use crate::services::calendar::CalendarProvider;

/// Whether the window is clear of events. Any overlapping event counts as
/// busy. Backend failure surfaces as an error, never as a guess.
pub async fn is_free(
    calendar: &dyn CalendarProvider,
    window: &TimeWindow,
) -> Result<bool, AppError> {
    let conflicts = list_conflicts(calendar, window).await?;
    Ok(conflicts.is_empty())
}

/// Events overlapping the window, for diagnostics. Windows arriving here
/// have already been validated; `end > start` is a given.
pub async fn list_conflicts(
    calendar: &dyn CalendarProvider,
    window: &TimeWindow,
) -> Result<Vec<CalendarEvent>, AppError> {
    calendar
        .list_events(window)
        .await
        .map_err(|e| AppError::Calendar(e.to_string()))
}
