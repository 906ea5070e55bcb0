pub mod google;

use async_trait::async_trait;

use crate::models::{CalendarEvent, TimeWindow};

/// Remote calendar backend. Windows handed in are already validated and
/// normalized to a single timezone.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// All events overlapping the window, in start order.
    async fn list_events(&self, window: &TimeWindow) -> anyhow::Result<Vec<CalendarEvent>>;

    /// Inserts an event and returns the backend's link to it.
    async fn insert_event(&self, title: &str, window: &TimeWindow) -> anyhow::Result<String>;
}
