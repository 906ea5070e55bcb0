use serde::{Deserialize, Serialize};

/// An event as the calendar backend reports it. The pipeline only reads
/// these back for conflict detection and diagnostics; it never owns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    /// RFC 3339 start as returned by the backend.
    pub start: String,
    /// RFC 3339 end as returned by the backend.
    pub end: String,
    pub link: Option<String>,
}
