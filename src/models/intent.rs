use serde::{Deserialize, Serialize};

/// Title used when neither the model nor the message names the event.
pub const DEFAULT_TITLE: &str = "Meeting";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Book,
    CheckAvailability,
    Other,
}

/// What the extractor distilled out of one user message. Consumed once,
/// never mutated; no state survives the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedIntent {
    pub intent: Intent,
    pub title: String,
    pub time_phrase: Option<String>,
}
