use serde::Deserialize;

use crate::models::{ExtractedIntent, Intent, DEFAULT_TITLE};
use crate::services::ai::{LlmProvider, Message};

const SYSTEM_PROMPT: &str = r#"You are an intent extraction engine for a meeting scheduling assistant. Analyze the user's message.

Return ONLY valid JSON (no markdown, no explanation) with this exact structure:
{
  "intent": "book|check_availability|other",
  "title": "short event title or null",
  "time_phrase": "the raw time expression from the message, verbatim, or null"
}

Intent rules:
- "book": the user wants to schedule a meeting or event
- "check_availability": the user asks whether a time is free or busy
- "other": anything else (greetings, questions, small talk)

Do not resolve the time yourself. Copy the time expression exactly as the user wrote it into time_phrase."#;

/// Wire shape of the model's reply. Parsed strictly; anything that does
/// not fit falls through to the keyword classifier.
#[derive(Debug, Deserialize)]
struct WireIntent {
    intent: Intent,
    title: Option<String>,
    time_phrase: Option<String>,
}

impl WireIntent {
    fn normalize(self) -> ExtractedIntent {
        ExtractedIntent {
            intent: self.intent,
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            time_phrase: self.time_phrase.filter(|p| !p.trim().is_empty()),
        }
    }
}

/// Classifies one message. Never fails: if the model is unreachable or its
/// reply is not parseable, the deterministic keyword classifier answers
/// instead, so the model is never a single point of total failure.
pub async fn extract(llm: &dyn LlmProvider, message: &str) -> ExtractedIntent {
    let messages = [Message {
        role: "user".to_string(),
        content: message.to_string(),
    }];

    match llm.chat(SYSTEM_PROMPT, &messages).await {
        Ok(response) => match parse_intent_response(&response) {
            Some(extracted) => extracted,
            None => {
                tracing::warn!("model reply was not valid intent JSON, using keyword classifier");
                classify_keywords(message)
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "intent extraction call failed, using keyword classifier");
            classify_keywords(message)
        }
    }
}

fn parse_intent_response(response: &str) -> Option<ExtractedIntent> {
    // Try direct parse first
    if let Ok(wire) = serde_json::from_str::<WireIntent>(response) {
        return Some(wire.normalize());
    }

    // Strip markdown code fences
    let cleaned = response
        .trim()
        .strip_prefix("```json")
        .or_else(|| response.trim().strip_prefix("```"))
        .unwrap_or(response.trim());
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    if let Ok(wire) = serde_json::from_str::<WireIntent>(cleaned) {
        return Some(wire.normalize());
    }

    // Try to find a JSON object buried in surrounding prose
    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(wire) = serde_json::from_str::<WireIntent>(&cleaned[start..=end]) {
                return Some(wire.normalize());
            }
        }
    }

    None
}

const BOOKING_VERBS: &[&str] = &["book", "schedule", "set up", "arrange", "plan a"];
const AVAILABILITY_WORDS: &[&str] = &["free", "available", "availability", "busy", "open slot"];

/// Deterministic fallback classifier. The whole raw message is kept as the
/// time phrase so the resolver still has something to work with.
pub fn classify_keywords(message: &str) -> ExtractedIntent {
    let lower = message.to_lowercase();

    let intent = if BOOKING_VERBS.iter().any(|v| lower.contains(v)) {
        Intent::Book
    } else if AVAILABILITY_WORDS.iter().any(|w| lower.contains(w)) {
        Intent::CheckAvailability
    } else {
        Intent::Other
    };

    ExtractedIntent {
        intent,
        title: DEFAULT_TITLE.to_string(),
        time_phrase: if message.trim().is_empty() {
            None
        } else {
            Some(message.to_string())
        },
    }
}
