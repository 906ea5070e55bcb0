use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::errors::AppError;
use crate::models::{BookingOutcome, Intent, TimeWindow};
use crate::services::ai::{intent, Message};
use crate::services::timeparse::{self, Confidence, Resolved};
use crate::services::{availability, negotiate};
use crate::state::AppState;

const REPLY_PROMPT: &str = "You are a friendly scheduling assistant. Answer the user's message \
     in one or two short sentences. You can book meetings and check calendar availability \
     if asked.";

const CALENDAR_DOWN: &str =
    "I'm having trouble reaching the calendar right now. Please try again in a moment.";

const CLARIFY_TIME: &str =
    "I couldn't work out a time from that. Could you mention a day or a time, like \
     \"tomorrow at 3pm\"?";

/// Runs one message through the pipeline and always produces a reply.
/// Nothing carries over to the next request; every call starts fresh.
pub async fn process_message(state: &Arc<AppState>, message: &str) -> String {
    let message = message.trim();
    if message.is_empty() {
        return "I didn't catch that. Tell me what you'd like to schedule, or ask whether \
                a time is free."
            .to_string();
    }

    let extracted = intent::extract(state.llm.as_ref(), message).await;
    tracing::info!(intent = ?extracted.intent, title = %extracted.title, "extracted intent");

    if extracted.intent == Intent::Other {
        return free_text_reply(state, message).await;
    }

    let reference = Utc::now().with_timezone(&state.config.timezone);
    let phrase = extracted.time_phrase.as_deref().unwrap_or(message);
    let duration = Duration::minutes(state.config.default_duration_minutes);

    let resolved = match timeparse::resolve(phrase, reference, duration) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(error = %e, phrase = %phrase, "time phrase unresolvable");
            return CLARIFY_TIME.to_string();
        }
    };
    tracing::info!(window = %resolved.window, confidence = ?resolved.confidence, "resolved window");

    if extracted.intent == Intent::CheckAvailability {
        check_availability_reply(state, &resolved).await
    } else {
        let outcome = book(state, &extracted.title, &resolved.window).await;
        render_booking(&outcome, &extracted.title, &resolved)
    }
}

/// `Other` intent: hand the message straight to the model for a reply.
/// The calendar is never touched on this branch.
async fn free_text_reply(state: &Arc<AppState>, message: &str) -> String {
    match model_reply(state, message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "free-text reply failed, using canned line");
            "I can book meetings or check your calendar for you. What would you like to do?"
                .to_string()
        }
    }
}

async fn model_reply(state: &Arc<AppState>, message: &str) -> Result<String, AppError> {
    let messages = [Message {
        role: "user".to_string(),
        content: message.to_string(),
    }];

    let reply = state
        .llm
        .chat(REPLY_PROMPT, &messages)
        .await
        .map_err(|e| AppError::Ai(e.to_string()))?;

    let reply = reply.trim();
    if reply.is_empty() {
        return Err(AppError::Ai("empty completion".to_string()));
    }
    Ok(reply.to_string())
}

/// Reports free/busy and, when busy, proposes an alternative for the user
/// to confirm. Never books on its own.
async fn check_availability_reply(state: &Arc<AppState>, resolved: &Resolved) -> String {
    let window = &resolved.window;
    let note = uncertainty_note(resolved);

    match availability::is_free(state.calendar.as_ref(), window).await {
        Ok(true) => format!("{note}You're free {}.", describe(window)),
        Ok(false) => {
            let alternative = negotiate::negotiate(
                state.calendar.as_ref(),
                window,
                state.config.negotiation_max_attempts,
                Duration::minutes(state.config.negotiation_step_minutes),
            )
            .await;
            match alternative {
                Ok(Some(alt)) => format!(
                    "{note}You're busy {}. The next free slot is {}. Say the word and I'll \
                     book it.",
                    describe(window),
                    describe(&alt)
                ),
                Ok(None) => format!(
                    "{note}You're busy {}, and nothing nearby is free either.",
                    describe(window)
                ),
                Err(e) => {
                    tracing::error!(error = %e, "negotiation failed");
                    CALENDAR_DOWN.to_string()
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "availability check failed");
            CALENDAR_DOWN.to_string()
        }
    }
}

/// Book branch: at most one insert, issued only after the window checked
/// out free. The availability-recheck-then-insert gap is accepted; see
/// DESIGN.md.
async fn book(state: &Arc<AppState>, title: &str, window: &TimeWindow) -> BookingOutcome {
    match availability::is_free(state.calendar.as_ref(), window).await {
        Err(e) => BookingOutcome::Unresolved { reason: e.to_string() },
        Ok(false) => {
            let suggested = negotiate::negotiate(
                state.calendar.as_ref(),
                window,
                state.config.negotiation_max_attempts,
                Duration::minutes(state.config.negotiation_step_minutes),
            )
            .await;
            match suggested {
                Ok(suggested) => BookingOutcome::Conflict { suggested },
                Err(e) => BookingOutcome::Unresolved { reason: e.to_string() },
            }
        }
        Ok(true) => match state.calendar.insert_event(title, window).await {
            Ok(link) => BookingOutcome::Booked { link, window: window.clone() },
            Err(e) => BookingOutcome::Unresolved { reason: e.to_string() },
        },
    }
}

fn render_booking(outcome: &BookingOutcome, title: &str, resolved: &Resolved) -> String {
    let note = uncertainty_note(resolved);
    match outcome {
        BookingOutcome::Booked { link, window } => {
            format!("{note}Booked \"{title}\" for {}. Link: {link}", describe(window))
        }
        BookingOutcome::Conflict { suggested: Some(alt) } => format!(
            "{note}That time is taken. The next free slot is {}. Want me to book that \
             instead?",
            describe(alt)
        ),
        BookingOutcome::Conflict { suggested: None } => format!(
            "{note}That time is taken, and I couldn't find a free slot nearby. Could you \
             suggest another time?"
        ),
        BookingOutcome::Unresolved { reason } => {
            tracing::error!(reason = %reason, "booking unresolved");
            CALENDAR_DOWN.to_string()
        }
    }
}

fn describe(window: &TimeWindow) -> String {
    window.start().format("%A %B %-d at %-I:%M %p %Z").to_string()
}

/// Flags a keyword-fallback window so the user can correct a bad guess.
fn uncertainty_note(resolved: &Resolved) -> String {
    match resolved.confidence {
        Confidence::Parsed => String::new(),
        Confidence::Fallback => format!(
            "I read that as {}. ",
            resolved.window.start().format("%A at %-I:%M %p")
        ),
    }
}
