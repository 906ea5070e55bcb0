/// Pipeline error taxonomy. Recoverable conditions are handled inside the
/// component that detects them; only these kinds cross component seams,
/// and the orchestrator turns each into a fixed user-facing sentence.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Phrase unresolvable even by the total fallback; only blank input.
    #[error("time parse error: {0}")]
    TimeParse(String),

    /// Calendar backend timed out or errored. Never coerced to free/busy.
    #[error("calendar backend error: {0}")]
    Calendar(String),

    /// LLM call failed where no deterministic fallback applies.
    #[error("AI provider error: {0}")]
    Ai(String),
}
