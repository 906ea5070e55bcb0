use crate::models::TimeWindow;

/// Terminal value of a booking attempt, rendered into the reply text by
/// the conversation orchestrator.
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    /// The event was inserted; `link` is the backend's event URL.
    Booked { link: String, window: TimeWindow },
    /// The requested window was busy. `suggested` is the first free
    /// alternative found by negotiation, if any.
    Conflict { suggested: Option<TimeWindow> },
    /// A backend failure stopped the attempt. `reason` is logged, never
    /// shown to the user verbatim.
    Unresolved { reason: String },
}
