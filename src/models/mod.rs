pub mod event;
pub mod intent;
pub mod outcome;
pub mod window;

pub use event::CalendarEvent;
pub use intent::{ExtractedIntent, Intent, DEFAULT_TITLE};
pub use outcome::BookingOutcome;
pub use window::TimeWindow;
