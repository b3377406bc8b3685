use chrono::NaiveDate;

use crate::types::EntityId;

/// Domain error taxonomy shared by the DB and API layers.
///
/// Every booking/availability operation reports failures through these
/// variants; nothing is silently swallowed, so callers can distinguish
/// "already done" from "not allowed".
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Two slots in the same write batch (or on disk) overlap in time
    /// for the same item/date.
    #[error("Conflicting availability slots: {0}")]
    ConflictingSlot(String),

    /// Neither the hourly nor the daily rate tier covers the requested
    /// duration.
    #[error("No applicable rate for a rental of {duration_hours} hours")]
    NoApplicableRate { duration_hours: i64 },

    /// The requested range collides with a blackout slot or a confirmed
    /// booking. Carries the specific dates so the caller can suggest
    /// alternatives.
    #[error("Requested range is unavailable on: {dates:?}")]
    RangeUnavailable { dates: Vec<NaiveDate> },

    /// A transition was attempted outside its preconditions. Carries the
    /// current and attempted state for diagnosability.
    #[error("Invalid state transition: booking is {current}, attempted {attempted}")]
    InvalidState { current: String, attempted: String },

    #[error("Unauthorized actor: {0}")]
    UnauthorizedActor(String),
}
