//! Availability resolution for rental items.
//!
//! The ledger answers "is this item free for this date/time range?" from
//! two inputs: owner-declared [`SlotWindow`] overrides and the occupied
//! windows of confirmed bookings. Dates with no explicit slot default to
//! available (open-availability policy).
//!
//! Range iteration is day-by-day, not a coarse date-difference check,
//! because partial-day overlaps (evening pickup/return windows) must be
//! evaluated per time slot.

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A sub-day pickup/return window on a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// An owner-declared availability override for a single date.
///
/// `start_time`/`end_time` of `None` means the override claims the whole
/// day.
#[derive(Debug, Clone)]
pub struct SlotWindow {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_available: bool,
}

/// The occupied window of a confirmed booking. `end_date` is exclusive.
#[derive(Debug, Clone)]
pub struct BookedWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Every calendar day touched by `[start, end)`, in order.
///
/// Returns an empty vec when `start >= end`; callers validate ordering
/// before reserving.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day < end {
        days.push(day);
        day = day
            .checked_add_days(Days::new(1))
            .expect("date range within chrono bounds");
    }
    days
}

/// Whether two time windows on the same date overlap.
///
/// A side with a missing bound claims the whole day and therefore
/// overlaps everything.
pub fn windows_overlap(
    a_start: Option<NaiveTime>,
    a_end: Option<NaiveTime>,
    b_start: Option<NaiveTime>,
    b_end: Option<NaiveTime>,
) -> bool {
    match (a_start, a_end, b_start, b_end) {
        (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => {
            a_start < b_end && b_start < a_end
        }
        _ => true,
    }
}

/// Validate a batch of slot writes before they replace stored slots.
///
/// Rejects with [`CoreError::ConflictingSlot`] when two slots for the
/// same date have overlapping time windows, or when a slot's window is
/// inverted.
pub fn validate_slot_batch(slots: &[SlotWindow]) -> Result<(), CoreError> {
    for slot in slots {
        if let (Some(start), Some(end)) = (slot.start_time, slot.end_time) {
            if start >= end {
                return Err(CoreError::ConflictingSlot(format!(
                    "slot on {} has start_time {} >= end_time {}",
                    slot.date, start, end
                )));
            }
        }
    }

    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if a.date == b.date
                && windows_overlap(a.start_time, a.end_time, b.start_time, b.end_time)
            {
                return Err(CoreError::ConflictingSlot(format!(
                    "two slots on {} have overlapping time windows",
                    a.date
                )));
            }
        }
    }

    Ok(())
}

/// Resolve the unavailable dates within `[start, end)`.
///
/// Per date, in precedence order:
/// 1. A confirmed booking overlapping the date (and the requested time
///    slot, where both sides declare one) makes it unavailable regardless
///    of slot overrides.
/// 2. An explicit `is_available: false` slot overlapping the requested
///    window makes it unavailable.
/// 3. Otherwise the date is available (open default).
///
/// An empty result means the whole range is free.
pub fn unavailable_dates(
    start: NaiveDate,
    end: NaiveDate,
    requested: Option<TimeSlot>,
    slots: &[SlotWindow],
    bookings: &[BookedWindow],
) -> Vec<NaiveDate> {
    let (req_start, req_end) = match requested {
        Some(ts) => (Some(ts.start_time), Some(ts.end_time)),
        None => (None, None),
    };

    days_in_range(start, end)
        .into_iter()
        .filter(|date| {
            let booked = bookings.iter().any(|b| {
                b.start_date <= *date
                    && *date < b.end_date
                    && windows_overlap(b.start_time, b.end_time, req_start, req_end)
            });
            if booked {
                return true;
            }

            slots.iter().any(|s| {
                s.date == *date
                    && !s.is_available
                    && windows_overlap(s.start_time, s.end_time, req_start, req_end)
            })
        })
        .collect()
}
