//! Rate selection and quote computation.
//!
//! A rental item carries up to four rate tiers in cents. Quotes use the
//! hourly tier for rentals of 24 hours or less (when set) and otherwise
//! fall back to the daily tier at `ceil(hours / 24)` days. The weekly and
//! monthly tiers are owner-facing display attributes and do not
//! participate in quote selection.

use chrono::{Days, NaiveDate};

use crate::availability::TimeSlot;
use crate::error::CoreError;
use crate::types::Cents;

/// Per-item rate tiers in cents. At least one must be set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateSchedule {
    pub hourly: Option<Cents>,
    pub daily: Option<Cents>,
    pub weekly: Option<Cents>,
    pub monthly: Option<Cents>,
}

impl RateSchedule {
    /// Validate that at least one tier is set and all set tiers are
    /// positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        let tiers = [
            ("hourly", self.hourly),
            ("daily", self.daily),
            ("weekly", self.weekly),
            ("monthly", self.monthly),
        ];

        if tiers.iter().all(|(_, rate)| rate.is_none()) {
            return Err(CoreError::Validation(
                "at least one rate tier must be set".to_string(),
            ));
        }

        for (name, rate) in tiers {
            if let Some(cents) = rate {
                if cents <= 0 {
                    return Err(CoreError::Validation(format!(
                        "{name} rate must be positive, got {cents}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Compute the rental total for a duration in hours.
    ///
    /// Hourly tier when `duration_hours <= 24` and an hourly rate is set;
    /// otherwise daily tier at `ceil(hours / 24)` days. Fails with
    /// [`CoreError::NoApplicableRate`] when neither tier covers the
    /// request.
    pub fn quote(&self, duration_hours: i64) -> Result<Cents, CoreError> {
        if duration_hours <= 24 {
            if let Some(hourly) = self.hourly {
                return Ok(hourly * duration_hours);
            }
        }
        if let Some(daily) = self.daily {
            let days = duration_hours.div_ceil(24);
            return Ok(daily * days);
        }
        Err(CoreError::NoApplicableRate { duration_hours })
    }
}

/// Duration of a booking in whole hours, rounded up.
///
/// Without a time slot the rental occupies whole days: midnight on
/// `start_date` to midnight on `end_date` (exclusive). With a time slot
/// it runs from `start_time` on the first day to `end_time` on the last
/// day of `[start_date, end_date)`.
pub fn duration_hours(
    start_date: NaiveDate,
    end_date: NaiveDate,
    time_slot: Option<TimeSlot>,
) -> Result<i64, CoreError> {
    if start_date >= end_date {
        return Err(CoreError::Validation(format!(
            "start_date {start_date} must be before end_date {end_date}"
        )));
    }

    let (start_dt, end_dt) = match time_slot {
        Some(ts) => {
            let last_day = end_date
                .checked_sub_days(Days::new(1))
                .expect("end_date within chrono bounds");
            (
                start_date.and_time(ts.start_time),
                last_day.and_time(ts.end_time),
            )
        }
        None => (
            start_date.and_hms_opt(0, 0, 0).expect("midnight is valid"),
            end_date.and_hms_opt(0, 0, 0).expect("midnight is valid"),
        ),
    };

    let minutes = (end_dt - start_dt).num_minutes();
    if minutes <= 0 {
        return Err(CoreError::Validation(format!(
            "booking window {start_dt} .. {end_dt} has non-positive duration"
        )));
    }

    Ok(minutes.div_ceil(60))
}
