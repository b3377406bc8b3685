//! Booking orchestration: quote, reserve, hold, and the escrow
//! transitions.
//!
//! The create flow is reserve-then-hold. The conditional insert in the
//! booking repo wins or loses the range atomically; only a winner talks
//! to the payment gateway, and a failed or timed-out hold removes the
//! pending row again so the range frees immediately.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use lendly_core::availability::{self, TimeSlot};
use lendly_core::error::CoreError;
use lendly_core::escrow::{self, BookingAction, CancelledBy};
use lendly_core::pricing;
use lendly_core::types::EntityId;
use lendly_db::models::rental_booking::{CreateRentalBooking, RentalBooking};
use lendly_db::repositories::availability_slot_repo::AvailabilitySlotRepo;
use lendly_db::repositories::rental_booking_repo::RentalBookingRepo;
use lendly_db::repositories::rental_item_repo::RentalItemRepo;
use lendly_events::BookingEvent;
use lendly_payments::{HoldRequest, PaymentError};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for creating a booking against a rental item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub renter_id: EntityId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl CreateBookingRequest {
    /// The requested sub-day window, if any. Times must come in pairs.
    fn time_slot(&self) -> Result<Option<TimeSlot>, CoreError> {
        match (self.start_time, self.end_time) {
            (Some(start_time), Some(end_time)) => {
                if start_time >= end_time {
                    return Err(CoreError::Validation(format!(
                        "start_time {start_time} must be before end_time {end_time}"
                    )));
                }
                Ok(Some(TimeSlot {
                    start_time,
                    end_time,
                }))
            }
            (None, None) => Ok(None),
            _ => Err(CoreError::Validation(
                "start_time and end_time must be provided together".to_string(),
            )),
        }
    }
}

/// Coordinates the booking lifecycle end to end.
pub struct BookingService;

impl BookingService {
    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Quote, atomically reserve, and place the escrow hold for a new
    /// booking.
    ///
    /// Order matters: the ledger row is inserted first so the range is
    /// owned before any money moves, then the hold is placed for
    /// `total + security_deposit`. A hold failure or timeout deletes the
    /// pending row again before the error is reported.
    pub async fn create_booking(
        state: &AppState,
        rental_item_id: EntityId,
        request: &CreateBookingRequest,
    ) -> AppResult<RentalBooking> {
        let item = RentalItemRepo::find_by_id(&state.pool, rental_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "rental item",
                id: rental_item_id,
            })?;

        if item.deactivated_at.is_some() {
            return Err(CoreError::Validation(format!(
                "rental item {rental_item_id} is no longer available"
            ))
            .into());
        }
        if item.owner_id == request.renter_id {
            return Err(CoreError::Validation(
                "owners cannot book their own items".to_string(),
            )
            .into());
        }

        let time_slot = request.time_slot()?;
        let hours = pricing::duration_hours(request.start_date, request.end_date, time_slot)?;
        Self::check_duration_bounds(&item, request.start_date, request.end_date)?;
        let total_amount = item.rate_schedule().quote(hours)?;

        let input = CreateRentalBooking {
            rental_item_id,
            renter_id: request.renter_id,
            owner_id: item.owner_id,
            start_date: request.start_date,
            end_date: request.end_date,
            start_time: request.start_time,
            end_time: request.end_time,
            total_amount,
            security_deposit: item.security_deposit,
            cancellation_fee: item.cancellation_fee,
            is_refundable: item.is_refundable_cancellation,
        };

        let Some(booking) = RentalBookingRepo::create_if_available(&state.pool, &input).await?
        else {
            // Lost the range; resolve which dates blocked it for the error.
            let dates = Self::resolve_unavailable_dates(
                state,
                rental_item_id,
                request.start_date,
                request.end_date,
                time_slot,
            )
            .await?;
            return Err(CoreError::RangeUnavailable { dates }.into());
        };

        tracing::info!(
            booking_id = %booking.id,
            rental_item_id = %rental_item_id,
            total_amount,
            "Range reserved, placing escrow hold"
        );

        let payment_ref = match Self::place_hold(state, &booking).await {
            Ok(payment_ref) => payment_ref,
            Err(err) => {
                // Compensate: free the range before surfacing the failure.
                let removed = RentalBookingRepo::remove_pending(&state.pool, booking.id).await?;
                tracing::warn!(
                    booking_id = %booking.id,
                    removed,
                    error = %err,
                    "Escrow hold failed, pending reservation released"
                );
                return Err(err.into());
            }
        };

        let booking = RentalBookingRepo::mark_held(&state.pool, booking.id, &payment_ref)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "booking {} left pending state before hold confirmation",
                    booking.id
                ))
            })?;

        state.event_bus.publish(
            BookingEvent::new("booking.created")
                .with_booking(booking.id)
                .with_actor(request.renter_id)
                .with_payload(json!({
                    "rental_item_id": rental_item_id,
                    "total_amount": booking.total_amount,
                    "security_deposit": booking.security_deposit,
                    "start_date": booking.start_date,
                    "end_date": booking.end_date,
                })),
        );

        Ok(booking)
    }

    /// Place the escrow hold for `total + security_deposit`, bounded by
    /// the configured hold timeout.
    async fn place_hold(state: &AppState, booking: &RentalBooking) -> Result<String, PaymentError> {
        let hold = HoldRequest {
            amount: booking.total_amount + booking.security_deposit,
            currency: state.config.payments.currency.clone(),
            metadata: HashMap::from([
                ("rental_item_id".to_string(), booking.rental_item_id.to_string()),
                ("renter_id".to_string(), booking.renter_id.to_string()),
                ("owner_id".to_string(), booking.owner_id.to_string()),
            ]),
        };

        let timeout = Duration::from_secs(state.config.payments.hold_timeout_secs);
        match tokio::time::timeout(timeout, state.payments.create_hold(&hold)).await {
            Ok(result) => result,
            Err(_) => Err(PaymentError::HoldFailed(format!(
                "hold not confirmed within {}s",
                timeout.as_secs()
            ))),
        }
    }

    fn check_duration_bounds(
        item: &lendly_db::models::rental_item::RentalItem,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), CoreError> {
        let days = (end_date - start_date).num_days();
        if days < i64::from(item.min_rental_duration) {
            return Err(CoreError::Validation(format!(
                "rental of {days} days is below the minimum of {} days",
                item.min_rental_duration
            )));
        }
        if let Some(max) = item.max_rental_duration {
            if days > i64::from(max) {
                return Err(CoreError::Validation(format!(
                    "rental of {days} days exceeds the maximum of {max} days"
                )));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Availability
    // -----------------------------------------------------------------------

    /// Resolve which dates in `[start, end)` are blocked by confirmed
    /// bookings or blackout slots.
    pub async fn resolve_unavailable_dates(
        state: &AppState,
        rental_item_id: EntityId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        requested: Option<TimeSlot>,
    ) -> AppResult<Vec<NaiveDate>> {
        let slots =
            AvailabilitySlotRepo::list_in_range(&state.pool, rental_item_id, start_date, end_date)
                .await?;
        let bookings = RentalBookingRepo::list_confirmed_overlapping(
            &state.pool,
            rental_item_id,
            start_date,
            end_date,
        )
        .await?;

        let slot_windows: Vec<_> = slots.iter().map(|s| s.window()).collect();
        let booked_windows: Vec<_> = bookings.iter().map(|b| b.window()).collect();

        Ok(availability::unavailable_dates(
            start_date,
            end_date,
            requested,
            &slot_windows,
            &booked_windows,
        ))
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Complete a held booking, capturing the escrow hold. Owner only.
    pub async fn complete_booking(
        state: &AppState,
        booking_id: EntityId,
        acting_user_id: EntityId,
    ) -> AppResult<RentalBooking> {
        let booking = Self::find_booking(state, booking_id).await?;

        if acting_user_id != booking.owner_id {
            return Err(CoreError::UnauthorizedActor(
                "only the owner may complete a booking".to_string(),
            )
            .into());
        }

        let (booking_status, escrow_status) = booking.states()?;
        escrow::ensure_transition(booking_status, escrow_status, BookingAction::Complete)?;

        let payment_ref = booking.payment_ref.as_deref().ok_or_else(|| {
            AppError::InternalError(format!("held booking {booking_id} has no payment reference"))
        })?;

        // Capture first: if the capture fails the booking stays held and
        // the transition can be retried.
        state.payments.capture_hold(payment_ref).await?;

        let booking = RentalBookingRepo::complete(&state.pool, booking_id)
            .await?
            .ok_or_else(|| Self::stale_transition_error(BookingAction::Complete))?;

        tracing::info!(booking_id = %booking.id, "Booking completed, funds released");

        state.event_bus.publish(
            BookingEvent::new("booking.completed")
                .with_booking(booking.id)
                .with_actor(acting_user_id)
                .with_payload(json!({
                    "total_amount": booking.total_amount,
                    "payment_ref": booking.payment_ref,
                })),
        );

        Ok(booking)
    }

    /// Cancel a held booking, releasing the escrow hold. Either party
    /// may cancel; non-refundable policies retain the cancellation fee.
    pub async fn cancel_booking(
        state: &AppState,
        booking_id: EntityId,
        acting_user_id: EntityId,
        reason: Option<&str>,
    ) -> AppResult<RentalBooking> {
        let booking = Self::find_booking(state, booking_id).await?;

        let cancelled_by = if acting_user_id == booking.renter_id {
            CancelledBy::Renter
        } else if acting_user_id == booking.owner_id {
            CancelledBy::Owner
        } else {
            return Err(CoreError::UnauthorizedActor(
                "only the renter or the owner may cancel a booking".to_string(),
            )
            .into());
        };

        let (booking_status, escrow_status) = booking.states()?;
        escrow::ensure_transition(booking_status, escrow_status, BookingAction::Cancel)?;

        let split = escrow::refund_breakdown(
            booking.total_amount,
            booking.cancellation_fee,
            booking.is_refundable,
        );

        let payment_ref = booking.payment_ref.as_deref().ok_or_else(|| {
            AppError::InternalError(format!("held booking {booking_id} has no payment reference"))
        })?;

        // The hold was never captured, so cancelling it returns the full
        // amount. The retained fee is recorded on the booking for
        // settlement with the owner.
        state.payments.cancel_hold(payment_ref).await?;

        let booking = RentalBookingRepo::cancel(
            &state.pool,
            booking_id,
            cancelled_by.as_str(),
            reason,
            split.fee_retained,
        )
        .await?
        .ok_or_else(|| Self::stale_transition_error(BookingAction::Cancel))?;

        tracing::info!(
            booking_id = %booking.id,
            cancelled_by = %cancelled_by,
            refund_amount = split.refund_amount,
            fee_retained = split.fee_retained,
            "Booking cancelled, hold released"
        );

        state.event_bus.publish(
            BookingEvent::new("booking.cancelled")
                .with_booking(booking.id)
                .with_actor(acting_user_id)
                .with_payload(json!({
                    "cancelled_by": cancelled_by,
                    "refund_amount": split.refund_amount,
                    "fee_retained": split.fee_retained,
                    "reason": reason,
                })),
        );

        Ok(booking)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn find_booking(state: &AppState, booking_id: EntityId) -> AppResult<RentalBooking> {
        RentalBookingRepo::find_by_id(&state.pool, booking_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "booking",
                    id: booking_id,
                }
                .into()
            })
    }

    /// The guarded update matched no row: a concurrent transition won.
    fn stale_transition_error(action: BookingAction) -> AppError {
        CoreError::InvalidState {
            current: "already transitioned".to_string(),
            attempted: action.to_string(),
        }
        .into()
    }
}
