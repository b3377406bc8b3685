//! Rental booking entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lendly_core::availability::BookedWindow;
use lendly_core::error::CoreError;
use lendly_core::escrow::{BookingStatus, EscrowStatus};
use lendly_core::types::{Cents, EntityId, Timestamp};

/// A row from the `rental_bookings` table.
///
/// Bookings are financial/audit records and are never deleted; the only
/// exception is the compensating removal of a row whose payment hold
/// failed in the same create operation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RentalBooking {
    pub id: EntityId,
    pub rental_item_id: EntityId,
    pub renter_id: EntityId,
    pub owner_id: EntityId,
    // -- Occupied range: [start_date, end_date) --
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    // -- Amounts (cents) --
    pub total_amount: Cents,
    pub security_deposit: Cents,
    pub cancellation_fee: Cents,
    pub is_refundable: bool,
    // -- Escrow state machine --
    pub escrow_status: String,
    pub booking_status: String,
    pub payment_ref: Option<String>,
    // -- Cancellation metadata --
    pub fee_retained: Option<Cents>,
    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    // -- Timestamps --
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RentalBooking {
    /// Parse the stored status pair into core state machine enums.
    pub fn states(&self) -> Result<(BookingStatus, EscrowStatus), CoreError> {
        Ok((self.booking_status.parse()?, self.escrow_status.parse()?))
    }

    /// The booking's occupied window for availability resolution.
    pub fn window(&self) -> BookedWindow {
        BookedWindow {
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Internal DTO for the conditional reservation insert. Built by the
/// booking service after pricing; never deserialized from a request.
#[derive(Debug, Clone)]
pub struct CreateRentalBooking {
    pub rental_item_id: EntityId,
    pub renter_id: EntityId,
    pub owner_id: EntityId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub total_amount: Cents,
    pub security_deposit: Cents,
    pub cancellation_fee: Cents,
    pub is_refundable: bool,
}

/// A booking joined with its item title, for renter/owner list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingListRow {
    pub id: EntityId,
    pub rental_item_id: EntityId,
    pub renter_id: EntityId,
    pub owner_id: EntityId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Cents,
    pub escrow_status: String,
    pub booking_status: String,
    pub created_at: Timestamp,
    pub item_title: String,
}

/// Request body for cancelling a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelBookingRequest {
    pub acting_user_id: EntityId,
    pub reason: Option<String>,
}

/// Request body for completing a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteBookingRequest {
    pub acting_user_id: EntityId,
}
