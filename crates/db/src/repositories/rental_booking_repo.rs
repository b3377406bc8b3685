//! Repository for the `rental_bookings` table.
//!
//! The booking ledger is the single source of truth for conflict
//! resolution: reservations go through one conditional insert, and every
//! state transition is a single `UPDATE` with an expected-prior-state
//! predicate so concurrent transitions cannot both succeed.

use chrono::NaiveDate;
use sqlx::PgPool;

use lendly_core::types::{Cents, EntityId};

use crate::models::rental_booking::{BookingListRow, CreateRentalBooking, RentalBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, rental_item_id, renter_id, owner_id, \
    start_date, end_date, start_time, end_time, \
    total_amount, security_deposit, cancellation_fee, is_refundable, \
    escrow_status, booking_status, payment_ref, \
    fee_retained, cancellation_reason, cancelled_by, cancelled_at, \
    created_at, updated_at";

/// Time-window overlap predicate used by the reservation insert. Either
/// side with a missing window claims the whole day.
const WINDOW_OVERLAPS: &str = "($6::time IS NULL OR $7::time IS NULL
            OR {side}.start_time IS NULL OR {side}.end_time IS NULL
            OR ({side}.start_time < $7::time AND {side}.end_time > $6::time))";

/// Provides the booking ledger operations.
pub struct RentalBookingRepo;

impl RentalBookingRepo {
    /// Atomically reserve the range by inserting the booking row, but
    /// only when no confirmed booking and no blackout slot overlaps it.
    ///
    /// Returns `None` when the range was taken at the moment of the
    /// write; the caller then resolves the conflicting dates for the
    /// error. This is the only path that may create a booking -- there
    /// is deliberately no separate check-then-insert.
    ///
    /// Concurrent inserts for the same item are serialized with a
    /// transaction-scoped advisory lock; two overlapping NOT EXISTS
    /// checks under read committed could otherwise both pass.
    pub async fn create_if_available(
        pool: &PgPool,
        input: &CreateRentalBooking,
    ) -> Result<Option<RentalBooking>, sqlx::Error> {
        let booking_overlap = WINDOW_OVERLAPS.replace("{side}", "b");
        let slot_overlap = WINDOW_OVERLAPS.replace("{side}", "s");
        let query = format!(
            "INSERT INTO rental_bookings
                (rental_item_id, renter_id, owner_id, start_date, end_date,
                 start_time, end_time, total_amount, security_deposit,
                 cancellation_fee, is_refundable, escrow_status, booking_status)
             SELECT $1::uuid, $2::uuid, $3::uuid, $4::date, $5::date,
                    $6::time, $7::time, $8::bigint, $9::bigint,
                    $10::bigint, $11::boolean, 'pending', 'confirmed'
             WHERE NOT EXISTS (
                 SELECT 1 FROM rental_bookings b
                 WHERE b.rental_item_id = $1
                   AND b.booking_status = 'confirmed'
                   AND b.start_date < $5 AND b.end_date > $4
                   AND {booking_overlap}
             )
             AND NOT EXISTS (
                 SELECT 1 FROM availability_slots s
                 WHERE s.rental_item_id = $1
                   AND s.is_available = FALSE
                   AND s.slot_date >= $4 AND s.slot_date < $5
                   AND {slot_overlap}
             )
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(input.rental_item_id)
            .execute(&mut *tx)
            .await?;

        let booking = sqlx::query_as::<_, RentalBooking>(&query)
            .bind(input.rental_item_id)
            .bind(input.renter_id)
            .bind(input.owner_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.total_amount)
            .bind(input.security_deposit)
            .bind(input.cancellation_fee)
            .bind(input.is_refundable)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Find a booking by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<RentalBooking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rental_bookings WHERE id = $1");
        sqlx::query_as::<_, RentalBooking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List confirmed bookings overlapping `[start_date, end_date)` for
    /// an item, for availability resolution and conflict reporting.
    pub async fn list_confirmed_overlapping(
        pool: &PgPool,
        rental_item_id: EntityId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RentalBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rental_bookings
             WHERE rental_item_id = $1
               AND booking_status = 'confirmed'
               AND start_date < $3 AND end_date > $2
             ORDER BY start_date ASC"
        );
        sqlx::query_as::<_, RentalBooking>(&query)
            .bind(rental_item_id)
            .bind(start_date)
            .bind(end_date)
            .fetch_all(pool)
            .await
    }

    /// Record the confirmed hold: `pending -> held` plus the payment
    /// reference. Returns `None` if the booking is not in `pending`.
    pub async fn mark_held(
        pool: &PgPool,
        id: EntityId,
        payment_ref: &str,
    ) -> Result<Option<RentalBooking>, sqlx::Error> {
        let query = format!(
            "UPDATE rental_bookings
             SET escrow_status = 'held', payment_ref = $2, updated_at = NOW()
             WHERE id = $1 AND escrow_status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RentalBooking>(&query)
            .bind(id)
            .bind(payment_ref)
            .fetch_optional(pool)
            .await
    }

    /// `confirmed/held -> completed/released`. Returns `None` if the
    /// booking is not currently held (lost race or terminal state).
    pub async fn complete(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<RentalBooking>, sqlx::Error> {
        let query = format!(
            "UPDATE rental_bookings
             SET booking_status = 'completed', escrow_status = 'released', updated_at = NOW()
             WHERE id = $1 AND booking_status = 'confirmed' AND escrow_status = 'held'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RentalBooking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// `confirmed/held -> cancelled/refunded`, recording who cancelled,
    /// why, and the fee retained. Returns `None` if the booking is not
    /// currently held.
    pub async fn cancel(
        pool: &PgPool,
        id: EntityId,
        cancelled_by: &str,
        reason: Option<&str>,
        fee_retained: Cents,
    ) -> Result<Option<RentalBooking>, sqlx::Error> {
        let query = format!(
            "UPDATE rental_bookings
             SET booking_status = 'cancelled', escrow_status = 'refunded',
                 cancelled_by = $2, cancellation_reason = $3,
                 fee_retained = $4, cancelled_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND booking_status = 'confirmed' AND escrow_status = 'held'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RentalBooking>(&query)
            .bind(id)
            .bind(cancelled_by)
            .bind(reason)
            .bind(fee_retained)
            .fetch_optional(pool)
            .await
    }

    /// Remove a booking row whose payment hold failed, releasing the
    /// reserved range. Only valid while the row is still `pending`; this
    /// is the compensating half of the create operation and the sole
    /// deletion path in the ledger.
    pub async fn remove_pending(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM rental_bookings WHERE id = $1 AND escrow_status = 'pending'")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a renter's bookings with item titles, newest first.
    pub async fn list_by_renter(
        pool: &PgPool,
        renter_id: EntityId,
    ) -> Result<Vec<BookingListRow>, sqlx::Error> {
        sqlx::query_as::<_, BookingListRow>(
            "SELECT b.id, b.rental_item_id, b.renter_id, b.owner_id,
                    b.start_date, b.end_date, b.total_amount,
                    b.escrow_status, b.booking_status, b.created_at,
                    i.title AS item_title
             FROM rental_bookings b
             JOIN rental_items i ON i.id = b.rental_item_id
             WHERE b.renter_id = $1
             ORDER BY b.created_at DESC",
        )
        .bind(renter_id)
        .fetch_all(pool)
        .await
    }

    /// List an owner's bookings with item titles, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: EntityId,
    ) -> Result<Vec<BookingListRow>, sqlx::Error> {
        sqlx::query_as::<_, BookingListRow>(
            "SELECT b.id, b.rental_item_id, b.renter_id, b.owner_id,
                    b.start_date, b.end_date, b.total_amount,
                    b.escrow_status, b.booking_status, b.created_at,
                    i.title AS item_title
             FROM rental_bookings b
             JOIN rental_items i ON i.id = b.rental_item_id
             WHERE b.owner_id = $1
             ORDER BY b.created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }
}
