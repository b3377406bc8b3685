//! Repository for the `availability_slots` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use lendly_core::types::EntityId;

use crate::models::availability_slot::{AvailabilitySlot, SlotInput};

const COLUMNS: &str = "id, rental_item_id, slot_date, start_time, end_time, \
    is_available, custom_rate, notes, created_at";

/// Provides slot reads and the replace-on-write used by owner
/// availability updates.
pub struct AvailabilitySlotRepo;

impl AvailabilitySlotRepo {
    /// Replace all slots for the dates present in `slots`, in one
    /// transaction. Stored slots for untouched dates are left alone;
    /// slots are superseded by newer writes, never independently deleted.
    ///
    /// The caller validates the batch for overlapping windows before
    /// calling (see `lendly_core::availability::validate_slot_batch`).
    pub async fn replace_for_dates(
        pool: &PgPool,
        rental_item_id: EntityId,
        slots: &[SlotInput],
    ) -> Result<Vec<AvailabilitySlot>, sqlx::Error> {
        let mut dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
        dates.sort_unstable();
        dates.dedup();

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM availability_slots WHERE rental_item_id = $1 AND slot_date = ANY($2)")
            .bind(rental_item_id)
            .bind(&dates)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO availability_slots
                (rental_item_id, slot_date, start_time, end_time, is_available, custom_rate, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(slots.len());
        for slot in slots {
            let row = sqlx::query_as::<_, AvailabilitySlot>(&insert)
                .bind(rental_item_id)
                .bind(slot.date)
                .bind(slot.start_time)
                .bind(slot.end_time)
                .bind(slot.is_available)
                .bind(slot.custom_rate)
                .bind(&slot.notes)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// List the slots intersecting `[start_date, end_date)`, ordered by
    /// date then start time.
    pub async fn list_in_range(
        pool: &PgPool,
        rental_item_id: EntityId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availability_slots
             WHERE rental_item_id = $1 AND slot_date >= $2 AND slot_date < $3
             ORDER BY slot_date ASC, start_time ASC NULLS FIRST"
        );
        sqlx::query_as::<_, AvailabilitySlot>(&query)
            .bind(rental_item_id)
            .bind(start_date)
            .bind(end_date)
            .fetch_all(pool)
            .await
    }
}
