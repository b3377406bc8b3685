//! Repository for the `rental_items` table.

use sqlx::PgPool;

use lendly_core::types::EntityId;

use crate::models::rental_item::{CreateRentalItem, RentalItem, UpdateRentalItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, description, category, location, \
    hourly_rate, daily_rate, weekly_rate, monthly_rate, \
    security_deposit, cancellation_fee, is_refundable_cancellation, cancellation_policy, \
    min_rental_duration, max_rental_duration, deactivated_at, created_at, updated_at";

/// Provides CRUD operations for rental items.
pub struct RentalItemRepo;

impl RentalItemRepo {
    /// Insert a new rental item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRentalItem) -> Result<RentalItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO rental_items
                (owner_id, title, description, category, location,
                 hourly_rate, daily_rate, weekly_rate, monthly_rate,
                 security_deposit, cancellation_fee, is_refundable_cancellation,
                 cancellation_policy, min_rental_duration, max_rental_duration)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                     COALESCE($10, 0), COALESCE($11, 0), COALESCE($12, FALSE),
                     $13, COALESCE($14, 1), $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RentalItem>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.location)
            .bind(input.hourly_rate)
            .bind(input.daily_rate)
            .bind(input.weekly_rate)
            .bind(input.monthly_rate)
            .bind(input.security_deposit)
            .bind(input.cancellation_fee)
            .bind(input.is_refundable_cancellation)
            .bind(&input.cancellation_policy)
            .bind(input.min_rental_duration)
            .bind(input.max_rental_duration)
            .fetch_one(pool)
            .await
    }

    /// Find an item by ID, including deactivated rows (bookings against
    /// deactivated items are rejected in the service, not hidden here).
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<RentalItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rental_items WHERE id = $1");
        sqlx::query_as::<_, RentalItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's active items, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: EntityId,
    ) -> Result<Vec<RentalItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rental_items
             WHERE owner_id = $1 AND deactivated_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, RentalItem>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateRentalItem,
    ) -> Result<Option<RentalItem>, sqlx::Error> {
        let query = format!(
            "UPDATE rental_items SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                location = COALESCE($5, location),
                hourly_rate = COALESCE($6, hourly_rate),
                daily_rate = COALESCE($7, daily_rate),
                weekly_rate = COALESCE($8, weekly_rate),
                monthly_rate = COALESCE($9, monthly_rate),
                security_deposit = COALESCE($10, security_deposit),
                cancellation_fee = COALESCE($11, cancellation_fee),
                is_refundable_cancellation = COALESCE($12, is_refundable_cancellation),
                cancellation_policy = COALESCE($13, cancellation_policy),
                min_rental_duration = COALESCE($14, min_rental_duration),
                max_rental_duration = COALESCE($15, max_rental_duration),
                updated_at = NOW()
             WHERE id = $1 AND deactivated_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RentalItem>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.location)
            .bind(input.hourly_rate)
            .bind(input.daily_rate)
            .bind(input.weekly_rate)
            .bind(input.monthly_rate)
            .bind(input.security_deposit)
            .bind(input.cancellation_fee)
            .bind(input.is_refundable_cancellation)
            .bind(&input.cancellation_policy)
            .bind(input.min_rental_duration)
            .bind(input.max_rental_duration)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate an item. Returns `true` if a row was deactivated.
    ///
    /// Items are never hard-deleted so booking history stays intact.
    pub async fn deactivate(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE rental_items SET deactivated_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deactivated_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
