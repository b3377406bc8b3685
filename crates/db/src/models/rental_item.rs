//! Rental item entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use lendly_core::pricing::RateSchedule;
use lendly_core::types::{Cents, EntityId, Timestamp};

/// A row from the `rental_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RentalItem {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: Option<String>,
    // -- Rate tiers (cents) --
    pub hourly_rate: Option<Cents>,
    pub daily_rate: Option<Cents>,
    pub weekly_rate: Option<Cents>,
    pub monthly_rate: Option<Cents>,
    // -- Escrow terms --
    pub security_deposit: Cents,
    pub cancellation_fee: Cents,
    pub is_refundable_cancellation: bool,
    pub cancellation_policy: Option<String>,
    // -- Duration bounds (days) --
    pub min_rental_duration: i32,
    pub max_rental_duration: Option<i32>,
    // -- Timestamps --
    pub deactivated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RentalItem {
    /// The item's rate tiers as a quotable schedule.
    pub fn rate_schedule(&self) -> RateSchedule {
        RateSchedule {
            hourly: self.hourly_rate,
            daily: self.daily_rate,
            weekly: self.weekly_rate,
            monthly: self.monthly_rate,
        }
    }
}

/// DTO for creating a new rental item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRentalItem {
    pub owner_id: EntityId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub category: String,
    pub location: Option<String>,
    pub hourly_rate: Option<Cents>,
    pub daily_rate: Option<Cents>,
    pub weekly_rate: Option<Cents>,
    pub monthly_rate: Option<Cents>,
    pub security_deposit: Option<Cents>,
    pub cancellation_fee: Option<Cents>,
    pub is_refundable_cancellation: Option<bool>,
    pub cancellation_policy: Option<String>,
    #[validate(range(min = 1))]
    pub min_rental_duration: Option<i32>,
    #[validate(range(min = 1))]
    pub max_rental_duration: Option<i32>,
}

impl CreateRentalItem {
    /// The requested rate tiers as a schedule, for core validation.
    pub fn rate_schedule(&self) -> RateSchedule {
        RateSchedule {
            hourly: self.hourly_rate,
            daily: self.daily_rate,
            weekly: self.weekly_rate,
            monthly: self.monthly_rate,
        }
    }
}

/// DTO for updating an existing rental item. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRentalItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub hourly_rate: Option<Cents>,
    pub daily_rate: Option<Cents>,
    pub weekly_rate: Option<Cents>,
    pub monthly_rate: Option<Cents>,
    pub security_deposit: Option<Cents>,
    pub cancellation_fee: Option<Cents>,
    pub is_refundable_cancellation: Option<bool>,
    pub cancellation_policy: Option<String>,
    pub min_rental_duration: Option<i32>,
    pub max_rental_duration: Option<i32>,
}
