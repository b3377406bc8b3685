//! Availability slot entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lendly_core::availability::SlotWindow;
use lendly_core::types::{Cents, EntityId, Timestamp};

/// A row from the `availability_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailabilitySlot {
    pub id: EntityId,
    pub rental_item_id: EntityId,
    pub slot_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_available: bool,
    pub custom_rate: Option<Cents>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

impl AvailabilitySlot {
    /// The slot as a core availability window.
    pub fn window(&self) -> SlotWindow {
        SlotWindow {
            date: self.slot_date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_available: self.is_available,
        }
    }
}

fn default_available() -> bool {
    true
}

/// One slot in an owner availability write. Slots for the dates present
/// in a write replace whatever was stored for those dates.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotInput {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    pub custom_rate: Option<Cents>,
    pub notes: Option<String>,
}

impl SlotInput {
    /// The input as a core availability window, for batch validation.
    pub fn window(&self) -> SlotWindow {
        SlotWindow {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_available: self.is_available,
        }
    }
}
