//! Owner availability handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use lendly_core::availability::{validate_slot_batch, TimeSlot};
use lendly_core::error::CoreError;
use lendly_core::types::EntityId;
use lendly_db::models::availability_slot::SlotInput;
use lendly_db::repositories::availability_slot_repo::AvailabilitySlotRepo;
use lendly_db::repositories::rental_item_repo::RentalItemRepo;

use crate::error::AppResult;
use crate::services::BookingService;
use crate::state::AppState;

/// Request body for replacing an item's availability slots.
#[derive(Debug, Clone, Deserialize)]
pub struct SetAvailabilityRequest {
    pub owner_id: EntityId,
    pub slots: Vec<SlotInput>,
}

/// Query parameters for an availability read.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
}

/// `PUT /api/v1/rentals/{id}/availability`
///
/// Replaces the stored slots for every date present in the request.
/// Slots on untouched dates stay as they were.
pub async fn set_availability(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(request): Json<SetAvailabilityRequest>,
) -> AppResult<Json<Value>> {
    let item = RentalItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "rental item",
            id,
        })?;

    if item.owner_id != request.owner_id {
        return Err(CoreError::UnauthorizedActor(
            "only the owner may set availability".to_string(),
        )
        .into());
    }

    let windows: Vec<_> = request.slots.iter().map(|s| s.window()).collect();
    validate_slot_batch(&windows)?;

    let created = AvailabilitySlotRepo::replace_for_dates(&state.pool, id, &request.slots).await?;
    tracing::info!(item_id = %id, slots = created.len(), "Availability slots replaced");

    Ok(Json(json!({ "slots": created })))
}

/// `GET /api/v1/rentals/{id}/availability?start_date=..&end_date=..`
///
/// Returns the stored slots in the range plus the resolved unavailable
/// dates, optionally narrowed to a requested time window.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Value>> {
    if query.start_date >= query.end_date {
        return Err(CoreError::Validation(format!(
            "start_date {} must be before end_date {}",
            query.start_date, query.end_date
        ))
        .into());
    }

    RentalItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "rental item",
            id,
        })?;

    let requested = match (query.start_time, query.end_time) {
        (Some(start_time), Some(end_time)) => Some(TimeSlot {
            start_time,
            end_time,
        }),
        _ => None,
    };

    let slots =
        AvailabilitySlotRepo::list_in_range(&state.pool, id, query.start_date, query.end_date)
            .await?;
    let unavailable = BookingService::resolve_unavailable_dates(
        &state,
        id,
        query.start_date,
        query.end_date,
        requested,
    )
    .await?;

    Ok(Json(json!({
        "slots": slots,
        "unavailable_dates": unavailable,
    })))
}
