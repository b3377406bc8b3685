//! Rental item CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use lendly_core::error::CoreError;
use lendly_core::types::EntityId;
use lendly_db::models::rental_item::{CreateRentalItem, RentalItem, UpdateRentalItem};
use lendly_db::repositories::rental_item_repo::RentalItemRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// `POST /api/v1/rentals`
pub async fn create_rental_item(
    State(state): State<AppState>,
    Json(input): Json<CreateRentalItem>,
) -> AppResult<(StatusCode, Json<RentalItem>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    input.rate_schedule().validate()?;

    let item = RentalItemRepo::create(&state.pool, &input).await?;
    tracing::info!(item_id = %item.id, owner_id = %item.owner_id, "Rental item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/v1/rentals/{id}`
pub async fn get_rental_item(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<RentalItem>> {
    let item = RentalItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "rental item",
            id,
        })?;
    Ok(Json(item))
}

/// `GET /api/v1/rentals/owner/{owner_id}`
pub async fn list_owner_items(
    State(state): State<AppState>,
    Path(owner_id): Path<EntityId>,
) -> AppResult<Json<Vec<RentalItem>>> {
    let items = RentalItemRepo::list_by_owner(&state.pool, owner_id).await?;
    Ok(Json(items))
}

/// `PUT /api/v1/rentals/{id}`
pub async fn update_rental_item(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateRentalItem>,
) -> AppResult<Json<RentalItem>> {
    // Rate tiers may be changed but never to non-positive values.
    for (name, rate) in [
        ("hourly", input.hourly_rate),
        ("daily", input.daily_rate),
        ("weekly", input.weekly_rate),
        ("monthly", input.monthly_rate),
    ] {
        if let Some(cents) = rate {
            if cents <= 0 {
                return Err(CoreError::Validation(format!(
                    "{name} rate must be positive, got {cents}"
                ))
                .into());
            }
        }
    }

    let item = RentalItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "rental item",
            id,
        })?;

    Ok(Json(item))
}

/// `DELETE /api/v1/rentals/{id}`
///
/// Soft-deactivates the item; existing bookings are untouched.
pub async fn deactivate_rental_item(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    let deactivated = RentalItemRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(CoreError::NotFound {
            entity: "rental item",
            id,
        }
        .into());
    }
    tracing::info!(item_id = %id, "Rental item deactivated");
    Ok(StatusCode::NO_CONTENT)
}
