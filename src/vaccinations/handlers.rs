use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{bad_request, internal, not_found, ApiError};
use crate::metrics::is_core_vaccine;
use crate::pets::Pet;
use crate::state::AppState;

use super::dto::{
    CreateVaccinationRequest, MessageEnvelope, UpdateVaccinationRequest, VaccinationEnvelope,
    VaccinationsEnvelope,
};
use super::repo::{NewVaccination, Vaccination};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pets/:id/vaccinations",
            get(list_vaccinations).post(create_vaccination),
        )
        .route(
            "/vaccinations/:id",
            put(update_vaccination).delete(delete_vaccination),
        )
}

#[instrument(skip(state))]
async fn list_vaccinations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<VaccinationsEnvelope>, ApiError> {
    let pet = Pet::find_active(&state.db, user_id, pet_id)
        .await
        .map_err(|e| {
            error!(error = %e, %pet_id, "list vaccinations: pet lookup failed");
            internal("Failed to fetch vaccinations")
        })?;
    if pet.is_none() {
        return Err(not_found("Pet not found"));
    }

    let vaccinations = Vaccination::list_by_pet(&state.db, pet_id)
        .await
        .map_err(|e| {
            error!(error = %e, %pet_id, "list vaccinations failed");
            internal("Failed to fetch vaccinations")
        })?;

    Ok(Json(VaccinationsEnvelope {
        success: true,
        vaccinations,
    }))
}

#[instrument(skip(state, payload))]
async fn create_vaccination(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<Uuid>,
    Json(payload): Json<CreateVaccinationRequest>,
) -> Result<(StatusCode, Json<VaccinationEnvelope>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(bad_request("Vaccine name and date are required"));
    }

    let pet = Pet::find_active(&state.db, user_id, pet_id)
        .await
        .map_err(|e| {
            error!(error = %e, %pet_id, "create vaccination: pet lookup failed");
            internal("Failed to create vaccination")
        })?;
    if pet.is_none() {
        return Err(not_found("Pet not found"));
    }

    let new = NewVaccination {
        is_core: is_core_vaccine(&payload.name),
        vaccine_name: payload.name,
        date_administered: payload.date,
        next_due_date: payload.next_due,
        veterinarian_name: payload
            .veterinarian_name
            .unwrap_or_else(|| "Unknown".into()),
        clinic_name: payload.clinic_name,
    };

    let vaccination = Vaccination::insert(&state.db, pet_id, &new)
        .await
        .map_err(|e| {
            error!(error = %e, %pet_id, "create vaccination failed");
            internal("Failed to create vaccination")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(VaccinationEnvelope {
            success: true,
            vaccination,
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn update_vaccination(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVaccinationRequest>,
) -> Result<Json<VaccinationEnvelope>, ApiError> {
    let existing = Vaccination::find_owned(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "update vaccination: lookup failed");
            internal("Failed to update vaccination")
        })?
        .ok_or_else(|| not_found("Vaccination not found"))?;

    let vaccine_name = payload.name.unwrap_or(existing.vaccine_name);
    let new = NewVaccination {
        is_core: is_core_vaccine(&vaccine_name),
        vaccine_name,
        date_administered: payload.date.unwrap_or(existing.date_administered),
        next_due_date: payload.next_due.or(existing.next_due_date),
        veterinarian_name: payload
            .veterinarian_name
            .unwrap_or(existing.veterinarian_name),
        clinic_name: payload.clinic_name.or(existing.clinic_name),
    };

    let vaccination = Vaccination::update(&state.db, id, &new).await.map_err(|e| {
        error!(error = %e, %id, "update vaccination failed");
        internal("Failed to update vaccination")
    })?;

    Ok(Json(VaccinationEnvelope {
        success: true,
        vaccination,
    }))
}

#[instrument(skip(state))]
async fn delete_vaccination(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    let existing = Vaccination::find_owned(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "delete vaccination: lookup failed");
            internal("Failed to delete vaccination")
        })?;
    if existing.is_none() {
        return Err(not_found("Vaccination not found"));
    }

    Vaccination::delete(&state.db, id).await.map_err(|e| {
        error!(error = %e, %id, "delete vaccination failed");
        internal("Failed to delete vaccination")
    })?;

    Ok(Json(MessageEnvelope {
        success: true,
        message: "Vaccination deleted successfully".into(),
    }))
}
