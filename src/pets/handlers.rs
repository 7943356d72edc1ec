use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{bad_request, internal, not_found, ApiError};
use crate::health::HealthAnalysis;
use crate::metrics::{
    age_at, birth_date_from_age, health_summary, is_core_vaccine, weight_in_kg, WeightUnit,
};
use crate::state::AppState;
use crate::vaccinations::{NewVaccination, Vaccination};

use super::dto::{
    CreatePetRequest, CreateVetRecordRequest, MessageEnvelope, PetDetails, PetEnvelope,
    PetsEnvelope, SummaryEnvelope, UpdatePetRequest, VetRecordEnvelope, VetRecordsEnvelope,
};
use super::repo::{Pet, PetNotes, PetRecord, VetRecord};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/:id", get(get_pet).put(update_pet).delete(delete_pet))
        .route("/pets/:id/health-summary", get(pet_health_summary))
        .route("/pets/:id/records", get(list_vet_records).post(create_vet_record))
}

/// Trim a submitted string, treating whitespace-only values as absent
/// (the upstream API's falsy-fallback behavior).
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn load_details(db: &PgPool, pet: Pet, deep: bool) -> anyhow::Result<PetDetails> {
    // The list view previews relations; the profile view loads them all.
    let (analysis_limit, record_limit) = if deep { (None, None) } else { (Some(5), Some(3)) };
    let health_analyses = HealthAnalysis::list_by_pet(db, pet.id, analysis_limit).await?;
    let vet_records = VetRecord::list_by_pet(db, pet.id, record_limit).await?;
    let vaccinations = Vaccination::list_by_pet(db, pet.id).await?;
    let age = pet
        .birth_date
        .map(|birth| age_at(birth, OffsetDateTime::now_utc().date()));

    Ok(PetDetails {
        pet,
        age,
        health_analyses,
        vet_records,
        vaccinations,
    })
}

#[instrument(skip(state))]
async fn list_pets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PetsEnvelope>, ApiError> {
    let fetch = async {
        let pets = Pet::list_active(&state.db, user_id).await?;
        let mut details = Vec::with_capacity(pets.len());
        for pet in pets {
            details.push(load_details(&state.db, pet, false).await?);
        }
        anyhow::Ok(details)
    };

    let pets = fetch.await.map_err(|e| {
        error!(error = %e, %user_id, "list pets failed");
        internal("Failed to fetch pets")
    })?;

    Ok(Json(PetsEnvelope {
        success: true,
        pets,
    }))
}

#[instrument(skip(state, payload))]
async fn create_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePetRequest>,
) -> Result<(StatusCode, Json<PetEnvelope>), ApiError> {
    let name = trimmed(payload.name);
    let species = payload
        .species
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty());
    let breed = trimmed(payload.breed);
    let gender = payload.gender.filter(|g| !g.is_empty());

    let (Some(name), Some(species), Some(breed), Some(gender)) = (name, species, breed, gender)
    else {
        return Err(bad_request("Name, species, breed, and gender are required"));
    };

    let today = OffsetDateTime::now_utc().date();
    let birth_date = match (payload.age, payload.age_unit) {
        (Some(age), Some(unit)) => Some(birth_date_from_age(age, unit, today)),
        _ => None,
    };
    let weight_kg = payload
        .weight
        .map(|w| weight_in_kg(w, payload.weight_unit.unwrap_or(WeightUnit::Kg)));

    let vet_info = payload.vet_info.clone();
    let record = PetRecord {
        name,
        species,
        breed,
        gender,
        birth_date,
        weight_kg,
        color: trimmed(payload.color),
        microchip_id: trimmed(payload.microchip_id),
        profile_image_url: payload.photos.first().cloned(),
        notes: Some(PetNotes {
            markings: trimmed(payload.markings),
            medical_history: trimmed(payload.medical_history),
            allergies: trimmed(payload.allergies),
            medications: trimmed(payload.medications),
            vet_info: payload.vet_info,
            emergency_contact: payload.emergency_contact,
            photos: Some(payload.photos),
        }),
    };

    let pet = Pet::insert(&state.db, user_id, &record).await.map_err(|e| {
        error!(error = %e, %user_id, "create pet failed");
        internal("Failed to create pet")
    })?;

    // Entries without both a name and a date are dropped, not rejected
    let new_vaccinations: Vec<NewVaccination> = payload
        .vaccinations
        .into_iter()
        .filter_map(|entry| {
            let name = trimmed(entry.name)?;
            let date = entry.date?;
            Some(NewVaccination {
                is_core: is_core_vaccine(&name),
                vaccine_name: name,
                date_administered: date,
                next_due_date: entry.next_due,
                veterinarian_name: vet_info
                    .as_ref()
                    .and_then(|v| v.vet_name.clone())
                    .unwrap_or_else(|| "Unknown".into()),
                clinic_name: vet_info.as_ref().and_then(|v| v.clinic_name.clone()),
            })
        })
        .collect();

    if !new_vaccinations.is_empty() {
        Vaccination::insert_many(&state.db, pet.id, &new_vaccinations)
            .await
            .map_err(|e| {
                error!(error = %e, pet_id = %pet.id, "create pet: vaccinations insert failed");
                internal("Failed to create pet")
            })?;
    }

    info!(pet_id = %pet.id, %user_id, "pet created");
    let details = load_details(&state.db, pet, true).await.map_err(|e| {
        error!(error = %e, "create pet: reload failed");
        internal("Failed to create pet")
    })?;

    Ok((
        StatusCode::CREATED,
        Json(PetEnvelope {
            success: true,
            pet: details,
        }),
    ))
}

#[instrument(skip(state))]
async fn get_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PetEnvelope>, ApiError> {
    let pet = Pet::find_active(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "get pet failed");
            internal("Failed to fetch pet")
        })?
        .ok_or_else(|| not_found("Pet not found"))?;

    let details = load_details(&state.db, pet, true).await.map_err(|e| {
        error!(error = %e, %id, "get pet: relations failed");
        internal("Failed to fetch pet")
    })?;

    Ok(Json(PetEnvelope {
        success: true,
        pet: details,
    }))
}

#[instrument(skip(state, payload))]
async fn update_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePetRequest>,
) -> Result<Json<PetEnvelope>, ApiError> {
    let existing = Pet::find_active(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "update pet: lookup failed");
            internal("Failed to update pet")
        })?
        .ok_or_else(|| not_found("Pet not found"))?;

    let today = OffsetDateTime::now_utc().date();
    let birth_date = match (payload.age, payload.age_unit) {
        (Some(age), Some(unit)) => Some(birth_date_from_age(age, unit, today)),
        _ => existing.birth_date,
    };
    let weight_kg = match payload.weight {
        Some(w) => Some(weight_in_kg(
            w,
            payload.weight_unit.unwrap_or(WeightUnit::Kg),
        )),
        None => existing.weight_kg,
    };

    let record = PetRecord {
        name: trimmed(payload.name).unwrap_or(existing.name),
        species: payload
            .species
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or(existing.species),
        breed: trimmed(payload.breed).unwrap_or(existing.breed),
        gender: payload
            .gender
            .filter(|g| !g.is_empty())
            .unwrap_or(existing.gender),
        birth_date,
        weight_kg,
        color: trimmed(payload.color).or(existing.color),
        microchip_id: trimmed(payload.microchip_id).or(existing.microchip_id),
        profile_image_url: payload
            .profile_image
            .filter(|p| !p.is_empty())
            .or(existing.profile_image_url),
        notes: payload.notes.or(existing.notes.map(|json| json.0)),
    };

    let pet = Pet::update(&state.db, id, &record).await.map_err(|e| {
        error!(error = %e, %id, "update pet failed");
        internal("Failed to update pet")
    })?;

    let details = load_details(&state.db, pet, true).await.map_err(|e| {
        error!(error = %e, %id, "update pet: reload failed");
        internal("Failed to update pet")
    })?;

    Ok(Json(PetEnvelope {
        success: true,
        pet: details,
    }))
}

#[instrument(skip(state))]
async fn delete_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    let existing = Pet::find_active(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "delete pet: lookup failed");
            internal("Failed to delete pet")
        })?;
    if existing.is_none() {
        return Err(not_found("Pet not found"));
    }

    Pet::soft_delete(&state.db, id).await.map_err(|e| {
        error!(error = %e, %id, "delete pet failed");
        internal("Failed to delete pet")
    })?;

    info!(pet_id = %id, %user_id, "pet soft-deleted");
    Ok(Json(MessageEnvelope {
        success: true,
        message: "Pet deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
async fn pet_health_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryEnvelope>, ApiError> {
    let pet = Pet::find_active(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "health summary: lookup failed");
            internal("Failed to fetch health summary")
        })?;
    if pet.is_none() {
        return Err(not_found("Pet not found"));
    }

    let now = OffsetDateTime::now_utc();
    let fetch = async {
        let analyses = HealthAnalysis::list_by_pet(&state.db, id, Some(10)).await?;
        let vaccinations = Vaccination::list_by_pet(&state.db, id).await?;
        anyhow::Ok(health_summary(&analyses, &vaccinations, now.date()))
    };

    let summary = fetch.await.map_err(|e| {
        error!(error = %e, %id, "health summary failed");
        internal("Failed to fetch health summary")
    })?;

    Ok(Json(SummaryEnvelope {
        success: true,
        summary,
    }))
}

#[instrument(skip(state))]
async fn list_vet_records(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VetRecordsEnvelope>, ApiError> {
    let pet = Pet::find_active(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "list vet records: lookup failed");
            internal("Failed to fetch vet records")
        })?;
    if pet.is_none() {
        return Err(not_found("Pet not found"));
    }

    let records = VetRecord::list_by_pet(&state.db, id, None).await.map_err(|e| {
        error!(error = %e, %id, "list vet records failed");
        internal("Failed to fetch vet records")
    })?;

    Ok(Json(VetRecordsEnvelope {
        success: true,
        records,
    }))
}

#[instrument(skip(state, payload))]
async fn create_vet_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateVetRecordRequest>,
) -> Result<(StatusCode, Json<VetRecordEnvelope>), ApiError> {
    let (Some(visit_date), Some(diagnosis)) = (payload.visit_date, trimmed(payload.diagnosis))
    else {
        return Err(bad_request("Visit date and diagnosis are required"));
    };

    let pet = Pet::find_active(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "create vet record: lookup failed");
            internal("Failed to create vet record")
        })?;
    if pet.is_none() {
        return Err(not_found("Pet not found"));
    }

    let record = VetRecord::insert(
        &state.db,
        id,
        visit_date,
        &diagnosis,
        payload.notes.as_deref(),
        payload
            .veterinarian_name
            .as_deref()
            .unwrap_or("Unknown"),
        payload.clinic_name.as_deref(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, %id, "create vet record failed");
        internal("Failed to create vet record")
    })?;

    Ok((
        StatusCode::CREATED,
        Json(VetRecordEnvelope {
            success: true,
            record,
        }),
    ))
}
