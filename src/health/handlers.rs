use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{internal, not_found, ApiError};
use crate::pets::Pet;
use crate::state::AppState;

use super::dto::{
    AnalysesEnvelope, AnalysisEnvelope, AnalysisTypeInfo, AnalysisTypesEnvelope, AnalyzeRequest,
};
use super::mock;
use super::repo::HealthAnalysis;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health/analysis-types", get(analysis_types))
        .route("/health/analyze", post(analyze))
        .route("/health/history/:pet_id", get(history))
        .route("/health/analysis/:id", get(get_analysis))
}

#[instrument]
async fn analysis_types() -> Json<AnalysisTypesEnvelope> {
    let analysis_types = mock::ANALYSIS_TYPES
        .iter()
        .map(|(id, name, description)| AnalysisTypeInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();
    Json(AnalysisTypesEnvelope {
        success: true,
        analysis_types,
    })
}

#[instrument(skip(state, payload))]
async fn analyze(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<AnalysisEnvelope>), ApiError> {
    let pet = Pet::find_active(&state.db, user_id, payload.pet_id)
        .await
        .map_err(|e| {
            error!(error = %e, pet_id = %payload.pet_id, "analyze: pet lookup failed");
            internal("Failed to analyze pet health")
        })?;
    if pet.is_none() {
        return Err(not_found("Pet not found"));
    }

    let analysis_type = payload.analysis_type.as_deref().unwrap_or("general");
    let new = mock::generate(analysis_type, payload.image_url);

    let analysis = HealthAnalysis::insert(&state.db, payload.pet_id, &new)
        .await
        .map_err(|e| {
            error!(error = %e, pet_id = %payload.pet_id, "analyze: insert failed");
            internal("Failed to analyze pet health")
        })?;

    info!(
        pet_id = %payload.pet_id,
        analysis_id = %analysis.id,
        %analysis_type,
        "health analysis recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(AnalysisEnvelope {
            success: true,
            analysis,
        }),
    ))
}

#[instrument(skip(state))]
async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<AnalysesEnvelope>, ApiError> {
    let pet = Pet::find_active(&state.db, user_id, pet_id)
        .await
        .map_err(|e| {
            error!(error = %e, %pet_id, "history: pet lookup failed");
            internal("Failed to fetch analysis history")
        })?;
    if pet.is_none() {
        return Err(not_found("Pet not found"));
    }

    let analyses = HealthAnalysis::list_by_pet(&state.db, pet_id, None)
        .await
        .map_err(|e| {
            error!(error = %e, %pet_id, "history: query failed");
            internal("Failed to fetch analysis history")
        })?;

    Ok(Json(AnalysesEnvelope {
        success: true,
        analyses,
    }))
}

#[instrument(skip(state))]
async fn get_analysis(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisEnvelope>, ApiError> {
    let analysis = HealthAnalysis::find_owned(&state.db, user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "get analysis failed");
            internal("Failed to fetch analysis")
        })?
        .ok_or_else(|| not_found("Analysis not found"))?;

    Ok(Json(AnalysisEnvelope {
        success: true,
        analysis,
    }))
}
