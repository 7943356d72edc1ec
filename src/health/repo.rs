use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One observation inside an analysis, e.g. coat quality or tartar buildup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionFinding {
    pub name: String,
    pub status: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HealthAnalysis {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub analysis_type: String,
    pub health_status: String,
    pub confidence_score: f64,
    pub conditions: Json<Vec<ConditionFinding>>,
    pub recommendations: Json<Vec<String>>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewHealthAnalysis {
    pub analysis_type: String,
    pub health_status: String,
    pub confidence_score: f64,
    pub conditions: Vec<ConditionFinding>,
    pub recommendations: Vec<String>,
    pub image_url: Option<String>,
}

impl HealthAnalysis {
    /// Analyses of a pet, newest first (the ordering the metrics functions
    /// expect). `limit` caps the result when given.
    pub async fn list_by_pet(
        db: &PgPool,
        pet_id: Uuid,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<HealthAnalysis>> {
        let rows = sqlx::query_as::<_, HealthAnalysis>(
            r#"
            SELECT id, pet_id, analysis_type, health_status, confidence_score,
                   conditions, recommendations, image_url, created_at
            FROM health_analyses
            WHERE pet_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(pet_id)
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        db: &PgPool,
        pet_id: Uuid,
        new: &NewHealthAnalysis,
    ) -> anyhow::Result<HealthAnalysis> {
        let row = sqlx::query_as::<_, HealthAnalysis>(
            r#"
            INSERT INTO health_analyses
                (pet_id, analysis_type, health_status, confidence_score,
                 conditions, recommendations, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, pet_id, analysis_type, health_status, confidence_score,
                      conditions, recommendations, image_url, created_at
            "#,
        )
        .bind(pet_id)
        .bind(&new.analysis_type)
        .bind(&new.health_status)
        .bind(new.confidence_score)
        .bind(Json(&new.conditions))
        .bind(Json(&new.recommendations))
        .bind(&new.image_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Look up an analysis through its pet, scoped to the owner.
    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        analysis_id: Uuid,
    ) -> anyhow::Result<Option<HealthAnalysis>> {
        let row = sqlx::query_as::<_, HealthAnalysis>(
            r#"
            SELECT a.id, a.pet_id, a.analysis_type, a.health_status, a.confidence_score,
                   a.conditions, a.recommendations, a.image_url, a.created_at
            FROM health_analyses a
            JOIN pets p ON p.id = a.pet_id
            WHERE a.id = $1 AND p.user_id = $2 AND p.is_active = TRUE
            "#,
        )
        .bind(analysis_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
