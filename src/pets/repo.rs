use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Primary vet contact stored inside the notes sub-record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VetContact {
    pub vet_name: Option<String>,
    pub clinic_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Structured replacement for the upstream free-form notes blob. Every field
/// is optional; absent sections serialize as null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetNotes {
    pub markings: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub vet_info: Option<VetContact>,
    pub emergency_contact: Option<EmergencyContact>,
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub gender: String,
    pub birth_date: Option<Date>,
    /// Always kilograms; unit conversion happens before the write.
    pub weight_kg: Option<f64>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub profile_image_url: Option<String>,
    pub notes: Option<Json<PetNotes>>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Resolved column values for an insert or full-row update.
#[derive(Debug, Clone)]
pub struct PetRecord {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub gender: String,
    pub birth_date: Option<Date>,
    pub weight_kg: Option<f64>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub profile_image_url: Option<String>,
    pub notes: Option<PetNotes>,
}

const PET_COLUMNS: &str = "id, user_id, name, species, breed, gender, birth_date, weight_kg, \
                           color, microchip_id, profile_image_url, notes, is_active, \
                           created_at, updated_at";

impl Pet {
    /// Active pets of a user, newest first.
    pub async fn list_active(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Pet>> {
        let rows = sqlx::query_as::<_, Pet>(&format!(
            r#"
            SELECT {PET_COLUMNS}
            FROM pets
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_active(
        db: &PgPool,
        user_id: Uuid,
        pet_id: Uuid,
    ) -> anyhow::Result<Option<Pet>> {
        let row = sqlx::query_as::<_, Pet>(&format!(
            r#"
            SELECT {PET_COLUMNS}
            FROM pets
            WHERE id = $1 AND user_id = $2 AND is_active = TRUE
            "#,
        ))
        .bind(pet_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn insert(db: &PgPool, user_id: Uuid, record: &PetRecord) -> anyhow::Result<Pet> {
        let row = sqlx::query_as::<_, Pet>(&format!(
            r#"
            INSERT INTO pets
                (user_id, name, species, breed, gender, birth_date, weight_kg,
                 color, microchip_id, profile_image_url, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PET_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(&record.name)
        .bind(&record.species)
        .bind(&record.breed)
        .bind(&record.gender)
        .bind(record.birth_date)
        .bind(record.weight_kg)
        .bind(&record.color)
        .bind(&record.microchip_id)
        .bind(&record.profile_image_url)
        .bind(record.notes.as_ref().map(Json))
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(db: &PgPool, pet_id: Uuid, record: &PetRecord) -> anyhow::Result<Pet> {
        let row = sqlx::query_as::<_, Pet>(&format!(
            r#"
            UPDATE pets
            SET name = $2, species = $3, breed = $4, gender = $5, birth_date = $6,
                weight_kg = $7, color = $8, microchip_id = $9, profile_image_url = $10,
                notes = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING {PET_COLUMNS}
            "#,
        ))
        .bind(pet_id)
        .bind(&record.name)
        .bind(&record.species)
        .bind(&record.breed)
        .bind(&record.gender)
        .bind(record.birth_date)
        .bind(record.weight_kg)
        .bind(&record.color)
        .bind(&record.microchip_id)
        .bind(&record.profile_image_url)
        .bind(record.notes.as_ref().map(Json))
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn soft_delete(db: &PgPool, pet_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE pets SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(pet_id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VetRecord {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub visit_date: Date,
    pub diagnosis: String,
    pub notes: Option<String>,
    pub veterinarian_name: String,
    pub clinic_name: Option<String>,
    pub created_at: OffsetDateTime,
}

impl VetRecord {
    /// Visits of a pet, most recent first. `limit` caps the result when given.
    pub async fn list_by_pet(
        db: &PgPool,
        pet_id: Uuid,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<VetRecord>> {
        let rows = sqlx::query_as::<_, VetRecord>(
            r#"
            SELECT id, pet_id, visit_date, diagnosis, notes, veterinarian_name,
                   clinic_name, created_at
            FROM vet_records
            WHERE pet_id = $1
            ORDER BY visit_date DESC
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
        visit_date: Date,
        diagnosis: &str,
        notes: Option<&str>,
        veterinarian_name: &str,
        clinic_name: Option<&str>,
    ) -> anyhow::Result<VetRecord> {
        let row = sqlx::query_as::<_, VetRecord>(
            r#"
            INSERT INTO vet_records
                (pet_id, visit_date, diagnosis, notes, veterinarian_name, clinic_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, pet_id, visit_date, diagnosis, notes, veterinarian_name,
                      clinic_name, created_at
            "#,
        )
        .bind(pet_id)
        .bind(visit_date)
        .bind(diagnosis)
        .bind(notes)
        .bind(veterinarian_name)
        .bind(clinic_name)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
