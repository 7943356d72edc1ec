use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub vaccine_name: String,
    pub date_administered: Date,
    pub next_due_date: Option<Date>,
    pub veterinarian_name: String,
    pub clinic_name: Option<String>,
    pub is_core: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewVaccination {
    pub vaccine_name: String,
    pub date_administered: Date,
    pub next_due_date: Option<Date>,
    pub veterinarian_name: String,
    pub clinic_name: Option<String>,
    pub is_core: bool,
}

impl Vaccination {
    /// All vaccinations of a pet, ascending by due date (the ordering the
    /// metrics bucketing expects).
    pub async fn list_by_pet(db: &PgPool, pet_id: Uuid) -> anyhow::Result<Vec<Vaccination>> {
        let rows = sqlx::query_as::<_, Vaccination>(
            r#"
            SELECT id, pet_id, vaccine_name, date_administered, next_due_date,
                   veterinarian_name, clinic_name, is_core, created_at
            FROM vaccinations
            WHERE pet_id = $1
            ORDER BY next_due_date ASC
            "#,
        )
        .bind(pet_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        db: &PgPool,
        pet_id: Uuid,
        new: &NewVaccination,
    ) -> anyhow::Result<Vaccination> {
        let row = sqlx::query_as::<_, Vaccination>(
            r#"
            INSERT INTO vaccinations
                (pet_id, vaccine_name, date_administered, next_due_date,
                 veterinarian_name, clinic_name, is_core)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, pet_id, vaccine_name, date_administered, next_due_date,
                      veterinarian_name, clinic_name, is_core, created_at
            "#,
        )
        .bind(pet_id)
        .bind(&new.vaccine_name)
        .bind(new.date_administered)
        .bind(new.next_due_date)
        .bind(&new.veterinarian_name)
        .bind(&new.clinic_name)
        .bind(new.is_core)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Bulk insert used by pet creation. One transaction, all or nothing.
    pub async fn insert_many(
        db: &PgPool,
        pet_id: Uuid,
        new: &[NewVaccination],
    ) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        for vac in new {
            sqlx::query(
                r#"
                INSERT INTO vaccinations
                    (pet_id, vaccine_name, date_administered, next_due_date,
                     veterinarian_name, clinic_name, is_core)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(pet_id)
            .bind(&vac.vaccine_name)
            .bind(vac.date_administered)
            .bind(vac.next_due_date)
            .bind(&vac.veterinarian_name)
            .bind(&vac.clinic_name)
            .bind(vac.is_core)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Look up a vaccination through its pet, scoped to the owner.
    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        vaccination_id: Uuid,
    ) -> anyhow::Result<Option<Vaccination>> {
        let row = sqlx::query_as::<_, Vaccination>(
            r#"
            SELECT v.id, v.pet_id, v.vaccine_name, v.date_administered, v.next_due_date,
                   v.veterinarian_name, v.clinic_name, v.is_core, v.created_at
            FROM vaccinations v
            JOIN pets p ON p.id = v.pet_id
            WHERE v.id = $1 AND p.user_id = $2 AND p.is_active = TRUE
            "#,
        )
        .bind(vaccination_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        vaccination_id: Uuid,
        new: &NewVaccination,
    ) -> anyhow::Result<Vaccination> {
        let row = sqlx::query_as::<_, Vaccination>(
            r#"
            UPDATE vaccinations
            SET vaccine_name = $2, date_administered = $3, next_due_date = $4,
                veterinarian_name = $5, clinic_name = $6, is_core = $7
            WHERE id = $1
            RETURNING id, pet_id, vaccine_name, date_administered, next_due_date,
                      veterinarian_name, clinic_name, is_core, created_at
            "#,
        )
        .bind(vaccination_id)
        .bind(&new.vaccine_name)
        .bind(new.date_administered)
        .bind(new.next_due_date)
        .bind(&new.veterinarian_name)
        .bind(&new.clinic_name)
        .bind(new.is_core)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, vaccination_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM vaccinations WHERE id = $1")
            .bind(vaccination_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
