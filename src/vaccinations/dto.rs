use serde::{Deserialize, Serialize};
use time::Date;

use super::repo::Vaccination;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVaccinationRequest {
    pub name: String,
    pub date: Date,
    pub next_due: Option<Date>,
    pub veterinarian_name: Option<String>,
    pub clinic_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVaccinationRequest {
    pub name: Option<String>,
    pub date: Option<Date>,
    pub next_due: Option<Date>,
    pub veterinarian_name: Option<String>,
    pub clinic_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VaccinationsEnvelope {
    pub success: bool,
    pub vaccinations: Vec<Vaccination>,
}

#[derive(Debug, Serialize)]
pub struct VaccinationEnvelope {
    pub success: bool,
    pub vaccination: Vaccination,
}

#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}
