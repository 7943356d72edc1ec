use serde::{Deserialize, Serialize};
use time::Date;

use crate::health::HealthAnalysis;
use crate::metrics::{Age, AgeUnit, HealthSummary, WeightUnit};
use crate::vaccinations::Vaccination;

use super::repo::{EmergencyContact, Pet, PetNotes, VetContact, VetRecord};

/// Vaccination entry as submitted with a new pet. Entries missing a name or a
/// date are dropped, not rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationEntry {
    pub name: Option<String>,
    pub date: Option<Date>,
    pub next_due: Option<Date>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub age_unit: Option<AgeUnit>,
    pub weight: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub markings: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub vet_info: Option<VetContact>,
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default)]
    pub vaccinations: Vec<VaccinationEntry>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub age_unit: Option<AgeUnit>,
    pub weight: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub profile_image: Option<String>,
    pub notes: Option<PetNotes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVetRecordRequest {
    pub visit_date: Option<Date>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub veterinarian_name: Option<String>,
    pub clinic_name: Option<String>,
}

/// Pet plus its preloaded relations and the computed age, as the profile and
/// list endpoints return it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDetails {
    #[serde(flatten)]
    pub pet: Pet,
    pub age: Option<Age>,
    pub health_analyses: Vec<HealthAnalysis>,
    pub vet_records: Vec<VetRecord>,
    pub vaccinations: Vec<Vaccination>,
}

#[derive(Debug, Serialize)]
pub struct PetsEnvelope {
    pub success: bool,
    pub pets: Vec<PetDetails>,
}

#[derive(Debug, Serialize)]
pub struct PetEnvelope {
    pub success: bool,
    pub pet: PetDetails,
}

#[derive(Debug, Serialize)]
pub struct SummaryEnvelope {
    pub success: bool,
    pub summary: HealthSummary,
}

#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VetRecordsEnvelope {
    pub success: bool,
    pub records: Vec<VetRecord>,
}

#[derive(Debug, Serialize)]
pub struct VetRecordEnvelope {
    pub success: bool,
    pub record: VetRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn pet_details_flattens_and_camel_cases() {
        let pet = Pet {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Mila".into(),
            species: "dog".into(),
            breed: "Border Collie".into(),
            gender: "female".into(),
            birth_date: Some(date!(2021 - 04 - 02)),
            weight_kg: Some(17.2),
            color: None,
            microchip_id: None,
            profile_image_url: None,
            notes: None,
            is_active: true,
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        };
        let details = PetDetails {
            age: Some(Age { years: 4, months: 2 }),
            pet,
            health_analyses: vec![],
            vet_records: vec![],
            vaccinations: vec![],
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["name"], "Mila");
        assert_eq!(json["weightKg"], 17.2);
        assert_eq!(json["age"]["years"], 4);
        assert!(json["healthAnalyses"].as_array().unwrap().is_empty());
        assert!(json["vetRecords"].as_array().unwrap().is_empty());
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn create_request_accepts_partial_vaccination_entries() {
        let payload = serde_json::json!({
            "name": "Rex",
            "species": "Dog",
            "breed": "Boxer",
            "gender": "male",
            "vaccinations": [
                {"name": "Rabies", "date": "2024-05-01", "nextDue": "2025-05-01"},
                {"name": "Bordetella"},
                {"date": "2024-06-01"}
            ]
        });
        let req: CreatePetRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(req.vaccinations.len(), 3);
        assert!(req.vaccinations[1].date.is_none());
        assert!(req.vaccinations[2].name.is_none());
    }
}
