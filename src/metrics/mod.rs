//! Derived health metrics for a pet profile.
//!
//! Pure functions over already-fetched, already-ordered records. The caller
//! supplies the reference instant, so every computation is reproducible under
//! a fixed clock in tests. Nothing in here issues queries or holds state.

mod age;
mod summary;
mod weight;

pub use age::{age_at, birth_date_from_age, Age, AgeUnit};
pub use summary::{
    bucket_vaccinations, health_summary, health_trend, is_core_vaccine, overall_health_score,
    HealthSummary, HealthTrend, VaccinationBuckets, CORE_VACCINES,
};
pub use weight::{weight_in_kg, WeightUnit, LBS_TO_KG};
