use serde::{Deserialize, Serialize};

/// Conversion factor applied once at write time; storage is always kilograms.
pub const LBS_TO_KG: f64 = 0.453592;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lbs,
}

/// Normalize a weight to kilograms. No rounding, full f64 precision.
pub fn weight_in_kg(value: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kg => value,
        WeightUnit::Lbs => value * LBS_TO_KG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilograms_pass_through() {
        assert_eq!(weight_in_kg(12.5, WeightUnit::Kg), 12.5);
        assert_eq!(weight_in_kg(0.0, WeightUnit::Kg), 0.0);
    }

    #[test]
    fn pounds_multiply_by_exact_factor() {
        assert_eq!(weight_in_kg(10.0, WeightUnit::Lbs), 4.53592);
        assert_eq!(weight_in_kg(1.0, WeightUnit::Lbs), 0.453592);
        assert_eq!(weight_in_kg(22.3, WeightUnit::Lbs), 22.3 * 0.453592);
    }

    #[test]
    fn unit_labels_deserialize_lowercase() {
        assert_eq!(
            serde_json::from_str::<WeightUnit>(r#""lbs""#).unwrap(),
            WeightUnit::Lbs
        );
        assert_eq!(
            serde_json::from_str::<WeightUnit>(r#""kg""#).unwrap(),
            WeightUnit::Kg
        );
    }
}
