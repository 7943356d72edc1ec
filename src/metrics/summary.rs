use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::health::HealthAnalysis;
use crate::vaccinations::Vaccination;

/// Closed set of vaccines flagged as core. Not user-configurable.
pub const CORE_VACCINES: [&str; 3] = ["Rabies", "DHPP", "DHLPP"];

pub fn is_core_vaccine(name: &str) -> bool {
    CORE_VACCINES.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTrend {
    Improving,
    Stable,
    Declining,
    Unknown,
}

/// Due-date buckets over a list pre-ordered ascending by `next_due_date`.
#[derive(Debug, Clone)]
pub struct VaccinationBuckets {
    pub upcoming: Vec<Vaccination>,
    pub overdue: Vec<Vaccination>,
}

/// Profile summary view-model, serialized inside `{"success": true, "summary": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub overall_health_score: f64,
    pub recent_analyses_count: usize,
    pub last_analysis_date: Option<OffsetDateTime>,
    pub upcoming_vaccinations: Vec<Vaccination>,
    pub overdue_vaccinations: Vec<Vaccination>,
    pub health_trend: HealthTrend,
}

/// Split vaccinations into overdue and upcoming relative to `today`.
///
/// Both comparisons are strict: an entry due exactly today lands in neither
/// bucket, and a missing due date is skipped entirely. Upcoming keeps at most
/// the first three entries in their stored (ascending) order.
pub fn bucket_vaccinations(vaccinations: &[Vaccination], today: Date) -> VaccinationBuckets {
    let upcoming = vaccinations
        .iter()
        .filter(|v| v.next_due_date.is_some_and(|due| due > today))
        .take(3)
        .cloned()
        .collect();
    let overdue = vaccinations
        .iter()
        .filter(|v| v.next_due_date.is_some_and(|due| due < today))
        .cloned()
        .collect();
    VaccinationBuckets { upcoming, overdue }
}

fn mean_confidence(analyses: &[HealthAnalysis]) -> f64 {
    analyses.iter().map(|a| a.confidence_score).sum::<f64>() / analyses.len() as f64
}

/// Mean confidence over the five newest analyses; 0.0 when there are none.
pub fn overall_health_score(analyses: &[HealthAnalysis]) -> f64 {
    let recent = &analyses[..analyses.len().min(5)];
    if recent.is_empty() {
        0.0
    } else {
        mean_confidence(recent)
    }
}

/// Coarse trend over a newest-first analysis list.
///
/// Compares the mean confidence of the three newest entries against the next
/// three; a difference beyond +/-0.1 tips the classification. Scores are used
/// as stored, with no prior rounding.
pub fn health_trend(analyses: &[HealthAnalysis]) -> HealthTrend {
    if analyses.len() < 2 {
        return HealthTrend::Unknown;
    }

    let recent = &analyses[..analyses.len().min(3)];
    let older = &analyses[3.min(analyses.len())..6.min(analyses.len())];

    if recent.is_empty() || older.is_empty() {
        return HealthTrend::Unknown;
    }

    let diff = mean_confidence(recent) - mean_confidence(older);

    if diff > 0.1 {
        HealthTrend::Improving
    } else if diff < -0.1 {
        HealthTrend::Declining
    } else {
        HealthTrend::Stable
    }
}

/// Assemble the profile summary from pre-ordered records.
///
/// `analyses` must be newest-first, `vaccinations` ascending by due date —
/// the orderings the repository queries already guarantee.
pub fn health_summary(
    analyses: &[HealthAnalysis],
    vaccinations: &[Vaccination],
    today: Date,
) -> HealthSummary {
    let recent_count = analyses.len().min(5);
    let buckets = bucket_vaccinations(vaccinations, today);

    HealthSummary {
        overall_health_score: overall_health_score(analyses),
        recent_analyses_count: recent_count,
        last_analysis_date: analyses.first().map(|a| a.created_at),
        upcoming_vaccinations: buckets.upcoming,
        overdue_vaccinations: buckets.overdue,
        health_trend: health_trend(analyses),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    fn analysis(confidence: f64, created_at: OffsetDateTime) -> HealthAnalysis {
        HealthAnalysis {
            id: Uuid::new_v4(),
            pet_id: Uuid::new_v4(),
            analysis_type: "general".into(),
            health_status: "healthy".into(),
            confidence_score: confidence,
            conditions: Json(vec![]),
            recommendations: Json(vec![]),
            image_url: None,
            created_at,
        }
    }

    // Newest-first, one day apart, matching the repository ordering.
    fn analyses(confidences: &[f64]) -> Vec<HealthAnalysis> {
        confidences
            .iter()
            .enumerate()
            .map(|(i, &c)| analysis(c, datetime!(2025-06-30 12:00 UTC) - time::Duration::days(i as i64)))
            .collect()
    }

    fn vaccination(name: &str, next_due: Option<Date>) -> Vaccination {
        Vaccination {
            id: Uuid::new_v4(),
            pet_id: Uuid::new_v4(),
            vaccine_name: name.into(),
            date_administered: date!(2024 - 01 - 15),
            next_due_date: next_due,
            veterinarian_name: "Dr. Alvarez".into(),
            clinic_name: None,
            is_core: is_core_vaccine(name),
            created_at: datetime!(2024-01-15 9:00 UTC),
        }
    }

    const TODAY: Date = date!(2025 - 06 - 30);

    #[test]
    fn core_vaccine_set_is_closed() {
        assert!(is_core_vaccine("Rabies"));
        assert!(is_core_vaccine("DHPP"));
        assert!(is_core_vaccine("DHLPP"));
        assert!(!is_core_vaccine("Bordetella"));
        assert!(!is_core_vaccine("rabies"));
    }

    #[test]
    fn score_of_empty_list_is_zero() {
        assert_eq!(overall_health_score(&[]), 0.0);
    }

    #[test]
    fn score_of_single_analysis_is_its_confidence() {
        assert_eq!(overall_health_score(&analyses(&[0.8])), 0.8);
    }

    #[test]
    fn score_uses_only_the_five_newest() {
        let list = analyses(&[0.9, 0.88, 0.91, 0.7, 0.72, 0.69]);
        let score = overall_health_score(&list);
        assert!((score - 0.822).abs() < 1e-9);
    }

    #[test]
    fn trend_needs_at_least_two_analyses() {
        assert_eq!(health_trend(&[]), HealthTrend::Unknown);
        assert_eq!(health_trend(&analyses(&[0.9])), HealthTrend::Unknown);
    }

    #[test]
    fn trend_unknown_without_an_older_window() {
        // Three entries fill the recent window but leave the older one empty
        assert_eq!(health_trend(&analyses(&[0.9, 0.8, 0.7])), HealthTrend::Unknown);
    }

    #[test]
    fn trend_improving_past_positive_threshold() {
        let list = analyses(&[0.95, 0.95, 0.95, 0.80, 0.80, 0.80]);
        assert_eq!(health_trend(&list), HealthTrend::Improving);
    }

    #[test]
    fn trend_declining_past_negative_threshold() {
        let list = analyses(&[0.80, 0.80, 0.80, 0.95, 0.95, 0.95]);
        assert_eq!(health_trend(&list), HealthTrend::Declining);
    }

    #[test]
    fn trend_stable_within_threshold() {
        let list = analyses(&[0.85, 0.85, 0.85, 0.80, 0.80, 0.80]);
        assert_eq!(health_trend(&list), HealthTrend::Stable);
    }

    #[test]
    fn six_analysis_scenario_improves() {
        let list = analyses(&[0.9, 0.88, 0.91, 0.7, 0.72, 0.69]);
        // recent mean 0.8967 vs older mean 0.7033, diff ~0.193
        assert_eq!(health_trend(&list), HealthTrend::Improving);
    }

    #[test]
    fn bucketing_splits_on_strict_comparison() {
        let yesterday = TODAY - time::Duration::days(1);
        let tomorrow = TODAY + time::Duration::days(1);
        let vaccs = vec![
            vaccination("Rabies", Some(yesterday)),
            vaccination("DHPP", Some(tomorrow)),
            vaccination("Bordetella", None),
        ];

        let buckets = bucket_vaccinations(&vaccs, TODAY);
        assert_eq!(buckets.overdue.len(), 1);
        assert_eq!(buckets.overdue[0].vaccine_name, "Rabies");
        assert_eq!(buckets.upcoming.len(), 1);
        assert_eq!(buckets.upcoming[0].vaccine_name, "DHPP");
    }

    #[test]
    fn due_today_lands_in_neither_bucket() {
        let vaccs = vec![vaccination("Rabies", Some(TODAY))];
        let buckets = bucket_vaccinations(&vaccs, TODAY);
        assert!(buckets.overdue.is_empty());
        assert!(buckets.upcoming.is_empty());
    }

    #[test]
    fn upcoming_truncates_to_three_in_stored_order() {
        let vaccs: Vec<_> = (1..=5)
            .map(|i| {
                vaccination(
                    &format!("Shot {i}"),
                    Some(TODAY + time::Duration::days(i * 30)),
                )
            })
            .collect();

        let buckets = bucket_vaccinations(&vaccs, TODAY);
        assert_eq!(buckets.upcoming.len(), 3);
        assert_eq!(buckets.upcoming[0].vaccine_name, "Shot 1");
        assert_eq!(buckets.upcoming[2].vaccine_name, "Shot 3");
        assert!(buckets.overdue.is_empty());
    }

    #[test]
    fn summary_of_empty_records() {
        let summary = health_summary(&[], &[], TODAY);
        assert_eq!(summary.overall_health_score, 0.0);
        assert_eq!(summary.recent_analyses_count, 0);
        assert_eq!(summary.last_analysis_date, None);
        assert!(summary.upcoming_vaccinations.is_empty());
        assert!(summary.overdue_vaccinations.is_empty());
        assert_eq!(summary.health_trend, HealthTrend::Unknown);
    }

    #[test]
    fn summary_composes_score_trend_and_buckets() {
        let list = analyses(&[0.9, 0.88, 0.91, 0.7, 0.72, 0.69]);
        let vaccs = vec![
            vaccination("Rabies", Some(TODAY - time::Duration::days(10))),
            vaccination("DHPP", Some(TODAY + time::Duration::days(10))),
        ];

        let summary = health_summary(&list, &vaccs, TODAY);
        assert!((summary.overall_health_score - 0.822).abs() < 1e-9);
        assert_eq!(summary.recent_analyses_count, 5);
        assert_eq!(summary.last_analysis_date, Some(list[0].created_at));
        assert_eq!(summary.health_trend, HealthTrend::Improving);
        assert_eq!(summary.overdue_vaccinations.len(), 1);
        assert_eq!(summary.upcoming_vaccinations.len(), 1);
    }

    #[test]
    fn trend_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&HealthTrend::Improving).unwrap(),
            r#""improving""#
        );
        assert_eq!(
            serde_json::to_string(&HealthTrend::Unknown).unwrap(),
            r#""unknown""#
        );
    }

    #[test]
    fn summary_serializes_camel_case_with_null_date() {
        let summary = health_summary(&[], &[], TODAY);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["overallHealthScore"], 0.0);
        assert_eq!(json["recentAnalysesCount"], 0);
        assert!(json["lastAnalysisDate"].is_null());
        assert_eq!(json["healthTrend"], "unknown");
    }
}
