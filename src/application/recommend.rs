//! Nearest-age recommendation matching.

use crate::domain::{Gender, PrescriptionRecord, RecommendationBundle, Severity};

/// Pick the recommendation bundle for a predicted disease.
///
/// Candidates are records whose disease contains `disease` (case-insensitive)
/// and whose gender equals the dataset spelling of `gender`. Among them the
/// record with the smallest age difference wins; on equal difference the
/// earlier record is kept. No candidate yields [`RecommendationBundle::fallback`].
///
/// `severity` is accepted for callers that already validated it, but it does
/// not influence the choice.
#[must_use]
pub fn match_recommendation(
    disease: &str,
    age: u32,
    gender: Gender,
    _severity: Severity,
    records: &[PrescriptionRecord],
) -> RecommendationBundle {
    let needle = disease.to_lowercase();
    let gender_value = gender.dataset_value();
    let age = i64::from(age);

    let mut best: Option<(&PrescriptionRecord, u64)> = None;
    for record in records {
        if record.gender != gender_value || !record.disease.to_lowercase().contains(&needle) {
            continue;
        }
        let diff = record.age.abs_diff(age);
        if best.map_or(true, |(_, best_diff)| diff < best_diff) {
            best = Some((record, diff));
        }
    }

    match best {
        Some((record, diff)) => {
            tracing::debug!("Matched recommendation with age difference {}", diff);
            RecommendationBundle::for_drug(record.drug.clone())
        }
        None => {
            tracing::debug!("No matching prescription; using fallback recommendations");
            RecommendationBundle::fallback()
        }
    }
}
