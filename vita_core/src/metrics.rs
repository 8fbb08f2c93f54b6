//! Metrics engine: BMI, BMR and daily water intake.
//!
//! Pure functions over validated scalar inputs; no state, no I/O.
//! Callers are expected to have constrained inputs to the domain ranges
//! in [`crate::types`]; in particular `bmi` does not defend against a
//! near-zero height.

use crate::{ActivityLevel, BmiCategory, Gender, Measurements, Result};

/// Body Mass Index: weight (kg) over squared height (m)
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Basal Metabolic Rate (kcal/day) for an already-parsed gender,
/// via the Mifflin-St Jeor equation.
pub fn bmr_for(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Basal Metabolic Rate from a raw gender string.
///
/// Accepts "man"/"male" and "woman"/"female" case-insensitively; any
/// other value is [`crate::Error::InvalidGender`].
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: &str) -> Result<f64> {
    let gender: Gender = gender.parse()?;
    Ok(bmr_for(weight_kg, height_cm, age_years, gender))
}

/// Recommended daily water intake in liters: 35 ml per kg of body
/// weight, scaled by the activity factor. Unrecognized activity levels
/// fall back to the neutral factor 1.0 rather than erroring.
pub fn water_intake_liters(weight_kg: f64, activity: &str) -> f64 {
    let factor = ActivityLevel::parse_lenient(activity)
        .map(ActivityLevel::water_factor)
        .unwrap_or(1.0);
    weight_kg * 35.0 * factor / 1000.0
}

/// Computed results for one session
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsReport {
    pub bmi: f64,
    pub bmr_kcal: f64,
    pub water_liters: f64,
    pub category: BmiCategory,
}

/// Compute all three metrics for a validated measurement set
pub fn compute_report(m: &Measurements) -> MetricsReport {
    let bmi_value = bmi(m.weight_kg, m.height_cm);
    let water_factor = m.activity.map(ActivityLevel::water_factor).unwrap_or(1.0);
    MetricsReport {
        bmi: bmi_value,
        bmr_kcal: bmr_for(m.weight_kg, m.height_cm, m.age_years, m.gender),
        water_liters: m.weight_kg * 35.0 * water_factor / 1000.0,
        category: BmiCategory::from_bmi(bmi_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_bmi_example() {
        assert!((bmi(70.0, 175.0) - 22.857).abs() < 1e-3);
    }

    #[test]
    fn test_bmr_examples() {
        assert_eq!(bmr(70.0, 175.0, 30, "male").unwrap(), 1648.75);
        assert_eq!(bmr(60.0, 165.0, 25, "female").unwrap(), 1345.25);
    }

    #[test]
    fn test_bmr_case_insensitive() {
        let reference = bmr(70.0, 175.0, 30, "male").unwrap();
        assert_eq!(bmr(70.0, 175.0, 30, "MALE").unwrap(), reference);
        assert_eq!(bmr(70.0, 175.0, 30, "Male").unwrap(), reference);
        assert_eq!(bmr(70.0, 175.0, 30, "man").unwrap(), reference);
    }

    #[test]
    fn test_bmr_rejects_invalid_gender() {
        let result = bmr(70.0, 175.0, 30, "alien");
        assert!(matches!(result, Err(Error::InvalidGender(ref v)) if v == "alien"));
    }

    #[test]
    fn test_water_intake_examples() {
        assert!((water_intake_liters(70.0, "low") - 2.45).abs() < 1e-9);
        assert!((water_intake_liters(70.0, "high") - 3.43).abs() < 1e-9);
        // Unrecognized level falls back to the neutral factor
        assert!((water_intake_liters(70.0, "unknown") - 2.45).abs() < 1e-9);
    }

    #[test]
    fn test_water_intake_case_insensitive() {
        assert_eq!(
            water_intake_liters(70.0, "HIGH"),
            water_intake_liters(70.0, "high")
        );
    }

    #[test]
    fn test_compute_report_matches_individual_functions() {
        let m = Measurements {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            gender: Gender::Male,
            activity: Some(ActivityLevel::Medium),
        };

        let report = compute_report(&m);
        assert_eq!(report.bmi, bmi(70.0, 175.0));
        assert_eq!(report.bmr_kcal, 1648.75);
        assert!((report.water_liters - 2.94).abs() < 1e-9);
        assert_eq!(report.category, BmiCategory::Healthy);
    }

    #[test]
    fn test_compute_report_without_activity_uses_neutral_factor() {
        let m = Measurements {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            gender: Gender::Female,
            activity: None,
        };

        let report = compute_report(&m);
        assert!((report.water_liters - 2.45).abs() < 1e-9);
    }
}
