//! Core domain types for the Vita health assistant.
//!
//! This module defines the fundamental types used throughout the system:
//! - Gender and activity level categories
//! - Measurement input for a single session
//! - BMI classification
//! - Input domain ranges shared with the console layer

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Accepted weight input, kilograms
pub const WEIGHT_KG_RANGE: RangeInclusive<f64> = 20.0..=300.0;

/// Accepted height input, centimeters
pub const HEIGHT_CM_RANGE: RangeInclusive<f64> = 50.0..=250.0;

/// Accepted age input, years
pub const AGE_YEARS_RANGE: RangeInclusive<u32> = 5..=120;

// ============================================================================
// Categorical Inputs
// ============================================================================

/// Gender category used by the Mifflin-St Jeor BMR equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    /// Case-insensitive; both short and long forms are accepted.
    /// Anything else is `Error::InvalidGender`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "man" | "male" => Ok(Gender::Male),
            "woman" | "female" => Ok(Gender::Female),
            _ => Err(Error::InvalidGender(s.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Self-reported activity level for the water intake estimate
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    /// Case-insensitive parse. Returns `None` for unrecognized input;
    /// callers treat `None` as the neutral factor rather than an error
    /// (deliberately lenient, unlike gender parsing).
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(ActivityLevel::Low),
            "medium" => Some(ActivityLevel::Medium),
            "high" => Some(ActivityLevel::High),
            _ => None,
        }
    }

    /// Water intake multiplier for this activity level
    pub fn water_factor(self) -> f64 {
        match self {
            ActivityLevel::Low => 1.0,
            ActivityLevel::Medium => 1.2,
            ActivityLevel::High => 1.4,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityLevel::Low => write!(f, "low"),
            ActivityLevel::Medium => write!(f, "medium"),
            ActivityLevel::High => write!(f, "high"),
        }
    }
}

// ============================================================================
// Measurement Input
// ============================================================================

/// One session's worth of user measurements. Ephemeral: collected by the
/// console layer, consumed by the metrics engine, never persisted.
#[derive(Clone, Debug)]
pub struct Measurements {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    /// `None` means the user entered an unrecognized level; the water
    /// intake estimate falls back to the neutral factor.
    pub activity: Option<ActivityLevel>,
}

// ============================================================================
// BMI Classification
// ============================================================================

/// BMI band used for the end-of-session recommendation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
}

impl BmiCategory {
    /// Classify a BMI value: < 18.5 underweight, < 24 healthy, else overweight
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 24.0 {
            BmiCategory::Healthy
        } else {
            BmiCategory::Overweight
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "underweight"),
            BmiCategory::Healthy => write!(f, "healthy"),
            BmiCategory::Overweight => write!(f, "overweight"),
        }
    }
}
