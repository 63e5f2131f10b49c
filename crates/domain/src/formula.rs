use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub const PLATE_INCREMENT: f64 = 2.5;

const LBS_PER_KG: f64 = 2.204_622_6;

#[must_use]
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return value;
    }
    (value / increment).round() * increment
}

#[must_use]
pub fn round_to_plate(value: f64) -> f64 {
    round_to_increment(value, PLATE_INCREMENT)
}

#[must_use]
pub fn round_to_decimals(value: f64, places: u32) -> f64 {
    #[allow(clippy::cast_possible_wrap)]
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

#[must_use]
pub fn brzycki(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    // denominator reaches zero at 37 reps
    if reps >= 37 {
        return 0.0;
    }
    round_to_decimals(weight * 36.0 / (37.0 - f64::from(reps)), 1)
}

#[must_use]
pub fn epley(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    round_to_decimals(weight * (1.0 + f64::from(reps) / 30.0), 1)
}

#[must_use]
pub fn lombardi(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    round_to_decimals(weight * f64::from(reps).powf(0.1), 1)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Formula {
    Brzycki,
    Epley,
    Lombardi,
}

impl Formula {
    #[must_use]
    pub fn estimate(self, weight: f64, reps: u32) -> f64 {
        match self {
            Formula::Brzycki => brzycki(weight, reps),
            Formula::Epley => epley(weight, reps),
            Formula::Lombardi => lombardi(weight, reps),
        }
    }
}

/// Confidence of an estimate, determined by the rep count alone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneRepMax {
    #[serde(rename = "estimated1RM")]
    pub estimated_1rm: f64,
    pub formula: Formula,
    pub confidence: Confidence,
}

/// Estimate the one-repetition maximum, picking the formula by rep range.
///
/// Up to 5 reps Brzycki is used, 6 to 10 reps the mean of Brzycki and Epley,
/// above that Epley. Invalid input yields an estimate of 0 with low confidence.
#[must_use]
pub fn calculate_1rm(weight: f64, reps: u32) -> OneRepMax {
    if weight <= 0.0 || reps == 0 {
        return OneRepMax {
            estimated_1rm: 0.0,
            formula: Formula::Brzycki,
            confidence: Confidence::Low,
        };
    }

    match reps {
        1..=5 => OneRepMax {
            estimated_1rm: brzycki(weight, reps),
            formula: Formula::Brzycki,
            confidence: Confidence::High,
        },
        6..=10 => OneRepMax {
            estimated_1rm: round_to_decimals(
                (brzycki(weight, reps) + epley(weight, reps)) / 2.0,
                1,
            ),
            formula: Formula::Brzycki,
            confidence: Confidence::Medium,
        },
        _ => OneRepMax {
            estimated_1rm: epley(weight, reps),
            formula: Formula::Epley,
            confidence: Confidence::Low,
        },
    }
}

/// Weight expected to be liftable for `target_reps`, from the inverted Brzycki formula.
#[must_use]
pub fn calculate_weight_for_reps(e1rm: f64, target_reps: u32) -> f64 {
    if e1rm <= 0.0 || target_reps == 0 || target_reps >= 37 {
        return 0.0;
    }
    if target_reps == 1 {
        return round_to_plate(e1rm);
    }
    round_to_plate(e1rm * (37.0 - f64::from(target_reps)) / 36.0)
}

#[must_use]
pub fn calculate_relative_intensity(weight: f64, e1rm: f64) -> f64 {
    if e1rm <= 0.0 {
        return 0.0;
    }
    round_to_decimals(weight / e1rm * 100.0, 1)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum IntensityZone {
    Maximal,
    Heavy,
    Moderate,
    Light,
    #[serde(rename = "Very Light")]
    #[strum(serialize = "Very Light")]
    VeryLight,
}

impl IntensityZone {
    #[must_use]
    pub fn from_relative_intensity(relative_intensity: f64) -> Self {
        if relative_intensity >= 90.0 {
            IntensityZone::Maximal
        } else if relative_intensity >= 80.0 {
            IntensityZone::Heavy
        } else if relative_intensity >= 70.0 {
            IntensityZone::Moderate
        } else if relative_intensity >= 60.0 {
            IntensityZone::Light
        } else {
            IntensityZone::VeryLight
        }
    }

    #[must_use]
    pub fn purpose(self) -> &'static str {
        match self {
            IntensityZone::Maximal => "Strength/Power",
            IntensityZone::Heavy => "Strength",
            IntensityZone::Moderate => "Hypertrophy",
            IntensityZone::Light => "Endurance/Technique",
            IntensityZone::VeryLight => "Warm-up/Recovery",
        }
    }
}

#[must_use]
pub fn get_intensity_zone(relative_intensity: f64) -> IntensityZone {
    IntensityZone::from_relative_intensity(relative_intensity)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Unit {
    Lbs,
    Kg,
}

impl Unit {
    #[must_use]
    pub fn convert(self, value: f64, to: Unit) -> f64 {
        match (self, to) {
            (Unit::Lbs, Unit::Kg) => lbs_to_kg(value),
            (Unit::Kg, Unit::Lbs) => kg_to_lbs(value),
            _ => value,
        }
    }
}

#[must_use]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    round_to_decimals(lbs / LBS_PER_KG, 1)
}

#[must_use]
pub fn kg_to_lbs(kg: f64) -> f64 {
    round_to_decimals(kg * LBS_PER_KG, 1)
}
