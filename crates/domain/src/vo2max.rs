//! Field-test estimators of maximal oxygen uptake (ml/kg/min).
//!
//! Each estimator is only valid for the inputs of its own protocol. Results are
//! rounded to one decimal, and `None` is returned when the inputs cannot come
//! from a real test (e.g. a non-positive time or heart rate).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::round_to_decimals;

/// Oxygen cost of horizontal running in ml/kg/min per m/min.
const ACSM_RUNNING_COST: f64 = 0.2;
const RESTING_VO2: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    FEMALE,
    MALE,
}

impl From<u8> for Sex {
    fn from(value: u8) -> Self {
        match value {
            0 => Sex::FEMALE,
            _ => Sex::MALE,
        }
    }
}

impl From<&str> for Sex {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "female" | "f" => Sex::FEMALE,
            _ => Sex::MALE,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Sex::FEMALE => "female",
                Sex::MALE => "male",
            }
        )
    }
}

/// Cooper 12-minute run.
#[must_use]
pub fn cooper_12_minute_run(distance_meters: f64) -> Option<f64> {
    if distance_meters <= 0.0 {
        return None;
    }
    Some(round_to_decimals((distance_meters - 504.9) / 44.73, 1))
}

/// 1.5-mile run for time.
#[must_use]
pub fn one_and_a_half_mile_run(time_minutes: f64) -> Option<f64> {
    if time_minutes <= 0.0 {
        return None;
    }
    Some(round_to_decimals(483.0 / time_minutes + 3.5, 1))
}

/// Rockport 1-mile walk (Kline et al., 1987).
#[must_use]
pub fn rockport_walk(
    weight_lbs: f64,
    age: u32,
    sex: Sex,
    time_minutes: f64,
    heart_rate: f64,
) -> Option<f64> {
    if weight_lbs <= 0.0 || time_minutes <= 0.0 || heart_rate <= 0.0 {
        return None;
    }
    let sex_factor = match sex {
        Sex::FEMALE => 0.0,
        Sex::MALE => 1.0,
    };
    Some(round_to_decimals(
        132.853 - 0.0769 * weight_lbs - 0.3877 * f64::from(age) + 6.315 * sex_factor
            - 3.2649 * time_minutes
            - 0.1565 * heart_rate,
        1,
    ))
}

/// 3-minute step test, based on the heart rate after recovery.
#[must_use]
pub fn step_test(sex: Sex, recovery_heart_rate: f64) -> Option<f64> {
    if recovery_heart_rate <= 0.0 {
        return None;
    }
    let vo2max = match sex {
        Sex::MALE => 111.33 - 0.42 * recovery_heart_rate,
        Sex::FEMALE => 65.81 - 0.1847 * recovery_heart_rate,
    };
    Some(round_to_decimals(vo2max, 1))
}

/// Heart-rate-reserve estimate from a steady run.
///
/// The oxygen cost of the pace follows the ACSM running equation and is scaled
/// up by the fraction of heart rate reserve used.
#[must_use]
pub fn from_running(
    distance_meters: f64,
    duration_minutes: f64,
    avg_heart_rate: f64,
    max_heart_rate: f64,
    resting_heart_rate: f64,
) -> Option<f64> {
    if distance_meters <= 0.0 || duration_minutes <= 0.0 || max_heart_rate <= resting_heart_rate {
        return None;
    }
    let reserve_fraction =
        (avg_heart_rate - resting_heart_rate) / (max_heart_rate - resting_heart_rate);
    if reserve_fraction <= 0.0 || reserve_fraction > 1.0 {
        return None;
    }
    let speed = distance_meters / duration_minutes;
    let vo2 = ACSM_RUNNING_COST * speed + RESTING_VO2;
    Some(round_to_decimals((vo2 / reserve_fraction).clamp(15.0, 90.0), 1))
}

/// Estimate from average cycling power.
///
/// The intensity factor is the fraction of maximum heart rate if known,
/// otherwise it is derived from the duration of the effort.
#[must_use]
pub fn from_cycling_power(
    avg_power_watts: f64,
    weight_kg: f64,
    duration_minutes: f64,
    avg_heart_rate: Option<f64>,
    max_heart_rate: Option<f64>,
) -> Option<f64> {
    if avg_power_watts <= 0.0 || weight_kg <= 0.0 || duration_minutes <= 0.0 {
        return None;
    }
    let intensity = match (avg_heart_rate, max_heart_rate) {
        (Some(avg), Some(max)) if avg > 0.0 && max > 0.0 => (avg / max).clamp(0.5, 1.0),
        _ if duration_minutes <= 20.0 => 0.95,
        _ if duration_minutes <= 60.0 => 0.85,
        _ => 0.75,
    };
    let vo2 = 10.8 * avg_power_watts / weight_kg + 7.0;
    Some(round_to_decimals((vo2 / intensity).clamp(20.0, 90.0), 1))
}

/// Inputs of a single field test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum Vo2maxTest {
    #[serde(rename_all = "camelCase")]
    Cooper { distance_meters: f64 },
    #[serde(rename_all = "camelCase")]
    OneAndAHalfMile { time_minutes: f64 },
    #[serde(rename_all = "camelCase")]
    Rockport {
        weight_lbs: f64,
        age: u32,
        sex: Sex,
        time_minutes: f64,
        heart_rate: f64,
    },
    #[serde(rename_all = "camelCase")]
    StepTest { sex: Sex, recovery_heart_rate: f64 },
    #[serde(rename_all = "camelCase")]
    Running {
        distance_meters: f64,
        duration_minutes: f64,
        avg_heart_rate: f64,
        max_heart_rate: f64,
        resting_heart_rate: f64,
    },
    #[serde(rename_all = "camelCase")]
    CyclingPower {
        avg_power_watts: f64,
        weight_kg: f64,
        duration_minutes: f64,
        #[serde(default)]
        avg_heart_rate: Option<f64>,
        #[serde(default)]
        max_heart_rate: Option<f64>,
    },
}

impl Vo2maxTest {
    #[must_use]
    pub fn estimate(&self) -> Option<f64> {
        match *self {
            Vo2maxTest::Cooper { distance_meters } => cooper_12_minute_run(distance_meters),
            Vo2maxTest::OneAndAHalfMile { time_minutes } => one_and_a_half_mile_run(time_minutes),
            Vo2maxTest::Rockport {
                weight_lbs,
                age,
                sex,
                time_minutes,
                heart_rate,
            } => rockport_walk(weight_lbs, age, sex, time_minutes, heart_rate),
            Vo2maxTest::StepTest {
                sex,
                recovery_heart_rate,
            } => step_test(sex, recovery_heart_rate),
            Vo2maxTest::Running {
                distance_meters,
                duration_minutes,
                avg_heart_rate,
                max_heart_rate,
                resting_heart_rate,
            } => from_running(
                distance_meters,
                duration_minutes,
                avg_heart_rate,
                max_heart_rate,
                resting_heart_rate,
            ),
            Vo2maxTest::CyclingPower {
                avg_power_watts,
                weight_kg,
                duration_minutes,
                avg_heart_rate,
                max_heart_rate,
            } => from_cycling_power(
                avg_power_watts,
                weight_kg,
                duration_minutes,
                avg_heart_rate,
                max_heart_rate,
            ),
        }
    }
}
