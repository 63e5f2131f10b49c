//! Population norms for VO2max.
//!
//! The reference data is a [`PercentileTable`] passed in by the caller. The
//! default table holds the FRIEND registry norms for treadmill tests.

use log::debug;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Sex, round_to_decimals};

const MIN_FITNESS_AGE: f64 = 20.0;
const MAX_FITNESS_AGE: f64 = 90.0;

/// VO2max values at the 5th, 25th, 50th, 75th and 95th percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl Percentiles {
    #[must_use]
    pub const fn new(p5: f64, p25: f64, p50: f64, p75: f64, p95: f64) -> Self {
        Self {
            p5,
            p25,
            p50,
            p75,
            p95,
        }
    }

    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.p5 < self.p25 && self.p25 < self.p50 && self.p50 < self.p75 && self.p75 < self.p95
    }

    /// Continuous percentile of a value.
    ///
    /// Values between the reference points are interpolated linearly. Above the
    /// 95th percentile the result approaches 99, below the 5th it falls
    /// linearly down to 1.
    #[must_use]
    pub fn percentile_of(&self, vo2max: f64) -> f64 {
        if vo2max >= self.p95 {
            let excess = (vo2max - self.p95) / (self.p95 - self.p75);
            return (95.0 + 4.0 * (1.0 - (-excess).exp())).min(99.0);
        }
        if vo2max <= self.p5 {
            return (5.0 - (self.p5 - vo2max) / (self.p25 - self.p5) * 20.0).max(1.0);
        }
        let points = [
            (5.0, self.p5),
            (25.0, self.p25),
            (50.0, self.p50),
            (75.0, self.p75),
            (95.0, self.p95),
        ];
        points
            .windows(2)
            .find_map(|w| {
                let ((lower_pct, lower), (upper_pct, upper)) = (w[0], w[1]);
                (vo2max <= upper).then(|| {
                    lower_pct + (vo2max - lower) / (upper - lower) * (upper_pct - lower_pct)
                })
            })
            .unwrap_or(95.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBracket {
    pub min_age: u32,
    pub max_age: u32,
    pub male: Percentiles,
    pub female: Percentiles,
}

impl AgeBracket {
    #[must_use]
    pub fn contains(&self, age: u32) -> bool {
        (self.min_age..=self.max_age).contains(&age)
    }

    #[must_use]
    pub fn midpoint(&self) -> f64 {
        f64::from(self.min_age + self.max_age) / 2.0
    }

    #[must_use]
    pub fn percentiles(&self, sex: Sex) -> &Percentiles {
        match sex {
            Sex::FEMALE => &self.female,
            Sex::MALE => &self.male,
        }
    }
}

/// Age brackets ordered from youngest to oldest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AgeBracket>")]
pub struct PercentileTable(Vec<AgeBracket>);

impl From<Vec<AgeBracket>> for PercentileTable {
    fn from(value: Vec<AgeBracket>) -> Self {
        PercentileTable::new(value)
    }
}

impl PercentileTable {
    #[must_use]
    pub fn new(mut brackets: Vec<AgeBracket>) -> Self {
        brackets.sort_by_key(|b| b.min_age);
        Self(brackets)
    }

    #[must_use]
    pub fn brackets(&self) -> &[AgeBracket] {
        &self.0
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.iter().all(|b| {
                b.min_age <= b.max_age && b.male.is_ascending() && b.female.is_ascending()
            })
            && self.0.windows(2).all(|w| w[0].max_age < w[1].min_age)
    }

    /// Bracket containing the age, or the oldest bracket if none does.
    #[must_use]
    pub fn bracket(&self, age: u32) -> Option<&AgeBracket> {
        self.0.iter().find(|b| b.contains(age)).or_else(|| {
            debug!("no age bracket contains {age}, using oldest bracket");
            self.0.iter().max_by_key(|b| b.max_age)
        })
    }
}

impl Default for PercentileTable {
    fn default() -> Self {
        Self(vec![
            AgeBracket {
                min_age: 20,
                max_age: 29,
                male: Percentiles::new(29.0, 40.1, 48.0, 55.2, 66.3),
                female: Percentiles::new(21.7, 30.5, 37.6, 44.7, 56.0),
            },
            AgeBracket {
                min_age: 30,
                max_age: 39,
                male: Percentiles::new(27.2, 35.9, 42.4, 49.2, 59.8),
                female: Percentiles::new(19.0, 25.3, 30.2, 36.1, 45.8),
            },
            AgeBracket {
                min_age: 40,
                max_age: 49,
                male: Percentiles::new(24.2, 31.9, 37.8, 45.0, 55.6),
                female: Percentiles::new(17.0, 22.1, 26.7, 32.4, 41.7),
            },
            AgeBracket {
                min_age: 50,
                max_age: 59,
                male: Percentiles::new(20.9, 27.1, 32.6, 39.7, 50.7),
                female: Percentiles::new(16.0, 19.9, 23.4, 27.6, 35.9),
            },
            AgeBracket {
                min_age: 60,
                max_age: 69,
                male: Percentiles::new(17.4, 23.7, 28.2, 34.5, 43.0),
                female: Percentiles::new(13.4, 17.2, 20.0, 23.8, 29.4),
            },
            AgeBracket {
                min_age: 70,
                max_age: 79,
                male: Percentiles::new(16.3, 20.4, 24.4, 30.4, 39.7),
                female: Percentiles::new(13.1, 15.6, 18.3, 20.8, 24.1),
            },
        ])
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Classification {
    Poor,
    Fair,
    Good,
    Excellent,
    Superior,
}

impl Classification {
    #[must_use]
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= 90.0 {
            Classification::Superior
        } else if percentile >= 75.0 {
            Classification::Excellent
        } else if percentile >= 50.0 {
            Classification::Good
        } else if percentile >= 25.0 {
            Classification::Fair
        } else {
            Classification::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileRank {
    pub percentile: f64,
    pub classification: Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vo2maxProfile {
    pub percentile: f64,
    pub classification: Classification,
    pub fitness_age: f64,
}

/// Percentile and classification of a VO2max within the athlete's age bracket.
#[must_use]
pub fn get_vo2max_percentile(
    vo2max: f64,
    age: u32,
    sex: Sex,
    table: &PercentileTable,
) -> Option<PercentileRank> {
    let bracket = table.bracket(age)?;
    let percentile = round_to_decimals(bracket.percentiles(sex).percentile_of(vo2max), 1);
    Some(PercentileRank {
        percentile,
        classification: Classification::from_percentile(percentile),
    })
}

/// Age at which the VO2max would be the median.
///
/// Starts from the bracket whose median is closest and interpolates between
/// bracket midpoints toward the younger bracket for higher values and toward
/// the older bracket for lower values.
#[must_use]
pub fn calculate_fitness_age(vo2max: f64, sex: Sex, table: &PercentileTable) -> Option<f64> {
    let brackets = table.brackets();
    let (index, closest) = brackets.iter().enumerate().min_by(|(_, a), (_, b)| {
        let a = (a.percentiles(sex).p50 - vo2max).abs();
        let b = (b.percentiles(sex).p50 - vo2max).abs();
        a.total_cmp(&b)
    })?;
    let median = closest.percentiles(sex).p50;

    let neighbor = if vo2max > median {
        index.checked_sub(1).or(Some(index + 1))
    } else {
        Some(index + 1).filter(|i| *i < brackets.len()).or(index.checked_sub(1))
    }
    .and_then(|i| brackets.get(i));

    let age = match neighbor {
        Some(neighbor) if (neighbor.percentiles(sex).p50 - median).abs() > f64::EPSILON => {
            let slope = (neighbor.midpoint() - closest.midpoint())
                / (neighbor.percentiles(sex).p50 - median);
            closest.midpoint() + (vo2max - median) * slope
        }
        _ => closest.midpoint(),
    };

    Some(round_to_decimals(age.clamp(MIN_FITNESS_AGE, MAX_FITNESS_AGE), 1))
}

#[must_use]
pub fn vo2max_profile(
    vo2max: f64,
    age: u32,
    sex: Sex,
    table: &PercentileTable,
) -> Option<Vo2maxProfile> {
    let rank = get_vo2max_percentile(vo2max, age, sex, table)?;
    Some(Vo2maxProfile {
        percentile: rank.percentile,
        classification: rank.classification,
        fitness_age: calculate_fitness_age(vo2max, sex, table)?,
    })
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrainingStatus {
    Trained,
    Untrained,
}

impl TrainingStatus {
    #[must_use]
    pub fn annual_decline_rate(self) -> f64 {
        match self {
            TrainingStatus::Trained => 0.005,
            TrainingStatus::Untrained => 0.01,
        }
    }
}

/// VO2max needed today to still reach `future_vo2max` after `years` of decline.
#[must_use]
pub fn calculate_target_vo2max(future_vo2max: f64, years: f64, status: TrainingStatus) -> f64 {
    if future_vo2max <= 0.0 {
        return 0.0;
    }
    round_to_decimals(
        future_vo2max / (1.0 - status.annual_decline_rate()).powf(years),
        1,
    )
}

/// VO2max expected after `years` of decline.
#[must_use]
pub fn project_vo2max(current_vo2max: f64, years: f64, status: TrainingStatus) -> f64 {
    if current_vo2max <= 0.0 {
        return 0.0;
    }
    round_to_decimals(
        current_vo2max * (1.0 - status.annual_decline_rate()).powf(years),
        1,
    )
}
