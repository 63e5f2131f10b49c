use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{SetRecord, round_to_plate};

pub const DEFAULT_PLATEAU_WINDOW_WEEKS: usize = 3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProgressionModel {
    Linear,
    Double,
    RpeBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RpeTarget {
    pub low: f64,
    pub high: f64,
}

/// Last session's performance and the prescription it is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionInput {
    pub current_weight: f64,
    pub current_reps: u32,
    pub target_rep_low: u32,
    pub target_rep_high: u32,
    pub weight_increment: f64,
    #[serde(default)]
    pub rpe_target: Option<RpeTarget>,
    #[serde(default)]
    pub current_rpe: Option<f64>,
}

impl ProgressionInput {
    #[must_use]
    pub fn new(
        current_weight: f64,
        current_reps: u32,
        target_rep_low: u32,
        target_rep_high: u32,
        weight_increment: f64,
    ) -> Self {
        Self {
            current_weight,
            current_reps,
            target_rep_low,
            target_rep_high,
            weight_increment,
            rpe_target: None,
            current_rpe: None,
        }
    }

    #[must_use]
    pub fn with_rpe(mut self, rpe_target: RpeTarget, current_rpe: f64) -> Self {
        self.rpe_target = Some(rpe_target);
        self.current_rpe = Some(current_rpe);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionSuggestion {
    pub model: ProgressionModel,
    pub current_weight: f64,
    pub current_reps: u32,
    pub suggested_weight: f64,
    pub suggested_reps: u32,
    pub reasoning: String,
}

#[must_use]
pub fn suggest_progression(
    model: ProgressionModel,
    input: &ProgressionInput,
) -> ProgressionSuggestion {
    let weight = input.current_weight;
    let increment = input.weight_increment;

    let (suggested_weight, suggested_reps, reasoning) = match model {
        ProgressionModel::Linear => (
            weight + increment,
            input.target_rep_low,
            format!(
                "Linear progression: add {increment} lbs and work at {} reps.",
                input.target_rep_low
            ),
        ),
        ProgressionModel::Double => {
            if input.current_reps >= input.target_rep_high {
                (
                    weight + increment,
                    input.target_rep_low,
                    format!(
                        "You hit the top of the {}-{} rep range. \
                         Add {increment} lbs and start again at {} reps.",
                        input.target_rep_low, input.target_rep_high, input.target_rep_low
                    ),
                )
            } else {
                (
                    weight,
                    input.current_reps + 1,
                    format!(
                        "Keep the weight and aim for {} reps to climb the {}-{} rep range.",
                        input.current_reps + 1,
                        input.target_rep_low,
                        input.target_rep_high
                    ),
                )
            }
        }
        ProgressionModel::RpeBased => match (input.rpe_target, input.current_rpe) {
            (Some(target), Some(rpe)) if rpe < target.low => (
                weight + increment,
                input.current_reps,
                format!(
                    "RPE {rpe} was below the {}-{} target. Add {increment} lbs.",
                    target.low, target.high
                ),
            ),
            (Some(target), Some(rpe)) if rpe > target.high => (
                weight,
                input.current_reps,
                format!(
                    "RPE {rpe} was above the {}-{} target. Hold the weight until it feels easier.",
                    target.low, target.high
                ),
            ),
            (Some(target), Some(rpe)) => (
                weight + increment / 2.0,
                input.current_reps,
                format!(
                    "RPE {rpe} was within the {}-{} target. Add a small increment of {} lbs.",
                    target.low,
                    target.high,
                    increment / 2.0
                ),
            ),
            _ => (
                weight,
                input.current_reps,
                "Log RPE for personalized suggestions.".to_string(),
            ),
        },
    };

    ProgressionSuggestion {
        model,
        current_weight: weight,
        current_reps: input.current_reps,
        suggested_weight: round_to_plate(suggested_weight),
        suggested_reps,
        reasoning,
    }
}

/// Best estimated 1RM within one training week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBest {
    pub week_start: NaiveDate,
    pub e1rm: f64,
}

/// Group valid, timestamped sets into Monday-based weeks, keeping the best e1RM of each week.
#[must_use]
pub fn weekly_bests(sets: &[SetRecord]) -> Vec<WeeklyBest> {
    let mut result: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for set in sets.iter().filter(|s| s.is_valid()) {
        let Some(performed_at) = set.performed_at else {
            continue;
        };
        let date = performed_at.date();
        let week_start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        let e1rm = set.one_rep_max().estimated_1rm;
        result
            .entry(week_start)
            .and_modify(|best| *best = best.max(e1rm))
            .or_insert(e1rm);
    }
    result
        .into_iter()
        .map(|(week_start, e1rm)| WeeklyBest { week_start, e1rm })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plateau {
    #[serde(rename = "plateau")]
    pub is_plateau: bool,
    pub weeks_stagnant: u32,
    pub recent_best: f64,
    pub previous_best: f64,
}

/// Detect stagnation in a chronologically ordered e1RM history.
///
/// The best value of the last `window_weeks` entries is compared to the best
/// value before them. `weeks_stagnant` counts, starting from the newest entry,
/// how many consecutive older entries were at least as high as the best seen so far.
#[must_use]
pub fn detect_plateau(history: &[WeeklyBest], window_weeks: usize) -> Plateau {
    if window_weeks == 0 || history.len() < window_weeks {
        return Plateau::default();
    }

    let (previous, recent) = history.split_at(history.len() - window_weeks);
    let best = |entries: &[WeeklyBest]| entries.iter().map(|w| w.e1rm).fold(0.0, f64::max);
    let recent_best = best(recent);
    let previous_best = best(previous);

    let mut weeks_stagnant = 0;
    let mut values = history.iter().rev().map(|w| w.e1rm);
    if let Some(mut running_best) = values.next() {
        for value in values {
            if value < running_best {
                break;
            }
            weeks_stagnant += 1;
            running_best = value;
        }
    }

    Plateau {
        is_plateau: previous_best > 0.0 && recent_best <= previous_best,
        weeks_stagnant,
        recent_best,
        previous_best,
    }
}
