use log::debug;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::round_to_decimals;

/// Relative deviation from the expected ratio beyond which a lift is out of balance.
const BALANCE_TOLERANCE: f64 = 0.10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
    Ohp,
    Row,
}

impl Lift {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::Bench => "Bench Press",
            Lift::Deadlift => "Deadlift",
            Lift::Ohp => "Overhead Press",
            Lift::Row => "Row",
        }
    }
}

/// Current estimated 1RMs of the compared lifts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifts {
    #[serde(default)]
    pub squat: Option<f64>,
    #[serde(default)]
    pub bench: Option<f64>,
    #[serde(default)]
    pub deadlift: Option<f64>,
    #[serde(default)]
    pub ohp: Option<f64>,
    #[serde(default)]
    pub row: Option<f64>,
}

/// Expected ratio of each lift to the squat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetRatios {
    pub bench: f64,
    pub deadlift: f64,
    pub ohp: f64,
    pub row: f64,
}

impl Default for TargetRatios {
    fn default() -> Self {
        Self {
            bench: 0.75,
            deadlift: 1.2,
            ohp: 0.45,
            row: 0.6,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BalanceStatus {
    Weak,
    Balanced,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakPointAnalysis {
    pub lift: Lift,
    #[serde(rename = "current1RM")]
    pub current_1rm: f64,
    pub expected_ratio: f64,
    pub actual_ratio: f64,
    pub status: BalanceStatus,
    pub recommendation: String,
}

/// Compare each accessory lift to the squat.
///
/// Returns nothing without a positive squat. Lifts that are missing are skipped.
#[must_use]
pub fn analyze_weak_points(lifts: &Lifts, target_ratios: &TargetRatios) -> Vec<WeakPointAnalysis> {
    let Some(squat) = lifts.squat.filter(|s| *s > 0.0) else {
        debug!("no squat available as reference lift");
        return vec![];
    };

    [
        (Lift::Bench, lifts.bench, target_ratios.bench),
        (Lift::Deadlift, lifts.deadlift, target_ratios.deadlift),
        (Lift::Ohp, lifts.ohp, target_ratios.ohp),
        (Lift::Row, lifts.row, target_ratios.row),
    ]
    .into_iter()
    .filter_map(|(lift, current, expected_ratio)| {
        let current = current?;
        if expected_ratio <= 0.0 {
            debug!("ignoring non-positive target ratio for {lift}");
            return None;
        }
        let actual_ratio = current / squat;
        let deviation = (actual_ratio - expected_ratio) / expected_ratio;
        let status = if deviation > BALANCE_TOLERANCE {
            BalanceStatus::Strong
        } else if deviation < -BALANCE_TOLERANCE {
            BalanceStatus::Weak
        } else {
            BalanceStatus::Balanced
        };
        let recommendation = match status {
            BalanceStatus::Weak => format!(
                "{} is lagging behind your squat ({actual_ratio:.2}x vs {expected_ratio:.2}x \
                 expected). Prioritize it with extra volume or frequency.",
                lift.name()
            ),
            BalanceStatus::Balanced => {
                format!("{} is well balanced with your squat.", lift.name())
            }
            BalanceStatus::Strong => format!(
                "{} is strong relative to your squat ({actual_ratio:.2}x vs {expected_ratio:.2}x \
                 expected). Your squat may be the lift holding you back.",
                lift.name()
            ),
        };
        Some(WeakPointAnalysis {
            lift,
            current_1rm: current,
            expected_ratio,
            actual_ratio: round_to_decimals(actual_ratio, 2),
            status,
            recommendation,
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_analyze_weak_points() {
        let lifts = Lifts {
            squat: Some(300.0),
            bench: Some(225.0),
            deadlift: Some(400.0),
            ohp: Some(120.0),
            row: None,
        };
        let result = analyze_weak_points(&lifts, &TargetRatios::default());
        assert_eq!(
            result
                .iter()
                .map(|r| (r.lift, r.actual_ratio, r.status))
                .collect::<Vec<_>>(),
            vec![
                (Lift::Bench, 0.75, BalanceStatus::Balanced),
                (Lift::Deadlift, 1.33, BalanceStatus::Strong),
                (Lift::Ohp, 0.4, BalanceStatus::Weak),
            ]
        );
        assert!(result[2].recommendation.starts_with("Overhead Press is lagging"));
    }

    #[rstest]
    #[case::no_squat(None)]
    #[case::zero_squat(Some(0.0))]
    fn test_analyze_weak_points_without_reference(#[case] squat: Option<f64>) {
        let lifts = Lifts {
            squat,
            bench: Some(225.0),
            ..Lifts::default()
        };
        assert_eq!(analyze_weak_points(&lifts, &TargetRatios::default()), vec![]);
    }

    #[rstest]
    #[case::upper_edge(329.0, BalanceStatus::Balanced)]
    #[case::above(331.0, BalanceStatus::Strong)]
    #[case::lower_edge(271.0, BalanceStatus::Balanced)]
    #[case::below(269.0, BalanceStatus::Weak)]
    fn test_analyze_weak_points_tolerance(#[case] row: f64, #[case] expected: BalanceStatus) {
        let lifts = Lifts {
            squat: Some(500.0),
            row: Some(row),
            ..Lifts::default()
        };
        let result = analyze_weak_points(&lifts, &TargetRatios::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, expected);
    }

    #[test]
    fn test_weak_point_analysis_serialization() {
        let lifts = Lifts {
            squat: Some(400.0),
            bench: Some(300.0),
            ..Lifts::default()
        };
        let value = serde_json::to_value(&analyze_weak_points(&lifts, &TargetRatios::default())[0])
            .unwrap();
        assert_eq!(value["lift"], "bench");
        assert_eq!(value["current1RM"], 300.0);
        assert_eq!(value["expectedRatio"], 0.75);
        assert_eq!(value["actualRatio"], 0.75);
        assert_eq!(value["status"], "balanced");
    }
}
