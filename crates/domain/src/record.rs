use std::{collections::BTreeMap, fmt};

use log::trace;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumString};

use crate::{ExerciseID, SetRecord, calculate_1rm, round_to_decimals, round_to_plate};

/// Load bucket used to compare rep counts, a weight rounded to the nearest 2.5.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeightBucket(u32);

impl WeightBucket {
    #[must_use]
    pub fn from_weight(weight: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self((round_to_plate(weight.max(0.0)) * 10.0).round() as u32)
    }

    #[must_use]
    pub fn weight(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for WeightBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weight())
    }
}

impl Serialize for WeightBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeightBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value
            .trim()
            .parse::<f64>()
            .map(WeightBucket::from_weight)
            .map_err(serde::de::Error::custom)
    }
}

/// Best performances of one exercise, the baseline for PR detection.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseBests {
    #[serde(default)]
    pub max_weight: Option<f64>,
    #[serde(default)]
    pub max_reps: Option<u32>,
    #[serde(default)]
    pub max_volume: Option<f64>,
    #[serde(default, rename = "best1RM")]
    pub best_1rm: Option<f64>,
    #[serde(default)]
    pub max_reps_at_weight: BTreeMap<WeightBucket, u32>,
}

impl ExerciseBests {
    /// Return the snapshot updated with a newly performed set.
    #[must_use]
    pub fn record(&self, weight: f64, reps: u32) -> Self {
        let mut bests = self.clone();
        bests.update(weight, reps);
        bests
    }

    fn update(&mut self, weight: f64, reps: u32) {
        if weight <= 0.0 || reps == 0 {
            return;
        }
        let volume = weight * f64::from(reps);
        let e1rm = calculate_1rm(weight, reps).estimated_1rm;

        self.max_weight = Some(self.max_weight.map_or(weight, |w| w.max(weight)));
        self.max_reps = Some(self.max_reps.map_or(reps, |r| r.max(reps)));
        self.max_volume = Some(self.max_volume.map_or(volume, |v| v.max(volume)));
        self.best_1rm = Some(self.best_1rm.map_or(e1rm, |e| e.max(e1rm)));
        self.max_reps_at_weight
            .entry(WeightBucket::from_weight(weight))
            .and_modify(|r| *r = (*r).max(reps))
            .or_insert(reps);
    }

    #[must_use]
    pub fn reps_at_weight(&self, weight: f64) -> Option<u32> {
        self.max_reps_at_weight
            .get(&WeightBucket::from_weight(weight))
            .copied()
    }
}

/// Fold a complete set history into a bests snapshot, ignoring incomplete or invalid sets.
#[must_use]
pub fn build_exercise_bests(history: &[SetRecord]) -> ExerciseBests {
    history
        .iter()
        .fold(ExerciseBests::default(), |mut bests, set| {
            if set.is_valid() {
                bests.update(set.weight, set.reps);
            } else {
                trace!(
                    "skipping set of {} x {} (completed: {})",
                    set.weight, set.reps, set.completed
                );
            }
            bests
        })
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PRType {
    Weight,
    Reps,
    Volume,
    E1rm,
}

impl PRType {
    /// Types in decreasing order of significance.
    pub const PRIORITY: [PRType; 4] = [PRType::E1rm, PRType::Weight, PRType::Reps, PRType::Volume];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    #[serde(rename = "type")]
    pub pr_type: PRType,
    pub exercise_id: ExerciseID,
    pub exercise_name: String,
    pub previous_value: f64,
    pub new_value: f64,
    pub improvement_percent: f64,
    pub weight: f64,
    pub reps: u32,
}

fn improvement_percent(previous: f64, new: f64) -> f64 {
    if previous > 0.0 {
        round_to_decimals((new - previous) / previous * 100.0, 1)
    } else {
        100.0
    }
}

/// Check a completed set against the previous bests.
///
/// Weight and e1RM PRs are also awarded for the first set of an exercise. A
/// reps PR requires an earlier set in the same weight bucket.
#[must_use]
pub fn detect_prs(
    exercise_id: ExerciseID,
    exercise_name: &str,
    weight: f64,
    reps: u32,
    previous_bests: &ExerciseBests,
) -> Vec<PersonalRecord> {
    if weight <= 0.0 || reps == 0 {
        return vec![];
    }

    let pr = |pr_type: PRType, previous_value: f64, new_value: f64| PersonalRecord {
        pr_type,
        exercise_id,
        exercise_name: exercise_name.to_string(),
        previous_value,
        new_value,
        improvement_percent: improvement_percent(previous_value, new_value),
        weight,
        reps,
    };

    let mut records = vec![];

    match previous_bests.max_weight {
        Some(max_weight) if weight > max_weight => {
            records.push(pr(PRType::Weight, max_weight, weight));
        }
        None => records.push(pr(PRType::Weight, 0.0, weight)),
        Some(_) => {}
    }

    if let Some(previous_reps) = previous_bests.reps_at_weight(weight) {
        if reps > previous_reps {
            records.push(pr(
                PRType::Reps,
                f64::from(previous_reps),
                f64::from(reps),
            ));
        }
    }

    let volume = weight * f64::from(reps);
    if let Some(max_volume) = previous_bests.max_volume {
        if volume > max_volume {
            records.push(pr(PRType::Volume, max_volume, volume));
        }
    }

    let e1rm = calculate_1rm(weight, reps).estimated_1rm;
    match previous_bests.best_1rm {
        Some(best_1rm) if e1rm > best_1rm => records.push(pr(PRType::E1rm, best_1rm, e1rm)),
        None if e1rm > 0.0 => records.push(pr(PRType::E1rm, 0.0, e1rm)),
        _ => {}
    }

    records
}

/// Detect PRs and return them together with the bests updated by the set.
#[must_use]
pub fn detect_prs_and_update(
    exercise_id: ExerciseID,
    exercise_name: &str,
    weight: f64,
    reps: u32,
    previous_bests: &ExerciseBests,
) -> (Vec<PersonalRecord>, ExerciseBests) {
    (
        detect_prs(exercise_id, exercise_name, weight, reps, previous_bests),
        previous_bests.record(weight, reps),
    )
}

#[must_use]
pub fn most_significant_pr(records: &[PersonalRecord]) -> Option<&PersonalRecord> {
    PRType::PRIORITY
        .iter()
        .find_map(|pr_type| records.iter().find(|r| r.pr_type == *pr_type))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn types(records: &[PersonalRecord]) -> Vec<PRType> {
        records.iter().map(|r| r.pr_type).collect()
    }

    #[test]
    fn test_detect_prs_first_set() {
        let records = detect_prs(1.into(), "Bench Press", 135.0, 5, &ExerciseBests::default());
        assert_eq!(types(&records), vec![PRType::Weight, PRType::E1rm]);
        for record in &records {
            assert_eq!(record.previous_value, 0.0);
            assert_eq!(record.improvement_percent, 100.0);
            assert_eq!(record.exercise_name, "Bench Press");
        }
        assert_eq!(records[1].new_value, 151.9);
    }

    #[test]
    fn test_detect_prs_lighter_set() {
        let bests = ExerciseBests {
            max_weight: Some(315.0),
            max_reps: Some(10),
            max_volume: Some(2000.0),
            best_1rm: Some(240.0),
            max_reps_at_weight: BTreeMap::new(),
        };
        let records = detect_prs(1.into(), "Squat", 225.0, 5, &bests);
        assert_eq!(types(&records), vec![PRType::E1rm]);
        assert_eq!(records[0].previous_value, 240.0);
        assert_eq!(records[0].new_value, 253.1);
        assert_eq!(records[0].improvement_percent, 5.5);
    }

    #[rstest]
    #[case::more_reps(225.0, 7, vec![PRType::Reps, PRType::E1rm])]
    #[case::same_bucket(226.0, 7, vec![PRType::Reps, PRType::E1rm])]
    #[case::volume(185.0, 11, vec![PRType::Reps, PRType::Volume])]
    #[case::equal_reps(225.0, 6, vec![])]
    #[case::new_bucket(230.0, 3, vec![])]
    #[case::heavier(245.0, 1, vec![PRType::Weight])]
    fn test_detect_prs_against_history(
        #[case] weight: f64,
        #[case] reps: u32,
        #[case] expected: Vec<PRType>,
    ) {
        let history = vec![
            SetRecord::new(1.into(), 225.0, 6),
            SetRecord::new(1.into(), 240.0, 2),
            SetRecord::new(1.into(), 185.0, 10),
        ];
        let bests = build_exercise_bests(&history);
        assert_eq!(
            types(&detect_prs(1.into(), "Squat", weight, reps, &bests)),
            expected
        );
    }

    #[rstest]
    #[case(0.0, 5)]
    #[case(-45.0, 5)]
    #[case(135.0, 0)]
    fn test_detect_prs_invalid_set(#[case] weight: f64, #[case] reps: u32) {
        assert_eq!(
            detect_prs(1.into(), "Row", weight, reps, &ExerciseBests::default()),
            vec![]
        );
    }

    #[test]
    fn test_build_exercise_bests() {
        let history = vec![
            SetRecord::new(1.into(), 135.0, 10),
            SetRecord::new(1.into(), 185.0, 5),
            SetRecord::new(1.into(), 186.0, 6),
            SetRecord::new(1.into(), 225.0, 1),
            SetRecord::new(1.into(), 315.0, 1).incomplete(),
            SetRecord::new(1.into(), 0.0, 20),
            SetRecord::new(1.into(), 100.0, 0),
        ];
        assert_eq!(
            build_exercise_bests(&history),
            ExerciseBests {
                max_weight: Some(225.0),
                max_reps: Some(10),
                max_volume: Some(1350.0),
                best_1rm: Some(225.0),
                max_reps_at_weight: BTreeMap::from([
                    (WeightBucket::from_weight(135.0), 10),
                    (WeightBucket::from_weight(185.0), 6),
                    (WeightBucket::from_weight(225.0), 1),
                ]),
            }
        );
    }

    #[test]
    fn test_build_exercise_bests_empty() {
        assert_eq!(build_exercise_bests(&[]), ExerciseBests::default());
    }

    #[test]
    fn test_detect_prs_and_update_prevents_duplicates() {
        let bests = ExerciseBests::default();
        let (first, bests) = detect_prs_and_update(1.into(), "Deadlift", 315.0, 3, &bests);
        assert_eq!(types(&first), vec![PRType::Weight, PRType::E1rm]);
        let (second, bests) = detect_prs_and_update(1.into(), "Deadlift", 315.0, 3, &bests);
        assert_eq!(second, vec![]);
        let (third, _) = detect_prs_and_update(1.into(), "Deadlift", 315.0, 4, &bests);
        assert_eq!(
            types(&third),
            vec![PRType::Reps, PRType::Volume, PRType::E1rm]
        );
    }

    #[rstest]
    #[case(vec![PRType::Volume, PRType::Reps], Some(PRType::Reps))]
    #[case(vec![PRType::Weight, PRType::Volume, PRType::E1rm], Some(PRType::E1rm))]
    #[case(vec![PRType::Volume, PRType::Weight], Some(PRType::Weight))]
    #[case(vec![PRType::Volume], Some(PRType::Volume))]
    #[case(vec![], None)]
    fn test_most_significant_pr(#[case] pr_types: Vec<PRType>, #[case] expected: Option<PRType>) {
        let records = pr_types
            .into_iter()
            .map(|pr_type| PersonalRecord {
                pr_type,
                exercise_id: 1.into(),
                exercise_name: "Bench Press".to_string(),
                previous_value: 100.0,
                new_value: 110.0,
                improvement_percent: 10.0,
                weight: 100.0,
                reps: 5,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            most_significant_pr(&records).map(|r| r.pr_type),
            expected
        );
    }

    #[rstest]
    #[case(135.0, "135")]
    #[case(136.0, "135")]
    #[case(137.0, "137.5")]
    #[case(-5.0, "0")]
    fn test_weight_bucket(#[case] weight: f64, #[case] expected: &str) {
        assert_eq!(WeightBucket::from_weight(weight).to_string(), expected);
    }

    #[test]
    fn test_exercise_bests_serialization() {
        let bests = build_exercise_bests(&[
            SetRecord::new(1.into(), 137.5, 8),
            SetRecord::new(1.into(), 135.0, 10),
        ]);
        let value = serde_json::to_value(&bests).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "maxWeight": 137.5,
                "maxReps": 10,
                "maxVolume": 1350.0,
                "best1RM": 180.0,
                "maxRepsAtWeight": { "135": 10, "137.5": 8 }
            })
        );
        assert_eq!(
            serde_json::from_value::<ExerciseBests>(value).unwrap(),
            bests
        );
    }

    #[test]
    fn test_personal_record_serialization() {
        let records = detect_prs(1.into(), "Bench Press", 135.0, 5, &ExerciseBests::default());
        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["type"], "weight");
        assert_eq!(value["exerciseName"], "Bench Press");
        assert_eq!(value["improvementPercent"], 100.0);
    }
}
