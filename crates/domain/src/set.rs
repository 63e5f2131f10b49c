use chrono::NaiveDateTime;
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EffectiveReps, OneRepMax, RIR, RPE, calculate_1rm, calculate_effective_reps, effective_rpe,
};

#[derive(
    Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A single performed (or planned) set as supplied by the caller.
///
/// Weights are in lbs. A set only takes part in any calculation once it is
/// completed and carries a positive weight and rep count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub exercise_id: ExerciseID,
    pub weight: f64,
    pub reps: u32,
    #[serde(default)]
    pub rpe: Option<RPE>,
    #[serde(default)]
    pub rir: Option<RIR>,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub performed_at: Option<NaiveDateTime>,
}

impl SetRecord {
    #[must_use]
    pub fn new(exercise_id: ExerciseID, weight: f64, reps: u32) -> Self {
        Self {
            exercise_id,
            weight,
            reps,
            rpe: None,
            rir: None,
            time: None,
            completed: true,
            performed_at: None,
        }
    }

    #[must_use]
    pub fn with_rpe(mut self, rpe: RPE) -> Self {
        self.rpe = Some(rpe);
        self
    }

    #[must_use]
    pub fn with_rir(mut self, rir: RIR) -> Self {
        self.rir = Some(rir);
        self
    }

    #[must_use]
    pub fn performed_at(mut self, performed_at: NaiveDateTime) -> Self {
        self.performed_at = Some(performed_at);
        self
    }

    #[must_use]
    pub fn incomplete(mut self) -> Self {
        self.completed = false;
        self
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.completed && self.weight > 0.0 && self.reps > 0
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }

    #[must_use]
    pub fn one_rep_max(&self) -> OneRepMax {
        calculate_1rm(self.weight, self.reps)
    }

    #[must_use]
    pub fn effective_rpe(&self) -> f64 {
        effective_rpe(self.rpe.map(f64::from), self.rir.map(f64::from))
    }

    #[must_use]
    pub fn effective_reps(&self) -> EffectiveReps {
        calculate_effective_reps(
            self.reps,
            self.rpe.map(f64::from),
            self.rir.map(f64::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_exercise_id_nil() {
        assert!(ExerciseID::nil().is_nil());
        assert_eq!(ExerciseID::nil(), ExerciseID::default());
        assert!(!ExerciseID::from(1).is_nil());
    }

    #[rstest]
    #[case::valid(SetRecord::new(1.into(), 135.0, 5), true)]
    #[case::incomplete(SetRecord::new(1.into(), 135.0, 5).incomplete(), false)]
    #[case::no_weight(SetRecord::new(1.into(), 0.0, 5), false)]
    #[case::negative_weight(SetRecord::new(1.into(), -5.0, 5), false)]
    #[case::no_reps(SetRecord::new(1.into(), 135.0, 0), false)]
    fn test_set_record_is_valid(#[case] set: SetRecord, #[case] expected: bool) {
        assert_eq!(set.is_valid(), expected);
    }

    #[test]
    fn test_set_record_derived_values() {
        let set = SetRecord::new(1.into(), 135.0, 8).with_rir(RIR::new(2.0).unwrap());
        assert_eq!(set.volume(), 1080.0);
        assert_eq!(set.effective_rpe(), 8.0);
        assert_eq!(set.effective_reps().effective_reps, 4);
        assert_eq!(set.one_rep_max().estimated_1rm, 169.3);
    }

    #[test]
    fn test_set_record_deserialization() {
        let set: SetRecord = serde_json::from_str(
            r#"{
                "exerciseId": "00000000-0000-0000-0000-000000000001",
                "weight": 225.0,
                "reps": 5,
                "rpe": 8.5,
                "completed": true,
                "performedAt": "2024-03-04T18:30:00"
            }"#,
        )
        .unwrap();
        assert_eq!(
            set,
            SetRecord::new(1.into(), 225.0, 5)
                .with_rpe(RPE::new(8.5).unwrap())
                .performed_at(
                    NaiveDate::from_ymd_opt(2024, 3, 4)
                        .unwrap()
                        .and_hms_opt(18, 30, 0)
                        .unwrap()
                )
        );
    }

    #[rstest]
    #[case::rpe_out_of_range(r#""rpe": 42"#)]
    #[case::negative_rpe(r#""rpe": -3"#)]
    #[case::rpe_resolution(r#""rpe": 8.2"#)]
    #[case::rir_out_of_range(r#""rir": 11"#)]
    fn test_set_record_deserialization_rejects_invalid_effort(#[case] effort: &str) {
        let json = format!(
            r#"{{"exerciseId": "00000000-0000-0000-0000-000000000001",
                "weight": 225.0, "reps": 5, "completed": true, {effort}}}"#
        );
        assert!(serde_json::from_str::<SetRecord>(&json).is_err());
    }

    #[test]
    fn test_set_record_effort_serialization() {
        let set = SetRecord::new(1.into(), 225.0, 5)
            .with_rpe(RPE::new(8.5).unwrap())
            .with_rir(RIR::new(1.5).unwrap());
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["rpe"], 8.5);
        assert_eq!(value["rir"], 1.5);
        assert_eq!(set.effective_rpe(), 8.5);
        assert_eq!(set.effective_reps().rir, 1.5);
    }
}
