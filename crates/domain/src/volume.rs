use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{ExerciseID, RPE, SetRecord};

/// Weekly set-count landmarks for a muscle group, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeLandmarks {
    pub mev: u32,
    pub mav_low: u32,
    pub mav_high: u32,
    pub mrv: u32,
}

impl VolumeLandmarks {
    pub const GENERIC: VolumeLandmarks = VolumeLandmarks::new(6, 10, 16, 20);

    #[must_use]
    pub const fn new(mev: u32, mav_low: u32, mav_high: u32, mrv: u32) -> Self {
        Self {
            mev,
            mav_low,
            mav_high,
            mrv,
        }
    }

    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.mev <= self.mav_low && self.mav_low <= self.mav_high && self.mav_high <= self.mrv
    }

    #[must_use]
    pub fn with_overrides(self, overrides: &LandmarkOverrides) -> Self {
        Self {
            mev: overrides.mev.unwrap_or(self.mev),
            mav_low: overrides.mav_low.unwrap_or(self.mav_low),
            mav_high: overrides.mav_high.unwrap_or(self.mav_high),
            mrv: overrides.mrv.unwrap_or(self.mrv),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkOverrides {
    #[serde(default)]
    pub mev: Option<u32>,
    #[serde(default)]
    pub mav_low: Option<u32>,
    #[serde(default)]
    pub mav_high: Option<u32>,
    #[serde(default)]
    pub mrv: Option<u32>,
}

static DEFAULT_LANDMARKS: [(&str, VolumeLandmarks); 14] = [
    ("chest", VolumeLandmarks::new(8, 12, 20, 22)),
    ("back", VolumeLandmarks::new(10, 14, 22, 25)),
    ("shoulders", VolumeLandmarks::new(8, 16, 22, 26)),
    ("front_delts", VolumeLandmarks::new(0, 6, 8, 12)),
    ("rear_delts", VolumeLandmarks::new(6, 12, 18, 22)),
    ("biceps", VolumeLandmarks::new(8, 14, 20, 26)),
    ("triceps", VolumeLandmarks::new(6, 10, 14, 18)),
    ("quads", VolumeLandmarks::new(8, 12, 18, 20)),
    ("hamstrings", VolumeLandmarks::new(6, 10, 16, 20)),
    ("glutes", VolumeLandmarks::new(0, 4, 12, 16)),
    ("calves", VolumeLandmarks::new(8, 12, 16, 20)),
    ("abs", VolumeLandmarks::new(0, 16, 20, 25)),
    ("traps", VolumeLandmarks::new(0, 12, 20, 26)),
    ("forearms", VolumeLandmarks::new(2, 10, 16, 25)),
];

#[must_use]
pub fn normalize_muscle_group(muscle_group: &str) -> String {
    muscle_group
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn display_name(muscle_group: &str) -> String {
    normalize_muscle_group(muscle_group).replace('_', " ")
}

#[must_use]
pub fn get_volume_landmarks(
    muscle_group: &str,
    overrides: Option<&LandmarkOverrides>,
) -> VolumeLandmarks {
    let key = normalize_muscle_group(muscle_group);
    let defaults = DEFAULT_LANDMARKS
        .iter()
        .find(|(group, _)| *group == key)
        .map_or_else(
            || {
                debug!("no default volume landmarks for {key}, using generic landmarks");
                VolumeLandmarks::GENERIC
            },
            |(_, landmarks)| *landmarks,
        );
    match overrides {
        Some(overrides) => defaults.with_overrides(overrides),
        None => defaults,
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VolumeStatus {
    BelowMev,
    ApproachingMev,
    InMav,
    ApproachingMrv,
    OverMrv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeLandmarkStatus {
    pub muscle_group: String,
    pub weekly_sets: u32,
    pub landmarks: VolumeLandmarks,
    pub status: VolumeStatus,
    pub percentage: f64,
    pub recommendation: String,
}

#[must_use]
pub fn analyze_volume_status(
    weekly_sets: u32,
    landmarks: &VolumeLandmarks,
    muscle_group: &str,
) -> VolumeLandmarkStatus {
    let percentage = if landmarks.mrv == landmarks.mev {
        0.0
    } else {
        ((f64::from(weekly_sets) - f64::from(landmarks.mev))
            / (f64::from(landmarks.mrv) - f64::from(landmarks.mev))
            * 100.0)
            .round()
            .max(0.0)
    };

    let status = if weekly_sets < landmarks.mev {
        VolumeStatus::BelowMev
    } else if weekly_sets < landmarks.mev.saturating_add(2) {
        VolumeStatus::ApproachingMev
    } else if weekly_sets <= landmarks.mav_high {
        VolumeStatus::InMav
    } else if weekly_sets <= landmarks.mrv {
        VolumeStatus::ApproachingMrv
    } else {
        VolumeStatus::OverMrv
    };

    let name = display_name(muscle_group);
    let recommendation = match status {
        VolumeStatus::BelowMev => {
            let deficit = landmarks.mev - weekly_sets;
            format!(
                "Add {deficit} more {} per week for {name} to reach the minimum effective volume.",
                if deficit == 1 { "set" } else { "sets" }
            )
        }
        VolumeStatus::ApproachingMev => format!(
            "{name} volume is just above the minimum effective volume. \
             Add 1-2 sets per week for more growth."
        ),
        VolumeStatus::InMav => format!(
            "{name} volume is in the productive range. Maintain or progress gradually."
        ),
        VolumeStatus::ApproachingMrv => format!(
            "{name} volume is close to your recoverable limit. Monitor recovery before adding sets."
        ),
        VolumeStatus::OverMrv => {
            let excess = weekly_sets - landmarks.mrv;
            format!(
                "{name} volume exceeds your recoverable limit by {excess} {}. \
                 Reduce volume or plan a deload.",
                if excess == 1 { "set" } else { "sets" }
            )
        }
    };

    VolumeLandmarkStatus {
        muscle_group: normalize_muscle_group(muscle_group),
        weekly_sets,
        landmarks: *landmarks,
        status,
        percentage,
        recommendation,
    }
}

/// Count the hard sets per muscle group.
///
/// Only valid sets count, and a set with effort data only counts if its
/// effective RPE is at least 7.
#[must_use]
pub fn weekly_sets_per_muscle_group(
    sets: &[SetRecord],
    muscle_groups: &BTreeMap<ExerciseID, Vec<String>>,
) -> BTreeMap<String, u32> {
    let mut result: BTreeMap<String, u32> = BTreeMap::new();
    for set in sets {
        if !set.is_valid() || set.effective_rpe() < f64::from(RPE::SEVEN) {
            continue;
        }
        match muscle_groups.get(&set.exercise_id) {
            Some(groups) => {
                for group in groups {
                    *result.entry(normalize_muscle_group(group)).or_insert(0) += 1;
                }
            }
            None => debug!("no muscle groups tagged for exercise {}", set.exercise_id),
        }
    }
    result
}

/// Classify each muscle group's weekly set count, applying any per-group overrides.
#[must_use]
pub fn analyze_weekly_volume(
    weekly_sets: &BTreeMap<String, u32>,
    overrides: &BTreeMap<String, LandmarkOverrides>,
) -> Vec<VolumeLandmarkStatus> {
    weekly_sets
        .iter()
        .map(|(group, sets)| {
            let key = normalize_muscle_group(group);
            let landmarks = get_volume_landmarks(&key, overrides.get(&key));
            analyze_volume_status(*sets, &landmarks, &key)
        })
        .collect()
}
