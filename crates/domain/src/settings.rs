use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_PLATEAU_WINDOW_WEEKS, LandmarkOverrides, Lifts, PLATE_INCREMENT, PercentileRank,
    PercentileTable, Plateau, ProgressionInput, Sex, TargetRatios, VolumeLandmarkStatus,
    VolumeLandmarks, Vo2maxProfile, WeakPointAnalysis, WeeklyBest, analyze_weak_points,
    analyze_weekly_volume, detect_plateau, get_volume_landmarks, get_vo2max_percentile,
    normalize_muscle_group, vo2max_profile,
};

/// User-adjustable parameters of the analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub landmark_overrides: BTreeMap<String, LandmarkOverrides>,
    pub target_ratios: TargetRatios,
    pub percentile_table: PercentileTable,
    pub weight_increment: f64,
    pub window_weeks: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            landmark_overrides: BTreeMap::new(),
            target_ratios: TargetRatios::default(),
            percentile_table: PercentileTable::default(),
            weight_increment: PLATE_INCREMENT,
            window_weeks: DEFAULT_PLATEAU_WINDOW_WEEKS,
        }
    }
}

impl Settings {
    /// Parse and validate settings. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.landmark_overrides = settings
            .landmark_overrides
            .into_iter()
            .map(|(group, overrides)| (normalize_muscle_group(&group), overrides))
            .collect();
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (group, overrides) in &self.landmark_overrides {
            if !get_volume_landmarks(group, Some(overrides)).is_ascending() {
                warn!("rejecting volume landmark overrides for {group}");
                return Err(SettingsError::InvalidLandmarks(group.clone()));
            }
        }
        let ratios = &self.target_ratios;
        if [ratios.bench, ratios.deadlift, ratios.ohp, ratios.row]
            .iter()
            .any(|r| *r <= 0.0)
        {
            return Err(SettingsError::InvalidTargetRatio);
        }
        if self.weight_increment <= 0.0 || !self.weight_increment.is_finite() {
            return Err(SettingsError::InvalidWeightIncrement);
        }
        if self.window_weeks == 0 {
            return Err(SettingsError::InvalidWindow);
        }
        if !self.percentile_table.is_valid() {
            warn!("rejecting percentile table");
            return Err(SettingsError::InvalidPercentileTable);
        }
        Ok(())
    }

    #[must_use]
    pub fn volume_landmarks(&self, muscle_group: &str) -> VolumeLandmarks {
        get_volume_landmarks(
            muscle_group,
            self.landmark_overrides
                .get(&normalize_muscle_group(muscle_group)),
        )
    }

    #[must_use]
    pub fn analyze_weekly_volume(
        &self,
        weekly_sets: &BTreeMap<String, u32>,
    ) -> Vec<VolumeLandmarkStatus> {
        analyze_weekly_volume(weekly_sets, &self.landmark_overrides)
    }

    /// Progression input using the configured weight increment.
    #[must_use]
    pub fn progression_input(
        &self,
        current_weight: f64,
        current_reps: u32,
        target_rep_low: u32,
        target_rep_high: u32,
    ) -> ProgressionInput {
        ProgressionInput::new(
            current_weight,
            current_reps,
            target_rep_low,
            target_rep_high,
            self.weight_increment,
        )
    }

    #[must_use]
    pub fn detect_plateau(&self, history: &[WeeklyBest]) -> Plateau {
        detect_plateau(history, self.window_weeks)
    }

    #[must_use]
    pub fn analyze_weak_points(&self, lifts: &Lifts) -> Vec<WeakPointAnalysis> {
        analyze_weak_points(lifts, &self.target_ratios)
    }

    #[must_use]
    pub fn vo2max_percentile(&self, vo2max: f64, age: u32, sex: Sex) -> Option<PercentileRank> {
        get_vo2max_percentile(vo2max, age, sex, &self.percentile_table)
    }

    #[must_use]
    pub fn vo2max_profile(&self, vo2max: f64, age: u32, sex: Sex) -> Option<Vo2maxProfile> {
        vo2max_profile(vo2max, age, sex, &self.percentile_table)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("volume landmarks of {0} are not ascending")]
    InvalidLandmarks(String),
    #[error("target ratios must be positive")]
    InvalidTargetRatio,
    #[error("weight increment must be positive")]
    InvalidWeightIncrement,
    #[error("plateau window must span at least one week")]
    InvalidWindow,
    #[error("percentile table must contain ascending reference points")]
    InvalidPercentileTable,
}
