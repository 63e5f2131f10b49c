use std::fmt;

use serde::{Deserialize, Serialize};

/// RPE assumed for a set logged without any effort data.
pub const DEFAULT_RPE: f64 = 7.5;

#[must_use]
pub fn rir_to_rpe(rir: f64) -> f64 {
    (10.0 - rir).clamp(1.0, 10.0)
}

#[must_use]
pub fn rpe_to_rir(rpe: f64) -> f64 {
    (10.0 - rpe).clamp(0.0, 10.0)
}

/// An explicit RPE takes precedence over one derived from RIR.
#[must_use]
pub fn effective_rpe(rpe: Option<f64>, rir: Option<f64>) -> f64 {
    rpe.or_else(|| rir.map(rir_to_rpe)).unwrap_or(DEFAULT_RPE)
}

#[must_use]
#[allow(clippy::if_same_then_else)]
pub fn max_stimulating_reps(rpe: f64) -> u32 {
    if rpe >= 10.0 {
        5
    } else if rpe >= 9.0 {
        5
    } else if rpe >= 8.0 {
        4
    } else if rpe >= 7.0 {
        3
    } else if rpe >= 6.0 {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveReps {
    pub total_reps: u32,
    pub effective_reps: u32,
    pub rpe: f64,
    pub rir: f64,
}

/// Count the reps close enough to failure to be considered stimulating.
#[must_use]
pub fn calculate_effective_reps(reps: u32, rpe: Option<f64>, rir: Option<f64>) -> EffectiveReps {
    let rpe_value = effective_rpe(rpe, rir);
    let rir_value = rir.unwrap_or_else(|| rpe_to_rir(rpe_value));
    EffectiveReps {
        total_reps: reps,
        effective_reps: reps.min(max_stimulating_reps(rpe_value)),
        rpe: rpe_value,
        rir: rir_value,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct RPE(u8);

impl RPE {
    pub const ONE: RPE = RPE(10);
    pub const SEVEN: RPE = RPE(70);
    pub const EIGHT: RPE = RPE(80);
    pub const TEN: RPE = RPE(100);

    pub fn new(value: f64) -> Result<Self, RPEError> {
        if !(0.0..=10.0).contains(&value) {
            return Err(RPEError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = (value * 10.0).round() as u8;

        if v % 5 != 0 {
            return Err(RPEError::InvalidResolution);
        }

        Ok(Self(v))
    }
}

impl From<RPE> for f64 {
    fn from(value: RPE) -> Self {
        f64::from(value.0) / 10.0
    }
}

impl TryFrom<f64> for RPE {
    type Error = RPEError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        RPE::new(value)
    }
}

impl TryFrom<&str> for RPE {
    type Error = RPEError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f64>() {
            Ok(parsed_value) => RPE::new(parsed_value),
            Err(_) => Err(RPEError::ParseError),
        }
    }
}

impl From<RIR> for RPE {
    fn from(value: RIR) -> Self {
        Self(100_u8.saturating_sub(value.0).max(RPE::ONE.0))
    }
}

impl fmt::Display for RPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f64::from(*self))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RPEError {
    #[error("RPE must be in the range 0.0 to 10.0")]
    OutOfRange,
    #[error("RPE must be a multiple of 0.5")]
    InvalidResolution,
    #[error("RPE must be a decimal")]
    ParseError,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct RIR(u8);

impl RIR {
    pub const FAILURE: RIR = RIR(0);

    pub fn new(value: f64) -> Result<Self, RIRError> {
        if !(0.0..=10.0).contains(&value) {
            return Err(RIRError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = (value * 10.0).round() as u8;

        if v % 5 != 0 {
            return Err(RIRError::InvalidResolution);
        }

        Ok(Self(v))
    }

    /// Map a qualitative effort description to reps in reserve.
    pub fn from_tag(tag: &str) -> Result<Self, RIRError> {
        match tag.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "failure" => Ok(RIR(0)),
            "hard" => Ok(RIR(10)),
            "moderate" => Ok(RIR(20)),
            "easy" => Ok(RIR(30)),
            "very_easy" => Ok(RIR(40)),
            "warmup" | "warm_up" => Ok(RIR(50)),
            _ => Err(RIRError::UnknownTag(tag.to_string())),
        }
    }
}

impl From<RIR> for f64 {
    fn from(value: RIR) -> Self {
        f64::from(value.0) / 10.0
    }
}

impl TryFrom<f64> for RIR {
    type Error = RIRError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        RIR::new(value)
    }
}

impl TryFrom<&str> for RIR {
    type Error = RIRError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f64>() {
            Ok(parsed_value) => RIR::new(parsed_value),
            Err(_) => RIR::from_tag(value),
        }
    }
}

impl From<RPE> for RIR {
    fn from(value: RPE) -> Self {
        Self(100_u8.saturating_sub(value.0))
    }
}

impl fmt::Display for RIR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f64::from(*self))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RIRError {
    #[error("RIR must be in the range 0.0 to 10.0")]
    OutOfRange,
    #[error("RIR must be a multiple of 0.5")]
    InvalidResolution,
    #[error("Unknown RIR description: {0}")]
    UnknownTag(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 10.0)]
    #[case(2.0, 8.0)]
    #[case(9.0, 1.0)]
    #[case(12.0, 1.0)]
    fn test_rir_to_rpe(#[case] rir: f64, #[case] expected: f64) {
        assert_eq!(rir_to_rpe(rir), expected);
    }

    #[rstest]
    #[case(10.0, 0.0)]
    #[case(7.5, 2.5)]
    #[case(0.0, 10.0)]
    #[case(11.0, 0.0)]
    fn test_rpe_to_rir(#[case] rpe: f64, #[case] expected: f64) {
        assert_eq!(rpe_to_rir(rpe), expected);
    }

    #[test]
    fn test_rpe_rir_round_trip() {
        for x in 1..=10 {
            let x = f64::from(x);
            assert_eq!(rir_to_rpe(rpe_to_rir(x)), x);
        }
    }

    #[rstest]
    #[case::rpe_wins(Some(9.0), Some(4.0), 9.0)]
    #[case::from_rir(None, Some(2.0), 8.0)]
    #[case::default(None, None, 7.5)]
    fn test_effective_rpe(
        #[case] rpe: Option<f64>,
        #[case] rir: Option<f64>,
        #[case] expected: f64,
    ) {
        assert_eq!(effective_rpe(rpe, rir), expected);
    }

    #[rstest]
    #[case::failure(10, Some(10.0), None, 5)]
    #[case::rpe_9_5(10, Some(9.5), None, 5)]
    #[case::rpe_9(3, Some(9.0), None, 3)]
    #[case::rpe_8(10, Some(8.0), None, 4)]
    #[case::rpe_7(10, Some(7.0), None, 3)]
    #[case::rpe_6(10, Some(6.0), None, 2)]
    #[case::rpe_5(10, Some(5.0), None, 1)]
    #[case::rir_1(10, None, Some(1.0), 5)]
    #[case::rir_3(10, None, Some(3.0), 3)]
    #[case::default(10, None, None, 3)]
    fn test_calculate_effective_reps(
        #[case] reps: u32,
        #[case] rpe: Option<f64>,
        #[case] rir: Option<f64>,
        #[case] expected: u32,
    ) {
        let result = calculate_effective_reps(reps, rpe, rir);
        assert_eq!(result.total_reps, reps);
        assert_eq!(result.effective_reps, expected);
        assert!(result.effective_reps <= result.total_reps);
    }

    #[test]
    fn test_calculate_effective_reps_derives_missing_values() {
        assert_eq!(
            calculate_effective_reps(8, None, Some(2.0)),
            EffectiveReps {
                total_reps: 8,
                effective_reps: 4,
                rpe: 8.0,
                rir: 2.0,
            }
        );
        assert_eq!(
            calculate_effective_reps(8, Some(9.0), None),
            EffectiveReps {
                total_reps: 8,
                effective_reps: 5,
                rpe: 9.0,
                rir: 1.0,
            }
        );
    }

    #[test]
    fn test_calculate_effective_reps_keeps_given_values() {
        assert_eq!(
            calculate_effective_reps(8, Some(9.0), Some(2.0)),
            EffectiveReps {
                total_reps: 8,
                effective_reps: 5,
                rpe: 9.0,
                rir: 2.0,
            }
        );
    }

    #[rstest]
    #[case(0.0, Ok(RPE(0)))]
    #[case(8.0, Ok(RPE::EIGHT))]
    #[case(9.5, Ok(RPE(95)))]
    #[case(10.0, Ok(RPE::TEN))]
    #[case(10.5, Err(RPEError::OutOfRange))]
    #[case(8.2, Err(RPEError::InvalidResolution))]
    fn test_rpe_new(#[case] input: f64, #[case] expected: Result<RPE, RPEError>) {
        assert_eq!(RPE::new(input), expected);
    }

    #[rstest]
    #[case("8", Ok(RPE::EIGHT))]
    #[case(" 9.5 ", Ok(RPE(95)))]
    #[case("11", Err(RPEError::OutOfRange))]
    #[case("hard", Err(RPEError::ParseError))]
    fn test_rpe_from_str(#[case] input: &str, #[case] expected: Result<RPE, RPEError>) {
        assert_eq!(RPE::try_from(input), expected);
    }

    #[rstest]
    #[case("2", Ok(RIR(20)))]
    #[case("failure", Ok(RIR::FAILURE))]
    #[case("Very Easy", Ok(RIR(40)))]
    #[case("warm-up", Ok(RIR(50)))]
    #[case("12", Err(RIRError::OutOfRange))]
    #[case("meh", Err(RIRError::UnknownTag("meh".to_string())))]
    fn test_rir_from_str(#[case] input: &str, #[case] expected: Result<RIR, RIRError>) {
        assert_eq!(RIR::try_from(input), expected);
    }

    #[rstest]
    #[case(RIR(0), RPE::TEN)]
    #[case(RIR(20), RPE::EIGHT)]
    #[case(RIR(100), RPE::ONE)]
    fn test_rpe_from_rir(#[case] rir: RIR, #[case] expected: RPE) {
        assert_eq!(RPE::from(rir), expected);
    }

    #[rstest]
    #[case(RPE::TEN, RIR(0))]
    #[case(RPE(75), RIR(25))]
    fn test_rir_from_rpe(#[case] rpe: RPE, #[case] expected: RIR) {
        assert_eq!(RIR::from(rpe), expected);
    }

    #[rstest]
    #[case(RPE::EIGHT, "8")]
    #[case(RPE(95), "9.5")]
    fn test_rpe_display(#[case] input: RPE, #[case] expected: &str) {
        assert_eq!(input.to_string(), expected);
    }
}
