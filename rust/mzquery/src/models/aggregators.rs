use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::{
    EmptyAggregationError,
    UnsupportedAggregationError,
};

/// Reduction applied to the intensities matched within one spectrum.
///
/// The serialized form is the lowercase wire token (`"sum"`, `"max"`,
/// `"min"`, `"mean"`), and `FromStr` accepts exactly those tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MzAggregation {
    #[serde(rename = "sum")]
    Sum,
    #[serde(rename = "max")]
    Max,
    #[serde(rename = "min")]
    Min,
    #[serde(rename = "mean")]
    Mean,
}

impl MzAggregation {
    /// Reduces a set of intensities to a single value.
    ///
    /// `Sum` and `Mean` of nothing are defined as 0 so chromatograms stay
    /// numerically well formed; `Max`/`Min` of nothing have no sensible
    /// value and fail instead.
    pub fn try_aggregate(&self, intensities: &[f64]) -> Result<f64, EmptyAggregationError> {
        match self {
            Self::Sum => Ok(intensities.iter().sum()),
            Self::Mean => {
                if intensities.is_empty() {
                    Ok(0.0)
                } else {
                    Ok(intensities.iter().sum::<f64>() / intensities.len() as f64)
                }
            }
            Self::Max => intensities
                .iter()
                .copied()
                .reduce(f64::max)
                .ok_or(EmptyAggregationError),
            Self::Min => intensities
                .iter()
                .copied()
                .reduce(f64::min)
                .ok_or(EmptyAggregationError),
        }
    }

    /// The extraction policy: a spectrum contributing no peaks in range
    /// yields intensity 0, never an error.
    pub fn aggregate_or_zero(&self, intensities: &[f64]) -> f64 {
        self.try_aggregate(intensities).unwrap_or(0.0)
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
            Self::Mean => "mean",
        }
    }
}

impl FromStr for MzAggregation {
    type Err = UnsupportedAggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Self::Sum),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "mean" => Ok(Self::Mean),
            other => Err(UnsupportedAggregationError {
                mode: other.to_string(),
            }),
        }
    }
}

impl Display for MzAggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_mean() {
        let vals = [1.0, 2.0, 3.0];
        assert_eq!(MzAggregation::Sum.try_aggregate(&vals).unwrap(), 6.0);
        assert_eq!(MzAggregation::Mean.try_aggregate(&vals).unwrap(), 2.0);
    }

    #[test]
    fn test_max_and_min() {
        let vals = [4.0, 1.0, 9.0];
        assert_eq!(MzAggregation::Max.try_aggregate(&vals).unwrap(), 9.0);
        assert_eq!(MzAggregation::Min.try_aggregate(&vals).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_input_policy() {
        assert_eq!(MzAggregation::Sum.try_aggregate(&[]).unwrap(), 0.0);
        assert_eq!(MzAggregation::Mean.try_aggregate(&[]).unwrap(), 0.0);
        assert_eq!(
            MzAggregation::Max.try_aggregate(&[]),
            Err(EmptyAggregationError)
        );
        assert_eq!(
            MzAggregation::Min.try_aggregate(&[]),
            Err(EmptyAggregationError)
        );
        // The policy the extractor relies on
        assert_eq!(MzAggregation::Max.aggregate_or_zero(&[]), 0.0);
    }

    #[test]
    fn test_mode_tokens() {
        assert_eq!("sum".parse::<MzAggregation>().unwrap(), MzAggregation::Sum);
        assert_eq!(
            "mean".parse::<MzAggregation>().unwrap(),
            MzAggregation::Mean
        );
        let err = "average".parse::<MzAggregation>().unwrap_err();
        assert_eq!(err.mode, "average");
        // Tokens are case sensitive
        assert!("SUM".parse::<MzAggregation>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&MzAggregation::Mean).unwrap();
        assert_eq!(json, "\"mean\"");
        let back: MzAggregation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MzAggregation::Mean);
    }
}
