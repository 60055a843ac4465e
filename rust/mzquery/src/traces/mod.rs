pub mod detector;

pub use detector::{
    detect_mass_traces,
    MassTraceDetector,
};

use serde::{
    Deserialize,
    Serialize,
};

/// One signal contributed to a trace: where it was and how strong.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    pub mz: f64,
    pub retention_time: f64,
    pub intensity: f64,
}

/// The elution profile of a single chemical mass: points contributed
/// from consecutive spectra, plus derived summary quantities.
///
/// Finalized by the detector and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassTrace {
    points: Vec<TracePoint>,
    centroid_mz: f64,
    total_intensity: f64,
}

impl MassTrace {
    pub(crate) fn from_points(points: Vec<TracePoint>) -> Self {
        let total_intensity: f64 = points.iter().map(|p| p.intensity).sum();
        let centroid_mz = if total_intensity > 0.0 {
            points.iter().map(|p| p.mz * p.intensity).sum::<f64>() / total_intensity
        } else if points.is_empty() {
            0.0
        } else {
            points.iter().map(|p| p.mz).sum::<f64>() / points.len() as f64
        };
        Self {
            points,
            centroid_mz,
            total_intensity,
        }
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Intensity-weighted mean m/z of the trace.
    pub fn centroid_mz(&self) -> f64 {
        self.centroid_mz
    }

    /// Summed intensity over all points; the detector's ranking key.
    pub fn total_intensity(&self) -> f64 {
        self.total_intensity
    }

    /// Retention times of the first and last point.
    pub fn rt_bounds(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.retention_time, last.retention_time)),
            _ => None,
        }
    }

    /// The most intense point of the trace.
    pub fn apex(&self) -> Option<&TracePoint> {
        self.points
            .iter()
            .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
    }
}

/// How far a peak may sit from a candidate's representative mass and
/// still extend it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceMzTolerance {
    #[serde(rename = "ppm")]
    Ppm(f64),
    #[serde(rename = "da")]
    Dalton(f64),
}

impl TraceMzTolerance {
    /// Maximum absolute m/z distance at the given mass.
    pub fn half_width_at(&self, mz: f64) -> f64 {
        match self {
            Self::Ppm(ppm) => mz * ppm / 1e6,
            Self::Dalton(da) => *da,
        }
    }
}

/// Configuration for the mass trace detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceDetectionConfig {
    /// Match window around a candidate's representative mass.
    /// 20 ppm works well for high-resolution data.
    pub mz_tolerance: TraceMzTolerance,
    /// Consecutive scans a candidate may miss before it is closed.
    pub max_missed_scans: u32,
    /// Traces with fewer points than this are discarded as noise.
    pub min_trace_length: usize,
    /// Signals at or below this intensity are invisible to the detector.
    pub min_intensity: f64,
    /// Which spectra participate.
    pub ms_level: u8,
}

impl Default for TraceDetectionConfig {
    fn default() -> Self {
        Self {
            mz_tolerance: TraceMzTolerance::Ppm(20.0),
            max_missed_scans: 2,
            min_trace_length: 3,
            min_intensity: 0.0,
            ms_level: 1,
        }
    }
}
