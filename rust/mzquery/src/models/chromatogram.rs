use std::fmt;
use std::fmt::{
    Display,
    Formatter,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::models::ranges::MzRtWindow;
use crate::models::spectrum::Experiment;

/// m/z window width below which a window counts as targeting a single
/// mass for classification purposes. Advisory only.
const NARROW_MZ_WINDOW: f64 = 10.0;

/// Semantic category of a chromatogram, with the stable integer codes
/// used on the wire.
///
/// `SizeOfType` (code 9) is a sentinel reporting the size of the
/// enumeration; it is never assigned to real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChromatogramType {
    Mass,
    TotalIonCurrent,
    SelectedIonCurrent,
    Basepeak,
    SelectedIonMonitoring,
    SelectedReactionMonitoring,
    ElectromagneticRadiation,
    Absorption,
    Emission,
    SizeOfType,
}

impl ChromatogramType {
    /// Returns the `ChromatogramType` corresponding to the given code,
    /// or `None` for anything outside the fixed table.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Mass),
            1 => Some(Self::TotalIonCurrent),
            2 => Some(Self::SelectedIonCurrent),
            3 => Some(Self::Basepeak),
            4 => Some(Self::SelectedIonMonitoring),
            5 => Some(Self::SelectedReactionMonitoring),
            6 => Some(Self::ElectromagneticRadiation),
            7 => Some(Self::Absorption),
            8 => Some(Self::Emission),
            9 => Some(Self::SizeOfType),
            _ => None,
        }
    }

    /// The stable integer code for this type.
    pub fn code(&self) -> u8 {
        match self {
            Self::Mass => 0,
            Self::TotalIonCurrent => 1,
            Self::SelectedIonCurrent => 2,
            Self::Basepeak => 3,
            Self::SelectedIonMonitoring => 4,
            Self::SelectedReactionMonitoring => 5,
            Self::ElectromagneticRadiation => 6,
            Self::Absorption => 7,
            Self::Emission => 8,
            Self::SizeOfType => 9,
        }
    }

    /// Number of real chromatogram types, as reported by the sentinel.
    pub fn count() -> usize {
        Self::SizeOfType.code() as usize
    }

    /// Assigns a semantic category from the extraction context.
    ///
    /// Advisory metadata, not used in any aggregation math: an
    /// unrestricted m/z window is a TIC, a narrow MS1 window over the
    /// full RT span is a mass chromatogram, a narrow window at MS2+ looks
    /// like a precursor/product pair, and everything else is a selected
    /// ion current.
    pub fn classify(window: &MzRtWindow, ms_level: u8, experiment: &Experiment) -> Self {
        if let Some(span) = experiment.mz_bounds() {
            if window.covers_mz_span(span) {
                return Self::TotalIonCurrent;
            }
        }
        if window.mz_width() <= NARROW_MZ_WINDOW {
            if ms_level >= 2 {
                return Self::SelectedReactionMonitoring;
            }
            if let Some(span) = experiment.rt_bounds() {
                if ms_level == 1 && window.covers_rt_span(span) {
                    return Self::Mass;
                }
            }
        }
        Self::SelectedIonCurrent
    }
}

impl Display for ChromatogramType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mass => "mass",
            Self::TotalIonCurrent => "total ion current",
            Self::SelectedIonCurrent => "selected ion current",
            Self::Basepeak => "base peak",
            Self::SelectedIonMonitoring => "selected ion monitoring",
            Self::SelectedReactionMonitoring => "selected reaction monitoring",
            Self::ElectromagneticRadiation => "electromagnetic radiation",
            Self::Absorption => "absorption",
            Self::Emission => "emission",
            Self::SizeOfType => "size of type",
        };
        write!(f, "{}", name)
    }
}

/// An intensity-over-retention-time series with a semantic category.
///
/// `retention_times` and `intensities` are index aligned and equal
/// length, by construction; the struct is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromatogram {
    pub chromatogram_type: ChromatogramType,
    pub retention_times: Vec<f64>,
    pub intensities: Vec<f64>,
}

impl Chromatogram {
    pub fn new(
        chromatogram_type: ChromatogramType,
        retention_times: Vec<f64>,
        intensities: Vec<f64>,
    ) -> Self {
        assert_eq!(
            retention_times.len(),
            intensities.len(),
            "retention times and intensities must be index aligned"
        );
        Self {
            chromatogram_type,
            retention_times,
            intensities,
        }
    }

    pub fn empty(chromatogram_type: ChromatogramType) -> Self {
        Self {
            chromatogram_type,
            retention_times: Vec::new(),
            intensities: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.retention_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retention_times.is_empty()
    }

    /// Index-aligned `(retention_time, intensity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.retention_times
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }
}
