pub mod aggregators;
pub mod chromatogram;
pub mod ranges;
pub mod spectrum;

pub use aggregators::MzAggregation;
pub use chromatogram::{
    Chromatogram,
    ChromatogramType,
};
pub use ranges::{
    MzRtWindow,
    RangeMatrix,
};
pub use spectrum::{
    Experiment,
    Peak,
    Spectrum,
};
