#![doc = include_str!("../README.md")]

// Re-export main structures
pub use crate::extraction::{
    aggregate_from_matrix,
    base_peak_chromatogram,
    extract_xics,
    total_ion_chromatogram,
    XicArrays,
};
pub use crate::models::aggregators::MzAggregation;
pub use crate::models::chromatogram::{
    Chromatogram,
    ChromatogramType,
};
pub use crate::models::ranges::{
    MzRtWindow,
    RangeMatrix,
    RANGE_COLUMNS,
};
pub use crate::models::spectrum::{
    Experiment,
    Peak,
    Spectrum,
};
pub use crate::traces::{
    detect_mass_traces,
    MassTrace,
    MassTraceDetector,
    TraceDetectionConfig,
    TraceMzTolerance,
    TracePoint,
};

// Declare modules
pub mod errors;
pub mod extraction;
pub mod models;
pub mod traces;
pub mod utils;

// Re-export errors
pub use crate::errors::{
    EmptyAggregationError,
    InvalidParameterError,
    InvalidRangeError,
    MzQueryError,
    UnsupportedAggregationError,
};
