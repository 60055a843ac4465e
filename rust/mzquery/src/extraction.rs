use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::errors::{
    InvalidParameterError,
    Result,
};
use crate::models::aggregators::MzAggregation;
use crate::models::chromatogram::{
    Chromatogram,
    ChromatogramType,
};
use crate::models::ranges::{
    MzRtWindow,
    RangeMatrix,
};
use crate::models::spectrum::{
    Experiment,
    Spectrum,
};
use crate::utils::subslice_range_by_key;

/// Raw extraction output for one window: index-aligned parallel vectors.
///
/// This is the untyped result shape; [`extract_xics`] wraps the same
/// series into [`Chromatogram`] records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XicArrays {
    pub retention_times: Vec<f64>,
    pub intensities: Vec<f64>,
}

impl XicArrays {
    pub fn len(&self) -> usize {
        self.retention_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retention_times.is_empty()
    }
}

/// Extracts one chromatogram per window, as typed records.
///
/// Windows are independent and processed in parallel; the output is in
/// input order, one [`Chromatogram`] per row of `ranges`. Spectra are
/// first filtered to `ms_level`; a level with no spectra yields empty
/// chromatograms, not an error. Each output's type comes from
/// [`ChromatogramType::classify`].
pub fn extract_xics(
    experiment: &Experiment,
    ranges: &RangeMatrix,
    ms_level: u8,
    aggregation: MzAggregation,
) -> Result<Vec<Chromatogram>> {
    let level_spectra = spectra_at_level(experiment, ms_level)?;
    Ok(ranges
        .windows()
        .par_iter()
        .map(|window| {
            let arrays = window_arrays(&level_spectra, window, aggregation);
            Chromatogram::new(
                ChromatogramType::classify(window, ms_level, experiment),
                arrays.retention_times,
                arrays.intensities,
            )
        })
        .collect())
}

/// Extracts one raw series per window.
///
/// Same core computation as [`extract_xics`], returned as untyped
/// parallel vectors. The output is range-major: element `i` holds the
/// full `(retention_times, intensities)` series for input row `i`.
pub fn aggregate_from_matrix(
    experiment: &Experiment,
    ranges: &RangeMatrix,
    ms_level: u8,
    aggregation: MzAggregation,
) -> Result<Vec<XicArrays>> {
    let level_spectra = spectra_at_level(experiment, ms_level)?;
    Ok(ranges
        .windows()
        .par_iter()
        .map(|window| window_arrays(&level_spectra, window, aggregation))
        .collect())
}

/// Base peak chromatogram: the tallest signal per scan.
///
/// Unset bounds default to the experiment's own extent. An experiment
/// with no signal yields an empty chromatogram.
pub fn base_peak_chromatogram(
    experiment: &Experiment,
    ms_level: u8,
    mz_range: Option<(f64, f64)>,
    rt_range: Option<(f64, f64)>,
) -> Result<Chromatogram> {
    summary_chromatogram(
        experiment,
        ms_level,
        mz_range,
        rt_range,
        MzAggregation::Max,
        ChromatogramType::Basepeak,
    )
}

/// Total ion chromatogram: summed signal per scan.
///
/// Unset bounds default to the experiment's own extent.
pub fn total_ion_chromatogram(
    experiment: &Experiment,
    ms_level: u8,
    rt_range: Option<(f64, f64)>,
) -> Result<Chromatogram> {
    summary_chromatogram(
        experiment,
        ms_level,
        None,
        rt_range,
        MzAggregation::Sum,
        ChromatogramType::TotalIonCurrent,
    )
}

fn summary_chromatogram(
    experiment: &Experiment,
    ms_level: u8,
    mz_range: Option<(f64, f64)>,
    rt_range: Option<(f64, f64)>,
    aggregation: MzAggregation,
    chromatogram_type: ChromatogramType,
) -> Result<Chromatogram> {
    let level_spectra = spectra_at_level(experiment, ms_level)?;

    let mz_range = mz_range.or_else(|| experiment.mz_bounds());
    let rt_range = rt_range.or_else(|| experiment.rt_bounds());
    let (Some((mz_min, mz_max)), Some((rt_min, rt_max))) = (mz_range, rt_range) else {
        return Ok(Chromatogram::empty(chromatogram_type));
    };

    let window = MzRtWindow::try_new(mz_min, mz_max, rt_min, rt_max)?;
    let arrays = window_arrays(&level_spectra, &window, aggregation);
    Ok(Chromatogram::new(
        chromatogram_type,
        arrays.retention_times,
        arrays.intensities,
    ))
}

/// The core routine shared by every extraction entry point.
///
/// `level_spectra` is already filtered to one MS level and ordered by
/// retention time, so the RT window selects a contiguous subsequence via
/// binary search; each selected spectrum then contributes one aggregated
/// intensity from its in-window peak slice (empty slice aggregates to 0).
fn window_arrays(
    level_spectra: &[&Spectrum],
    window: &MzRtWindow,
    aggregation: MzAggregation,
) -> XicArrays {
    let selected = subslice_range_by_key(level_spectra, window.rt_min(), window.rt_max(), |s| {
        s.retention_time()
    });
    let selected = &level_spectra[selected];

    let mut retention_times = Vec::with_capacity(selected.len());
    let mut intensities = Vec::with_capacity(selected.len());
    let mut scratch: Vec<f64> = Vec::new();
    for spectrum in selected {
        scratch.clear();
        scratch.extend(
            spectrum
                .peaks_in_mz_range(window.mz_min(), window.mz_max())
                .iter()
                .map(|p| p.intensity),
        );
        retention_times.push(spectrum.retention_time());
        intensities.push(aggregation.aggregate_or_zero(&scratch));
    }

    XicArrays {
        retention_times,
        intensities,
    }
}

fn spectra_at_level(experiment: &Experiment, ms_level: u8) -> Result<Vec<&Spectrum>> {
    if ms_level == 0 {
        return Err(InvalidParameterError::ZeroMsLevel.into());
    }
    let level_spectra: Vec<&Spectrum> = experiment.spectra_at_ms_level(ms_level).collect();
    if level_spectra.is_empty() && !experiment.is_empty() {
        warn!(ms_level, "no spectra at requested ms_level, all series will be empty");
    }
    Ok(level_spectra)
}
