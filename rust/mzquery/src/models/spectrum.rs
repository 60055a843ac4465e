use serde::{
    Deserialize,
    Serialize,
};
use tracing::warn;

use crate::utils::subslice_range_by_key;

/// A single centroided signal: m/z position and intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// One scan: a retention time, an MS level, and an m/z-sorted peak list.
///
/// Immutable once constructed. The constructor restores the m/z sort
/// order if the input violates it, since every lookup on the peak list
/// is a binary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    retention_time: f64,
    ms_level: u8,
    peaks: Vec<Peak>,
}

impl Spectrum {
    pub fn new(retention_time: f64, ms_level: u8, mut peaks: Vec<Peak>) -> Self {
        if !peaks.windows(2).all(|w| w[0].mz <= w[1].mz) {
            warn!(
                retention_time,
                "peak list not sorted by m/z, sorting on construction"
            );
            peaks.sort_unstable_by(|a, b| a.mz.total_cmp(&b.mz));
        }
        Self {
            retention_time,
            ms_level,
            peaks,
        }
    }

    pub fn retention_time(&self) -> f64 {
        self.retention_time
    }

    pub fn ms_level(&self) -> u8 {
        self.ms_level
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// The contiguous slice of peaks with `mz_min <= mz <= mz_max`.
    ///
    /// O(log P) via binary search over the sorted peak list. An empty
    /// slice means no signal in the window, which is data, not an error.
    pub fn peaks_in_mz_range(&self, mz_min: f64, mz_max: f64) -> &[Peak] {
        let range = subslice_range_by_key(&self.peaks, mz_min, mz_max, |p| p.mz);
        &self.peaks[range]
    }

    /// Lowest and highest m/z in this spectrum, if it has any peaks.
    pub fn mz_bounds(&self) -> Option<(f64, f64)> {
        match (self.peaks.first(), self.peaks.last()) {
            (Some(first), Some(last)) => Some((first.mz, last.mz)),
            _ => None,
        }
    }
}

/// An in-memory LC-MS run: spectra ordered by retention time.
///
/// The experiment is a read-only store for everything in this crate;
/// extraction and detection borrow it and never mutate it. The
/// constructor sorts by retention time so the monotonicity invariant
/// holds no matter how the spectra were produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    spectra: Vec<Spectrum>,
}

impl Experiment {
    pub fn new(mut spectra: Vec<Spectrum>) -> Self {
        if !spectra
            .windows(2)
            .all(|w| w[0].retention_time <= w[1].retention_time)
        {
            warn!("spectra not sorted by retention time, sorting on construction");
            spectra.sort_by(|a, b| a.retention_time.total_cmp(&b.retention_time));
        }
        Self { spectra }
    }

    pub fn spectra(&self) -> &[Spectrum] {
        &self.spectra
    }

    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    /// Spectra of one MS level, in retention-time order.
    pub fn spectra_at_ms_level(&self, ms_level: u8) -> impl Iterator<Item = &Spectrum> {
        self.spectra
            .iter()
            .filter(move |s| s.ms_level == ms_level)
    }

    /// First and last retention time of the run.
    pub fn rt_bounds(&self) -> Option<(f64, f64)> {
        match (self.spectra.first(), self.spectra.last()) {
            (Some(first), Some(last)) => Some((first.retention_time, last.retention_time)),
            _ => None,
        }
    }

    /// Overall m/z extent across every spectrum with at least one peak.
    pub fn mz_bounds(&self) -> Option<(f64, f64)> {
        self.spectra
            .iter()
            .filter_map(|s| s.mz_bounds())
            .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))
    }

    /// The spectrum of the requested MS level recorded closest to `rt`.
    pub fn spectrum_closest_to_rt(&self, rt: f64, ms_level: u8) -> Option<&Spectrum> {
        self.spectra_at_ms_level(ms_level)
            .min_by(|a, b| {
                (a.retention_time - rt)
                    .abs()
                    .total_cmp(&(b.retention_time - rt).abs())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(mz: f64, intensity: f64) -> Peak {
        Peak::new(mz, intensity)
    }

    #[test]
    fn test_spectrum_sorts_unsorted_peaks() {
        let spectrum = Spectrum::new(
            1.0,
            1,
            vec![peak(300.0, 1.0), peak(100.0, 2.0), peak(200.0, 3.0)],
        );
        let mzs: Vec<f64> = spectrum.peaks().iter().map(|p| p.mz).collect();
        assert_eq!(mzs, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_peaks_in_mz_range() {
        let spectrum = Spectrum::new(
            1.0,
            1,
            vec![
                peak(100.0, 1.0),
                peak(150.0, 2.0),
                peak(200.0, 3.0),
                peak(250.0, 4.0),
            ],
        );
        let hits = spectrum.peaks_in_mz_range(150.0, 200.0);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].mz, 150.0);
        assert_eq!(hits[1].mz, 200.0);

        assert!(spectrum.peaks_in_mz_range(300.0, 400.0).is_empty());
    }

    #[test]
    fn test_experiment_sorts_by_rt() {
        let exp = Experiment::new(vec![
            Spectrum::new(30.0, 1, vec![]),
            Spectrum::new(10.0, 1, vec![]),
            Spectrum::new(20.0, 1, vec![]),
        ]);
        let rts: Vec<f64> = exp.spectra().iter().map(|s| s.retention_time()).collect();
        assert_eq!(rts, vec![10.0, 20.0, 30.0]);
        assert_eq!(exp.rt_bounds(), Some((10.0, 30.0)));
    }

    #[test]
    fn test_experiment_mz_bounds_skips_empty_spectra() {
        let exp = Experiment::new(vec![
            Spectrum::new(10.0, 1, vec![peak(120.0, 1.0), peak(380.0, 1.0)]),
            Spectrum::new(20.0, 1, vec![]),
            Spectrum::new(30.0, 1, vec![peak(90.0, 1.0), peak(200.0, 1.0)]),
        ]);
        assert_eq!(exp.mz_bounds(), Some((90.0, 380.0)));
    }

    #[test]
    fn test_spectrum_closest_to_rt_respects_ms_level() {
        let exp = Experiment::new(vec![
            Spectrum::new(10.0, 1, vec![]),
            Spectrum::new(11.0, 2, vec![]),
            Spectrum::new(40.0, 1, vec![]),
        ]);
        let hit = exp.spectrum_closest_to_rt(12.0, 1).unwrap();
        assert_eq!(hit.retention_time(), 10.0);
        let hit = exp.spectrum_closest_to_rt(35.0, 2).unwrap();
        assert_eq!(hit.retention_time(), 11.0);
        assert!(exp.spectrum_closest_to_rt(12.0, 3).is_none());
    }
}
