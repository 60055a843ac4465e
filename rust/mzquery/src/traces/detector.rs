use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

use tracing::debug;

use crate::errors::{
    InvalidParameterError,
    Result,
};
use crate::models::spectrum::{
    Experiment,
    Peak,
};
use crate::traces::{
    MassTrace,
    TraceDetectionConfig,
    TracePoint,
};
use crate::utils::closest_index_by_key;

/// An open trace being grown across consecutive spectra.
///
/// The representative mass is the intensity-weighted running mean of the
/// points matched so far, so a strong apex anchors the lane while weak
/// shoulders barely move it.
#[derive(Debug, Clone)]
struct TraceCandidate {
    points: Vec<TracePoint>,
    weighted_mz_sum: f64,
    total_intensity: f64,
    gap_count: u32,
}

impl TraceCandidate {
    fn seed(point: TracePoint) -> Self {
        let mut candidate = Self {
            points: Vec::new(),
            weighted_mz_sum: 0.0,
            total_intensity: 0.0,
            gap_count: 0,
        };
        candidate.extend(point);
        candidate
    }

    fn extend(&mut self, point: TracePoint) {
        self.weighted_mz_sum += point.mz * point.intensity;
        self.total_intensity += point.intensity;
        self.points.push(point);
        self.gap_count = 0;
    }

    fn reference_mz(&self) -> f64 {
        if self.total_intensity > 0.0 {
            self.weighted_mz_sum / self.total_intensity
        } else {
            self.points
                .last()
                .expect("candidates always hold at least one point")
                .mz
        }
    }

    fn last_intensity(&self) -> f64 {
        self.points
            .last()
            .expect("candidates always hold at least one point")
            .intensity
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn into_trace(self) -> MassTrace {
        MassTrace::from_points(self.points)
    }
}

/// Seed-and-extend mass trace detection over an experiment.
///
/// Walks the spectra of one MS level in retention-time order, growing a
/// set of open candidates: each spectrum's peaks either extend the
/// candidate whose representative mass they sit closest to (within
/// tolerance) or seed new candidates. A candidate that misses too many
/// consecutive scans is closed and never reopened.
///
/// Detection never fails on data quality; sparse or noisy input just
/// yields short or zero traces.
#[derive(Debug, Clone, Default)]
pub struct MassTraceDetector {
    config: TraceDetectionConfig,
}

impl MassTraceDetector {
    pub fn new(config: TraceDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraceDetectionConfig {
        &self.config
    }

    /// Detects mass traces, returning at most `max_traces` of them,
    /// sorted by total intensity descending.
    pub fn detect(&self, experiment: &Experiment, max_traces: usize) -> Result<Vec<MassTrace>> {
        self.run(experiment, max_traces, || false)
    }

    /// Like [`detect`](Self::detect), but checks `cancel` between
    /// spectra. When the flag goes up, the stream is treated as ended:
    /// whatever closed so far is filtered, ranked and returned.
    pub fn detect_with_cancel(
        &self,
        experiment: &Experiment,
        max_traces: usize,
        cancel: &AtomicBool,
    ) -> Result<Vec<MassTrace>> {
        self.run(experiment, max_traces, || cancel.load(Ordering::Relaxed))
    }

    fn run(
        &self,
        experiment: &Experiment,
        max_traces: usize,
        should_stop: impl Fn() -> bool,
    ) -> Result<Vec<MassTrace>> {
        if max_traces == 0 {
            return Err(InvalidParameterError::NonPositiveMaxTraces { got: max_traces }.into());
        }
        if self.config.ms_level == 0 {
            return Err(InvalidParameterError::ZeroMsLevel.into());
        }

        let config = &self.config;
        let mut open: Vec<TraceCandidate> = Vec::new();
        let mut closed: Vec<TraceCandidate> = Vec::new();

        for spectrum in experiment.spectra_at_ms_level(config.ms_level) {
            if should_stop() {
                debug!(
                    open_candidates = open.len(),
                    "cancellation requested, ending stream early"
                );
                break;
            }

            let retention_time = spectrum.retention_time();
            let visible: Vec<Peak> = spectrum
                .peaks()
                .iter()
                .filter(|p| p.intensity > config.min_intensity)
                .copied()
                .collect();
            let mut claimed = vec![false; visible.len()];

            // Candidates with the strongest latest signal get first pick
            // of contested peaks.
            open.sort_unstable_by(|a, b| b.last_intensity().total_cmp(&a.last_intensity()));

            let mut still_open: Vec<TraceCandidate> =
                Vec::with_capacity(open.len() + visible.len());
            for mut candidate in open.drain(..) {
                let reference_mz = candidate.reference_mz();
                let matched = closest_index_by_key(&visible, reference_mz, |p| p.mz)
                    .filter(|&idx| !claimed[idx])
                    .filter(|&idx| {
                        (visible[idx].mz - reference_mz).abs()
                            <= config.mz_tolerance.half_width_at(reference_mz)
                    });

                match matched {
                    Some(idx) => {
                        claimed[idx] = true;
                        candidate.extend(TracePoint {
                            mz: visible[idx].mz,
                            retention_time,
                            intensity: visible[idx].intensity,
                        });
                        still_open.push(candidate);
                    }
                    None => {
                        candidate.gap_count += 1;
                        if candidate.gap_count > config.max_missed_scans {
                            closed.push(candidate);
                        } else {
                            still_open.push(candidate);
                        }
                    }
                }
            }

            // Every unclaimed signal starts a lane of its own.
            for (idx, peak) in visible.iter().enumerate() {
                if claimed[idx] {
                    continue;
                }
                still_open.push(TraceCandidate::seed(TracePoint {
                    mz: peak.mz,
                    retention_time,
                    intensity: peak.intensity,
                }));
            }

            open = still_open;
        }

        // End of stream closes everything still open.
        closed.append(&mut open);

        let mut traces: Vec<MassTrace> = closed
            .into_iter()
            .filter(|c| c.len() >= config.min_trace_length)
            .map(TraceCandidate::into_trace)
            .collect();
        traces.sort_unstable_by(|a, b| b.total_intensity().total_cmp(&a.total_intensity()));
        traces.truncate(max_traces);

        debug!(num_traces = traces.len(), "mass trace detection finished");
        Ok(traces)
    }
}

/// Detection with the default configuration.
pub fn detect_mass_traces(experiment: &Experiment, max_traces: usize) -> Result<Vec<MassTrace>> {
    MassTraceDetector::default().detect(experiment, max_traces)
}
