use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::InvalidRangeError;

/// Column count of the dense range input: `[mz_min, mz_max, rt_min, rt_max]`.
pub const RANGE_COLUMNS: usize = 4;

/// A rectangular extraction window on the m/z × retention-time plane.
///
/// Both ranges are closed-closed, and construction enforces
/// `mz_min <= mz_max`, `rt_min <= rt_max` and finite bounds, so a window
/// that exists is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzRtWindow {
    mz_min: f64,
    mz_max: f64,
    rt_min: f64,
    rt_max: f64,
}

impl MzRtWindow {
    pub fn try_new(
        mz_min: f64,
        mz_max: f64,
        rt_min: f64,
        rt_max: f64,
    ) -> Result<Self, InvalidRangeError> {
        Self::try_from_row([mz_min, mz_max, rt_min, rt_max], 0)
    }

    /// Validates one row of a range matrix. `row` is reported in errors.
    pub(crate) fn try_from_row(
        row: [f64; RANGE_COLUMNS],
        row_idx: usize,
    ) -> Result<Self, InvalidRangeError> {
        let [mz_min, mz_max, rt_min, rt_max] = row;
        if let Some(value) = row.iter().copied().find(|v| !v.is_finite()) {
            return Err(InvalidRangeError::NonFiniteBound {
                row: row_idx,
                value,
            });
        }
        if mz_min > mz_max {
            return Err(InvalidRangeError::InvertedMzBounds {
                row: row_idx,
                mz_min,
                mz_max,
            });
        }
        if rt_min > rt_max {
            return Err(InvalidRangeError::InvertedRtBounds {
                row: row_idx,
                rt_min,
                rt_max,
            });
        }
        Ok(Self {
            mz_min,
            mz_max,
            rt_min,
            rt_max,
        })
    }

    pub fn mz_min(&self) -> f64 {
        self.mz_min
    }

    pub fn mz_max(&self) -> f64 {
        self.mz_max
    }

    pub fn rt_min(&self) -> f64 {
        self.rt_min
    }

    pub fn rt_max(&self) -> f64 {
        self.rt_max
    }

    pub fn mz_width(&self) -> f64 {
        self.mz_max - self.mz_min
    }

    pub fn contains_rt(&self, rt: f64) -> bool {
        self.rt_min <= rt && rt <= self.rt_max
    }

    pub fn contains_mz(&self, mz: f64) -> bool {
        self.mz_min <= mz && mz <= self.mz_max
    }

    /// Whether the window's m/z range covers the whole `(lo, hi)` span.
    pub fn covers_mz_span(&self, span: (f64, f64)) -> bool {
        self.mz_min <= span.0 && span.1 <= self.mz_max
    }

    /// Whether the window's RT range covers the whole `(lo, hi)` span.
    pub fn covers_rt_span(&self, span: (f64, f64)) -> bool {
        self.rt_min <= span.0 && span.1 <= self.rt_max
    }
}

/// An ordered list of validated extraction windows.
///
/// Row order is significant: every extraction output is index-aligned
/// with the matrix that produced it. Construction is all-or-nothing, so
/// a matrix that exists contains only valid windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeMatrix {
    windows: Vec<MzRtWindow>,
}

impl RangeMatrix {
    /// Builds a matrix from rows of `[mz_min, mz_max, rt_min, rt_max]`.
    pub fn try_from_rows(rows: &[[f64; RANGE_COLUMNS]]) -> Result<Self, InvalidRangeError> {
        let windows = rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| MzRtWindow::try_from_row(*row, row_idx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { windows })
    }

    /// Builds a matrix from a dense row-major slice with exactly
    /// [`RANGE_COLUMNS`] columns.
    pub fn try_from_flat(values: &[f64]) -> Result<Self, InvalidRangeError> {
        if values.len() % RANGE_COLUMNS != 0 {
            return Err(InvalidRangeError::MalformedMatrix {
                len: values.len(),
                expected: RANGE_COLUMNS,
            });
        }
        let windows = values
            .chunks_exact(RANGE_COLUMNS)
            .enumerate()
            .map(|(row_idx, chunk)| {
                let row: [f64; RANGE_COLUMNS] =
                    chunk.try_into().expect("chunks_exact yields full rows");
                MzRtWindow::try_from_row(row, row_idx)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &[MzRtWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MzRtWindow> {
        self.windows.iter()
    }
}

impl From<Vec<MzRtWindow>> for RangeMatrix {
    fn from(windows: Vec<MzRtWindow>) -> Self {
        Self { windows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rows() {
        let matrix = RangeMatrix::try_from_rows(&[
            [100.0, 200.0, 0.0, 60.0],
            [300.0, 300.0, 10.0, 10.0],
        ])
        .unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.windows()[0].mz_width(), 100.0);
        // Degenerate-but-ordered bounds are allowed
        assert_eq!(matrix.windows()[1].mz_width(), 0.0);
    }

    #[test]
    fn test_inverted_mz_bounds() {
        let err = RangeMatrix::try_from_rows(&[
            [100.0, 200.0, 0.0, 60.0],
            [500.0, 400.0, 0.0, 60.0],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            InvalidRangeError::InvertedMzBounds {
                row: 1,
                mz_min: 500.0,
                mz_max: 400.0
            }
        );
    }

    #[test]
    fn test_inverted_rt_bounds() {
        let err = MzRtWindow::try_new(100.0, 200.0, 60.0, 0.0).unwrap_err();
        assert!(matches!(err, InvalidRangeError::InvertedRtBounds { .. }));
    }

    #[test]
    fn test_non_finite_bound() {
        let err = MzRtWindow::try_new(f64::NAN, 200.0, 0.0, 60.0).unwrap_err();
        assert!(matches!(err, InvalidRangeError::NonFiniteBound { row: 0, .. }));
        let err = MzRtWindow::try_new(100.0, f64::INFINITY, 0.0, 60.0).unwrap_err();
        assert!(matches!(err, InvalidRangeError::NonFiniteBound { .. }));
    }

    #[test]
    fn test_flat_construction() {
        let matrix =
            RangeMatrix::try_from_flat(&[100.0, 200.0, 0.0, 60.0, 300.0, 400.0, 5.0, 50.0])
                .unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.windows()[1].mz_min(), 300.0);
        assert_eq!(matrix.windows()[1].rt_max(), 50.0);
    }

    #[test]
    fn test_flat_ragged_input() {
        let err = RangeMatrix::try_from_flat(&[100.0, 200.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            InvalidRangeError::MalformedMatrix {
                len: 3,
                expected: RANGE_COLUMNS
            }
        );
    }

    #[test]
    fn test_empty_matrix_is_fine() {
        let matrix = RangeMatrix::try_from_flat(&[]).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_row_order_preserved() {
        let rows = [
            [300.0, 400.0, 5.0, 50.0],
            [100.0, 200.0, 0.0, 60.0],
        ];
        let matrix = RangeMatrix::try_from_rows(&rows).unwrap();
        assert_eq!(matrix.windows()[0].mz_min(), 300.0);
        assert_eq!(matrix.windows()[1].mz_min(), 100.0);
    }
}
