/// Finds the index range of elements in a sorted slice whose keys fall
/// within the inclusive bounds `[low, high]`.
///
/// The slice must be sorted ascending by the result of `key_fn`. The
/// returned range can be used directly for slicing: `&slice[range]`, and
/// is empty when nothing matches.
///
/// Keys only need `PartialOrd`, which is what makes this usable on the
/// f64 m/z and retention-time axes; non-finite keys violate the sort
/// precondition and are the caller's problem.
///
/// # Examples
///
/// ```
/// use mzquery::utils::subslice_range_by_key;
///
/// let rts = [10.0, 20.0, 30.0, 40.0, 50.0];
/// let range = subslice_range_by_key(&rts, 20.0, 40.0, |&rt| rt);
/// assert_eq!(range, 1..4);
/// assert_eq!(&rts[range], &[20.0, 30.0, 40.0]);
///
/// let empty = subslice_range_by_key(&rts, 60.0, 70.0, |&rt| rt);
/// assert!(rts[empty].is_empty());
/// ```
pub fn subslice_range_by_key<T, K, F>(slice: &[T], low: K, high: K, key_fn: F) -> std::ops::Range<usize>
where
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    let start = slice.partition_point(|x| key_fn(x) < low);
    let end = start + slice[start..].partition_point(|x| key_fn(x) <= high);

    start..end
}

/// Returns the index of the element whose key is closest to `target`.
///
/// The slice must be sorted ascending by the result of `key_fn`; the
/// lookup is O(log n) plus a neighbor comparison. Returns `None` only for
/// an empty slice. Whether the closest element is close *enough* is the
/// caller's decision.
pub fn closest_index_by_key<T, F>(slice: &[T], target: f64, key_fn: F) -> Option<usize>
where
    F: Fn(&T) -> f64,
{
    if slice.is_empty() {
        return None;
    }

    let insertion = slice.partition_point(|x| key_fn(x) < target);
    if insertion == 0 {
        return Some(0);
    }
    if insertion == slice.len() {
        return Some(slice.len() - 1);
    }

    let below = (key_fn(&slice[insertion - 1]) - target).abs();
    let above = (key_fn(&slice[insertion]) - target).abs();
    if below <= above {
        Some(insertion - 1)
    } else {
        Some(insertion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subslice_range() {
        let input = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let result = subslice_range_by_key(&input, 3.0, 7.0, |&x| x);
        assert_eq!(result, 2..7);
        assert_eq!(&input[result], &[3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_subslice_range_repeats() {
        let input = vec![1.0, 3.0, 3.0, 3.0, 5.0, 7.0, 7.0, 9.0];
        let result = subslice_range_by_key(&input, 3.0, 7.0, |&x| x);
        assert_eq!(result, 1..7);
    }

    #[test]
    fn test_subslice_range_out_of_bounds() {
        let input = vec![1.0, 2.0, 3.0];
        assert!(input[subslice_range_by_key(&input, 4.0, 9.0, |&x| x)].is_empty());
        assert!(input[subslice_range_by_key(&input, -3.0, 0.5, |&x| x)].is_empty());
        let all = subslice_range_by_key(&input, -100.0, 100.0, |&x| x);
        assert_eq!(all, 0..3);
    }

    #[test]
    fn test_closest_index() {
        let input = vec![100.0, 200.0, 300.0];
        assert_eq!(closest_index_by_key(&input, 201.0, |&x| x), Some(1));
        assert_eq!(closest_index_by_key(&input, 260.0, |&x| x), Some(2));
        assert_eq!(closest_index_by_key(&input, -5.0, |&x| x), Some(0));
        assert_eq!(closest_index_by_key(&input, 5000.0, |&x| x), Some(2));
        // Equidistant resolves to the lower element
        assert_eq!(closest_index_by_key(&input, 150.0, |&x| x), Some(0));
    }

    #[test]
    fn test_closest_index_empty() {
        let input: Vec<f64> = vec![];
        assert_eq!(closest_index_by_key(&input, 1.0, |&x| x), None);
    }
}
