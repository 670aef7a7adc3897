//! Sampling grids and one-dimensional inversion of monotonic functions.

/// Hard cap on bisection steps; 200 halvings exhaust f64 precision on any bracket.
const MAX_BISECTIONS: usize = 200;

/// Largest sampling grid accepted from configuration (scan grid, sweep levels, reversals).
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// `count` evenly spaced values from `start` to `end`, both inclusive.
///
/// # Examples
///
/// ```
/// use strainlife::solver::linspace;
///
/// assert_eq!(linspace(1.0, 3.0, 3), vec![1.0, 2.0, 3.0]);
/// assert_eq!(linspace(1.0, 3.0, 1), vec![3.0]);
/// ```
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count <= 1 {
        return vec![end];
    }
    let step = (end - start) / (count as f64 - 1.0);
    let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
    // pin the last sample so the range is closed exactly
    out[count - 1] = end;
    out
}

/// `count` values spaced evenly in log10 between `10^from_exp` and `10^to_exp`.
///
/// # Examples
///
/// ```
/// use strainlife::solver::logspace;
///
/// let v = logspace(1.0, 3.0, 3);
/// assert_eq!(v.len(), 3);
/// assert!((v[1] - 100.0).abs() < 1e-9);
/// ```
pub fn logspace(from_exp: f64, to_exp: f64, count: usize) -> Vec<f64> {
    linspace(from_exp, to_exp, count)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// Arithmetic sequence `start, start + step, ...` stopping before `end`.
///
/// Returns an empty vector when `step` is not positive or the range is empty.
///
/// # Examples
///
/// ```
/// use strainlife::solver::arange;
///
/// assert_eq!(arange(0.0, 50.0, 200.0), vec![0.0, 50.0, 100.0, 150.0]);
/// assert!(arange(0.0, 0.0, 10.0).is_empty());
/// ```
pub fn arange(start: f64, step: f64, end: f64) -> Vec<f64> {
    if !(step > 0.0) || end <= start {
        return Vec::new();
    }
    let count = ((end - start) / step).ceil() as usize;
    (0..count)
        .map(|i| start + step * i as f64)
        .take_while(|&x| x < end)
        .collect()
}

/// Finds `x` in `[lo, hi]` with `f(x) = target` for a monotonic `f`.
///
/// Works for increasing and decreasing functions. A target outside
/// `[f(lo), f(hi)]` saturates to the nearer bound instead of failing.
///
/// # Arguments
///
/// * `f` - Monotonic function on the bracket.
/// * `target` - Value to invert.
/// * `lo`, `hi` - Bracket, `lo < hi`.
/// * `tol` - Width of the final bracket.
///
/// # Examples
///
/// ```
/// use strainlife::solver::bisect_monotonic;
///
/// let root = bisect_monotonic(|x| x * x, 4.0, 0.0, 10.0, 1e-12);
/// assert!((root - 2.0).abs() < 1e-9);
///
/// // out of range: clamps to the bound
/// assert_eq!(bisect_monotonic(|x| x * x, 1000.0, 0.0, 10.0, 1e-12), 10.0);
/// ```
pub fn bisect_monotonic<F>(f: F, target: f64, lo: f64, hi: f64, tol: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let (f_lo, f_hi) = (f(lo), f(hi));
    let increasing = f_hi >= f_lo;
    let (f_min, f_max) = if increasing { (f_lo, f_hi) } else { (f_hi, f_lo) };
    if target <= f_min {
        return if increasing { lo } else { hi };
    }
    if target >= f_max {
        return if increasing { hi } else { lo };
    }

    let (mut lo, mut hi) = (lo, hi);
    for _ in 0..MAX_BISECTIONS {
        if hi - lo <= tol {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let below = if increasing { f(mid) < target } else { f(mid) > target };
        if below {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Grid point whose image under `f` is closest to `target`.
///
/// Brute-force counterpart of [`bisect_monotonic`]: precision is bounded by
/// the grid spacing and out-of-range targets return a boundary point.
/// Returns `None` only for an empty grid.
pub fn scan_nearest<F>(f: F, target: f64, grid: &[f64]) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    grid.iter()
        .map(|&x| (x, (f(x) - target).abs()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(x, _)| x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(1.0, 2000.0, 20000);
        assert_eq!(v.len(), 20000);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[19999], 2000.0);
        assert_relative_eq!(v[1] - v[0], 1999.0 / 19999.0, epsilon = 1e-9);
    }

    #[test]
    fn test_logspace_is_increasing() {
        let v = logspace(1.0, 8.0, 1000);
        assert_eq!(v.len(), 1000);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(v[0], 10.0, max_relative = 1e-12);
        assert_relative_eq!(v[999], 1e8, max_relative = 1e-12);
    }

    #[test]
    fn test_arange_excludes_end() {
        let v = arange(0.0, 50.0, 900.0);
        assert_eq!(v.len(), 18);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[17], 850.0);
        assert!(arange(10.0, 5.0, 10.0).is_empty());
        assert!(arange(0.0, -1.0, 10.0).is_empty());
    }

    #[test]
    fn test_bisect_decreasing() {
        let root = bisect_monotonic(|x: f64| 1.0 / x, 0.25, 1.0, 10.0, 1e-12);
        assert_relative_eq!(root, 4.0, epsilon = 1e-9);
        // above f(lo) on a decreasing function saturates to lo
        assert_eq!(bisect_monotonic(|x: f64| 1.0 / x, 5.0, 1.0, 10.0, 1e-12), 1.0);
        assert_eq!(bisect_monotonic(|x: f64| 1.0 / x, 0.01, 1.0, 10.0, 1e-12), 10.0);
    }

    #[test]
    fn test_scan_nearest() {
        let grid = linspace(0.0, 10.0, 11);
        assert_eq!(scan_nearest(|x| 2.0 * x, 7.9, &grid), Some(4.0));
        assert_eq!(scan_nearest(|x| 2.0 * x, 100.0, &grid), Some(10.0));
        assert_eq!(scan_nearest(|x| x, 1.0, &[]), None);
    }
}
