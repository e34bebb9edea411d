//! Ordinary least-squares line fitting
//!
//! Kept separate from the windowing code so the pace-at-AeT projection can
//! be tested on bare (x, y) pairs.

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Slope magnitudes below this are treated as a flat (unsolvable) fit
const MIN_SLOPE: f64 = 1e-9;

impl LinearFit {
    /// Solve `y = slope * x + intercept` for x; `None` for a flat line
    pub fn solve_x(&self, y: f64) -> Option<f64> {
        if self.slope.abs() < MIN_SLOPE {
            return None;
        }
        Some((y - self.intercept) / self.slope)
    }
}

/// Least-squares fit of y on x
///
/// Returns `None` when fewer than two points or fewer than two distinct x
/// values are supplied, since the slope is undefined in either case.
pub fn fit_line(points: impl IntoIterator<Item = (f64, f64)>) -> Option<LinearFit> {
    let mut n = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;

    for (x, y) in points {
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }

    if n < 2.0 || max_x - min_x < f64::EPSILON * max_x.abs().max(1.0) {
        return None;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < MIN_SLOPE {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(LinearFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line_recovery() {
        let points = (0..10).map(|i| (i as f64, 2.0 * i as f64 + 3.0));
        let fit = fit_line(points).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_x_inverts_the_fit() {
        let fit = LinearFit {
            slope: 0.5,
            intercept: 140.0,
        };
        // 150 bpm on hr = 0.5 * speed + 140 puts speed at 20
        assert_eq!(fit.solve_x(150.0), Some(20.0));
    }

    #[test]
    fn test_flat_line_has_no_x_solution() {
        let fit = LinearFit {
            slope: 0.0,
            intercept: 150.0,
        };
        assert_eq!(fit.solve_x(150.0), None);
    }

    #[test]
    fn test_single_point_fails() {
        assert!(fit_line([(1.0, 2.0)]).is_none());
    }

    #[test]
    fn test_degenerate_x_values_fail() {
        // Same speed at every sample: slope of HR on speed is undefined
        let points = [(6.0, 140.0), (6.0, 150.0), (6.0, 160.0)];
        assert!(fit_line(points).is_none());
    }

    #[test]
    fn test_noisy_fit_stays_close() {
        let points = [
            (1.0, 5.1),
            (2.0, 6.9),
            (3.0, 9.2),
            (4.0, 10.8),
            (5.0, 13.1),
        ];
        let fit = fit_line(points).unwrap();
        assert!((fit.slope - 2.0).abs() < 0.1);
        assert!((fit.intercept - 3.0).abs() < 0.4);
    }
}
