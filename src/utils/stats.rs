//! Timing statistics.

/// Mean and spread of one (benchmark, core count) measurement, in seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub mean: f64,
    /// Unset when fewer than two samples were taken and the benchmark did
    /// not report one itself
    pub stdev: Option<f64>,
}

impl Summary {
    /// Standard deviation as a percentage of the mean, unset for a zero mean
    pub fn relative_stdev(&self) -> Option<f64> {
        if self.mean == 0.0 {
            return None;
        }
        self.stdev.map(|s| s / self.mean * 100.0)
    }
}

/// Arithmetic mean, `None` for no samples
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample standard deviation (Bessel-corrected), `None` below two samples
pub fn calculate_std_dev(samples: &[f64], mean: f64) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }

    let variance: f64 = samples
        .iter()
        .map(|t| {
            let diff = t - mean;
            diff * diff
        })
        .sum::<f64>()
        / (samples.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Summarize samples, `None` when there are none
pub fn compute_stats(samples: &[f64]) -> Option<Summary> {
    let mean = mean(samples)?;
    Some(Summary {
        mean,
        stdev: calculate_std_dev(samples, mean),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_samples() {
        let s = compute_stats(&[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(s.mean, 4.0);
        assert_eq!(s.stdev, Some(2.0));
        assert_eq!(s.relative_stdev(), Some(50.0));
    }

    #[test]
    fn test_single_sample_has_no_stdev() {
        let s = compute_stats(&[5.0]).unwrap();
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.stdev, None);
        assert_eq!(s.relative_stdev(), None);
    }

    #[test]
    fn test_no_samples() {
        assert_eq!(compute_stats(&[]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_identical_samples() {
        let s = compute_stats(&[1.5, 1.5, 1.5, 1.5]).unwrap();
        assert_eq!(s.mean, 1.5);
        assert_eq!(s.stdev, Some(0.0));
    }

    #[test]
    fn test_zero_mean_has_no_relative_stdev() {
        let s = compute_stats(&[0.0, 0.0]).unwrap();
        assert_eq!(s.stdev, Some(0.0));
        assert_eq!(s.relative_stdev(), None);
    }
}
