//! Tests for timing extraction.

#[cfg(test)]
mod tests {
    use crate::error::DriverError;
    use crate::extract::{Extracted, Extraction};

    const EPSILON: f64 = 1e-12;

    fn assert_close(a: f64, b: f64, msg: &str) {
        assert!((a - b).abs() < EPSILON, "{}: expected {}, got {}", msg, b, a);
    }

    #[test]
    fn test_infer_by_name() {
        assert_eq!(Extraction::infer("ferret-piper"), Extraction::Ferret);
        assert_eq!(Extraction::infer("bst-gf"), Extraction::Bst);
        assert_eq!(Extraction::infer("hw-se"), Extraction::Hw);
        assert_eq!(Extraction::infer("lcs-fj2"), Extraction::Summary);
        assert_eq!(Extraction::infer("fib-sf-stack"), Extraction::Summary);
    }

    #[test]
    fn test_summary_reads_mean_and_stdev() {
        let out = "foo\nbar\naverage: 3.5 seconds\nStd. dev: 0.2\n";
        let found = Extraction::Summary.extract("lcs-fj", out).unwrap();
        assert!(found.samples.is_empty());
        assert_eq!(found.mean, Some(3.5));
        assert_eq!(found.stdev, Some(0.2));
    }

    #[test]
    fn test_summary_stops_at_stdev_line() {
        let out = "average: 3.5 s\nStd. dev: 0.2 s (5.714%)\naverage: 99.0 s\n";
        let found = Extraction::Summary.extract("lcs-fj", out).unwrap();
        assert_eq!(found.mean, Some(3.5));
        assert_eq!(found.stdev, Some(0.2));
    }

    #[test]
    fn test_summary_mean_without_stdev() {
        let out = "Running time 1: 1.25 s\nRunning time average: 1.25 s\n";
        let found = Extraction::Summary.extract("fib-fj", out).unwrap();
        assert_eq!(found.mean, Some(1.25));
        assert_eq!(found.stdev, None);
    }

    #[test]
    fn test_summary_no_match_leaves_everything_unset() {
        let found = Extraction::Summary.extract("mm-fj", "nothing here\n").unwrap();
        assert_eq!(found, Extracted::default());
    }

    #[test]
    fn test_hw_time_line_in_milliseconds() {
        let out = "loading frames\nhw time: 120.0 ms\ndone\n";
        let found = Extraction::Hw.extract("hw-fj", out).unwrap();
        assert_eq!(found.samples.len(), 1);
        assert_close(found.samples[0], 0.12, "hw sample");
    }

    #[test]
    fn test_hw_collects_every_time_line() {
        let out = "time: 100 ms\nother\nelapsed time: 300 ms\n";
        let found = Extraction::Hw.extract("hw-gf", out).unwrap();
        assert_eq!(found.samples.len(), 2);
        assert_close(found.samples[0], 0.1, "first");
        assert_close(found.samples[1], 0.3, "second");
    }

    #[test]
    fn test_bst_third_line_third_token() {
        let out = "building tree\nmerging\nmerge time: 2500 ms\n";
        let found = Extraction::Bst.extract("bst-fj", out).unwrap();
        assert_eq!(found.samples, vec![2.5]);
    }

    #[test]
    fn test_ferret_third_token() {
        let found = Extraction::Ferret
            .extract("ferret-piper", "Running time: 12.75 s\n")
            .unwrap();
        assert_eq!(found.samples, vec![12.75]);
    }

    #[test]
    fn test_empty_output_yields_no_sample() {
        for strategy in [Extraction::Ferret, Extraction::Bst, Extraction::Hw] {
            let found = strategy.extract("x", "").unwrap();
            assert!(found.samples.is_empty(), "{}", strategy.name());
        }
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let err = Extraction::Ferret
            .extract("ferret-serial", "Running time: twelve s\n")
            .unwrap_err();
        assert!(matches!(err, DriverError::MalformedTiming { ref text, .. } if text == "twelve"));

        let err = Extraction::Summary
            .extract("mm-fj", "average: n/a\n")
            .unwrap_err();
        assert!(matches!(err, DriverError::MalformedTiming { .. }));
    }

    #[test]
    fn test_summary_line_without_colon_is_an_error() {
        let err = Extraction::Summary
            .extract("mm-fj", "average 3.5\n")
            .unwrap_err();
        assert!(matches!(err, DriverError::MissingValue { .. }));
    }
}
