pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean; an empty slice yields 0.0 rather than dividing
    /// by zero, which is the batch-average policy for empty inputs.
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let sum: f64 = values.iter().sum();
        sum / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_single_value_is_the_value() {
        assert_eq!(StatsHelper::mean(&[4.0]), 4.0);
    }

    #[test]
    fn mean_of_batch() {
        assert_eq!(StatsHelper::mean(&[10.0, 20.0, 30.0]), 20.0);
    }
}
