/// Evenly spaced sweep across a closed interval, for dummy track columns.
#[allow(dead_code)]
pub fn linear_sweep(length: usize, lo: f64, hi: f64) -> Vec<f64> {
    if length <= 1 {
        return vec![lo; length];
    }
    let step = (hi - lo) / (length as f64 - 1.0);
    (0..length).map(|i| lo + step * i as f64).collect()
}
