//! Built-in reference dataset: velocity vs time.
//!
//! 21 samples of a bell-shaped curve, used as the default input when no CSV is
//! given and as a pinned regression fixture in tests.

use crate::domain::SamplePair;

/// `(time, velocity)` pairs.
const VELOCITY_VS_TIME: [(f64, f64); 21] = [
    (0.0, 0.0),
    (1.0, 1.0),
    (2.0, 4.0),
    (3.0, 8.0),
    (4.0, 14.0),
    (5.0, 21.0),
    (6.0, 28.0),
    (7.0, 35.0),
    (8.0, 43.0),
    (9.0, 51.0),
    (10.0, 58.0),
    (11.0, 64.0),
    (12.0, 69.0),
    (13.0, 73.0),
    (14.0, 75.0),
    (15.0, 73.0),
    (16.0, 68.0),
    (17.0, 60.0),
    (18.0, 49.0),
    (19.0, 35.0),
    (20.0, 33.0),
];

/// Label shown in reports for the built-in dataset.
pub const REFERENCE_LABEL: &str = "built-in velocity vs time";

/// The reference samples, in time order.
pub fn reference_samples() -> Vec<SamplePair> {
    VELOCITY_VS_TIME.iter().copied().map(SamplePair::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_dataset_shape() {
        let samples = reference_samples();
        assert_eq!(samples.len(), 21);
        assert_eq!(samples.first().map(|s| s.x), Some(0.0));
        assert_eq!(samples.last().map(|s| s.x), Some(20.0));

        let peak = samples
            .iter()
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|s| (s.x, s.y));
        assert_eq!(peak, Some((14.0, 75.0)));
    }
}
