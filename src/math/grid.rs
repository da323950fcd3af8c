use crate::error::{ensure_sim, SimResult};

/// Ordered, strictly increasing time points (days) at which state is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    pub fn new(points: Vec<f64>) -> SimResult<Self> {
        ensure_sim!(!points.is_empty(), Configuration, "time grid is empty");
        ensure_sim!(
            points.iter().all(|t| t.is_finite()),
            Configuration,
            "time grid contains non-finite points"
        );
        ensure_sim!(
            points.windows(2).all(|w| w[1] > w[0]),
            Configuration,
            "time grid must be strictly increasing"
        );
        Ok(Self { points })
    }

    /// `num` evenly spaced points from `start` to `stop`, both inclusive.
    pub fn linspace(start: f64, stop: f64, num: usize) -> SimResult<Self> {
        ensure_sim!(num >= 2, Configuration, "linspace needs at least 2 points, got {}", num);
        ensure_sim!(
            stop > start,
            Configuration,
            "linspace stop ({}) must exceed start ({})",
            stop,
            start
        );
        let step = (stop - start) / (num - 1) as f64;
        let mut points: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
        // Pin the endpoint exactly rather than accumulating rounding error.
        points[num - 1] = stop;
        Self::new(points)
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Consecutive `(t_i, t_{i+1})` pairs.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn linspace_matches_reference_grid() {
        let g = TimeGrid::linspace(0.0, 99.0, 100).unwrap();
        assert_eq!(g.len(), 100);
        assert_eq!(g.start(), 0.0);
        assert_eq!(g.end(), 99.0);
        assert!((g.points()[42] - 42.0).abs() < 1e-12);
        assert_eq!(g.intervals().count(), 99);
    }

    #[test]
    fn rejects_non_increasing_points() {
        let err = TimeGrid::new(vec![0.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
        assert!(TimeGrid::new(vec![]).is_err());
        assert!(TimeGrid::new(vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn single_point_grid_is_allowed() {
        let g = TimeGrid::new(vec![3.0]).unwrap();
        assert_eq!(g.intervals().count(), 0);
    }

    #[test]
    fn linspace_rejects_degenerate_ranges() {
        assert!(TimeGrid::linspace(0.0, 10.0, 1).is_err());
        assert!(TimeGrid::linspace(5.0, 5.0, 10).is_err());
    }
}
