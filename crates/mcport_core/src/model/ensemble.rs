/// Simulated portfolio values over time for many independent paths
///
/// Logically a `steps × paths` tensor. Each path is stored contiguously since
/// paths are generated independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    steps: usize,
    paths: usize,
    values: Vec<f64>,
}

impl Ensemble {
    /// Build an ensemble from per-path trajectories of equal length.
    #[must_use]
    pub fn from_paths(paths: Vec<Vec<f64>>) -> Self {
        let steps = paths.first().map_or(0, Vec::len);
        debug_assert!(paths.iter().all(|p| p.len() == steps));
        let n_paths = paths.len();
        Self {
            steps,
            paths: n_paths,
            values: paths.concat(),
        }
    }

    /// Number of time steps per path
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn n_paths(&self) -> usize {
        self.paths
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths == 0 || self.steps == 0
    }

    #[must_use]
    pub fn path(&self, index: usize) -> &[f64] {
        &self.values[index * self.steps..(index + 1) * self.steps]
    }

    pub fn paths(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.steps.max(1))
    }

    #[must_use]
    pub fn value(&self, step: usize, path: usize) -> f64 {
        self.values[path * self.steps + step]
    }

    /// Cross-section of every path at one time step.
    #[must_use]
    pub fn step_values(&self, step: usize) -> Vec<f64> {
        self.paths().map(|p| p[step]).collect()
    }

    /// Values at the last time step; empty when the ensemble is.
    #[must_use]
    pub fn final_values(&self) -> Vec<f64> {
        if self.steps == 0 {
            return Vec::new();
        }
        self.step_values(self.steps - 1)
    }
}
