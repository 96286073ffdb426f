//! Observations and observation spaces

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::GridPos;

/// Trait for observations from an environment
pub trait Observation: Clone + Debug + Send + Sync {
    /// Convert the observation to a flat feature vector
    fn to_vec(&self) -> Vec<f64>;

    /// Get the shape of the observation
    fn shape(&self) -> Vec<usize>;
}

/// Trait for defining observation spaces
pub trait ObservationSpace: Send + Sync {
    /// The type of observations in this space
    type Observation: Observation;

    /// Sample a random observation from the space
    fn sample(&self) -> Self::Observation;

    /// Check if an observation is valid within this space
    fn contains(&self, obs: &Self::Observation) -> bool;

    /// Get the shape of observations in this space
    fn shape(&self) -> Vec<usize>;
}

/// Full-board observation: one scalar per cell, indexed `[row, col]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridObservation {
    /// Per-cell values
    pub values: Array2<f64>,
}

impl GridObservation {
    /// Create a new grid observation
    #[must_use]
    pub fn new(values: Array2<f64>) -> Self {
        Self { values }
    }

    /// Value at a cell, or `None` when out of bounds
    #[must_use]
    pub fn at(&self, pos: GridPos) -> Option<f64> {
        self.values.get((pos.row, pos.col)).copied()
    }
}

impl Observation for GridObservation {
    fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    fn shape(&self) -> Vec<usize> {
        self.values.shape().to_vec()
    }
}

/// Space of grid observations over a fixed alphabet of cell values
#[derive(Debug, Clone)]
pub struct GridObservationSpace {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Scalars a cell may take
    pub values: Vec<f64>,
}

impl GridObservationSpace {
    /// Create a new grid observation space
    #[must_use]
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        Self { rows, cols, values }
    }
}

impl ObservationSpace for GridObservationSpace {
    type Observation = GridObservation;

    fn sample(&self) -> Self::Observation {
        use rand::seq::SliceRandom;
        let mut rng = rand::thread_rng();
        let values = Array2::from_shape_fn((self.rows, self.cols), |_| {
            self.values.choose(&mut rng).copied().unwrap_or(0.0)
        });
        GridObservation { values }
    }

    fn contains(&self, obs: &Self::Observation) -> bool {
        obs.values.dim() == (self.rows, self.cols)
            && obs
                .values
                .iter()
                .all(|v| self.values.iter().any(|a| (a - v).abs() < f64::EPSILON))
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.rows, self.cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_observation_shape_and_flatten() {
        let obs = GridObservation::new(Array2::zeros((3, 11)));
        assert_eq!(obs.shape(), vec![3, 11]);
        assert_eq!(obs.to_vec().len(), 33);
    }

    #[test]
    fn test_space_contains_checks_alphabet() {
        let space = GridObservationSpace::new(2, 2, vec![0.0, 1.0]);
        let ok = GridObservation::new(Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 1.0, 0.0]).unwrap());
        let bad = GridObservation::new(Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 1.0, 7.0]).unwrap());
        assert!(space.contains(&ok));
        assert!(!space.contains(&bad));
    }

    #[test]
    fn test_space_sample_is_contained() {
        let space = GridObservationSpace::new(4, 5, vec![0.0, 1.0, 2.0, 3.0]);
        for _ in 0..8 {
            assert!(space.contains(&space.sample()));
        }
    }
}
