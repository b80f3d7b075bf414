//! Shot-based measurement sampling
//!
//! Each draw picks a basis state with probability |amplitude|^2. Draws are
//! exposed as a one-shot iterator; every call starts from fresh randomness.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use super::state::{basis_label, StateVector, StateVectorEngine};
use crate::error::{Result, SynthError};

/// Iterator over `shots` independent basis-state draws
pub struct MeasurementShots<'r, R: Rng> {
    dist: WeightedIndex<f64>,
    rng: &'r mut R,
    remaining: u32,
}

impl<'r, R: Rng> Iterator for MeasurementShots<'r, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.dist.sample(&mut *self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

/// Histogram of measured basis states
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementCounts {
    n_qubits: usize,
    shots: u32,
    counts: BTreeMap<usize, u32>,
}

impl MeasurementCounts {
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Count for one basis state (0 if never observed)
    pub fn count(&self, basis: usize) -> u32 {
        self.counts.get(&basis).copied().unwrap_or(0)
    }

    /// Observed basis states with their counts, ascending
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.counts.iter().map(|(&basis, &count)| (basis, count))
    }

    /// Counts keyed by bitstring (`"011"` = q2=0, q1=1, q0=1)
    pub fn by_bitstring(&self) -> BTreeMap<String, u32> {
        self.counts
            .iter()
            .map(|(&basis, &count)| (basis_label(basis, self.n_qubits), count))
            .collect()
    }

    /// Empirical P(qubit = 1) from the observed shots
    pub fn qubit_frequencies(&self) -> Vec<f64> {
        let mut ones = vec![0u32; self.n_qubits];
        for (&basis, &count) in &self.counts {
            for (qubit, total) in ones.iter_mut().enumerate() {
                if basis >> qubit & 1 == 1 {
                    *total += count;
                }
            }
        }
        ones.into_iter()
            .map(|n| n as f64 / self.shots as f64)
            .collect()
    }
}

impl StateVectorEngine {
    /// Lazily draw `shots` basis states from `state`
    pub fn measurement_shots<'r, R: Rng>(
        &self,
        state: &StateVector,
        shots: u32,
        rng: &'r mut R,
    ) -> Result<MeasurementShots<'r, R>> {
        let dist = WeightedIndex::new(state.basis_probabilities())
            .map_err(|e| SynthError::render(format!("Cannot sample state: {}", e)))?;
        Ok(MeasurementShots {
            dist,
            rng,
            remaining: shots,
        })
    }

    /// Histogram of `shots` draws using the caller's RNG
    pub fn sample_measurements_with<R: Rng>(
        &self,
        state: &StateVector,
        shots: u32,
        rng: &mut R,
    ) -> Result<MeasurementCounts> {
        if shots == 0 {
            return Err(SynthError::config("shots", "must be at least 1"));
        }
        let mut counts = BTreeMap::new();
        for basis in self.measurement_shots(state, shots, rng)? {
            *counts.entry(basis).or_insert(0) += 1;
        }
        log::debug!("Sampled {} shots over {} outcomes", shots, counts.len());
        Ok(MeasurementCounts {
            n_qubits: state.n_qubits(),
            shots,
            counts,
        })
    }

    /// Histogram of `shots` draws using thread-local randomness
    pub fn sample_measurements(
        &self,
        state: &StateVector,
        shots: u32,
    ) -> Result<MeasurementCounts> {
        self.sample_measurements_with(state, shots, &mut rand::thread_rng())
    }
}
