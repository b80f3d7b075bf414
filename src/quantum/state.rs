//! State-vector simulation of the qubit register
//!
//! Basis state `i` has qubit `k` set when bit `k` of `i` is 1. Every gate
//! produces a new [`StateVector`]; the input state is left untouched so the
//! orchestrator can keep prior states in its history.

use num_complex::Complex64;
use serde::Serialize;
use std::f64::consts::FRAC_1_SQRT_2;

use super::gates::GateOp;
use super::qubit::QUBIT_COUNT;
use crate::error::{Result, SynthError};

/// Largest register the engine will simulate
pub const MAX_QUBITS: usize = QUBIT_COUNT;

/// Allowed drift of the total probability away from 1.0
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Complex amplitudes over the 2^n basis states
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateVector {
    n_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// |0...0> for `n_qubits` qubits
    fn ground(n_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << n_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            n_qubits,
            amplitudes,
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn amplitude(&self, basis: usize) -> Option<Complex64> {
        self.amplitudes.get(basis).copied()
    }

    /// |amplitude|^2 for every basis state
    pub fn basis_probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of squared magnitudes
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() <= NORM_TOLERANCE
    }

    /// Ket notation of the non-negligible terms, e.g. `0.707|000> + 0.707|011>`
    pub fn ket(&self) -> String {
        let terms: Vec<String> = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm_sqr() > NORM_TOLERANCE)
            .map(|(i, a)| {
                let coefficient = if a.im.abs() <= NORM_TOLERANCE {
                    format!("{:.3}", a.re)
                } else {
                    format!("({:.3}{:+.3}i)", a.re, a.im)
                };
                format!("{}|{}>", coefficient, basis_label(i, self.n_qubits))
            })
            .collect();
        terms.join(" + ")
    }
}

/// Bitstring for a basis state, highest qubit first (q2 q1 q0)
pub fn basis_label(basis: usize, n_qubits: usize) -> String {
    (0..n_qubits)
        .rev()
        .map(|q| if basis >> q & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// P(measured = 1) for each qubit. Always recomputed from a state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityDistribution {
    ones: Vec<f64>,
}

impl ProbabilityDistribution {
    pub fn new(ones: Vec<f64>) -> Self {
        Self { ones }
    }

    /// P(qubit = 1), or None for an unknown qubit
    pub fn get(&self, qubit: usize) -> Option<f64> {
        self.ones.get(qubit).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.ones.iter().copied().enumerate()
    }

    pub fn len(&self) -> usize {
        self.ones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ones.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.ones
    }
}

/// Applies gates and derives measurement probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateVectorEngine {
    n_qubits: usize,
}

impl StateVectorEngine {
    pub fn new(n_qubits: usize) -> Result<Self> {
        if n_qubits == 0 || n_qubits > MAX_QUBITS {
            return Err(SynthError::UnsupportedQubitCount {
                requested: n_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self { n_qubits })
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn initialize(&self) -> StateVector {
        StateVector::ground(self.n_qubits)
    }

    /// Apply any gate, validating operands before touching amplitudes
    pub fn apply(&self, state: &StateVector, op: GateOp) -> Result<StateVector> {
        op.validate(state.n_qubits)?;
        let next = match op {
            GateOp::H { qubit } => hadamard(state, qubit),
            GateOp::X { qubit } => pauli_x(state, qubit),
            GateOp::Cnot { control, target } => cnot(state, control, target),
        };
        log::debug!("Applied {} -> {}", op, next.ket());
        Ok(next)
    }

    pub fn apply_h(&self, state: &StateVector, qubit: usize) -> Result<StateVector> {
        self.apply(state, GateOp::H { qubit })
    }

    pub fn apply_x(&self, state: &StateVector, qubit: usize) -> Result<StateVector> {
        self.apply(state, GateOp::X { qubit })
    }

    pub fn apply_cnot(
        &self,
        state: &StateVector,
        control: usize,
        target: usize,
    ) -> Result<StateVector> {
        self.apply(state, GateOp::Cnot { control, target })
    }

    /// Marginal P(qubit = 1) for every qubit of `state`
    pub fn probabilities(&self, state: &StateVector) -> ProbabilityDistribution {
        let mut ones = vec![0.0; state.n_qubits];
        for (basis, amplitude) in state.amplitudes.iter().enumerate() {
            let p = amplitude.norm_sqr();
            for (qubit, total) in ones.iter_mut().enumerate() {
                if basis >> qubit & 1 == 1 {
                    *total += p;
                }
            }
        }
        // Rounding can push a certain outcome a hair past 1.0
        for p in ones.iter_mut() {
            *p = p.clamp(0.0, 1.0);
        }
        ProbabilityDistribution::new(ones)
    }
}

fn hadamard(state: &StateVector, qubit: usize) -> StateVector {
    let mask = 1 << qubit;
    let mut amplitudes = state.amplitudes.clone();
    for i in (0..state.dimension()).filter(|i| i & mask == 0) {
        let j = i | mask;
        let (a0, a1) = (state.amplitudes[i], state.amplitudes[j]);
        amplitudes[i] = (a0 + a1) * FRAC_1_SQRT_2;
        amplitudes[j] = (a0 - a1) * FRAC_1_SQRT_2;
    }
    StateVector {
        n_qubits: state.n_qubits,
        amplitudes,
    }
}

fn pauli_x(state: &StateVector, qubit: usize) -> StateVector {
    let mask = 1 << qubit;
    let amplitudes = (0..state.dimension())
        .map(|i| state.amplitudes[i ^ mask])
        .collect();
    StateVector {
        n_qubits: state.n_qubits,
        amplitudes,
    }
}

fn cnot(state: &StateVector, control: usize, target: usize) -> StateVector {
    let control_mask = 1 << control;
    let target_mask = 1 << target;
    let amplitudes = (0..state.dimension())
        .map(|i| {
            if i & control_mask != 0 {
                state.amplitudes[i ^ target_mask]
            } else {
                state.amplitudes[i]
            }
        })
        .collect();
    StateVector {
        n_qubits: state.n_qubits,
        amplitudes,
    }
}
