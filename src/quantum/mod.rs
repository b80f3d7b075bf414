//! Quantum side of the pipeline
//!
//! - Fixed qubit register with one voice per qubit
//! - H / X / CNOT gates over a complex state vector
//! - Analytic per-qubit probabilities and shot-based sampling

pub mod gates;
pub mod measurement;
pub mod qubit;
pub mod state;

pub use gates::{GateKind, GateOp, GateRequest};
pub use measurement::{MeasurementCounts, MeasurementShots};
pub use qubit::{Qubit, VoiceTable, QUBIT_COUNT};
pub use state::{
    basis_label, ProbabilityDistribution, StateVector, StateVectorEngine, MAX_QUBITS,
    NORM_TOLERANCE,
};
