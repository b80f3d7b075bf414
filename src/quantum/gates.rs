//! Gate set and request parsing at the presentation boundary

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SynthError};

/// A gate applied to the register. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum GateOp {
    /// Hadamard
    H { qubit: usize },
    /// Pauli-X (bit flip)
    X { qubit: usize },
    Cnot { control: usize, target: usize },
}

/// Gate kind without operands, as selected in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    H,
    X,
    Cnot,
}

impl GateKind {
    pub fn arity(&self) -> usize {
        match self {
            Self::H | Self::X => 1,
            Self::Cnot => 2,
        }
    }
}

impl GateOp {
    pub fn kind(&self) -> GateKind {
        match self {
            Self::H { .. } => GateKind::H,
            Self::X { .. } => GateKind::X,
            Self::Cnot { .. } => GateKind::Cnot,
        }
    }

    /// Qubits touched by this gate, control first for CNOT
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Self::H { qubit } | Self::X { qubit } => vec![qubit],
            Self::Cnot { control, target } => vec![control, target],
        }
    }

    /// Check operands against a register of `n_qubits` qubits
    pub fn validate(&self, n_qubits: usize) -> Result<()> {
        for qubit in self.qubits() {
            check_index(qubit as i64, n_qubits)?;
        }
        if let Self::Cnot { control, target } = *self {
            if control == target {
                return Err(SynthError::InvalidGateArguments {
                    reason: format!("CNOT control and target are both qubit {}", control),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H { qubit } => write!(f, "H(q{})", qubit),
            Self::X { qubit } => write!(f, "X(q{})", qubit),
            Self::Cnot { control, target } => write!(f, "CNOT(q{} -> q{})", control, target),
        }
    }
}

fn check_index(index: i64, n_qubits: usize) -> Result<usize> {
    if index < 0 || index >= n_qubits as i64 {
        return Err(SynthError::InvalidQubitIndex { index, n_qubits });
    }
    Ok(index as usize)
}

/// Raw gate-selection request from the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRequest {
    pub gate: GateKind,
    pub qubits: Vec<i64>,
}

impl GateRequest {
    /// Convert into a gate for a register of `n_qubits` qubits
    pub fn into_gate(self, n_qubits: usize) -> Result<GateOp> {
        if self.qubits.len() != self.gate.arity() {
            return Err(SynthError::InvalidGateArguments {
                reason: format!(
                    "{:?} takes {} qubit(s), got {}",
                    self.gate,
                    self.gate.arity(),
                    self.qubits.len()
                ),
            });
        }

        let op = match self.gate {
            GateKind::H => GateOp::H {
                qubit: check_index(self.qubits[0], n_qubits)?,
            },
            GateKind::X => GateOp::X {
                qubit: check_index(self.qubits[0], n_qubits)?,
            },
            GateKind::Cnot => GateOp::Cnot {
                control: check_index(self.qubits[0], n_qubits)?,
                target: check_index(self.qubits[1], n_qubits)?,
            },
        };
        op.validate(n_qubits)?;
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_index_rejected() {
        let request = GateRequest {
            gate: GateKind::H,
            qubits: vec![-1],
        };
        match request.into_gate(3) {
            Err(SynthError::InvalidQubitIndex { index, n_qubits }) => {
                assert_eq!(index, -1);
                assert_eq!(n_qubits, 3);
            }
            other => panic!("expected InvalidQubitIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        assert!(matches!(
            GateOp::X { qubit: 3 }.validate(3),
            Err(SynthError::InvalidQubitIndex { index: 3, .. })
        ));
    }

    #[test]
    fn test_cnot_same_qubit_rejected() {
        let request = GateRequest {
            gate: GateKind::Cnot,
            qubits: vec![1, 1],
        };
        assert!(matches!(
            request.into_gate(3),
            Err(SynthError::InvalidGateArguments { .. })
        ));
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let request = GateRequest {
            gate: GateKind::X,
            qubits: vec![0, 1],
        };
        assert!(matches!(
            request.into_gate(3),
            Err(SynthError::InvalidGateArguments { .. })
        ));
    }

    #[test]
    fn test_request_from_json() {
        let request: GateRequest =
            serde_json::from_str(r#"{ "gate": "cnot", "qubits": [0, 2] }"#).unwrap();
        assert_eq!(
            request.into_gate(3).unwrap(),
            GateOp::Cnot {
                control: 0,
                target: 2
            }
        );
    }

    #[test]
    fn test_gate_op_serialization_is_tagged() {
        let json = serde_json::to_string(&GateOp::H { qubit: 1 }).unwrap();
        assert_eq!(json, r#"{"gate":"h","qubit":1}"#);
    }
}
