//! Circuit summary for display: depth, gate sequence, text diagram

use serde::Serialize;

use super::HistoryEntry;
use crate::quantum::{GateOp, ProbabilityDistribution, Qubit, VoiceTable};

/// Number of history entries included in a summary
pub const RECENT_ENTRIES: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct RecentSynthesis {
    pub gate: GateOp,
    pub probabilities: ProbabilityDistribution,
    pub audible_voices: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircuitSummary {
    pub n_qubits: usize,
    pub gate_count: usize,
    pub depth: usize,
    pub gates: Vec<GateOp>,
    pub diagram: String,
    pub voices: Vec<Qubit>,
    pub recent: Vec<RecentSynthesis>,
}

impl CircuitSummary {
    pub fn build(n_qubits: usize, voices: &VoiceTable, history: &[HistoryEntry]) -> Self {
        let gates: Vec<GateOp> = history.iter().map(|entry| entry.gate).collect();
        let recent = history
            .iter()
            .rev()
            .take(RECENT_ENTRIES)
            .rev()
            .map(|entry| RecentSynthesis {
                gate: entry.gate,
                probabilities: entry.probabilities.clone(),
                audible_voices: entry.track.voices().iter().filter(|v| !v.is_silent()).count(),
            })
            .collect();

        Self {
            n_qubits,
            gate_count: gates.len(),
            depth: circuit_depth(n_qubits, &gates),
            diagram: diagram(n_qubits, &gates),
            voices: voices.iter().cloned().collect(),
            gates,
            recent,
        }
    }
}

/// Layers needed when gates on disjoint qubits run in parallel
pub fn circuit_depth(n_qubits: usize, gates: &[GateOp]) -> usize {
    let mut level = vec![0usize; n_qubits];
    for gate in gates {
        let qubits = gate.qubits();
        let layer = qubits.iter().map(|&q| level[q]).max().unwrap_or(0) + 1;
        for q in qubits {
            level[q] = layer;
        }
    }
    level.into_iter().max().unwrap_or(0)
}

/// One row per qubit, one column per gate
pub fn diagram(n_qubits: usize, gates: &[GateOp]) -> String {
    let mut rows: Vec<String> = (0..n_qubits).map(|q| format!("q{}: ", q)).collect();

    for gate in gates {
        for (q, row) in rows.iter_mut().enumerate() {
            let cell = match *gate {
                GateOp::H { qubit } if qubit == q => "-H-",
                GateOp::X { qubit } if qubit == q => "-X-",
                GateOp::Cnot { control, .. } if control == q => "-●-",
                GateOp::Cnot { target, .. } if target == q => "-⊕-",
                GateOp::Cnot { control, target }
                    if q > control.min(target) && q < control.max(target) =>
                {
                    "-|-"
                }
                _ => "---",
            };
            row.push_str(cell);
        }
    }

    for row in rows.iter_mut() {
        row.push('-');
    }
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_parallel_gates() {
        let gates = [
            GateOp::H { qubit: 0 },
            GateOp::H { qubit: 1 },
            GateOp::H { qubit: 2 },
        ];
        assert_eq!(circuit_depth(3, &gates), 1);
    }

    #[test]
    fn test_depth_chain() {
        let gates = [
            GateOp::H { qubit: 0 },
            GateOp::Cnot {
                control: 0,
                target: 1,
            },
            GateOp::Cnot {
                control: 1,
                target: 2,
            },
            GateOp::X { qubit: 0 },
        ];
        assert_eq!(circuit_depth(3, &gates), 3);
        assert_eq!(circuit_depth(3, &[]), 0);
    }

    #[test]
    fn test_diagram_cells() {
        let gates = [
            GateOp::H { qubit: 0 },
            GateOp::Cnot {
                control: 0,
                target: 2,
            },
        ];
        let text = diagram(3, &gates);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "q0: -H--●--");
        assert_eq!(lines[1], "q1: ----|--");
        assert_eq!(lines[2], "q2: ----⊕--");
    }
}
