//! Named demo circuits

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SynthError;
use crate::quantum::GateOp;

/// Preset gate sequences that reach well-known states from |000>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Demo {
    /// Two qubits in equal superposition
    Superposition,
    /// One flipped qubit next to two superposed ones
    MixedStates,
    /// GHZ-style chain: all three qubits agree on every measurement
    Entanglement,
}

impl Demo {
    pub const ALL: [Demo; 3] = [Self::Superposition, Self::MixedStates, Self::Entanglement];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Superposition => "superposition",
            Self::MixedStates => "mixed_states",
            Self::Entanglement => "entanglement",
        }
    }

    pub fn gates(&self) -> &'static [GateOp] {
        match self {
            Self::Superposition => &[GateOp::H { qubit: 0 }, GateOp::H { qubit: 1 }],
            Self::MixedStates => &[
                GateOp::X { qubit: 0 },
                GateOp::H { qubit: 1 },
                GateOp::H { qubit: 2 },
            ],
            Self::Entanglement => &[
                GateOp::H { qubit: 0 },
                GateOp::Cnot {
                    control: 0,
                    target: 1,
                },
                GateOp::Cnot {
                    control: 1,
                    target: 2,
                },
            ],
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Demo {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|demo| demo.name() == s)
            .ok_or_else(|| SynthError::UnknownDemo(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for demo in Demo::ALL {
            assert_eq!(demo.name().parse::<Demo>().unwrap(), demo);
        }
        assert!(matches!(
            "teleport".parse::<Demo>(),
            Err(SynthError::UnknownDemo(name)) if name == "teleport"
        ));
    }

    #[test]
    fn test_presets_are_valid_for_register() {
        for demo in Demo::ALL {
            for gate in demo.gates() {
                assert!(gate.validate(3).is_ok(), "{} in {}", gate, demo);
            }
        }
    }
}
