//! Qubit register and the fixed voice assigned to each qubit

use once_cell::sync::Lazy;
use serde::Serialize;

/// Number of qubits in the register
pub const QUBIT_COUNT: usize = 3;

/// A qubit bound to an audio voice. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qubit {
    pub index: usize,
    pub base_frequency: f64, // Hz
    pub label: &'static str,
}

/// Qubit -> voice assignments for the whole register
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceTable {
    qubits: Vec<Qubit>,
}

/// Process-wide voice table. Initialized on first access, read-only afterwards.
static VOICE_TABLE: Lazy<VoiceTable> = Lazy::new(|| {
    let table = VoiceTable::new(vec![
        Qubit {
            index: 0,
            base_frequency: 220.0,
            label: "A3 (bass)",
        },
        Qubit {
            index: 1,
            base_frequency: 330.0,
            label: "E4 (melody)",
        },
        Qubit {
            index: 2,
            base_frequency: 440.0,
            label: "A4 (harmony)",
        },
    ]);
    log::debug!("Voice table initialized ({} voices)", table.len());
    table
});

impl VoiceTable {
    pub fn new(qubits: Vec<Qubit>) -> Self {
        Self { qubits }
    }

    /// The shared table for the fixed register
    pub fn shared() -> &'static VoiceTable {
        &VOICE_TABLE
    }

    pub fn get(&self, index: usize) -> Option<&Qubit> {
        self.qubits.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Qubit> {
        self.qubits.iter()
    }

    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_table_matches_register() {
        let table = VoiceTable::shared();
        assert_eq!(table.len(), QUBIT_COUNT);
        for (i, qubit) in table.iter().enumerate() {
            assert_eq!(qubit.index, i);
        }
        assert_eq!(table.get(0).map(|q| q.base_frequency), Some(220.0));
        assert_eq!(table.get(2).map(|q| q.base_frequency), Some(440.0));
        assert!(table.get(3).is_none());
    }

    #[test]
    fn test_shared_table_is_single_instance() {
        assert!(std::ptr::eq(VoiceTable::shared(), VoiceTable::shared()));
    }
}
