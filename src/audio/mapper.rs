//! Probability -> voice parameter mapping
//!
//! Pure and deterministic: the same probabilities and config always give
//! the same voices.

use serde::Serialize;

use crate::config::SynthConfig;
use crate::quantum::{ProbabilityDistribution, VoiceTable};

/// Probabilities below this are rendered as silence
pub const SILENCE_THRESHOLD: f64 = 0.10;

/// Synthesis parameters for one qubit's voice
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceParams {
    pub qubit: usize,
    pub frequency: f64, // Hz
    pub amplitude: f64, // 0.0 - 1.0, 0.0 = silent
    pub duration: f64,  // seconds
    /// P(qubit = 1) the amplitude was derived from
    pub probability: f64,
}

impl VoiceParams {
    pub fn is_silent(&self) -> bool {
        self.amplitude <= 0.0
    }
}

/// Loudness for a probability: silent under the threshold, sqrt-compressed above
pub fn probability_to_amplitude(probability: f64, volume: f64) -> f64 {
    if probability < SILENCE_THRESHOLD {
        0.0
    } else {
        probability.sqrt() * volume
    }
}

/// One voice per qubit that has an entry in `voices`
pub fn map_voices(
    probabilities: &ProbabilityDistribution,
    voices: &VoiceTable,
    config: &SynthConfig,
) -> Vec<VoiceParams> {
    probabilities
        .iter()
        .filter_map(|(qubit, probability)| {
            let Some(voice) = voices.get(qubit) else {
                log::warn!("No voice assigned to qubit {}, skipping", qubit);
                return None;
            };
            Some(VoiceParams {
                qubit,
                frequency: voice.base_frequency,
                amplitude: probability_to_amplitude(probability, config.volume),
                duration: config.duration,
                probability,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_law() {
        for p in [0.0, 0.01, 0.05, 0.0999] {
            assert_eq!(probability_to_amplitude(p, 0.8), 0.0);
        }
        for p in [0.10, 0.25, 0.5, 1.0] {
            let amp = probability_to_amplitude(p, 0.8);
            assert!(amp > 0.0);
            assert_eq!(amp, p.sqrt() * 0.8);
        }
    }

    #[test]
    fn test_map_uses_voice_table_and_config() {
        let config = SynthConfig {
            volume: 0.5,
            duration: 1.5,
            shots: 1,
        };
        let probs = ProbabilityDistribution::new(vec![0.5, 0.05, 1.0]);
        let voices = map_voices(&probs, VoiceTable::shared(), &config);

        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].frequency, 220.0);
        assert_eq!(voices[0].amplitude, 0.5f64.sqrt() * 0.5);
        assert!(voices[1].is_silent());
        assert_eq!(voices[2].frequency, 440.0);
        assert_eq!(voices[2].amplitude, 0.5);
        assert!(voices.iter().all(|v| v.duration == 1.5));
    }

    #[test]
    fn test_qubits_without_voice_are_skipped() {
        let probs = ProbabilityDistribution::new(vec![1.0, 1.0, 1.0, 1.0]);
        let voices = map_voices(&probs, VoiceTable::shared(), &SynthConfig::default());
        assert_eq!(voices.len(), 3);
    }
}
