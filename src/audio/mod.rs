//! Audio side of the pipeline
//!
//! Turns per-qubit probabilities into sound:
//! - Probability -> voice mapping with a silence threshold
//! - Sine oscillators shaped by an ADSR envelope
//! - Mixing, peak normalization and WAV encoding

pub mod envelope;
pub mod mapper;
pub mod oscillator;
pub mod synth;
pub mod wav;

pub use envelope::Envelope;
pub use mapper::{map_voices, probability_to_amplitude, VoiceParams, SILENCE_THRESHOLD};
pub use synth::{normalize, Track, TrackInfo, WaveformSynthesizer};
