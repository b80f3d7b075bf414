//! Quantum circuit synthesizer
//!
//! Applies gates to a small qubit register and renders the resulting
//! measurement probabilities as audio:
//! - `quantum`: state-vector engine, gates, measurement sampling
//! - `audio`: probability -> voice mapping, oscillators, mixing, WAV output
//! - `synth`: the orchestrator that runs the pipeline and keeps history

pub mod audio;
pub mod config;
pub mod error;
pub mod quantum;
pub mod synth;

pub use config::{AudioSettings, Settings, SynthConfig, SynthPreset};
pub use error::{Result, SynthError};
pub use quantum::{GateOp, GateRequest, ProbabilityDistribution, StateVector, StateVectorEngine};
pub use synth::{CircuitSynthesizer, Demo, HistoryEntry};
