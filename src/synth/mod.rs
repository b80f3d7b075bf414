//! Circuit synthesizer: owns the running circuit and its history
//!
//! Every gate application runs the whole pipeline synchronously:
//! state-vector update -> probabilities -> voice mapping -> render.
//! Failures are detected before anything is committed, so a failed call
//! leaves the current state and history exactly as they were.

pub mod demos;
pub mod summary;

use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};

pub use demos::Demo;
pub use summary::CircuitSummary;

use crate::audio::{map_voices, Track, WaveformSynthesizer};
use crate::config::{AudioSettings, Settings, SynthConfig};
use crate::error::{Result, SynthError};
use crate::quantum::{
    GateOp, GateRequest, MeasurementCounts, ProbabilityDistribution, StateVector,
    StateVectorEngine, VoiceTable, QUBIT_COUNT,
};

/// One gate application and everything it produced
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub gate: GateOp,
    pub state: StateVector,
    pub probabilities: ProbabilityDistribution,
    pub track: Track,
}

pub struct CircuitSynthesizer<'v> {
    engine: StateVectorEngine,
    synth: WaveformSynthesizer,
    voices: &'v VoiceTable,
    config: SynthConfig,
    state: StateVector,
    history: Vec<HistoryEntry>,
}

impl CircuitSynthesizer<'static> {
    /// Synthesizer over the shared voice table with default settings
    pub fn with_defaults() -> Result<Self> {
        Self::new(VoiceTable::shared(), Settings::default())
    }
}

impl<'v> CircuitSynthesizer<'v> {
    pub fn new(voices: &'v VoiceTable, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let engine = StateVectorEngine::new(QUBIT_COUNT)?;
        let synth = WaveformSynthesizer::new(settings.audio)?;

        log::info!(
            "CircuitSynthesizer initialized: {} qubits, {} Hz / {}-bit, volume {}",
            engine.n_qubits(),
            settings.audio.sample_rate,
            settings.audio.bit_depth,
            settings.synth.volume
        );

        Ok(Self {
            state: engine.initialize(),
            engine,
            synth,
            voices,
            config: settings.synth,
            history: Vec::new(),
        })
    }

    pub fn n_qubits(&self) -> usize {
        self.engine.n_qubits()
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn audio_settings(&self) -> &AudioSettings {
        self.synth.settings()
    }

    pub fn voices(&self) -> &VoiceTable {
        self.voices
    }

    pub fn current_state(&self) -> &StateVector {
        &self.state
    }

    /// Fresh analytic probabilities for the current state
    pub fn probabilities(&self) -> ProbabilityDistribution {
        self.engine.probabilities(&self.state)
    }

    /// Append-only log of gate applications since the last reset
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.history.last().map(|entry| &entry.track)
    }

    /// Run the pipeline for one gate starting at `from`. Commits nothing.
    fn synthesize(
        &self,
        from: &StateVector,
        gate: GateOp,
        config: &SynthConfig,
    ) -> Result<HistoryEntry> {
        let state = self.engine.apply(from, gate)?;
        if !state.is_normalized() {
            return Err(SynthError::render(format!(
                "state norm drifted to {} after {}",
                state.norm_sqr(),
                gate
            )));
        }

        let probabilities = self.engine.probabilities(&state);
        let voices = map_voices(&probabilities, self.voices, config);
        let track = self.synth.render(&voices, Some(gate))?;

        Ok(HistoryEntry {
            gate,
            state,
            probabilities,
            track,
        })
    }

    /// Apply a gate using the synthesizer's own config
    pub fn apply_gate(&mut self, gate: GateOp) -> Result<&HistoryEntry> {
        let config = self.config;
        self.apply_gate_with(gate, &config)
    }

    /// Apply a gate, rendering with a caller-supplied config
    pub fn apply_gate_with(&mut self, gate: GateOp, config: &SynthConfig) -> Result<&HistoryEntry> {
        config.validate()?;
        let entry = self.synthesize(&self.state, gate, config)?;

        log::info!(
            "{} applied, probabilities {:?}",
            gate,
            entry.probabilities.as_slice()
        );

        self.state = entry.state.clone();
        self.history.push(entry);
        Ok(&self.history[self.history.len() - 1])
    }

    /// Parse and apply a raw request from the presentation layer
    pub fn apply_request(&mut self, request: GateRequest) -> Result<&HistoryEntry> {
        let gate = request.into_gate(self.n_qubits())?;
        self.apply_gate(gate)
    }

    /// Discard history and return to |0...0>
    pub fn reset(&mut self) {
        self.history.clear();
        self.state = self.engine.initialize();
        log::info!("Circuit reset");
    }

    /// Run `gates` from |0...0> and replace the circuit with the result.
    /// Either every gate succeeds or nothing changes.
    fn replace_with_sequence(&mut self, gates: &[GateOp]) -> Result<&[HistoryEntry]> {
        let config = self.config;
        let mut staged: Vec<HistoryEntry> = Vec::with_capacity(gates.len());
        let mut state = self.engine.initialize();

        for &gate in gates {
            let entry = self.synthesize(&state, gate, &config)?;
            state = entry.state.clone();
            staged.push(entry);
        }

        self.state = state;
        self.history = staged;
        Ok(&self.history)
    }

    pub fn load_demo(&mut self, demo: Demo) -> Result<&[HistoryEntry]> {
        let entries = self.replace_with_sequence(demo.gates())?;
        log::info!("Demo circuit '{}' loaded ({} gates)", demo, entries.len());
        Ok(entries)
    }

    pub fn load_demo_by_name(&mut self, name: &str) -> Result<&[HistoryEntry]> {
        let demo: Demo = name.parse()?;
        self.load_demo(demo)
    }

    /// Sample the current state `config.shots` times
    pub fn measure(&self) -> Result<MeasurementCounts> {
        self.engine
            .sample_measurements(&self.state, self.config.shots)
    }

    pub fn measure_with<R: Rng>(&self, rng: &mut R) -> Result<MeasurementCounts> {
        self.engine
            .sample_measurements_with(&self.state, self.config.shots, rng)
    }

    pub fn summary(&self) -> CircuitSummary {
        CircuitSummary::build(self.n_qubits(), self.voices, &self.history)
    }

    /// Audio for the current state: the latest track, or a fresh render
    /// (silence for |0...0>) when nothing has been applied yet
    pub fn current_audio(&self) -> Result<Track> {
        if let Some(track) = self.current_track() {
            return Ok(track.clone());
        }
        let voices = map_voices(&self.probabilities(), self.voices, &self.config);
        self.synth.render(&voices, None)
    }

    /// Save the current audio as WAV. Without a path, a timestamped
    /// `quantum_synth_<unix>.wav` in the working directory is used.
    pub fn export_wav(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(format!("quantum_synth_{}.wav", Utc::now().timestamp())),
        };
        self.current_audio()?.save_wav(&path)?;
        Ok(path)
    }
}
