//! Waveform rendering: voices -> mixed, normalized, encoded track

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use super::envelope::Envelope;
use super::mapper::VoiceParams;
use super::oscillator::SineOscillator;
use super::wav;
use crate::config::{AudioSettings, MAX_DURATION};
use crate::error::{Result, SynthError};
use crate::quantum::GateOp;

/// Peak magnitude a normalized buffer may reach
pub const FULL_SCALE: f64 = 1.0;

/// Scale `samples` down so the peak fits in full scale.
///
/// Buffers already within range are left as they are, so applying this
/// twice gives the same result as applying it once.
pub fn normalize(samples: &mut [f64]) {
    let peak = peak_of(samples);
    if peak > FULL_SCALE {
        let scale = FULL_SCALE / peak;
        for sample in samples.iter_mut() {
            *sample = (*sample * scale).clamp(-FULL_SCALE, FULL_SCALE);
        }
    }
}

fn peak_of(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
}

/// One rendered synthesis event. Immutable once produced.
#[derive(Debug, Clone)]
pub struct Track {
    samples: Vec<f64>,
    wav: Vec<u8>,
    sample_rate: u32,
    bit_depth: u16,
    voices: Vec<VoiceParams>,
    gate: Option<GateOp>,
    created_at: DateTime<Utc>,
}

/// Serializable description of a track for display
#[derive(Debug, Clone, Serialize)]
pub struct TrackInfo {
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub duration_secs: f64,
    pub num_samples: usize,
    pub peak: f64,
    pub voices: Vec<VoiceParams>,
    pub gate: Option<GateOp>,
    pub created_at: DateTime<Utc>,
}

impl Track {
    /// Normalized mono samples in -1.0..=1.0
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Encoded WAV container
    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn voices(&self) -> &[VoiceParams] {
        &self.voices
    }

    pub fn gate(&self) -> Option<GateOp> {
        self.gate
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> f64 {
        peak_of(&self.samples)
    }

    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    pub fn to_base64(&self) -> String {
        wav::to_base64(&self.wav)
    }

    /// `data:` URI for direct playback in a browser audio element
    pub fn data_uri(&self) -> String {
        format!("data:audio/wav;base64,{}", self.to_base64())
    }

    pub fn save_wav<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        wav::write_wav_file(path, &self.wav)
    }

    pub fn info(&self) -> TrackInfo {
        TrackInfo {
            sample_rate: self.sample_rate,
            bit_depth: self.bit_depth,
            duration_secs: self.duration_secs(),
            num_samples: self.samples.len(),
            peak: self.peak(),
            voices: self.voices.clone(),
            gate: self.gate,
            created_at: self.created_at,
        }
    }
}

/// Renders voice parameters into a playable track
#[derive(Debug, Clone)]
pub struct WaveformSynthesizer {
    settings: AudioSettings,
    envelope: Envelope,
}

impl WaveformSynthesizer {
    pub fn new(settings: AudioSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            envelope: Envelope::default(),
        })
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    fn frames_for(&self, duration: f64) -> Result<usize> {
        if !duration.is_finite() || duration > MAX_DURATION {
            return Err(SynthError::render(format!(
                "voice duration {} s is outside 0..={} s",
                duration, MAX_DURATION
            )));
        }
        Ok((duration * self.settings.sample_rate as f64).round() as usize)
    }

    /// Sine wave for one voice, enveloped when enabled
    fn render_voice(&self, voice: &VoiceParams, frames: usize) -> Vec<f64> {
        let mut buffer = vec![0.0; frames];
        let mut osc = SineOscillator::new(voice.frequency, self.settings.sample_rate);
        osc.fill_buffer(&mut buffer, voice.amplitude);
        if self.settings.envelope {
            self.envelope.apply(&mut buffer);
        }
        buffer
    }

    /// Render, mix, normalize and encode `voices`.
    ///
    /// An all-silent voice list yields a zero buffer of the full duration.
    pub fn render(&self, voices: &[VoiceParams], gate: Option<GateOp>) -> Result<Track> {
        let duration = voices.iter().map(|v| v.duration).fold(0.0, f64::max);
        let frames = self.frames_for(duration)?;

        let audible: Vec<&VoiceParams> = voices.iter().filter(|v| !v.is_silent()).collect();
        let mut samples = match audible.as_slice() {
            [] => vec![0.0; frames],
            [only] => self.render_voice(only, frames),
            many => {
                let mut mixed = vec![0.0; frames];
                for voice in many {
                    let rendered = self.render_voice(voice, frames);
                    for (out, sample) in mixed.iter_mut().zip(&rendered) {
                        *out += sample;
                    }
                }
                mixed
            }
        };

        normalize(&mut samples);

        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(SynthError::render(format!(
                "non-finite sample at frame {}",
                pos
            )));
        }

        let wav = wav::encode_wav(&samples, self.settings.sample_rate, self.settings.bit_depth)?;

        log::debug!(
            "Rendered {} frames from {} audible voice(s), {} WAV bytes",
            frames,
            audible.len(),
            wav.len()
        );

        Ok(Track {
            samples,
            wav,
            sample_rate: self.settings.sample_rate,
            bit_depth: self.settings.bit_depth,
            voices: voices.to_vec(),
            gate,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(qubit: usize, frequency: f64, amplitude: f64) -> VoiceParams {
        VoiceParams {
            qubit,
            frequency,
            amplitude,
            duration: 0.5,
            probability: 1.0,
        }
    }

    fn synth() -> WaveformSynthesizer {
        WaveformSynthesizer::new(AudioSettings::default()).unwrap()
    }

    #[test]
    fn test_silence_has_full_duration() {
        let voices = [voice(0, 220.0, 0.0), voice(1, 330.0, 0.0)];
        let track = synth().render(&voices, None).unwrap();
        assert_eq!(track.samples().len(), 22050);
        assert!(track.is_silent());
        assert!((track.duration_secs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_voice_keeps_amplitude() {
        let track = synth().render(&[voice(0, 220.0, 0.4)], None).unwrap();
        let peak = track.peak();
        // Sustain level caps the enveloped peak
        assert!(peak <= 0.4 + 1e-9);
        assert!(peak > 0.2);
    }

    #[test]
    fn test_mix_is_normalized() {
        let voices = [
            voice(0, 220.0, 1.0),
            voice(1, 330.0, 1.0),
            voice(2, 440.0, 1.0),
        ];
        let track = synth().render(&voices, None).unwrap();
        assert!(track.peak() <= FULL_SCALE);
        assert!(track.peak() > 0.5);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let voices = [
            voice(0, 220.0, 0.9),
            voice(1, 330.0, 0.9),
            voice(2, 440.0, 0.9),
        ];
        let track = synth().render(&voices, None).unwrap();
        let mut again = track.samples().to_vec();
        normalize(&mut again);
        assert_eq!(again.as_slice(), track.samples());
    }

    #[test]
    fn test_normalize_scales_loud_buffer() {
        let mut samples = vec![0.5, -3.0, 1.5];
        normalize(&mut samples);
        assert!((samples[1] + 1.0).abs() < 1e-12);
        assert!((samples[0] - 0.5 / 3.0).abs() < 1e-12);
        let once = samples.clone();
        normalize(&mut samples);
        assert_eq!(samples, once);
    }

    #[test]
    fn test_encoded_track_metadata() {
        let settings = AudioSettings {
            sample_rate: 22050,
            bit_depth: 24,
            envelope: false,
        };
        let synth = WaveformSynthesizer::new(settings).unwrap();
        let track = synth
            .render(&[voice(2, 440.0, 0.5)], Some(GateOp::H { qubit: 2 }))
            .unwrap();

        let info = track.info();
        assert_eq!(info.sample_rate, 22050);
        assert_eq!(info.bit_depth, 24);
        assert_eq!(info.num_samples, 11025);
        assert_eq!(info.gate, Some(GateOp::H { qubit: 2 }));
        assert_eq!(&track.wav_bytes()[0..4], b"RIFF");
        assert!(track.data_uri().starts_with("data:audio/wav;base64,UklGR"));
    }

    #[test]
    fn test_non_finite_voice_is_render_failure() {
        let result = synth().render(&[voice(0, f64::NAN, 0.5)], None);
        assert!(matches!(result, Err(SynthError::RenderFailure { .. })));
    }

    #[test]
    fn test_custom_envelope() {
        let flat = Envelope {
            attack: 0.0,
            decay: 0.0,
            sustain: 1.0,
            release: 0.0,
        };
        let track = synth()
            .with_envelope(flat)
            .render(&[voice(0, 220.0, 0.4)], None)
            .unwrap();
        // No release ramp, so the tail is still at full level
        let tail = track.samples()[track.samples().len() - 200..]
            .iter()
            .fold(0.0f64, |m, s| m.max(s.abs()));
        assert!(tail > 0.39, "tail peak {}", tail);
    }

    #[test]
    fn test_oversized_voice_is_render_failure() {
        let mut long = voice(0, 220.0, 0.5);
        long.duration = 1e300;
        let result = synth().render(&[long], None);
        assert!(matches!(result, Err(SynthError::RenderFailure { .. })));

        long.duration = f64::INFINITY;
        let result = synth().render(&[long], None);
        assert!(matches!(result, Err(SynthError::RenderFailure { .. })));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = AudioSettings {
            bit_depth: 20,
            ..Default::default()
        };
        assert!(WaveformSynthesizer::new(settings).is_err());
    }
}
