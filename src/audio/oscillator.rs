//! Sine oscillator

use std::f64::consts::PI;

/// Phase-accumulating sine generator
pub struct SineOscillator {
    frequency: f64,
    sample_rate: f64,
    phase: f64, // 0.0 - 1.0, fraction of a cycle
}

impl SineOscillator {
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            frequency,
            sample_rate: sample_rate as f64,
            phase: 0.0,
        }
    }

    /// Generate the next sample in -1.0..=1.0
    pub fn next_sample(&mut self) -> f64 {
        let sample = (self.phase * 2.0 * PI).sin();
        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }

    /// Fill a buffer with samples scaled by `amplitude`
    pub fn fill_buffer(&mut self, buffer: &mut [f64], amplitude: f64) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample() * amplitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_range() {
        let mut osc = SineOscillator::new(440.0, 44100);
        for _ in 0..44100 {
            let sample = osc.next_sample();
            assert!((-1.0..=1.0).contains(&sample));
        }
    }

    #[test]
    fn test_starts_at_zero_crossing() {
        let mut osc = SineOscillator::new(220.0, 44100);
        assert_eq!(osc.next_sample(), 0.0);
        assert!(osc.next_sample() > 0.0);
    }

    #[test]
    fn test_quarter_cycle_peak() {
        // 100 Hz at 400 Hz sample rate: four samples per cycle
        let mut osc = SineOscillator::new(100.0, 400);
        let mut buffer = [0.0; 4];
        osc.fill_buffer(&mut buffer, 0.5);
        assert!(buffer[0].abs() < 1e-12);
        assert!((buffer[1] - 0.5).abs() < 1e-12);
        assert!((buffer[3] + 0.5).abs() < 1e-12);
    }
}
