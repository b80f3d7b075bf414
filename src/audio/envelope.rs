//! ADSR amplitude envelope
//!
//! Stage lengths are fractions of the note length so short and long notes
//! get the same shape. Attack and release are each capped at half the note.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f64,  // fraction of note length
    pub decay: f64,   // fraction of note length
    pub sustain: f64, // level, 0.0 - 1.0
    pub release: f64, // fraction of note length
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.05,
            decay: 0.05,
            sustain: 0.7,
            release: 0.1,
        }
    }
}

/// Stage boundaries in samples for one note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stages {
    attack: usize,
    decay: usize,
    release: usize,
}

impl Envelope {
    fn stages(&self, len: usize) -> Stages {
        let half = len / 2;
        let frames = |fraction: f64| (fraction.max(0.0) * len as f64).round() as usize;

        let attack = frames(self.attack).min(half);
        let release = frames(self.release).min(half);
        let decay = frames(self.decay).min(len - attack - release);
        Stages {
            attack,
            decay,
            release,
        }
    }

    /// Attack, decay and sustain gain, ignoring release
    fn held_gain(&self, stages: &Stages, index: usize) -> f64 {
        let sustain = self.sustain.clamp(0.0, 1.0);
        if index < stages.attack {
            index as f64 / stages.attack as f64
        } else if index < stages.attack + stages.decay {
            let t = (index - stages.attack) as f64 / stages.decay as f64;
            1.0 - (1.0 - sustain) * t
        } else {
            sustain
        }
    }

    /// Gain for sample `index` of a note `len` samples long
    pub fn gain(&self, index: usize, len: usize) -> f64 {
        let stages = self.stages(len);
        let release_start = len - stages.release;

        if index < release_start {
            return self.held_gain(&stages, index);
        }
        // Release fades from wherever the earlier stages left off
        let from = self.held_gain(&stages, release_start.saturating_sub(1));
        let remaining = (len - 1 - index) as f64;
        from * remaining / stages.release as f64
    }

    /// Shape `samples` in place
    pub fn apply(&self, samples: &mut [f64]) {
        let len = samples.len();
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample *= self.gain(i, len);
        }
    }
}
