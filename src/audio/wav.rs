//! PCM quantization and WAV container encoding

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::config::SUPPORTED_BIT_DEPTHS;
use crate::error::{Result, SynthError};

/// Largest positive integer sample for a bit depth, depth clamped to 1..=32
fn full_scale(bit_depth: u16) -> f64 {
    let bits = bit_depth.clamp(1, 32);
    ((1i64 << (bits - 1)) - 1) as f64
}

/// Convert a sample in -1.0..=1.0 to a signed integer at `bit_depth`
pub fn quantize(sample: f64, bit_depth: u16) -> i32 {
    (sample.clamp(-1.0, 1.0) * full_scale(bit_depth)).round() as i32
}

/// Encode mono samples as an uncompressed PCM WAV file in memory
pub fn encode_wav(samples: &[f64], sample_rate: u32, bit_depth: u16) -> Result<Vec<u8>> {
    if !SUPPORTED_BIT_DEPTHS.contains(&bit_depth) {
        return Err(SynthError::config(
            "bit_depth",
            format!("{} bits is not one of {:?}", bit_depth, SUPPORTED_BIT_DEPTHS),
        ));
    }
    if sample_rate == 0 {
        return Err(SynthError::config("sample_rate", "must be above 0 Hz"));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: bit_depth,
        sample_format: SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)
            .map_err(|e| SynthError::render(format!("Failed to start WAV stream: {}", e)))?;

        for &sample in samples {
            let value = quantize(sample, bit_depth);
            let written = match bit_depth {
                8 => writer.write_sample(value as i8),
                16 => writer.write_sample(value as i16),
                _ => writer.write_sample(value),
            };
            written.map_err(|e| SynthError::render(format!("Failed to write sample: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| SynthError::render(format!("Failed to finalize WAV: {}", e)))?;
    }

    Ok(bytes)
}

/// Text-safe encoding of container bytes for transport
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn write_wav_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, bytes)?;
    log::info!("Audio saved to {:?} ({} bytes)", path, bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_full_scale() {
        assert_eq!(quantize(1.0, 16), 32767);
        assert_eq!(quantize(-1.0, 16), -32767);
        assert_eq!(quantize(0.0, 16), 0);
        assert_eq!(quantize(2.0, 8), 127);
        assert_eq!(quantize(1.0, 24), 8_388_607);
        assert_eq!(quantize(-1.0, 32), -2_147_483_647);
    }

    #[test]
    fn test_wav_header() {
        let samples = vec![0.0, 0.5, -0.5, 1.0];
        let bytes = encode_wav(&samples, 44100, 16).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // 44-byte canonical header plus 2 bytes per sample
        assert_eq!(bytes.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn test_wav_reads_back() {
        let samples: Vec<f64> = (0..100).map(|i| (i as f64 / 100.0) - 0.5).collect();
        for bit_depth in [8u16, 16, 24, 32] {
            let bytes = encode_wav(&samples, 22050, bit_depth).unwrap();
            let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
            let spec = reader.spec();
            assert_eq!(spec.channels, 1);
            assert_eq!(spec.sample_rate, 22050);
            assert_eq!(spec.bits_per_sample, bit_depth);
            assert_eq!(reader.len(), 100);
        }
    }

    #[test]
    fn test_unsupported_bit_depth_rejected() {
        for bit_depth in [0u16, 12, 20, 64] {
            match encode_wav(&[0.5], 44100, bit_depth) {
                Err(SynthError::InvalidConfig { field, .. }) => assert_eq!(field, "bit_depth"),
                other => panic!("expected InvalidConfig for {} bits, got {:?}", bit_depth, other),
            }
        }
        assert!(matches!(
            encode_wav(&[0.5], 0, 16),
            Err(SynthError::InvalidConfig {
                field: "sample_rate",
                ..
            })
        ));
        assert_eq!(quantize(1.0, 0), 0);
    }

    #[test]
    fn test_empty_buffer_is_valid_wav() {
        let bytes = encode_wav(&[], 44100, 16).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    #[test]
    fn test_base64_is_text_safe() {
        let encoded = to_base64(b"RIFF");
        assert_eq!(encoded, "UklGRg==");
    }
}
