use anyhow::{Context, Result};
use hound::WavReader;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Header information of a WAV recording
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl WavInfo {
    /// Probe an in-memory WAV file without decoding its samples
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).context("Failed to parse WAV header")?;
        Ok(Self::from_reader(&reader))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
        Ok(Self::from_reader(&reader))
    }

    fn from_reader<R: std::io::Read>(reader: &WavReader<R>) -> Self {
        let spec = reader.spec();
        // `duration` counts frames, i.e. samples per channel
        let frames = reader.duration();
        let duration_seconds = frames as f64 / spec.sample_rate as f64;

        debug!(
            "WAV probed: {:.1}s, {}Hz, {} channels",
            duration_seconds, spec.sample_rate, spec.channels
        );

        Self {
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        }
    }

    /// Duration rounded to whole seconds
    pub fn whole_seconds(&self) -> u64 {
        self.duration_seconds.round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn wav_bytes(seconds: u32, sample_rate: u32, channels: u16) -> Vec<u8> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..(seconds * sample_rate * channels as u32) {
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_probe_mono_duration() {
        let info = WavInfo::from_bytes(&wav_bytes(2, 16000, 1)).unwrap();
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.whole_seconds(), 2);
    }

    #[test]
    fn test_probe_stereo_counts_frames() {
        let info = WavInfo::from_bytes(&wav_bytes(3, 8000, 2)).unwrap();
        assert_eq!(info.channels, 2);
        assert!((info.duration_seconds - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_probe_rejects_non_wav() {
        assert!(WavInfo::from_bytes(b"ID3 definitely not a wav").is_err());
    }
}
