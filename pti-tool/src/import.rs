//! Audio ingestion
//!
//! Decodes arbitrary audio files with Symphonia into mono f32 at 44.1 kHz,
//! the only format a .pti instrument can carry.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use pti_core::units::SAMPLE_RATE;
use pti_core::Error;

/// Decoded mono audio
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    /// Rate of the source before resampling
    pub source_rate: u32,
    pub channels: usize,
}

/// Decode an audio file to mono f32 at 44.1 kHz
pub fn decode_audio(path: &Path) -> anyhow::Result<DecodedAudio> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioDecode(e.to_string()))?;

    let mut format = probed.format;

    let (track_id, source_rate, channels, codec_params) = {
        let track = format
            .default_track()
            .ok_or_else(|| Error::AudioDecode("No default track".to_string()))?;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| Error::AudioDecode("Unknown sample rate".to_string()))?;
        let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
        (track.id, sample_rate, channels, track.codec_params.clone())
    };

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode(e.to_string()))?;

    let mut mixer = MonoMixer::default();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(e) => return Err(Error::AudioDecode(e.to_string()).into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| Error::AudioDecode(e.to_string()))?;
        mixer.push(decoded);
    }

    let mut samples = mixer.samples;
    if samples.is_empty() {
        return Err(Error::AudioDecode("No audio frames decoded".to_string()).into());
    }

    debug!(
        "Decoded {} frames at {} Hz, {} channel(s)",
        samples.len(),
        source_rate,
        channels
    );

    if source_rate != SAMPLE_RATE {
        debug!("Resampling {} Hz -> {} Hz", source_rate, SAMPLE_RATE);
        samples = resample_linear(&samples, source_rate, SAMPLE_RATE);
    }

    Ok(DecodedAudio {
        samples,
        source_rate,
        channels,
    })
}

/// Accumulates decoded packets of any sample format as mono f32.
///
/// Symphonia converts every format to interleaved f32; each frame is then
/// the mean of its channels.
#[derive(Default)]
struct MonoMixer {
    interleaved: Option<SampleBuffer<f32>>,
    samples: Vec<f32>,
}

impl MonoMixer {
    fn push(&mut self, decoded: AudioBufferRef<'_>) {
        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if channels == 0 || decoded.frames() == 0 {
            return;
        }

        let capacity = decoded.capacity();
        let needed = capacity * channels;
        if !self
            .interleaved
            .as_ref()
            .is_some_and(|buf| buf.capacity() >= needed)
        {
            self.interleaved = None;
        }
        let buf = self
            .interleaved
            .get_or_insert_with(|| SampleBuffer::new(capacity as u64, spec));

        buf.copy_interleaved_ref(decoded);
        self.samples.extend(
            buf.samples()
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    }
}

/// Linear interpolation resampler
pub fn resample_linear(samples: &[f32], from: u32, to: u32) -> Vec<f32> {
    if from == to || samples.is_empty() || from == 0 {
        return samples.to_vec();
    }

    let ratio = from as f64 / to as f64;
    let out_len = (samples.len() as f64 / ratio).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = (pos.floor() as usize).min(last);
            let frac = (pos - idx as f64) as f32;
            let a = samples[idx];
            let b = samples[(idx + 1).min(last)];
            a + (b - a) * frac
        })
        .collect()
}

/// Extensions the bundled Symphonia codecs can import
const AUDIO_EXTENSIONS: &[&str] = &["wav", "aif", "aiff", "flac", "mp3", "m4a", "aac"];

/// Whether `path` is a regular file with an importable audio extension
pub fn is_audio_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                AUDIO_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pti_core::wav::WavHeader;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_is_audio_file() {
        let tmp = TempDir::new().unwrap();

        let wav_path = tmp.path().join("kick.wav");
        File::create(&wav_path).unwrap();
        let flac_path = tmp.path().join("PAD.FLAC");
        File::create(&flac_path).unwrap();
        let pti_path = tmp.path().join("kick.pti");
        File::create(&pti_path).unwrap();
        let no_ext_path = tmp.path().join("kick");
        File::create(&no_ext_path).unwrap();

        assert!(is_audio_file(&wav_path));
        assert!(is_audio_file(&flac_path));
        assert!(!is_audio_file(&pti_path));
        assert!(!is_audio_file(&no_ext_path));
        assert!(!is_audio_file(Path::new("nonexistent.wav")));
    }

    #[test]
    fn test_resample_same_rate() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&samples, 44_100, 44_100), samples);
    }

    #[test]
    fn test_resample_upsample() {
        let samples = vec![0.0, 1.0, 0.0, -1.0];
        let out = resample_linear(&samples, 22_050, 44_100);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.5);
        assert_eq!(out[2], 1.0);
        assert_eq!(out[3], 0.5);
        // Holds the last sample past the end
        assert_eq!(out[7], -1.0);
    }

    #[test]
    fn test_resample_downsample() {
        let samples: Vec<f32> = (0..96).map(|i| i as f32).collect();
        let out = resample_linear(&samples, 48_000, 44_100);
        assert_eq!(out.len(), 88);
        assert_eq!(out[0], 0.0);
        assert!(out.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_decode_wav_export() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tone.wav");
        let audio: Vec<f32> = (0..441).map(|i| (i as f32 / 441.0) - 0.5).collect();
        std::fs::write(&path, pti_core::to_wav_file(&audio).unwrap()).unwrap();

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.source_rate, 44_100);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 441);
        assert!((decoded.samples[0] + 0.5).abs() < 0.001);
    }

    /// Uncompressed PCM WAV with the given interleaved sample bytes
    fn pcm_wav(channels: u16, sample_rate: u32, bits: u16, data: &[u8]) -> Vec<u8> {
        let mut bytes = WavHeader::pcm(channels, sample_rate, bits)
            .with_data_size(data.len() as u32)
            .to_bytes()
            .unwrap();
        bytes.extend_from_slice(data);
        bytes
    }

    #[test]
    fn test_decode_8bit_wav() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lofi.wav");
        // Unsigned 8-bit, 128 is silence
        std::fs::write(&path, pcm_wav(1, 44_100, 8, &[192u8; 1000])).unwrap();

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.samples.len(), 1000);
        assert!(decoded.samples.iter().all(|s| (s - 0.5).abs() < 0.01));
    }

    #[test]
    fn test_decode_stereo_averages_channels() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stereo.wav");
        let mut data = Vec::new();
        for _ in 0..100 {
            data.extend_from_slice(&16384i16.to_le_bytes());
            data.extend_from_slice(&(-8192i16).to_le_bytes());
        }
        std::fs::write(&path, pcm_wav(2, 44_100, 16, &data)).unwrap();

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.samples.len(), 100);
        assert!(decoded.samples.iter().all(|s| (s - 0.125).abs() < 1e-4));
    }

    #[test]
    fn test_decode_resamples_to_44100() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("half_rate.wav");
        let data: Vec<u8> = (0..2205).flat_map(|_| 8192i16.to_le_bytes()).collect();
        std::fs::write(&path, pcm_wav(1, 22_050, 16, &data)).unwrap();

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.source_rate, 22_050);
        assert_eq!(decoded.samples.len(), 4410);
        assert!(decoded.samples.iter().all(|s| (s - 0.25).abs() < 1e-3));
    }

    #[test]
    fn test_decode_empty_wav_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.wav");
        std::fs::write(&path, pcm_wav(1, 44_100, 16, &[])).unwrap();
        assert!(decode_audio(&path).is_err());
    }

    #[test]
    fn test_decode_garbage_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.wav");
        std::fs::write(&path, b"not audio at all").unwrap();
        assert!(decode_audio(&path).is_err());
    }
}
