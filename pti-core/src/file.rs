//! .pti and .wav file encoding
//!
//! A .pti file is the 392-byte header followed by mono signed 16-bit
//! little-endian PCM at 44.1 kHz. WAV exports wrap the same PCM in the
//! canonical 44-byte RIFF header.

use crate::defaults::WAV_HEADER_SIZE;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::magic::{validate_header, HEADER_SIZE};
use crate::wav::WavHeader;

/// Split a .pti file into its header and PCM payload.
pub fn split_pti_file(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::WrongSize {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }
    let (header, audio) = bytes.split_at(HEADER_SIZE);
    if audio.len() % 2 != 0 {
        return Err(Error::OddAudioLength(audio.len()));
    }
    Ok((header, audio))
}

/// Decode signed 16-bit little-endian PCM to float samples
pub fn pcm_to_f32(pcm: &[u8]) -> Result<Vec<f32>> {
    if pcm.len() % 2 != 0 {
        return Err(Error::OddAudioLength(pcm.len()));
    }
    Ok(pcm
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32767.0)
        .collect())
}

/// Encode float samples as signed 16-bit little-endian PCM.
///
/// Samples are clamped to [-1.0, 1.0] and scaled by 32767 with rounding.
pub fn f32_to_pcm(audio: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(audio.len() * 2);
    append_pcm(audio, &mut pcm);
    pcm
}

fn append_pcm(audio: &[f32], output: &mut Vec<u8>) {
    for sample in audio {
        let value = (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        output.extend_from_slice(&value.to_le_bytes());
    }
}

/// Build a .pti file from a header (with all edits) and mono audio
pub fn to_pti_file(audio: &[f32], header: &Header) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(HEADER_SIZE + audio.len() * 2);
    buffer.extend_from_slice(header.as_bytes());
    append_pcm(audio, &mut buffer);
    buffer
}

/// Build a mono 16-bit 44.1 kHz WAV file
pub fn to_wav_file(audio: &[f32]) -> Result<Vec<u8>> {
    let data_size = u32::try_from(audio.len() * 2).map_err(|_| Error::WrongSize {
        expected: u32::MAX as usize,
        actual: audio.len() * 2,
    })?;

    let mut buffer = WavHeader::tracker().with_data_size(data_size).to_bytes()?;
    buffer.reserve(audio.len() * 2);
    append_pcm(audio, &mut buffer);
    Ok(buffer)
}

/// A loaded instrument: header plus decoded audio
#[derive(Debug, Clone)]
pub struct PtiFile {
    pub header: Header,
    pub audio: Vec<f32>,
}

impl PtiFile {
    /// Validate and decode a complete .pti file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header_bytes, pcm) = split_pti_file(bytes)?;
        validate_header(header_bytes).into_result()?;
        Ok(Self {
            header: Header::parse(header_bytes)?,
            audio: pcm_to_f32(pcm)?,
        })
    }

    /// Start a new instrument from decoded audio using the default header.
    ///
    /// `name` and the sample length are filled in from the audio source.
    pub fn from_audio(name: &str, audio: Vec<f32>) -> Self {
        let mut header = Header::new();
        header.set_name(name);
        header.set_sample_length(audio.len().min(u32::MAX as usize) as u32);
        Self { header, audio }
    }

    pub fn to_pti_bytes(&self) -> Vec<u8> {
        to_pti_file(&self.audio, &self.header)
    }

    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        to_wav_file(&self.audio)
    }

    /// File name for exports, `<name>.<extension>`.
    ///
    /// The name comes from the file itself, so path separators and other
    /// characters that are not portable in file names become `_`.
    pub fn file_name(&self, extension: &str) -> String {
        let name: String = self
            .header
            .name()
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        if name.chars().all(|c| c == '.') {
            format!("instrument.{}", extension)
        } else {
            format!("{}.{}", name, extension)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_pti_header;
    use crate::wav::WavHeader;

    #[test]
    fn test_pti_roundtrip_preserves_header() {
        let mut original = *default_pti_header();
        // Unknown bytes must survive as well
        original[52] = 0xAB;
        original[100] = 0xCD;
        original[390] = 0xEF;

        let header = Header::parse(&original).unwrap();
        let file = to_pti_file(&[0.0, 0.5, -0.5], &header);
        let (header_bytes, _) = split_pti_file(&file).unwrap();
        let reparsed = Header::parse(header_bytes).unwrap();
        assert_eq!(reparsed.as_bytes(), &original);
    }

    #[test]
    fn test_pti_layout() {
        let header = Header::new();
        let file = to_pti_file(&[1.0, -1.0, 0.0], &header);
        assert_eq!(file.len(), HEADER_SIZE + 6);
        assert_eq!(&file[..HEADER_SIZE], header.as_bytes());
        assert_eq!(&file[HEADER_SIZE..HEADER_SIZE + 2], &32767i16.to_le_bytes());
        assert_eq!(&file[HEADER_SIZE + 2..HEADER_SIZE + 4], &(-32767i16).to_le_bytes());
        assert_eq!(&file[HEADER_SIZE + 4..], &[0, 0]);
    }

    #[test]
    fn test_pti_reflects_edits() {
        let mut header = Header::new();
        header.set_name("Edited");
        header.set_volume(75);
        let file = to_pti_file(&[], &header);
        let reparsed = Header::parse(&file).unwrap();
        assert_eq!(reparsed.name(), "Edited");
        assert_eq!(reparsed.volume(), 75);
    }

    #[test]
    fn test_pcm_rounding_and_clamping() {
        let pcm = f32_to_pcm(&[0.5, 2.0, -3.0, 0.00002]);
        let values: Vec<i16> = pcm
            .chunks_exact(2)
            .map(|p| i16::from_le_bytes([p[0], p[1]]))
            .collect();
        assert_eq!(values, vec![16384, 32767, -32767, 1]);
    }

    #[test]
    fn test_pcm_to_f32() {
        let mut pcm = Vec::new();
        pcm.extend_from_slice(&32767i16.to_le_bytes());
        pcm.extend_from_slice(&0i16.to_le_bytes());
        pcm.extend_from_slice(&(-32767i16).to_le_bytes());
        assert_eq!(pcm_to_f32(&pcm).unwrap(), vec![1.0, 0.0, -1.0]);

        assert!(matches!(pcm_to_f32(&[0, 0, 0]), Err(Error::OddAudioLength(3))));
    }

    #[test]
    fn test_split_errors() {
        assert!(matches!(
            split_pti_file(&[0u8; 100]),
            Err(Error::WrongSize { expected: 392, actual: 100 })
        ));
        assert!(matches!(
            split_pti_file(&[0u8; HEADER_SIZE + 3]),
            Err(Error::OddAudioLength(3))
        ));
    }

    #[test]
    fn test_wav_file() {
        let audio = vec![0.25f32; 100];
        let wav = to_wav_file(&audio).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_SIZE + 200);

        let header = WavHeader::parse(&wav).unwrap();
        assert_eq!(header.data_size, 200);
        assert_eq!(header.riff_size, 36 + 200);
        assert_eq!(header.frames(), 100);
        assert!(header.is_tracker_compatible());
        assert_eq!(&wav[44..46], &8192i16.to_le_bytes());
    }

    #[test]
    fn test_pti_file_from_bytes() {
        let header = Header::new();
        let bytes = to_pti_file(&[0.5, -0.5], &header);
        let file = PtiFile::from_bytes(&bytes).unwrap();
        assert_eq!(file.audio.len(), 2);
        assert_eq!(file.header, header);

        let mut broken = bytes.clone();
        broken[1] = b'X';
        assert!(matches!(PtiFile::from_bytes(&broken), Err(Error::BadMagic(1))));
    }

    #[test]
    fn test_pti_file_from_audio() {
        let file = PtiFile::from_audio("Imported loop", vec![0.0; 4410]);
        assert_eq!(file.header.name(), "Imported loop");
        assert_eq!(file.header.sample_length(), 4410);
        assert_eq!(file.file_name("pti"), "Imported loop.pti");

        let unnamed = PtiFile::from_audio("", Vec::new());
        assert_eq!(unnamed.file_name("wav"), "instrument.wav");
    }

    #[test]
    fn test_file_name_stays_in_directory() {
        let file = PtiFile::from_audio("../x", Vec::new());
        assert_eq!(file.file_name("wav"), ".._x.wav");

        let file = PtiFile::from_audio("a/b\\c:d", Vec::new());
        assert_eq!(file.file_name("pti"), "a_b_c_d.pti");

        let file = PtiFile::from_audio("..", Vec::new());
        assert_eq!(file.file_name("pti"), "instrument.pti");

        let file = PtiFile::from_audio("/", Vec::new());
        assert_eq!(file.file_name("pti"), "_.pti");
    }

    #[test]
    fn test_empty_wav_matches_template() {
        let wav = to_wav_file(&[]).unwrap();
        assert_eq!(&wav[..], &crate::defaults::default_wav_header().unwrap()[..]);
    }
}
