//! Default header templates
//!
//! Both templates are built on first use and cached for the lifetime of the
//! process. New instruments imported from plain audio files start from the
//! .pti template. The WAV template is the serialized `WavHeader::tracker()`.
//!
//! .pti layout of the automation region (little-endian):
//! - 92..212: six envelopes, 20 bytes each
//!   (volume, panning, cutoff, wavetable position, granular position, finetune)
//! - 212..260: six LFOs, 8 bytes each, same target order

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::magic::{primary_magic, HEADER_SIZE, MAGIC_LEN};
use crate::wav::WavHeader;

/// Size of the canonical WAV header in bytes
pub const WAV_HEADER_SIZE: usize = 44;

/// First envelope block offset
pub const ENVELOPE_START: usize = 92;
/// Size of one envelope block
pub const ENVELOPE_SIZE: usize = 20;
/// First LFO block offset
pub const LFO_START: usize = 212;
/// Size of one LFO block
pub const LFO_SIZE: usize = 8;
/// Number of automation targets
pub const AUTOMATION_TARGETS: usize = 6;

/// Default envelope release time in milliseconds
const DEFAULT_RELEASE_MS: u16 = 1000;
/// Default LFO shape (triangle)
const DEFAULT_LFO_SHAPE: u8 = 2;

static DEFAULT_PTI_HEADER: OnceLock<[u8; HEADER_SIZE]> = OnceLock::new();
static DEFAULT_WAV_HEADER: OnceLock<[u8; WAV_HEADER_SIZE]> = OnceLock::new();

/// The canonical 392-byte .pti header
pub fn default_pti_header() -> &'static [u8; HEADER_SIZE] {
    DEFAULT_PTI_HEADER.get_or_init(build_pti_header)
}

/// The canonical 44-byte WAV header for mono 16-bit 44.1 kHz PCM.
///
/// The data size field is zero.
pub fn default_wav_header() -> Result<&'static [u8; WAV_HEADER_SIZE]> {
    if let Some(header) = DEFAULT_WAV_HEADER.get() {
        return Ok(header);
    }
    let header = build_wav_header()?;
    Ok(DEFAULT_WAV_HEADER.get_or_init(|| header))
}

fn build_pti_header() -> [u8; HEADER_SIZE] {
    let mut data = [0u8; HEADER_SIZE];

    data[..MAGIC_LEN].copy_from_slice(&primary_magic());

    // 64: wavetable window size
    data[64..66].copy_from_slice(&2048u16.to_le_bytes());

    // 80..86: loop start, loop end, playback end
    data[80..82].copy_from_slice(&1u16.to_le_bytes());
    data[82..84].copy_from_slice(&65534u16.to_le_bytes());
    data[84..86].copy_from_slice(&65535u16.to_le_bytes());

    for target in 0..AUTOMATION_TARGETS {
        let env = ENVELOPE_START + target * ENVELOPE_SIZE;
        data[env..env + 4].copy_from_slice(&1.0f32.to_le_bytes()); // amount
        data[env + 12..env + 16].copy_from_slice(&1.0f32.to_le_bytes()); // sustain
        data[env + 16..env + 18].copy_from_slice(&DEFAULT_RELEASE_MS.to_le_bytes());

        let lfo = LFO_START + target * LFO_SIZE;
        data[lfo] = DEFAULT_LFO_SHAPE;
        data[lfo + 4..lfo + 8].copy_from_slice(&0.5f32.to_le_bytes()); // amount
    }

    // Volume envelope enabled
    data[ENVELOPE_START + 19] = 1;

    // 260: filter cutoff fully open
    data[260..264].copy_from_slice(&1.0f32.to_le_bytes());

    data[272] = 50; // volume
    data[276] = 50; // panning

    // 378: granular length in frames (10 ms)
    data[378..380].copy_from_slice(&441u16.to_le_bytes());

    data[386] = 16; // bit depth

    data
}

fn build_wav_header() -> Result<[u8; WAV_HEADER_SIZE]> {
    let bytes = WavHeader::tracker().to_bytes()?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| Error::WrongSize {
        expected: WAV_HEADER_SIZE,
        actual: len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::validate_header;

    #[test]
    fn test_default_pti_is_cached() {
        let a = default_pti_header();
        let b = default_pti_header();
        assert_eq!(a, b);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_default_pti_passes_validation() {
        assert!(validate_header(default_pti_header()).valid);
    }

    #[test]
    fn test_default_pti_fields() {
        let data = default_pti_header();
        assert_eq!(&data[0..2], b"TI");
        assert_eq!(data[5], 5);
        assert_eq!(u16::from_le_bytes([data[64], data[65]]), 2048);
        assert_eq!(u16::from_le_bytes([data[78], data[79]]), 0);
        assert_eq!(u16::from_le_bytes([data[80], data[81]]), 1);
        assert_eq!(u16::from_le_bytes([data[82], data[83]]), 65534);
        assert_eq!(u16::from_le_bytes([data[84], data[85]]), 65535);
        assert_eq!(f32::from_le_bytes([data[260], data[261], data[262], data[263]]), 1.0);
        assert_eq!(data[272], 50);
        assert_eq!(data[276], 50);
        assert_eq!(u16::from_le_bytes([data[378], data[379]]), 441);
        assert_eq!(data[386], 16);
    }

    #[test]
    fn test_default_automation_blocks() {
        let data = default_pti_header();
        for target in 0..AUTOMATION_TARGETS {
            let env = ENVELOPE_START + target * ENVELOPE_SIZE;
            let amount = f32::from_le_bytes([data[env], data[env + 1], data[env + 2], data[env + 3]]);
            let release = u16::from_le_bytes([data[env + 16], data[env + 17]]);
            assert_eq!(amount, 1.0);
            assert_eq!(release, 1000);

            let lfo = LFO_START + target * LFO_SIZE;
            assert_eq!(data[lfo], 2);
            let lfo_amount = f32::from_le_bytes([data[lfo + 4], data[lfo + 5], data[lfo + 6], data[lfo + 7]]);
            assert_eq!(lfo_amount, 0.5);
        }
        assert_eq!(LFO_START + AUTOMATION_TARGETS * LFO_SIZE, 260);
    }

    #[test]
    fn test_default_wav_header() {
        let data = default_wav_header().unwrap();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
        assert_eq!(&data[12..16], b"fmt ");
        assert_eq!(&data[36..40], b"data");
        assert_eq!(u32::from_le_bytes([data[24], data[25], data[26], data[27]]), 44_100);
        assert_eq!(u32::from_le_bytes([data[40], data[41], data[42], data[43]]), 0);
        assert_eq!(u32::from_le_bytes([data[4], data[5], data[6], data[7]]), 36);
        assert!(std::ptr::eq(default_wav_header().unwrap(), data));
    }
}
