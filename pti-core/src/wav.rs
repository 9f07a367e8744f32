//! Canonical WAV header model
//!
//! Only the plain 44-byte layout (RIFF, fmt, data in that order) is modeled.
//! That is what exports produce; arbitrary WAV input is decoded elsewhere.

use std::io::Cursor;

use binrw::{binrw, BinRead, BinWrite};
use serde::Serialize;

use crate::defaults::WAV_HEADER_SIZE;
use crate::error::{Error, Result};

#[binrw]
#[brw(little, magic = b"RIFF")]
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WavHeader {
    /// File size less 8 bytes
    pub riff_size: u32,
    #[brw(magic = b"WAVEfmt ")]
    pub fmt_size: u32,
    /// 1 = PCM
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    #[brw(magic = b"data")]
    pub data_size: u32,
}

impl WavHeader {
    /// Uncompressed PCM header with an empty data chunk
    pub fn pcm(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = channels * (bits_per_sample / 8);
        Self {
            riff_size: (WAV_HEADER_SIZE - 8) as u32,
            fmt_size: 16,
            audio_format: 1,
            channels,
            sample_rate,
            byte_rate: sample_rate * block_align as u32,
            block_align,
            bits_per_sample,
            data_size: 0,
        }
    }

    /// Mono 16-bit 44.1 kHz PCM, the layout the Tracker reads and writes
    pub fn tracker() -> Self {
        Self::pcm(1, 44_100, 16)
    }

    /// Set the data chunk length and the RIFF size that depends on it
    pub fn with_data_size(mut self, data_size: u32) -> Self {
        self.data_size = data_size;
        self.riff_size = ((WAV_HEADER_SIZE - 8) as u32).saturating_add(data_size);
        self
    }

    /// Serialize to the 44-byte on-disk form
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(WAV_HEADER_SIZE));
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Read the canonical header from the start of a WAV file
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(Error::WrongSize {
                expected: WAV_HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let mut cursor = Cursor::new(&bytes[..WAV_HEADER_SIZE]);
        Ok(WavHeader::read(&mut cursor)?)
    }

    /// Number of sample frames in the data chunk
    pub fn frames(&self) -> u32 {
        if self.block_align == 0 {
            return 0;
        }
        self.data_size / self.block_align as u32
    }

    /// Duration of the data chunk in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Whether this is the mono 16-bit 44.1 kHz PCM layout the Tracker uses
    pub fn is_tracker_compatible(&self) -> bool {
        self.audio_format == 1
            && self.channels == 1
            && self.sample_rate == 44_100
            && self.bits_per_sample == 16
    }
}
