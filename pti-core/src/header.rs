//! .pti instrument header codec
//!
//! A header is a fixed 392-byte little-endian record. `Header` owns a private
//! copy of those bytes; getters decode straight from the buffer and setters
//! write through it, so the buffer always reflects every edit and can be
//! written back out as-is.
//!
//! Field layout:
//! - 20: wavetable flag (u8)
//! - 21..52: name (31 ASCII bytes, NUL padded)
//! - 60: sample length in frames (u32)
//! - 64 / 68: wavetable window size / total positions (u16)
//! - 76: sample playback mode (u8)
//! - 78, 80, 82, 84: playback start, loop start, loop end, playback end (u16 offsets)
//! - 88: wavetable position (u16)
//! - 92..260: automation (see `automation`)
//! - 260 / 264: filter cutoff / resonance (f32)
//! - 268 / 269: filter type / enabled (u8)
//! - 270 / 271: tune / finetune (i8)
//! - 272, 276, 278: volume, panning, delay send (u8)
//! - 280..376: slice table (48 x u16)
//! - 376: slice count (u8)
//! - 378 / 380: granular length (frames) / position (offset) (u16)
//! - 382 / 383: granular shape / loop mode (u8)
//! - 384, 385, 386: reverb send, overdrive, bit depth (u8)

use std::io::Cursor;

use binrw::BinRead;

use crate::automation::Automation;
use crate::defaults::{default_pti_header, ENVELOPE_START, LFO_START, LFO_SIZE, AUTOMATION_TARGETS};
use crate::error::{Error, Result};
use crate::magic::HEADER_SIZE;
use crate::playback::{
    classify, FilterType, GranularLoopMode, GranularShape, PlaybackCategory, SamplePlayback,
};

/// Length of the name field in bytes
pub const NAME_LEN: usize = 31;

/// Capacity of the slice table
pub const MAX_SLICES: usize = 48;

/// Upper bound for filter resonance
pub const MAX_RESONANCE: f32 = 4.3;

const IS_WAVETABLE: usize = 20;
const NAME: usize = 21;
const SAMPLE_LENGTH: usize = 60;
const WAVETABLE_WINDOW_SIZE: usize = 64;
const WAVETABLE_TOTAL_POSITIONS: usize = 68;
const SAMPLE_PLAYBACK: usize = 76;
const PLAYBACK_START: usize = 78;
const LOOP_START: usize = 80;
const LOOP_END: usize = 82;
const PLAYBACK_END: usize = 84;
const WAVETABLE_POSITION: usize = 88;
const CUTOFF: usize = 260;
const RESONANCE: usize = 264;
const FILTER_TYPE: usize = 268;
const FILTER_ENABLED: usize = 269;
const TUNE: usize = 270;
const FINETUNE: usize = 271;
const VOLUME: usize = 272;
const PANNING: usize = 276;
const DELAY_SEND: usize = 278;
const SLICES: usize = 280;
const NUM_SLICES: usize = 376;
const GRANULAR_LENGTH: usize = 378;
const GRANULAR_POSITION: usize = 380;
const GRANULAR_SHAPE: usize = 382;
const GRANULAR_LOOP_MODE: usize = 383;
const REVERB_SEND: usize = 384;
const OVERDRIVE: usize = 385;
const BIT_DEPTH: usize = 386;

/// Parsed .pti header with typed accessors
#[derive(Clone, PartialEq, Eq)]
pub struct Header {
    buf: [u8; HEADER_SIZE],
}

impl Header {
    /// Parse a header from exactly 392 bytes.
    ///
    /// The bytes are copied; later edits never touch the caller's buffer.
    /// Magic bytes are not checked here, see `magic::validate_header`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let buf: [u8; HEADER_SIZE] = bytes.try_into().map_err(|_| Error::WrongSize {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { buf })
    }

    /// A fresh header cloned from the default template
    pub fn new() -> Self {
        Self {
            buf: *default_pti_header(),
        }
    }

    /// Live byte representation including all edits
    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.buf
    }

    pub fn into_bytes(self) -> [u8; HEADER_SIZE] {
        self.buf
    }

    // Raw little-endian access

    fn u8_at(&self, offset: usize) -> u8 {
        self.buf[offset]
    }

    fn i8_at(&self, offset: usize) -> i8 {
        self.buf[offset] as i8
    }

    fn u16_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.buf[offset], self.buf[offset + 1]])
    }

    fn u32_at(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.buf[offset],
            self.buf[offset + 1],
            self.buf[offset + 2],
            self.buf[offset + 3],
        ])
    }

    fn f32_at(&self, offset: usize) -> f32 {
        f32::from_bits(self.u32_at(offset))
    }

    fn put_u8(&mut self, offset: usize, value: u8) {
        self.buf[offset] = value;
    }

    fn put_u16(&mut self, offset: usize, value: u16) {
        self.buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn put_u32(&mut self, offset: usize, value: u32) {
        self.buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn put_f32(&mut self, offset: usize, value: f32) {
        self.put_u32(offset, value.to_bits());
    }

    // Sample

    pub fn is_wavetable(&self) -> bool {
        self.u8_at(IS_WAVETABLE) == 1
    }

    pub fn set_is_wavetable(&mut self, value: bool) {
        self.put_u8(IS_WAVETABLE, value as u8);
    }

    /// Instrument name with NUL padding removed
    pub fn name(&self) -> String {
        self.buf[NAME..NAME + NAME_LEN]
            .iter()
            .filter(|b| **b != 0)
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect()
    }

    /// Set the instrument name.
    ///
    /// Names longer than 31 characters are truncated; non-ASCII characters
    /// are replaced with `?`.
    pub fn set_name(&mut self, value: &str) {
        let field = &mut self.buf[NAME..NAME + NAME_LEN];
        field.fill(0);
        for (slot, ch) in field.iter_mut().zip(value.chars()) {
            *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
        }
    }

    /// Sample length in frames as recorded in the header
    pub fn sample_length(&self) -> u32 {
        self.u32_at(SAMPLE_LENGTH)
    }

    pub fn set_sample_length(&mut self, value: u32) {
        self.put_u32(SAMPLE_LENGTH, value);
    }

    pub fn wavetable_window_size(&self) -> u16 {
        self.u16_at(WAVETABLE_WINDOW_SIZE)
    }

    pub fn set_wavetable_window_size(&mut self, value: u16) {
        self.put_u16(WAVETABLE_WINDOW_SIZE, value);
    }

    pub fn wavetable_total_positions(&self) -> u16 {
        self.u16_at(WAVETABLE_TOTAL_POSITIONS)
    }

    pub fn set_wavetable_total_positions(&mut self, value: u16) {
        self.put_u16(WAVETABLE_TOTAL_POSITIONS, value);
    }

    pub fn wavetable_position(&self) -> u16 {
        self.u16_at(WAVETABLE_POSITION)
    }

    pub fn set_wavetable_position(&mut self, value: u16) {
        self.put_u16(WAVETABLE_POSITION, value);
    }

    // Playback

    /// Raw playback mode byte, may hold values outside the known modes
    pub fn sample_playback_raw(&self) -> u8 {
        self.u8_at(SAMPLE_PLAYBACK)
    }

    pub fn sample_playback(&self) -> Option<SamplePlayback> {
        SamplePlayback::try_from(self.sample_playback_raw()).ok()
    }

    pub fn set_sample_playback(&mut self, value: SamplePlayback) {
        self.put_u8(SAMPLE_PLAYBACK, value as u8);
    }

    pub fn category(&self) -> Option<PlaybackCategory> {
        classify(self.sample_playback_raw())
    }

    pub fn playback_start(&self) -> u16 {
        self.u16_at(PLAYBACK_START)
    }

    pub fn loop_start(&self) -> u16 {
        self.u16_at(LOOP_START)
    }

    pub fn loop_end(&self) -> u16 {
        self.u16_at(LOOP_END)
    }

    pub fn playback_end(&self) -> u16 {
        self.u16_at(PLAYBACK_END)
    }

    fn offsets(&self) -> (u32, u32, u32, u32) {
        (
            self.playback_start() as u32,
            self.loop_start() as u32,
            self.loop_end() as u32,
            self.playback_end() as u32,
        )
    }

    fn put_offsets(&mut self, start: u32, loop_start: u32, loop_end: u32, end: u32) {
        self.put_u16(PLAYBACK_START, start as u16);
        self.put_u16(LOOP_START, loop_start as u16);
        self.put_u16(LOOP_END, loop_end as u16);
        self.put_u16(PLAYBACK_END, end as u16);
    }

    /// Whether `start < loop start < loop end < end` currently holds
    pub fn offsets_ordered(&self) -> bool {
        let (start, loop_start, loop_end, end) = self.offsets();
        start < loop_start && loop_start < loop_end && loop_end < end
    }

    /// Bring out-of-order offsets into strict order before an edit.
    /// Keeps playback start where possible; a collapsed loop is reopened to
    /// span the playback range.
    fn normalize_offsets(&mut self) {
        if self.offsets_ordered() {
            return;
        }
        let (start, loop_start, loop_end, end) = self.offsets();
        let end = end.max(3);
        let start = start.min(end - 3);
        let loop_start = loop_start.clamp(start + 1, end - 2);
        let loop_end = if loop_end > loop_start && loop_end < end {
            loop_end
        } else {
            end - 1
        };
        self.put_offsets(start, loop_start, loop_end, end);
    }

    /// Set playback start, pushing loop start and loop end up if needed
    pub fn set_playback_start(&mut self, value: u16) {
        self.normalize_offsets();
        let (_, mut loop_start, mut loop_end, end) = self.offsets();
        let start = (value as u32).min(end - 3);
        if loop_start <= start {
            loop_start = start + 1;
        }
        if loop_end <= loop_start {
            loop_end = loop_start + 1;
        }
        self.put_offsets(start, loop_start, loop_end, end);
    }

    /// Set loop start, clamped between playback start and loop end
    pub fn set_loop_start(&mut self, value: u16) {
        self.normalize_offsets();
        let (start, _, loop_end, _) = self.offsets();
        let loop_start = (value as u32).clamp(start + 1, loop_end - 1);
        self.put_u16(LOOP_START, loop_start as u16);
    }

    /// Set loop end, clamped between loop start and playback end
    pub fn set_loop_end(&mut self, value: u16) {
        self.normalize_offsets();
        let (_, loop_start, _, end) = self.offsets();
        let loop_end = (value as u32).clamp(loop_start + 1, end - 1);
        self.put_u16(LOOP_END, loop_end as u16);
    }

    /// Set playback end, dragging loop end and loop start down if needed
    pub fn set_playback_end(&mut self, value: u16) {
        self.normalize_offsets();
        let (start, mut loop_start, mut loop_end, _) = self.offsets();
        let end = (value as u32).max(start + 3);
        if loop_end >= end {
            loop_end = end - 1;
        }
        if loop_start >= loop_end {
            loop_start = loop_end - 1;
        }
        self.put_offsets(start, loop_start, loop_end, end);
    }

    // Filter

    pub fn cutoff(&self) -> f32 {
        self.f32_at(CUTOFF)
    }

    /// Set filter cutoff, clamped to 0.0..=1.0
    pub fn set_cutoff(&mut self, value: f32) {
        self.put_f32(CUTOFF, clamp_f32(value, 0.0, 1.0));
    }

    pub fn resonance(&self) -> f32 {
        self.f32_at(RESONANCE)
    }

    /// Set filter resonance, clamped to 0.0..=4.3
    pub fn set_resonance(&mut self, value: f32) {
        self.put_f32(RESONANCE, clamp_f32(value, 0.0, MAX_RESONANCE));
    }

    pub fn filter_type(&self) -> Option<FilterType> {
        FilterType::try_from(self.u8_at(FILTER_TYPE)).ok()
    }

    pub fn set_filter_type(&mut self, value: FilterType) {
        self.put_u8(FILTER_TYPE, value as u8);
    }

    pub fn filter_enabled(&self) -> bool {
        self.u8_at(FILTER_ENABLED) != 0
    }

    pub fn set_filter_enabled(&mut self, value: bool) {
        self.put_u8(FILTER_ENABLED, value as u8);
    }

    // Instrument parameters

    /// Coarse tune in semitones
    pub fn tune(&self) -> i8 {
        self.i8_at(TUNE)
    }

    pub fn set_tune(&mut self, value: i8) {
        self.put_u8(TUNE, value.clamp(-24, 24) as u8);
    }

    /// Fine tune in cents
    pub fn finetune(&self) -> i8 {
        self.i8_at(FINETUNE)
    }

    pub fn set_finetune(&mut self, value: i8) {
        self.put_u8(FINETUNE, value.clamp(-100, 100) as u8);
    }

    pub fn volume(&self) -> u8 {
        self.u8_at(VOLUME)
    }

    pub fn set_volume(&mut self, value: u8) {
        self.put_u8(VOLUME, value.min(100));
    }

    /// Panning, 50 is center
    pub fn panning(&self) -> u8 {
        self.u8_at(PANNING)
    }

    pub fn set_panning(&mut self, value: u8) {
        self.put_u8(PANNING, value.min(100));
    }

    pub fn delay_send(&self) -> u8 {
        self.u8_at(DELAY_SEND)
    }

    pub fn set_delay_send(&mut self, value: u8) {
        self.put_u8(DELAY_SEND, value.min(100));
    }

    pub fn reverb_send(&self) -> u8 {
        self.u8_at(REVERB_SEND)
    }

    pub fn set_reverb_send(&mut self, value: u8) {
        self.put_u8(REVERB_SEND, value.min(100));
    }

    pub fn overdrive(&self) -> u8 {
        self.u8_at(OVERDRIVE)
    }

    pub fn set_overdrive(&mut self, value: u8) {
        self.put_u8(OVERDRIVE, value.min(100));
    }

    pub fn bit_depth(&self) -> u8 {
        self.u8_at(BIT_DEPTH)
    }

    pub fn set_bit_depth(&mut self, value: u8) {
        self.put_u8(BIT_DEPTH, value.clamp(1, 16));
    }

    // Slices

    pub fn num_slices(&self) -> u8 {
        self.u8_at(NUM_SLICES)
    }

    pub fn set_num_slices(&mut self, value: u8) {
        self.put_u8(NUM_SLICES, value.min(MAX_SLICES as u8));
    }

    /// The first `num_slices` entries of the slice table.
    ///
    /// Entries are returned as stored; ordering is not checked.
    pub fn slices(&self) -> Vec<u16> {
        let count = (self.num_slices() as usize).min(MAX_SLICES);
        (0..count).map(|i| self.u16_at(SLICES + i * 2)).collect()
    }

    /// Replace the slice table. At most 48 entries are kept; unused entries
    /// are zeroed.
    pub fn set_slices(&mut self, slices: &[u16]) {
        let count = slices.len().min(MAX_SLICES);
        for i in 0..MAX_SLICES {
            let value = if i < count { slices[i] } else { 0 };
            self.put_u16(SLICES + i * 2, value);
        }
        self.put_u8(NUM_SLICES, count as u8);
    }

    /// Whether the active slices are strictly increasing
    pub fn slices_ordered(&self) -> bool {
        self.slices().windows(2).all(|pair| pair[0] < pair[1])
    }

    // Granular

    /// Grain length in frames
    pub fn granular_length(&self) -> u16 {
        self.u16_at(GRANULAR_LENGTH)
    }

    pub fn set_granular_length(&mut self, value: u16) {
        self.put_u16(GRANULAR_LENGTH, value);
    }

    pub fn granular_position(&self) -> u16 {
        self.u16_at(GRANULAR_POSITION)
    }

    pub fn set_granular_position(&mut self, value: u16) {
        self.put_u16(GRANULAR_POSITION, value);
    }

    pub fn granular_shape(&self) -> Option<GranularShape> {
        GranularShape::try_from(self.u8_at(GRANULAR_SHAPE)).ok()
    }

    pub fn set_granular_shape(&mut self, value: GranularShape) {
        self.put_u8(GRANULAR_SHAPE, value as u8);
    }

    pub fn granular_loop_mode(&self) -> Option<GranularLoopMode> {
        GranularLoopMode::try_from(self.u8_at(GRANULAR_LOOP_MODE)).ok()
    }

    pub fn set_granular_loop_mode(&mut self, value: GranularLoopMode) {
        self.put_u8(GRANULAR_LOOP_MODE, value as u8);
    }

    // Automation

    /// Decode the envelope and LFO blocks (read-only)
    pub fn automation(&self) -> Result<Automation> {
        let end = LFO_START + AUTOMATION_TARGETS * LFO_SIZE;
        let mut cursor = Cursor::new(&self.buf[ENVELOPE_START..end]);
        Ok(Automation::read(&mut cursor)?)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("name", &self.name())
            .field("sample_length", &self.sample_length())
            .field("sample_playback", &self.sample_playback_raw())
            .field("playback_start", &self.playback_start())
            .field("loop_start", &self.loop_start())
            .field("loop_end", &self.loop_end())
            .field("playback_end", &self.playback_end())
            .field("num_slices", &self.num_slices())
            .finish_non_exhaustive()
    }
}

/// Clamp that maps NaN to the lower bound
fn clamp_f32(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sliced_header() -> Header {
        let mut bytes = *default_pti_header();
        bytes[SAMPLE_PLAYBACK] = SamplePlayback::Slice as u8;
        bytes[NUM_SLICES] = 3;
        bytes[SLICES..SLICES + 2].copy_from_slice(&0u16.to_le_bytes());
        bytes[SLICES + 2..SLICES + 4].copy_from_slice(&20000u16.to_le_bytes());
        bytes[SLICES + 4..SLICES + 6].copy_from_slice(&40000u16.to_le_bytes());
        Header::parse(&bytes).unwrap()
    }

    /// Small deterministic generator for edit sequences
    struct Lcg(u64);

    impl Lcg {
        fn next_u16(&mut self) -> u16 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 48) as u16
        }
    }

    #[test]
    fn test_parse_wrong_size() {
        let err = Header::parse(&[0u8; 391]).unwrap_err();
        assert!(matches!(err, Error::WrongSize { expected: 392, actual: 391 }));
    }

    #[test]
    fn test_parse_copies_input() {
        let original = *default_pti_header();
        let mut header = Header::parse(&original).unwrap();
        header.set_volume(80);
        assert_eq!(original[VOLUME], 50);
        assert_eq!(header.as_bytes()[VOLUME], 80);
    }

    #[test]
    fn test_unmodified_bytes_roundtrip() {
        let mut bytes = [0u8; HEADER_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i * 7 % 256) as u8;
        }
        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.as_bytes(), &bytes);
    }

    #[test]
    fn test_default_values() {
        let header = Header::new();
        assert_eq!(header.name(), "");
        assert_eq!(header.wavetable_window_size(), 2048);
        assert_eq!(header.playback_start(), 0);
        assert_eq!(header.loop_start(), 1);
        assert_eq!(header.loop_end(), 65534);
        assert_eq!(header.playback_end(), 65535);
        assert_eq!(header.cutoff(), 1.0);
        assert_eq!(header.volume(), 50);
        assert_eq!(header.panning(), 50);
        assert_eq!(header.granular_length(), 441);
        assert_eq!(header.bit_depth(), 16);
        assert_eq!(header.sample_playback(), Some(SamplePlayback::OneShot));
        assert!(header.offsets_ordered());
    }

    #[test]
    fn test_slices_example() {
        let header = sliced_header();
        assert_eq!(header.slices(), vec![0, 20000, 40000]);
        assert_eq!(header.category(), Some(PlaybackCategory::Sliced));
        assert!(header.slices_ordered());
    }

    #[test]
    fn test_set_slices() {
        let mut header = Header::new();
        header.set_slices(&[100, 50]);
        assert_eq!(header.slices(), vec![100, 50]);
        assert!(!header.slices_ordered());

        let many: Vec<u16> = (0..60).map(|i| i * 1000).collect();
        header.set_slices(&many);
        assert_eq!(header.num_slices(), 48);
        assert_eq!(header.slices(), many[..48].to_vec());

        header.set_num_slices(200);
        assert_eq!(header.num_slices(), 48);
    }

    #[test]
    fn test_name_roundtrip() {
        let mut header = Header::new();
        header.set_name("Kick 01");
        assert_eq!(header.name(), "Kick 01");
        assert_eq!(header.as_bytes()[NAME + 7], 0);

        header.set_name("Snare");
        assert_eq!(header.name(), "Snare");
    }

    #[test]
    fn test_name_truncated() {
        let mut header = Header::new();
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        header.set_name(long);
        assert_eq!(header.name(), &long[..NAME_LEN]);
        // Byte after the field is untouched
        assert_eq!(header.as_bytes()[NAME + NAME_LEN], 0);
    }

    #[test]
    fn test_name_non_ascii() {
        let mut header = Header::new();
        header.set_name("Bäss");
        assert_eq!(header.name(), "B?ss");
    }

    #[test]
    fn test_numeric_clamping() {
        let mut header = Header::new();
        header.set_volume(150);
        header.set_panning(101);
        header.set_delay_send(200);
        header.set_reverb_send(255);
        header.set_overdrive(120);
        header.set_tune(-50);
        header.set_finetune(127);
        header.set_bit_depth(0);
        header.set_cutoff(1.5);
        header.set_resonance(-1.0);

        assert_eq!(header.volume(), 100);
        assert_eq!(header.panning(), 100);
        assert_eq!(header.delay_send(), 100);
        assert_eq!(header.reverb_send(), 100);
        assert_eq!(header.overdrive(), 100);
        assert_eq!(header.tune(), -24);
        assert_eq!(header.finetune(), 100);
        assert_eq!(header.bit_depth(), 1);
        assert_eq!(header.cutoff(), 1.0);
        assert_eq!(header.resonance(), 0.0);

        header.set_bit_depth(32);
        assert_eq!(header.bit_depth(), 16);
        header.set_resonance(10.0);
        assert_eq!(header.resonance(), MAX_RESONANCE);
        header.set_cutoff(f32::NAN);
        assert_eq!(header.cutoff(), 0.0);
    }

    #[test]
    fn test_signed_fields() {
        let mut header = Header::new();
        header.set_tune(-12);
        header.set_finetune(-37);
        assert_eq!(header.as_bytes()[TUNE], 244);
        assert_eq!(header.tune(), -12);
        assert_eq!(header.finetune(), -37);
    }

    #[test]
    fn test_enum_fields() {
        let mut header = Header::new();
        header.set_sample_playback(SamplePlayback::Granular);
        header.set_filter_type(FilterType::HighPass);
        header.set_filter_enabled(true);
        header.set_granular_shape(GranularShape::Gauss);
        header.set_granular_loop_mode(GranularLoopMode::PingPong);

        assert_eq!(header.sample_playback_raw(), 7);
        assert_eq!(header.filter_type(), Some(FilterType::HighPass));
        assert!(header.filter_enabled());
        assert_eq!(header.granular_shape(), Some(GranularShape::Gauss));
        assert_eq!(header.granular_loop_mode(), Some(GranularLoopMode::PingPong));

        let mut bytes = *header.as_bytes();
        bytes[SAMPLE_PLAYBACK] = 42;
        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.sample_playback(), None);
        assert_eq!(header.category(), None);
    }

    #[test]
    fn test_playback_start_pushes_loop() {
        let mut header = Header::new();
        header.set_loop_start(100);
        header.set_loop_end(200);
        header.set_playback_start(150);
        assert_eq!(header.playback_start(), 150);
        assert_eq!(header.loop_start(), 151);
        assert_eq!(header.loop_end(), 200);

        header.set_playback_start(300);
        assert_eq!(header.loop_start(), 301);
        assert_eq!(header.loop_end(), 302);

        header.set_playback_start(65535);
        assert_eq!(header.playback_start(), 65532);
        assert_eq!(header.loop_start(), 65533);
        assert_eq!(header.loop_end(), 65534);
        assert_eq!(header.playback_end(), 65535);
    }

    #[test]
    fn test_playback_end_drags_loop() {
        let mut header = Header::new();
        header.set_loop_start(1000);
        header.set_playback_end(1000);
        assert_eq!(header.playback_end(), 1000);
        assert_eq!(header.loop_end(), 999);
        assert_eq!(header.loop_start(), 998);

        header.set_playback_end(0);
        assert_eq!(header.playback_end(), 3);
        assert_eq!(header.loop_end(), 2);
        assert_eq!(header.loop_start(), 1);
        assert_eq!(header.playback_start(), 0);
    }

    #[test]
    fn test_loop_points_clamped_without_cascade() {
        let mut header = Header::new();
        header.set_playback_start(1000);
        header.set_playback_end(5000);

        header.set_loop_start(0);
        assert_eq!(header.loop_start(), 1001);

        header.set_loop_end(60000);
        assert_eq!(header.loop_end(), 4999);

        header.set_loop_start(6000);
        assert_eq!(header.loop_start(), 4998);

        header.set_loop_end(0);
        assert_eq!(header.loop_end(), 4999);
        assert_eq!(header.playback_start(), 1000);
        assert_eq!(header.playback_end(), 5000);
    }

    #[test]
    fn test_unordered_offsets_normalized_on_write() {
        let mut bytes = *default_pti_header();
        for offset in [PLAYBACK_START, LOOP_START, LOOP_END] {
            bytes[offset..offset + 2].copy_from_slice(&0u16.to_le_bytes());
        }
        let mut header = Header::parse(&bytes).unwrap();
        assert!(!header.offsets_ordered());

        header.set_loop_start(500);
        assert!(header.offsets_ordered());
        assert_eq!(header.playback_start(), 0);
        assert_eq!(header.loop_start(), 500);
        assert_eq!(header.playback_end(), 65535);
    }

    #[test]
    fn test_offset_invariant_holds_for_any_edit_sequence() {
        let mut rng = Lcg(0x5eed);
        let mut header = Header::new();
        for _ in 0..5000 {
            let value = rng.next_u16();
            match rng.next_u16() % 4 {
                0 => header.set_playback_start(value),
                1 => header.set_loop_start(value),
                2 => header.set_loop_end(value),
                _ => header.set_playback_end(value),
            }
            assert!(
                header.offsets_ordered(),
                "broken ordering: {:?}",
                header
            );
        }
    }

    #[test]
    fn test_automation_decoding() {
        let automation = Header::new().automation().unwrap();
        for envelope in &automation.envelopes {
            assert_eq!(envelope.amount, 1.0);
            assert_eq!(envelope.sustain, 1.0);
            assert_eq!(envelope.release, 1000);
        }
        assert!(automation.envelopes[0].is_enabled());
        assert!(!automation.envelopes[1].is_enabled());
        for lfo in &automation.lfos {
            assert_eq!(lfo.shape, 2);
            assert_eq!(lfo.amount, 0.5);
        }
    }
}
