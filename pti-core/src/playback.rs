//! Playback modes and the enumerated header fields
//!
//! The classifier predicates take the raw `samplePlayback` byte so that
//! headers carrying an unknown mode degrade to "no category" instead of
//! failing to parse.

use std::fmt;

use serde::Serialize;

/// Sample playback mode (header byte 76)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SamplePlayback {
    OneShot = 0,
    ForwardLoop = 1,
    BackwardLoop = 2,
    PingPongLoop = 3,
    Slice = 4,
    BeatSlice = 5,
    Wavetable = 6,
    Granular = 7,
}

impl SamplePlayback {
    pub const ALL: [SamplePlayback; 8] = [
        SamplePlayback::OneShot,
        SamplePlayback::ForwardLoop,
        SamplePlayback::BackwardLoop,
        SamplePlayback::PingPongLoop,
        SamplePlayback::Slice,
        SamplePlayback::BeatSlice,
        SamplePlayback::Wavetable,
        SamplePlayback::Granular,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SamplePlayback::OneShot => "1-Shot",
            SamplePlayback::ForwardLoop => "Forward loop",
            SamplePlayback::BackwardLoop => "Backward loop",
            SamplePlayback::PingPongLoop => "PingPong loop",
            SamplePlayback::Slice => "Slice",
            SamplePlayback::BeatSlice => "Beat slice",
            SamplePlayback::Wavetable => "Wavetable",
            SamplePlayback::Granular => "Granular",
        }
    }

    /// Parse a command-line style name ("oneshot", "forward", "slice", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "oneshot" | "1shot" => Some(SamplePlayback::OneShot),
            "forward" | "forwardloop" | "loop" => Some(SamplePlayback::ForwardLoop),
            "backward" | "backwardloop" => Some(SamplePlayback::BackwardLoop),
            "pingpong" | "pingpongloop" => Some(SamplePlayback::PingPongLoop),
            "slice" => Some(SamplePlayback::Slice),
            "beatslice" => Some(SamplePlayback::BeatSlice),
            "wavetable" => Some(SamplePlayback::Wavetable),
            "granular" => Some(SamplePlayback::Granular),
            _ => None,
        }
    }
}

impl TryFrom<u8> for SamplePlayback {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SamplePlayback::ALL
            .get(value as usize)
            .copied()
            .ok_or(value)
    }
}

impl fmt::Display for SamplePlayback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filter type (header byte 268)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterType {
    LowPass = 0,
    HighPass = 1,
    BandPass = 2,
}

impl FilterType {
    pub fn label(&self) -> &'static str {
        match self {
            FilterType::LowPass => "Low-pass",
            FilterType::HighPass => "High-pass",
            FilterType::BandPass => "Band-pass",
        }
    }
}

impl TryFrom<u8> for FilterType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FilterType::LowPass),
            1 => Ok(FilterType::HighPass),
            2 => Ok(FilterType::BandPass),
            _ => Err(value),
        }
    }
}

/// Grain envelope shape (header byte 382)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[repr(u8)]
pub enum GranularShape {
    Square = 0,
    Triangle = 1,
    Gauss = 2,
}

impl GranularShape {
    pub fn label(&self) -> &'static str {
        match self {
            GranularShape::Square => "Square",
            GranularShape::Triangle => "Triangle",
            GranularShape::Gauss => "Gauss",
        }
    }
}

impl TryFrom<u8> for GranularShape {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GranularShape::Square),
            1 => Ok(GranularShape::Triangle),
            2 => Ok(GranularShape::Gauss),
            _ => Err(value),
        }
    }
}

/// Grain playback direction (header byte 383)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[repr(u8)]
pub enum GranularLoopMode {
    Forward = 0,
    Backward = 1,
    PingPong = 2,
}

impl GranularLoopMode {
    pub fn label(&self) -> &'static str {
        match self {
            GranularLoopMode::Forward => "Forward",
            GranularLoopMode::Backward => "Backward",
            GranularLoopMode::PingPong => "PingPong",
        }
    }
}

impl TryFrom<u8> for GranularLoopMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GranularLoopMode::Forward),
            1 => Ok(GranularLoopMode::Backward),
            2 => Ok(GranularLoopMode::PingPong),
            _ => Err(value),
        }
    }
}

/// Behavioral category a playback mode belongs to
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PlaybackCategory {
    OneShot,
    Loop,
    Sliced,
    Wavetable,
    Granular,
}

pub fn is_one_shot(sample_playback: u8) -> bool {
    sample_playback == SamplePlayback::OneShot as u8
}

pub fn is_loop(sample_playback: u8) -> bool {
    (SamplePlayback::ForwardLoop as u8..=SamplePlayback::PingPongLoop as u8)
        .contains(&sample_playback)
}

pub fn is_sliced(sample_playback: u8) -> bool {
    (SamplePlayback::Slice as u8..=SamplePlayback::BeatSlice as u8).contains(&sample_playback)
}

pub fn is_wavetable(sample_playback: u8) -> bool {
    sample_playback == SamplePlayback::Wavetable as u8
}

pub fn is_granular(sample_playback: u8) -> bool {
    sample_playback == SamplePlayback::Granular as u8
}

/// Map a raw playback byte to its category, `None` for unknown modes
pub fn classify(sample_playback: u8) -> Option<PlaybackCategory> {
    if is_one_shot(sample_playback) {
        Some(PlaybackCategory::OneShot)
    } else if is_loop(sample_playback) {
        Some(PlaybackCategory::Loop)
    } else if is_sliced(sample_playback) {
        Some(PlaybackCategory::Sliced)
    } else if is_wavetable(sample_playback) {
        Some(PlaybackCategory::Wavetable)
    } else if is_granular(sample_playback) {
        Some(PlaybackCategory::Granular)
    } else {
        None
    }
}
