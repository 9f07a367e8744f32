//! Playback regions and offline preview rendering
//!
//! `PlaybackPlan` turns the header offsets into frame ranges for a given
//! amount of audio. `render_preview` uses the plan to produce what a single
//! trigger of the instrument sounds like, with volume and bit depth applied.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::header::Header;
use crate::playback::{PlaybackCategory, SamplePlayback};
use crate::units::{convert_volume, db_to_gain, offset_to_frame};

/// Half-open range of sample frames
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Frame ranges derived from a header for a concrete sample
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlaybackPlan {
    pub mode: Option<SamplePlayback>,
    pub category: Option<PlaybackCategory>,
    pub frames: usize,
    /// Range played on trigger
    pub instrument: Region,
    /// Loop body, loop modes only
    pub loop_region: Option<Region>,
    /// One region per slice, sliced modes only
    pub slices: Vec<Region>,
}

impl PlaybackPlan {
    pub fn new(header: &Header, frames: usize) -> Self {
        let category = header.category();
        let to_frame = |offset: u16| offset_to_frame(offset, frames);
        let whole = Region { start: 0, end: frames };

        let instrument = match category {
            Some(PlaybackCategory::OneShot) | Some(PlaybackCategory::Loop) => {
                let start = to_frame(header.playback_start());
                let end = to_frame(header.playback_end()).max(start);
                Region { start, end }
            }
            _ => whole,
        };

        let loop_region = match category {
            Some(PlaybackCategory::Loop) => {
                let start = to_frame(header.loop_start()).clamp(instrument.start, instrument.end);
                let end = to_frame(header.loop_end()).clamp(start, instrument.end);
                Some(Region { start, end })
            }
            _ => None,
        };

        let slices = match category {
            Some(PlaybackCategory::Sliced) => {
                let starts: Vec<usize> = header.slices().into_iter().map(to_frame).collect();
                starts
                    .iter()
                    .enumerate()
                    .map(|(i, &start)| {
                        let end = starts.get(i + 1).copied().unwrap_or(frames).max(start);
                        Region { start, end }
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        Self {
            mode: header.sample_playback(),
            category,
            frames,
            instrument,
            loop_region,
            slices,
        }
    }
}

/// Quantize a sample to `bit_depth` bits (1..=16)
pub fn bitcrush(sample: f32, bit_depth: u8) -> f32 {
    let step = 0.5f32.powi(bit_depth.clamp(1, 16) as i32 - 1);
    step * (sample / step + 0.5).floor()
}

/// Render one trigger of the instrument, or of a single slice.
///
/// Loop modes play up to the loop end and then the loop body once more in
/// the loop direction. Wavetable and granular modes render the whole sample.
pub fn render_preview(header: &Header, audio: &[f32], slice: Option<usize>) -> Result<Vec<f32>> {
    let plan = PlaybackPlan::new(header, audio.len());

    let mut output: Vec<f32> = match (plan.category, slice) {
        (Some(PlaybackCategory::Sliced), Some(index)) => {
            let region = plan.slices.get(index).ok_or(Error::SliceOutOfRange {
                index,
                count: plan.slices.len(),
            })?;
            audio[region.start..region.end].to_vec()
        }
        (_, Some(index)) => {
            return Err(Error::SliceOutOfRange { index, count: 0 });
        }
        (Some(PlaybackCategory::Loop), None) => {
            let body = plan.loop_region.unwrap_or(plan.instrument);
            let mut out = audio[plan.instrument.start..body.end].to_vec();
            let looped = &audio[body.start..body.end];
            match plan.mode {
                Some(SamplePlayback::BackwardLoop) => out.extend(looped.iter().rev()),
                Some(SamplePlayback::PingPongLoop) => {
                    out.extend(looped.iter().rev());
                    out.extend_from_slice(looped);
                }
                _ => out.extend_from_slice(looped),
            }
            out
        }
        (Some(PlaybackCategory::OneShot), None) => {
            audio[plan.instrument.start..plan.instrument.end].to_vec()
        }
        _ => audio.to_vec(),
    };

    let gain = db_to_gain(convert_volume(header.volume())) as f32;
    let bit_depth = header.bit_depth();
    for sample in output.iter_mut() {
        *sample *= gain;
        if bit_depth < 16 {
            *sample = bitcrush(*sample, bit_depth);
        }
    }

    Ok(output)
}
