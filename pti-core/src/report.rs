//! Instrument data table
//!
//! `InstrumentReport` is the human-facing summary of a header and its audio:
//! times are in milliseconds relative to the actual audio length, gains in dB
//! and panning centered on zero. Rows follow the playback mode; fields that do
//! not apply to the mode are left out.

use std::fmt;

use serde::Serialize;

use crate::automation::Automation;
use crate::header::{Header, MAX_RESONANCE};
use crate::playback::{is_wavetable, PlaybackCategory};
use crate::units::{
    convert_send, convert_volume, display_db, display_milliseconds, frames_to_ms, rel_offset,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WavetableReport {
    pub window_size: u16,
    pub total_positions: u16,
    pub position: u16,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GranularReport {
    pub length_ms: f64,
    pub position_ms: f64,
    pub shape: Option<String>,
    pub loop_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilterReport {
    pub filter_type: Option<String>,
    /// Cutoff in percent
    pub cutoff: u32,
    /// Resonance in percent of the maximum
    pub resonance: u32,
}

/// Data table for one instrument
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstrumentReport {
    pub name: String,
    pub length_ms: f64,
    /// Length recorded in the header, which may disagree with the audio
    pub header_length_ms: f64,
    pub playback: Option<String>,
    pub category: Option<PlaybackCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_start_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_end_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slices_ms: Option<Vec<f64>>,
    pub slices_ordered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wavetable: Option<WavetableReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granular: Option<GranularReport>,

    pub volume_db: f64,
    /// -50 (left) to 50 (right)
    pub panning: i16,
    pub tune: i8,
    pub finetune: i8,
    /// `None` when the filter is disabled
    pub filter: Option<FilterReport>,
    pub overdrive: u8,
    pub bit_depth: u8,
    /// Send levels in dB, `None` when silent
    pub reverb_send_db: Option<f64>,
    pub delay_send_db: Option<f64>,

    pub automation: Option<Automation>,
}

fn send_db(value: u8) -> Option<f64> {
    let db = convert_send(value);
    db.is_finite().then_some(db)
}

impl InstrumentReport {
    /// Build the report for `header` with `frames` frames of actual audio
    pub fn new(header: &Header, frames: usize) -> Self {
        let length_ms = frames_to_ms(frames);
        let at = |offset: u16| rel_offset(offset) * length_ms;
        let category = header.category();
        let playback_raw = header.sample_playback_raw();

        let timed = matches!(
            category,
            Some(PlaybackCategory::OneShot) | Some(PlaybackCategory::Loop)
        );
        let looped = category == Some(PlaybackCategory::Loop);

        let filter = header.filter_enabled().then(|| FilterReport {
            filter_type: header.filter_type().map(|t| t.label().to_string()),
            cutoff: (header.cutoff() * 100.0).floor() as u32,
            resonance: (header.resonance() / MAX_RESONANCE * 100.0).round() as u32,
        });

        Self {
            name: header.name(),
            length_ms,
            header_length_ms: frames_to_ms(header.sample_length() as usize),
            playback: header.sample_playback().map(|p| p.label().to_string()),
            category,
            start_ms: timed.then(|| at(header.playback_start())),
            loop_start_ms: looped.then(|| at(header.loop_start())),
            loop_end_ms: looped.then(|| at(header.loop_end())),
            end_ms: timed.then(|| at(header.playback_end())),
            slices_ms: (category == Some(PlaybackCategory::Sliced))
                .then(|| header.slices().into_iter().map(at).collect()),
            slices_ordered: header.slices_ordered(),
            wavetable: (header.is_wavetable() && is_wavetable(playback_raw)).then(|| {
                WavetableReport {
                    window_size: header.wavetable_window_size(),
                    total_positions: header.wavetable_total_positions(),
                    position: header.wavetable_position(),
                }
            }),
            granular: (category == Some(PlaybackCategory::Granular)).then(|| GranularReport {
                length_ms: frames_to_ms(header.granular_length() as usize),
                position_ms: at(header.granular_position()),
                shape: header.granular_shape().map(|s| s.label().to_string()),
                loop_mode: header.granular_loop_mode().map(|m| m.label().to_string()),
            }),
            volume_db: convert_volume(header.volume()),
            panning: header.panning() as i16 - 50,
            tune: header.tune(),
            finetune: header.finetune(),
            filter,
            overdrive: header.overdrive(),
            bit_depth: header.bit_depth(),
            reverb_send_db: send_db(header.reverb_send()),
            delay_send_db: send_db(header.delay_send()),
            automation: header.automation().ok(),
        }
    }

    /// Whether the header's sample length disagrees with the audio
    pub fn length_mismatch(&self) -> bool {
        self.header_length_ms != self.length_ms
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Label / value rows in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        let unknown = || "Unknown".to_string();

        rows.push(("Name", self.name.clone()));
        let mut length = display_milliseconds(self.length_ms);
        if self.length_mismatch() {
            length.push_str(&format!(
                " (header says: {})",
                display_milliseconds(self.header_length_ms)
            ));
        }
        rows.push(("Length", length));
        rows.push(("Playback", self.playback.clone().unwrap_or_else(unknown)));

        if let Some(start) = self.start_ms {
            rows.push(("Start", display_milliseconds(start)));
        }
        if let Some(loop_start) = self.loop_start_ms {
            rows.push(("Loop start", display_milliseconds(loop_start)));
        }
        if let Some(loop_end) = self.loop_end_ms {
            rows.push(("Loop end", display_milliseconds(loop_end)));
        }
        if let Some(end) = self.end_ms {
            rows.push(("End", display_milliseconds(end)));
        }

        if let Some(slices) = &self.slices_ms {
            rows.push(("Slices", slices.len().to_string()));
            for slice in slices {
                rows.push(("", display_milliseconds(*slice)));
            }
        }

        if let Some(wavetable) = &self.wavetable {
            rows.push(("Window size", wavetable.window_size.to_string()));
            rows.push(("Total positions", wavetable.total_positions.to_string()));
            rows.push(("Position", wavetable.position.to_string()));
        }

        if let Some(granular) = &self.granular {
            rows.push(("Length", display_milliseconds(granular.length_ms)));
            rows.push(("Position", display_milliseconds(granular.position_ms)));
            rows.push(("Shape", granular.shape.clone().unwrap_or_else(unknown)));
            rows.push(("Loop mode", granular.loop_mode.clone().unwrap_or_else(unknown)));
        }

        rows.push(("Volume", display_db(self.volume_db)));
        rows.push(("Panning", self.panning.to_string()));
        rows.push(("Tune", self.tune.to_string()));
        rows.push(("Finetune", self.finetune.to_string()));

        match &self.filter {
            None => rows.push(("Filter", "Disabled".to_string())),
            Some(filter) => {
                rows.push(("Filter", filter.filter_type.clone().unwrap_or_else(unknown)));
                rows.push(("Cutoff", filter.cutoff.to_string()));
                rows.push(("Resonance", filter.resonance.to_string()));
            }
        }

        rows.push(("Overdrive", self.overdrive.to_string()));
        rows.push(("Bit depth", self.bit_depth.to_string()));
        rows.push((
            "Reverb send",
            display_db(self.reverb_send_db.unwrap_or(f64::NEG_INFINITY)),
        ));
        rows.push((
            "Delay send",
            display_db(self.delay_send_db.unwrap_or(f64::NEG_INFINITY)),
        ));

        rows
    }
}

impl fmt::Display for InstrumentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in rows {
            writeln!(f, "{:width$}  {}", label, value, width = width)?;
        }
        Ok(())
    }
}
