//! Header edits from command-line flags

use clap::Args;
use tracing::{debug, warn};

use pti_core::playback::FilterType;
use pti_core::reactive::{FieldChange, FieldEdit, HeaderWatcher};
use pti_core::{Header, ObservedHeader, SamplePlayback};

#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    /// Instrument name (31 ASCII characters max)
    #[arg(long)]
    pub name: Option<String>,

    /// Sample playback mode (oneshot, forward, backward, pingpong, slice, beatslice, wavetable, granular)
    #[arg(long, value_parser = parse_playback)]
    pub playback: Option<SamplePlayback>,

    /// Playback start offset (0-65535)
    #[arg(long)]
    pub start: Option<u16>,

    /// Loop start offset (0-65535)
    #[arg(long)]
    pub loop_start: Option<u16>,

    /// Loop end offset (0-65535)
    #[arg(long)]
    pub loop_end: Option<u16>,

    /// Playback end offset (0-65535)
    #[arg(long)]
    pub end: Option<u16>,

    /// Comma separated slice offsets (0-65535, at most 48)
    #[arg(long, value_delimiter = ',')]
    pub slices: Option<Vec<u16>>,

    /// Volume (0-100, 50 is unity gain)
    #[arg(long)]
    pub volume: Option<u8>,

    /// Panning (0-100, 50 is center)
    #[arg(long)]
    pub panning: Option<u8>,

    /// Tune in semitones (-24..24)
    #[arg(long, allow_negative_numbers = true)]
    pub tune: Option<i8>,

    /// Finetune in cents (-100..100)
    #[arg(long, allow_negative_numbers = true)]
    pub finetune: Option<i8>,

    /// Enable the filter with the given type (lowpass, highpass, bandpass)
    #[arg(long, value_parser = parse_filter)]
    pub filter: Option<FilterType>,

    /// Filter cutoff (0.0-1.0)
    #[arg(long)]
    pub cutoff: Option<f32>,

    /// Filter resonance (0.0-4.3)
    #[arg(long)]
    pub resonance: Option<f32>,

    /// Overdrive (0-100)
    #[arg(long)]
    pub overdrive: Option<u8>,

    /// Bit depth (1-16)
    #[arg(long)]
    pub bit_depth: Option<u8>,

    /// Reverb send (0-100)
    #[arg(long)]
    pub reverb_send: Option<u8>,

    /// Delay send (0-100)
    #[arg(long)]
    pub delay_send: Option<u8>,
}

fn parse_playback(value: &str) -> Result<SamplePlayback, String> {
    SamplePlayback::from_name(value).ok_or_else(|| format!("unknown playback mode '{}'", value))
}

fn parse_filter(value: &str) -> Result<FilterType, String> {
    match value.to_lowercase().replace('-', "").as_str() {
        "lowpass" | "lp" => Ok(FilterType::LowPass),
        "highpass" | "hp" => Ok(FilterType::HighPass),
        "bandpass" | "bp" => Ok(FilterType::BandPass),
        _ => Err(format!("unknown filter type '{}'", value)),
    }
}

impl EditArgs {
    /// Requested edits in application order
    pub fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = Vec::new();

        if let Some(name) = &self.name {
            edits.push(FieldEdit::Name(name.clone()));
        }
        if let Some(playback) = self.playback {
            edits.push(FieldEdit::SamplePlayback(playback));
        }
        // Offsets are applied outermost first
        if let Some(v) = self.start {
            edits.push(FieldEdit::PlaybackStart(v));
        }
        if let Some(v) = self.end {
            edits.push(FieldEdit::PlaybackEnd(v));
        }
        if let Some(v) = self.loop_start {
            edits.push(FieldEdit::LoopStart(v));
        }
        if let Some(v) = self.loop_end {
            edits.push(FieldEdit::LoopEnd(v));
        }
        if let Some(slices) = &self.slices {
            edits.push(FieldEdit::Slices(slices.clone()));
        }
        if let Some(v) = self.volume {
            edits.push(FieldEdit::Volume(v));
        }
        if let Some(v) = self.panning {
            edits.push(FieldEdit::Panning(v));
        }
        if let Some(v) = self.tune {
            edits.push(FieldEdit::Tune(v));
        }
        if let Some(v) = self.finetune {
            edits.push(FieldEdit::Finetune(v));
        }
        if let Some(v) = self.filter {
            edits.push(FieldEdit::FilterType(v));
            edits.push(FieldEdit::FilterEnabled(true));
        }
        if let Some(v) = self.cutoff {
            edits.push(FieldEdit::Cutoff(v));
        }
        if let Some(v) = self.resonance {
            edits.push(FieldEdit::Resonance(v));
        }
        if let Some(v) = self.overdrive {
            edits.push(FieldEdit::Overdrive(v));
        }
        if let Some(v) = self.bit_depth {
            edits.push(FieldEdit::BitDepth(v));
        }
        if let Some(v) = self.reverb_send {
            edits.push(FieldEdit::ReverbSend(v));
        }
        if let Some(v) = self.delay_send {
            edits.push(FieldEdit::DelaySend(v));
        }

        edits
    }

    /// Apply all requested edits to `header`
    pub fn apply(&self, header: Header) -> Header {
        let edits = self.edits();
        if edits.is_empty() {
            return header;
        }

        let mut observed = ObservedHeader::new(header);
        observed.watch(EditLog::default());
        for edit in edits {
            observed.apply(edit);
        }

        let header = observed.revoke();
        if !header.slices_ordered() {
            warn!("Slice offsets are not in ascending order: {:?}", header.slices());
        }
        header
    }
}

/// Logs each committed edit and warns when a value was clamped
#[derive(Default)]
struct EditLog {
    requested: Option<FieldEdit>,
}

impl HeaderWatcher for EditLog {
    fn before_update(&mut self, edit: &FieldEdit) {
        self.requested = Some(edit.clone());
    }

    fn after_update(&mut self, change: &FieldChange) {
        match self.requested.take() {
            Some(requested) if requested != change.value => {
                warn!(
                    "{:?} adjusted: requested {:?}, stored {:?}",
                    change.field, requested, change.value
                );
            }
            _ => debug!("{:?} set to {:?}", change.field, change.value),
        }
    }
}
