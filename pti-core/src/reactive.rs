//! Change notification layer over `Header`
//!
//! `ObservedHeader` funnels every edit through `apply`, so watchers see each
//! committed value in registration order. Dispatch is synchronous.

use std::fmt;

use serde::Serialize;

use crate::header::Header;
use crate::playback::{FilterType, GranularLoopMode, GranularShape, SamplePlayback};

/// Editable header field identifiers
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    SampleLength,
    IsWavetable,
    WavetableWindowSize,
    WavetableTotalPositions,
    WavetablePosition,
    SamplePlayback,
    PlaybackStart,
    LoopStart,
    LoopEnd,
    PlaybackEnd,
    Cutoff,
    Resonance,
    FilterType,
    FilterEnabled,
    Tune,
    Finetune,
    Volume,
    Panning,
    DelaySend,
    ReverbSend,
    Overdrive,
    BitDepth,
    Slices,
    GranularLength,
    GranularPosition,
    GranularShape,
    GranularLoopMode,
}

/// A requested edit carrying the value the caller asked for
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    SampleLength(u32),
    IsWavetable(bool),
    WavetableWindowSize(u16),
    WavetableTotalPositions(u16),
    WavetablePosition(u16),
    SamplePlayback(SamplePlayback),
    PlaybackStart(u16),
    LoopStart(u16),
    LoopEnd(u16),
    PlaybackEnd(u16),
    Cutoff(f32),
    Resonance(f32),
    FilterType(FilterType),
    FilterEnabled(bool),
    Tune(i8),
    Finetune(i8),
    Volume(u8),
    Panning(u8),
    DelaySend(u8),
    ReverbSend(u8),
    Overdrive(u8),
    BitDepth(u8),
    Slices(Vec<u16>),
    GranularLength(u16),
    GranularPosition(u16),
    GranularShape(GranularShape),
    GranularLoopMode(GranularLoopMode),
}

impl FieldEdit {
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::Name(_) => Field::Name,
            FieldEdit::SampleLength(_) => Field::SampleLength,
            FieldEdit::IsWavetable(_) => Field::IsWavetable,
            FieldEdit::WavetableWindowSize(_) => Field::WavetableWindowSize,
            FieldEdit::WavetableTotalPositions(_) => Field::WavetableTotalPositions,
            FieldEdit::WavetablePosition(_) => Field::WavetablePosition,
            FieldEdit::SamplePlayback(_) => Field::SamplePlayback,
            FieldEdit::PlaybackStart(_) => Field::PlaybackStart,
            FieldEdit::LoopStart(_) => Field::LoopStart,
            FieldEdit::LoopEnd(_) => Field::LoopEnd,
            FieldEdit::PlaybackEnd(_) => Field::PlaybackEnd,
            FieldEdit::Cutoff(_) => Field::Cutoff,
            FieldEdit::Resonance(_) => Field::Resonance,
            FieldEdit::FilterType(_) => Field::FilterType,
            FieldEdit::FilterEnabled(_) => Field::FilterEnabled,
            FieldEdit::Tune(_) => Field::Tune,
            FieldEdit::Finetune(_) => Field::Finetune,
            FieldEdit::Volume(_) => Field::Volume,
            FieldEdit::Panning(_) => Field::Panning,
            FieldEdit::DelaySend(_) => Field::DelaySend,
            FieldEdit::ReverbSend(_) => Field::ReverbSend,
            FieldEdit::Overdrive(_) => Field::Overdrive,
            FieldEdit::BitDepth(_) => Field::BitDepth,
            FieldEdit::Slices(_) => Field::Slices,
            FieldEdit::GranularLength(_) => Field::GranularLength,
            FieldEdit::GranularPosition(_) => Field::GranularPosition,
            FieldEdit::GranularShape(_) => Field::GranularShape,
            FieldEdit::GranularLoopMode(_) => Field::GranularLoopMode,
        }
    }

    /// Write this edit into `header` through the clamping setters
    pub fn apply_to(&self, header: &mut Header) {
        match self {
            FieldEdit::Name(v) => header.set_name(v),
            FieldEdit::SampleLength(v) => header.set_sample_length(*v),
            FieldEdit::IsWavetable(v) => header.set_is_wavetable(*v),
            FieldEdit::WavetableWindowSize(v) => header.set_wavetable_window_size(*v),
            FieldEdit::WavetableTotalPositions(v) => header.set_wavetable_total_positions(*v),
            FieldEdit::WavetablePosition(v) => header.set_wavetable_position(*v),
            FieldEdit::SamplePlayback(v) => header.set_sample_playback(*v),
            FieldEdit::PlaybackStart(v) => header.set_playback_start(*v),
            FieldEdit::LoopStart(v) => header.set_loop_start(*v),
            FieldEdit::LoopEnd(v) => header.set_loop_end(*v),
            FieldEdit::PlaybackEnd(v) => header.set_playback_end(*v),
            FieldEdit::Cutoff(v) => header.set_cutoff(*v),
            FieldEdit::Resonance(v) => header.set_resonance(*v),
            FieldEdit::FilterType(v) => header.set_filter_type(*v),
            FieldEdit::FilterEnabled(v) => header.set_filter_enabled(*v),
            FieldEdit::Tune(v) => header.set_tune(*v),
            FieldEdit::Finetune(v) => header.set_finetune(*v),
            FieldEdit::Volume(v) => header.set_volume(*v),
            FieldEdit::Panning(v) => header.set_panning(*v),
            FieldEdit::DelaySend(v) => header.set_delay_send(*v),
            FieldEdit::ReverbSend(v) => header.set_reverb_send(*v),
            FieldEdit::Overdrive(v) => header.set_overdrive(*v),
            FieldEdit::BitDepth(v) => header.set_bit_depth(*v),
            FieldEdit::Slices(v) => header.set_slices(v),
            FieldEdit::GranularLength(v) => header.set_granular_length(*v),
            FieldEdit::GranularPosition(v) => header.set_granular_position(*v),
            FieldEdit::GranularShape(v) => header.set_granular_shape(*v),
            FieldEdit::GranularLoopMode(v) => header.set_granular_loop_mode(*v),
        }
    }

    /// The value `field` now holds in `header`, as an edit
    pub fn read(field: Field, header: &Header) -> Option<FieldEdit> {
        Some(match field {
            Field::Name => FieldEdit::Name(header.name()),
            Field::SampleLength => FieldEdit::SampleLength(header.sample_length()),
            Field::IsWavetable => FieldEdit::IsWavetable(header.is_wavetable()),
            Field::WavetableWindowSize => {
                FieldEdit::WavetableWindowSize(header.wavetable_window_size())
            }
            Field::WavetableTotalPositions => {
                FieldEdit::WavetableTotalPositions(header.wavetable_total_positions())
            }
            Field::WavetablePosition => FieldEdit::WavetablePosition(header.wavetable_position()),
            Field::SamplePlayback => FieldEdit::SamplePlayback(header.sample_playback()?),
            Field::PlaybackStart => FieldEdit::PlaybackStart(header.playback_start()),
            Field::LoopStart => FieldEdit::LoopStart(header.loop_start()),
            Field::LoopEnd => FieldEdit::LoopEnd(header.loop_end()),
            Field::PlaybackEnd => FieldEdit::PlaybackEnd(header.playback_end()),
            Field::Cutoff => FieldEdit::Cutoff(header.cutoff()),
            Field::Resonance => FieldEdit::Resonance(header.resonance()),
            Field::FilterType => FieldEdit::FilterType(header.filter_type()?),
            Field::FilterEnabled => FieldEdit::FilterEnabled(header.filter_enabled()),
            Field::Tune => FieldEdit::Tune(header.tune()),
            Field::Finetune => FieldEdit::Finetune(header.finetune()),
            Field::Volume => FieldEdit::Volume(header.volume()),
            Field::Panning => FieldEdit::Panning(header.panning()),
            Field::DelaySend => FieldEdit::DelaySend(header.delay_send()),
            Field::ReverbSend => FieldEdit::ReverbSend(header.reverb_send()),
            Field::Overdrive => FieldEdit::Overdrive(header.overdrive()),
            Field::BitDepth => FieldEdit::BitDepth(header.bit_depth()),
            Field::Slices => FieldEdit::Slices(header.slices()),
            Field::GranularLength => FieldEdit::GranularLength(header.granular_length()),
            Field::GranularPosition => FieldEdit::GranularPosition(header.granular_position()),
            Field::GranularShape => FieldEdit::GranularShape(header.granular_shape()?),
            Field::GranularLoopMode => FieldEdit::GranularLoopMode(header.granular_loop_mode()?),
        })
    }
}

/// A committed edit: the field and the value it holds after clamping
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: Field,
    pub value: FieldEdit,
}

/// Observer of header edits.
///
/// Any `FnMut(&FieldChange)` closure is a watcher that only listens to
/// committed changes.
pub trait HeaderWatcher {
    /// Called before the edit is written
    fn before_update(&mut self, _edit: &FieldEdit) {}

    /// Called after the edit is written, with the committed value
    fn after_update(&mut self, _change: &FieldChange) {}
}

impl<F> HeaderWatcher for F
where
    F: FnMut(&FieldChange),
{
    fn after_update(&mut self, change: &FieldChange) {
        self(change)
    }
}

/// A `Header` that notifies registered watchers on every edit
pub struct ObservedHeader {
    header: Header,
    watchers: Vec<Box<dyn HeaderWatcher>>,
}

impl ObservedHeader {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            watchers: Vec::new(),
        }
    }

    /// Register a watcher; watchers run in registration order
    pub fn watch<W: HeaderWatcher + 'static>(&mut self, watcher: W) {
        self.watchers.push(Box::new(watcher));
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Commit `edit` and notify watchers. Returns the committed change.
    pub fn apply(&mut self, edit: FieldEdit) -> FieldChange {
        for watcher in self.watchers.iter_mut() {
            watcher.before_update(&edit);
        }

        edit.apply_to(&mut self.header);
        let field = edit.field();
        let change = FieldChange {
            field,
            value: FieldEdit::read(field, &self.header).unwrap_or(edit),
        };

        for watcher in self.watchers.iter_mut() {
            watcher.after_update(&change);
        }
        change
    }

    /// Detach all watchers and hand back the header
    pub fn revoke(self) -> Header {
        self.header
    }
}

impl fmt::Debug for ObservedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedHeader")
            .field("header", &self.header)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}
