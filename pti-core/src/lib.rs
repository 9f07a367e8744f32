//! pti-core: Polyend Tracker instrument (.pti) format with write support
//!
//! This crate provides:
//! - header validation (magic bytes) and a lossless 392-byte header codec
//! - playback mode classification and unit conversions
//! - default header templates for .pti and .wav exports
//! - .pti / .wav file encoding from float audio
//! - an observable header wrapper, playback regions and preview rendering
//!
//! Based on jaap3's pti-file-format notes.

pub mod automation;
pub mod defaults;
pub mod error;
pub mod file;
pub mod header;
pub mod magic;
pub mod playback;
pub mod reactive;
pub mod render;
pub mod report;
pub mod units;
pub mod wav;

pub use error::{Error, Result};
pub use file::{to_pti_file, to_wav_file, PtiFile};
pub use header::Header;
pub use magic::{validate_header, HeaderValidation};
pub use playback::{PlaybackCategory, SamplePlayback};
pub use reactive::{FieldChange, FieldEdit, HeaderWatcher, ObservedHeader};
pub use render::{render_preview, PlaybackPlan};
pub use report::InstrumentReport;
