//! Unit conversions for offsets, gain and display

/// Largest stored offset value, maps to the end of the sample
pub const OFFSET_MAX: u16 = u16::MAX;

/// Sample rate of all Tracker audio
pub const SAMPLE_RATE: u32 = 44_100;

/// Convert a stored offset (0..=65535) to a fraction of the sample length.
///
/// Every place that interprets playback, loop, slice or granular offsets goes
/// through this function so the divisor stays identical.
pub fn rel_offset(offset: u16) -> f64 {
    offset as f64 / OFFSET_MAX as f64
}

/// Convert a fraction of the sample length back to a stored offset
pub fn abs_offset(fraction: f64) -> u16 {
    (fraction.clamp(0.0, 1.0) * OFFSET_MAX as f64).round() as u16
}

/// Convert a stored offset to a frame index within `frames` frames
pub fn offset_to_frame(offset: u16, frames: usize) -> usize {
    ((rel_offset(offset) * frames as f64).floor() as usize).min(frames)
}

/// Instrument volume (0..=100) in dB, 50 is unity gain
pub fn convert_volume(value: u8) -> f64 {
    value as f64 * 12.0 / 25.0 - 24.0
}

/// Effect send level (0..=100) in dB, 0 is silence
pub fn convert_send(value: u8) -> f64 {
    if value == 0 {
        return f64::NEG_INFINITY;
    }
    -40.0 + value as f64 * 2.0 / 5.0
}

/// Convert decibels to a linear gain factor
pub fn db_to_gain(db: f64) -> f64 {
    if db == f64::NEG_INFINITY {
        return 0.0;
    }
    10f64.powf(db / 20.0)
}

/// Sample frames to milliseconds at 44.1 kHz
pub fn frames_to_ms(frames: usize) -> f64 {
    frames as f64 / (SAMPLE_RATE as f64 / 1000.0)
}

pub fn display_milliseconds(ms: f64) -> String {
    if ms < 800.0 {
        format!("{:.2} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

pub fn display_db(db: f64) -> String {
    if db == f64::NEG_INFINITY {
        return "-inf dB".to_string();
    }
    format!("{:.2} dB", db)
}
