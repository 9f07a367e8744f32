//! Envelope and LFO blocks of the .pti header (bytes 92..260)
//!
//! These are not editable through `Header`; they are decoded for reporting
//! and otherwise carried through exports byte for byte.

use binrw::binrw;
use serde::Serialize;

/// Parameter an envelope / LFO pair modulates, in header order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AutomationTarget {
    Volume = 0,
    Panning = 1,
    Cutoff = 2,
    WavetablePosition = 3,
    GranularPosition = 4,
    Finetune = 5,
}

impl AutomationTarget {
    pub const ALL: [AutomationTarget; 6] = [
        AutomationTarget::Volume,
        AutomationTarget::Panning,
        AutomationTarget::Cutoff,
        AutomationTarget::WavetablePosition,
        AutomationTarget::GranularPosition,
        AutomationTarget::Finetune,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AutomationTarget::Volume => "Volume",
            AutomationTarget::Panning => "Panning",
            AutomationTarget::Cutoff => "Cutoff",
            AutomationTarget::WavetablePosition => "Wavetable position",
            AutomationTarget::GranularPosition => "Granular position",
            AutomationTarget::Finetune => "Finetune",
        }
    }
}

/// 20-byte envelope block
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Envelope {
    pub amount: f32,
    /// Times in milliseconds
    pub delay: u16,
    pub attack: u16,
    pub hold: u16,
    pub decay: u16,
    pub sustain: f32,
    pub release: u16,
    #[serde(skip)]
    pub unknown: u8,
    pub enabled: u8,
}

impl Envelope {
    pub fn is_enabled(&self) -> bool {
        self.enabled != 0
    }
}

/// 8-byte LFO block
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Lfo {
    pub shape: u8,
    #[serde(skip)]
    pub unknown: [u8; 3],
    pub amount: f32,
}

/// All automation blocks in header order
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Automation {
    pub envelopes: [Envelope; 6],
    pub lfos: [Lfo; 6],
}

impl Automation {
    pub fn envelope(&self, target: AutomationTarget) -> &Envelope {
        &self.envelopes[target as usize]
    }

    pub fn lfo(&self, target: AutomationTarget) -> &Lfo {
        &self.lfos[target as usize]
    }
}
