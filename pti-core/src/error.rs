//! Error types for pti-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Binary format error: {0}")]
    BinRw(String),

    #[error("Wrong size: expected {expected} bytes, got {actual}")]
    WrongSize { expected: usize, actual: usize },

    #[error("Bad magic {0}")]
    BadMagic(usize),

    #[error("Audio data has odd length: {0} bytes (16-bit PCM expected)")]
    OddAudioLength(usize),

    #[error("Slice {index} out of range ({count} slices)")]
    SliceOutOfRange { index: usize, count: usize },

    #[error("Audio decoding error: {0}")]
    AudioDecode(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<binrw::Error> for Error {
    fn from(e: binrw::Error) -> Self {
        Error::BinRw(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
