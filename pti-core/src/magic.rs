//! Magic byte validation for .pti headers
//!
//! The first 20 bytes of every header act as a format fingerprint. Several
//! positions changed between Tracker firmware releases, so those entries hold
//! a set of accepted alternatives rather than a single value. The first
//! alternative of each entry is the one written into new headers.
//!
//! Reference: https://github.com/jaap3/pti-file-format/blob/main/pti.rst#header

use crate::error::{Error, Result};

/// Size of a .pti header in bytes
pub const HEADER_SIZE: usize = 392;

/// Number of leading bytes covered by the magic table
pub const MAGIC_LEN: usize = 20;

/// Accepted values per magic byte position
pub const MAGIC: [&[u8]; MAGIC_LEN] = [
    &[b'T'],
    &[b'I'],
    &[1],
    &[0],
    &[1],
    &[5, 4],
    &[0, 1],
    &[1],
    &[9],
    &[9],
    &[9],
    &[9],
    &[116],
    &[1],
    &[0, 102, 110],
    &[0, 102],
    &[1],
    &[0],
    &[0],
    &[0],
];

/// Magic bytes written into freshly created headers
pub fn primary_magic() -> [u8; MAGIC_LEN] {
    let mut magic = [0u8; MAGIC_LEN];
    for (byte, allowed) in magic.iter_mut().zip(MAGIC.iter()) {
        *byte = allowed[0];
    }
    magic
}

/// Why a header was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    WrongSize(usize),
    BadMagic(usize),
}

/// Result of validating a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderValidation {
    pub valid: bool,
    /// Reason for the failure, `None` when valid
    pub reason: Option<String>,
    failure: Option<Failure>,
}

impl HeaderValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
            failure: None,
        }
    }

    fn fail(failure: Failure) -> Self {
        let reason = match failure {
            Failure::WrongSize(_) => "Wrong size".to_string(),
            Failure::BadMagic(index) => format!("Bad magic {}", index),
        };
        Self {
            valid: false,
            reason: Some(reason),
            failure: Some(failure),
        }
    }

    /// Convert a failed validation into an error
    pub fn into_result(self) -> Result<()> {
        match self.failure {
            None => Ok(()),
            Some(Failure::WrongSize(actual)) => Err(Error::WrongSize {
                expected: HEADER_SIZE,
                actual,
            }),
            Some(Failure::BadMagic(index)) => Err(Error::BadMagic(index)),
        }
    }
}

/// Validate a .pti header against the magic table.
///
/// The header must be exactly 392 bytes. Magic bytes are checked in ascending
/// order and the first mismatch is reported.
pub fn validate_header(header: &[u8]) -> HeaderValidation {
    if header.len() != HEADER_SIZE {
        return HeaderValidation::fail(Failure::WrongSize(header.len()));
    }

    for (index, allowed) in MAGIC.iter().enumerate() {
        if !allowed.contains(&header[index]) {
            return HeaderValidation::fail(Failure::BadMagic(index));
        }
    }

    HeaderValidation::ok()
}
