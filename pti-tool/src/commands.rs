//! Subcommand implementations

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use pti_core::file::split_pti_file;
use pti_core::magic::HEADER_SIZE;
use pti_core::{render_preview, to_wav_file, validate_header, InstrumentReport, PtiFile};

use crate::config::Config;
use crate::edit::EditArgs;
use crate::import::{decode_audio, is_audio_file};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pti,
    Wav,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pti => "pti",
            OutputFormat::Wav => "wav",
        }
    }
}

fn is_pti_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pti"))
        .unwrap_or(false)
}

/// Load a .pti instrument, or import any other audio file as a new one
pub fn load_instrument(path: &Path) -> anyhow::Result<PtiFile> {
    if is_pti_file(path) {
        let bytes = std::fs::read(path).with_context(|| format!("Cannot read {:?}", path))?;
        let file =
            PtiFile::from_bytes(&bytes).with_context(|| format!("Invalid instrument {:?}", path))?;
        debug!("Loaded {:?}: {:?}", path, file.header);
        return Ok(file);
    }

    let decoded =
        decode_audio(path).with_context(|| format!("Cannot decode audio {:?}", path))?;
    debug!(
        "Imported {:?}: {} Hz, {} channel(s)",
        path, decoded.source_rate, decoded.channels
    );
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    Ok(PtiFile::from_audio(name, decoded.samples))
}

/// Print the instrument data table, or its JSON form
pub fn info(path: &Path, json: bool) -> anyhow::Result<()> {
    let file = load_instrument(path)?;
    let report = InstrumentReport::new(&file.header, file.audio.len());

    if report.length_mismatch() {
        warn!(
            "Header sample length ({} frames) differs from audio ({} frames)",
            file.header.sample_length(),
            file.audio.len()
        );
    }

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

/// Validate the header of each file. Returns whether all passed.
pub fn validate(paths: &[PathBuf]) -> anyhow::Result<bool> {
    let mut all_valid = true;

    for path in paths {
        let bytes = std::fs::read(path).with_context(|| format!("Cannot read {:?}", path))?;
        let header = match split_pti_file(&bytes) {
            Ok((header, _)) => header,
            Err(pti_core::Error::OddAudioLength(len)) => {
                warn!("{:?}: audio data has odd length ({} bytes)", path, len);
                &bytes[..HEADER_SIZE]
            }
            Err(_) => &bytes[..],
        };

        let result = validate_header(header);
        match &result.reason {
            None => println!("{}: OK", path.display()),
            Some(reason) => {
                all_valid = false;
                println!("{}: {}", path.display(), reason);
            }
        }
    }

    Ok(all_valid)
}

/// Convert one file to .pti or .wav, applying edits
pub fn convert(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    edits: &EditArgs,
) -> anyhow::Result<PathBuf> {
    let mut file = load_instrument(input)?;
    file.header = edits.apply(file.header);

    let bytes = match format {
        OutputFormat::Pti => file.to_pti_bytes(),
        OutputFormat::Wav => file.to_wav_bytes()?,
    };

    let path = config.output_path(input, output, &file.file_name(format.extension()));
    config.write_output(&path, &bytes)?;
    Ok(path)
}

/// Convert every audio file below `dir` to .pti. Returns the number written.
pub fn batch(
    config: &Config,
    dir: &Path,
    output_dir: Option<&Path>,
    edits: &EditArgs,
) -> anyhow::Result<usize> {
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| dir.to_path_buf());

    let mut converted = 0;
    let mut failed = 0;

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !is_audio_file(path) {
            continue;
        }

        info!("Converting: {:?}", path);

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("instrument");
        let target = output_dir.join(format!("{}.pti", stem));

        match convert(config, path, Some(&target), OutputFormat::Pti, edits) {
            Ok(_) => converted += 1,
            Err(e) => {
                warn!("Failed to convert {:?}: {:#}", path, e);
                failed += 1;
            }
        }
    }

    info!("Converted {} files ({} failed)", converted, failed);
    Ok(converted)
}

/// Render a preview of the instrument (or one slice) to WAV
pub fn render(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    slice: Option<usize>,
) -> anyhow::Result<PathBuf> {
    let file = load_instrument(input)?;
    let preview = render_preview(&file.header, &file.audio, slice)
        .with_context(|| format!("Cannot render {:?}", input))?;

    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("instrument");
    let file_name = match slice {
        Some(index) => format!("{}-slice{}.wav", stem, index + 1),
        None => format!("{}-preview.wav", stem),
    };

    let path = config.output_path(input, output, &file_name);
    config.write_output(&path, &to_wav_file(&preview)?)?;
    Ok(path)
}
