//! Tool configuration

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Debug logging
    pub verbose: bool,
    /// Default directory for written files; next to the input when unset
    pub output_dir: Option<PathBuf>,
    /// Replace existing output files
    pub overwrite: bool,
}

impl Config {
    /// Where to write `file_name` produced from `input`
    pub fn output_path(&self, input: &Path, explicit: Option<&Path>, file_name: &str) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => input
                .parent()
                .map(|p| p.join(file_name))
                .unwrap_or_else(|| PathBuf::from(file_name)),
        }
    }

    /// Write `bytes` to `path`, honoring the overwrite policy
    pub fn write_output(&self, path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
        if path.exists() && !self.overwrite {
            bail!("{:?} already exists (use --force to overwrite)", path);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {:?}", parent))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("Cannot write {:?}", path))?;
        info!("Wrote {:?} ({} bytes)", path, bytes.len());
        Ok(())
    }
}
