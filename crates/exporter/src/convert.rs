//! Model Conversion Strategies
//!
//! The trained checkpoint is converted by an external collaborator; this
//! module wraps the known invocations as an ordered strategy ladder. The
//! first strategy that succeeds ends the stage, and every failed attempt is
//! reported to the caller.

use crate::ExportError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Locate the newest trained checkpoint: `.h5` files sort by name because
/// the training run embeds its timestamp in the filename.
pub fn find_latest_checkpoint(dir: &Path) -> Result<PathBuf, ExportError> {
    if !dir.is_dir() {
        return Err(ExportError::ModelMissing(dir.to_path_buf()));
    }

    let mut checkpoints: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "h5"))
        .collect();
    checkpoints.sort();

    checkpoints
        .pop()
        .ok_or_else(|| ExportError::ModelMissing(dir.to_path_buf()))
}

/// One way of converting a checkpoint into the servable model directory
pub trait ConvertStrategy {
    fn name(&self) -> &'static str;
    fn convert(&self, checkpoint: &Path, dest: &Path) -> Result<(), ExportError>;
}

fn run_command(mut command: Command) -> Result<(), ExportError> {
    let program = command.get_program().to_string_lossy().to_string();
    let output = command
        .output()
        .map_err(|e| ExportError::Converter(format!("failed to launch {program}: {e}")))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ExportError::Converter(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )))
    }
}

/// Primary: the `tensorflowjs_converter` CLI in Keras mode
pub struct TfjsConverterCli;

impl ConvertStrategy for TfjsConverterCli {
    fn name(&self) -> &'static str {
        "tensorflowjs_converter"
    }

    fn convert(&self, checkpoint: &Path, dest: &Path) -> Result<(), ExportError> {
        let mut command = Command::new("tensorflowjs_converter");
        command
            .arg("--input_format=keras")
            .arg(checkpoint)
            .arg(dest);
        run_command(command)
    }
}

/// Fallback: the same converter through the Python module entry point,
/// for hosts where only the library is installed.
pub struct TfjsPythonModule;

impl ConvertStrategy for TfjsPythonModule {
    fn name(&self) -> &'static str {
        "python -m tensorflowjs.converters.converter"
    }

    fn convert(&self, checkpoint: &Path, dest: &Path) -> Result<(), ExportError> {
        let mut command = Command::new("python3");
        command
            .arg("-m")
            .arg("tensorflowjs.converters.converter")
            .arg("--input_format=keras")
            .arg(checkpoint)
            .arg(dest);
        run_command(command)
    }
}

/// Last resort: publish the raw checkpoint into the destination so a
/// SavedModel-capable loader can still attempt it.
pub struct CheckpointCopy;

impl ConvertStrategy for CheckpointCopy {
    fn name(&self) -> &'static str {
        "checkpoint copy"
    }

    fn convert(&self, checkpoint: &Path, dest: &Path) -> Result<(), ExportError> {
        let file_name = checkpoint
            .file_name()
            .ok_or_else(|| ExportError::Converter("checkpoint has no file name".to_string()))?;
        fs::copy(checkpoint, dest.join(file_name))?;
        Ok(())
    }
}

/// Result of walking the strategy ladder
#[derive(Debug)]
pub struct ConvertOutcome {
    /// Name of the strategy that succeeded, if any
    pub succeeded: Option<&'static str>,
    /// Every failed attempt, in order: (strategy name, error message)
    pub failures: Vec<(String, String)>,
}

/// Ordered ladder of conversion strategies
pub struct ModelConverter {
    strategies: Vec<Box<dyn ConvertStrategy>>,
}

impl ModelConverter {
    pub fn new(strategies: Vec<Box<dyn ConvertStrategy>>) -> Self {
        Self { strategies }
    }

    /// Try each strategy in order against a clean destination. Stops at the
    /// first success; failures are collected, never raised.
    pub fn convert(&self, checkpoint: &Path, dest: &Path) -> ConvertOutcome {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            if let Err(e) = prepare_dest(dest) {
                failures.push((strategy.name().to_string(), e.to_string()));
                continue;
            }

            info!("Converting model via {}", strategy.name());
            match strategy.convert(checkpoint, dest) {
                Ok(()) => {
                    info!("Model converted via {}", strategy.name());
                    return ConvertOutcome {
                        succeeded: Some(strategy.name()),
                        failures,
                    };
                }
                Err(e) => {
                    warn!("Strategy {} failed: {}", strategy.name(), e);
                    failures.push((strategy.name().to_string(), e.to_string()));
                }
            }
        }

        ConvertOutcome {
            succeeded: None,
            failures,
        }
    }
}

impl Default for ModelConverter {
    fn default() -> Self {
        Self::new(vec![
            Box::new(TfjsConverterCli),
            Box::new(TfjsPythonModule),
            Box::new(CheckpointCopy),
        ])
    }
}

/// Each attempt starts from an empty destination directory so a partial
/// write from a failed strategy never leaks into the published model.
fn prepare_dest(dest: &Path) -> Result<(), ExportError> {
    if dest.exists() {
        fs::remove_dir_all(dest)?;
    }
    fs::create_dir_all(dest)?;
    Ok(())
}
