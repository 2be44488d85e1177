//! Timestamp overlay via the external ImageMagick `convert` tool.

use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

const FONT: &str = "fixed";
const POINT_SIZE: &str = "50";

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("failed to run convert: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("convert exited with {0}")]
    Failed(ExitStatus),
}

/// Drawing instructions for the two-tone stroke: black text with white text
/// offset one pixel over it, legible against any background.
fn draw_instructions(label: &str) -> String {
    format!("gravity southwest fill black text 0,12 '{label}' fill white text 1,11 '{label}'")
}

/// Overlay `label` onto the image at `path`, in place (output file equals
/// input file). On failure the file is left as captured.
pub async fn overlay_timestamp(path: &Path, label: &str) -> Result<(), AnnotateError> {
    let status = Command::new("convert")
        .arg(path)
        .args(["-font", FONT, "-pointsize", POINT_SIZE, "-draw"])
        .arg(draw_instructions(label))
        .arg(path)
        .status()
        .await?;

    if status.success() {
        Ok(())
    } else {
        Err(AnnotateError::Failed(status))
    }
}
