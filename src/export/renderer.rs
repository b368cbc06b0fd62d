//! HTML to raster rendering.

use std::fs;
use std::process::Command;

use tempfile::tempdir;

use super::raster::RasterImage;
use super::ExportError;
use crate::templates::layout::PAGE_WIDTH_PX;
use crate::templates::RenderedDocument;

/// Rasterizes a rendered document.
///
/// The same document and scale must always produce the same image.
pub trait Renderer: Send + Sync {
    fn render(&self, document: &RenderedDocument, scale: f32) -> Result<RasterImage, ExportError>;
}

/// Runs a headless HTML rasterizer (`wkhtmltoimage` compatible) in a scratch directory.
///
/// The directory is removed when rendering finishes, whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: String,
}

impl CommandRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, document: &RenderedDocument, scale: f32) -> Result<RasterImage, ExportError> {
        let temp_dir = tempdir().map_err(ExportError::TempDir)?;
        let input = temp_dir.path().join("document.html");
        let output = temp_dir.path().join("document.png");

        fs::write(&input, &document.html).map_err(ExportError::WriteHtml)?;

        let width = (PAGE_WIDTH_PX as f32 * scale).round() as u32;
        let status = Command::new(&self.command)
            .arg("--quiet")
            .arg("--format")
            .arg("png")
            .arg("--width")
            .arg(width.to_string())
            .arg("--zoom")
            .arg(format!("{:.2}", scale))
            .arg(&input)
            .arg(&output)
            .current_dir(temp_dir.path())
            .status()
            .map_err(|source| ExportError::RenderSpawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            log::error!("{} failed for {} with status {}", self.command, document.title, code);
            return Err(ExportError::RenderExit(code));
        }

        let bytes = fs::read(&output).map_err(ExportError::ReadImage)?;
        RasterImage::decode_png(&bytes)
    }
}
