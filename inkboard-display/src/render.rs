//! Render collaborator seam
//!
//! The orchestration core hands finished [`Screen`]s to a [`Renderer`]
//! chosen once at startup; whether that paints hardware or logs a
//! simulation frame is invisible to the core. Hardware drivers implement
//! the same trait out of tree.

use chrono::Local;
use inkboard_core::{Screen, TickerError, TickerResult};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Sink for finished screens.
pub trait Renderer: Send {
    fn render(&mut self, screen: &Screen) -> TickerResult<()>;
}

/// Simulation fallback: one structured log line per screen line.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, screen: &Screen) -> TickerResult<()> {
        info!(
            screen = %screen.id,
            title = %screen.title,
            stale = screen.is_stale,
            icon = screen.icon_asset.as_deref().unwrap_or("-"),
            "Displaying screen"
        );
        for line in &screen.lines {
            info!(screen = %screen.id, "  {line}");
        }
        Ok(())
    }
}

/// Writes each frame as plain text to a file, overwriting the previous
/// frame. The text analogue of dumping the simulation image to disk.
#[derive(Debug)]
pub struct FrameFileRenderer {
    path: PathBuf,
}

impl FrameFileRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn frame_text(screen: &Screen) -> String {
        let mut frame = String::new();
        frame.push_str(&screen.title);
        if screen.is_stale {
            frame.push_str(" (stale)");
        }
        frame.push('\n');
        frame.push_str(&"-".repeat(24));
        frame.push('\n');
        for line in &screen.lines {
            frame.push_str(line);
            frame.push('\n');
        }
        if let Some(icon) = &screen.icon_asset {
            frame.push_str(&format!("[icon: {icon}]\n"));
        }
        frame.push_str(&format!("Updated: {}\n", Local::now().format("%H:%M:%S")));
        frame
    }
}

impl Renderer for FrameFileRenderer {
    fn render(&mut self, screen: &Screen) -> TickerResult<()> {
        let mut file = std::fs::File::create(&self.path)
            .map_err(|e| TickerError::Render(format!("{}: {e}", self.path.display())))?;
        file.write_all(Self::frame_text(screen).as_bytes())
            .map_err(|e| TickerError::Render(format!("{}: {e}", self.path.display())))?;
        info!(path = %self.path.display(), screen = %screen.id, "Frame written");
        Ok(())
    }
}

/// Pick the renderer at startup: a frame file when a path was configured,
/// otherwise the log-only simulation.
pub fn select_renderer(frame_file: Option<PathBuf>) -> Box<dyn Renderer> {
    match frame_file {
        Some(path) => {
            info!(path = %path.display(), "Rendering frames to file");
            Box::new(FrameFileRenderer::new(path))
        }
        None => {
            info!("No display hardware attached, logging frames");
            Box::new(LogRenderer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen {
            id: "crypto".to_string(),
            title: "Bitcoin Prices".to_string(),
            lines: vec!["BTC/USD: $43,250.12".to_string()],
            icon_asset: None,
            is_stale: true,
        }
    }

    #[test]
    fn test_frame_text_includes_title_lines_and_stale_marker() {
        let frame = FrameFileRenderer::frame_text(&screen());
        assert!(frame.contains("Bitcoin Prices (stale)"));
        assert!(frame.contains("BTC/USD: $43,250.12"));
    }

    #[test]
    fn test_frame_file_renderer_writes_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.txt");
        let mut renderer = FrameFileRenderer::new(&path);

        renderer.render(&screen()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("BTC/USD"));
    }

    #[test]
    fn test_frame_file_renderer_reports_io_errors() {
        let mut renderer = FrameFileRenderer::new("/nonexistent-dir/frame.txt");
        let err = renderer.render(&screen()).unwrap_err();
        assert!(matches!(err, TickerError::Render(_)));
    }

    #[test]
    fn test_log_renderer_always_succeeds() {
        assert!(LogRenderer.render(&screen()).is_ok());
    }

    #[test]
    fn test_select_renderer_prefers_frame_file() {
        let boxed = select_renderer(Some(PathBuf::from("/tmp/frame.txt")));
        // Just exercising the selection branch; the concrete type is opaque.
        drop(boxed);
        drop(select_renderer(None));
    }
}
