//! inkboard display - orchestration and rendering seam
//!
//! Turns normalized source payloads into renderable screens, owns the
//! rotation over the configured screens, and hands finished screens to a
//! [`Renderer`] selected at startup (hardware or simulation).

mod orchestrator;
mod render;
mod screen;

pub use orchestrator::ScreenOrchestrator;
pub use render::{select_renderer, FrameFileRenderer, LogRenderer, Renderer};
pub use screen::{compose, placeholder, title_for};
