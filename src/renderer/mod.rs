//! Canvas 2D charset renderer
//!
//! Blits charset cells onto the main canvas, recoloring them through an
//! offscreen buffer. The simulation knows nothing about any of this; it
//! hands over a list of positioned glyphs once per frame.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
