//! Platform layer
//!
//! Hosts that implement `PresentationBridge`:
//! - `headless`: records commands; native binary and tests
//! - `web`: canvas 2D drawing and Web Audio in the browser

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;
