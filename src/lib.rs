//! Bandpaint - Library for palette-locked scene rendering and sprite compositing
//!
//! This library provides functionality to:
//! - Parse JSON/JSON5 scene descriptors made of vector primitives
//! - Rasterize scenes into a 16-color bitmap plus a priority buffer
//! - Animate sprites from views, loops and cels, and move them with easing
//! - Composite sprites over a scene by priority band, front to back
//! - Cache rendered scenes and build them on a background worker
//! - Support both lenient and strict color validation

pub mod animator;
pub mod arena;
pub mod cache;
pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod dither;
pub mod engine;
pub mod fingerprint;
pub mod framebuffer;
pub mod gif;
pub mod loader;
pub mod motion;
pub mod output;
pub mod palette;
pub mod primitive;
pub mod priority;
pub mod raster;
pub mod scene;
pub mod shapes;
pub mod suggest;
pub mod view;
pub mod warning;
