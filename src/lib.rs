//! Watersteg - watermark and steghide a batch of images
//!
//! This library crate exposes the run machinery for integration testing.

pub mod batch;
pub mod config;
pub mod console;
pub mod logging;
pub mod pipeline;
