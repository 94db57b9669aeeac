//! Pixel glyph design pipeline
pub mod core;
pub mod design;
pub mod logging;
pub mod unicode;
