// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// polybot-imaging — Grayscale image filters for Polybot.
//
// Decodes a raster image into a single-channel intensity matrix, applies box
// blur, contour, rotation, salt-and-pepper noise, concatenation, or row
// segmentation, and writes the result back out as a grayscale image.

pub mod matrix;
pub mod processor;

// Re-export the primary structs so callers can use `polybot_imaging::IntensityProcessor` etc.
pub use matrix::IntensityMatrix;
pub use processor::{EncodeOptions, IntensityProcessor, SegmentSet};
