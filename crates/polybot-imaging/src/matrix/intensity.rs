// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intensity matrix — a rectangular grid of real-valued grayscale intensities,
// plus conversion from RGB and back to 8-bit grayscale pixels.

use image::{GrayImage, Luma, RgbImage};
use polybot_core::EncodeMode;
use polybot_core::error::{PolybotError, Result};

/// Luminosity weights applied to the red, green and blue channels.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// A `height x width` grid of intensity values, stored row-major.
///
/// Every row has the same length by construction. Values are usually in
/// `[0, 255]` but may drift slightly outside after conversion or filtering;
/// encoding handles that with [`EncodeMode`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityMatrix {
    pub(super) data: Vec<f64>,
    pub(super) width: usize,
    pub(super) height: usize,
}

impl IntensityMatrix {
    // -- Construction ---------------------------------------------------------

    /// Build a matrix from a row-major buffer.
    ///
    /// Fails with `InvalidParameter` when `data.len() != width * height` or
    /// the product overflows.
    pub fn from_vec(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != cell_count(width, height)? {
            return Err(PolybotError::InvalidParameter(format!(
                "buffer of {} values does not fill a {height}x{width} matrix",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a matrix from nested rows. Ragged input is rejected.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(PolybotError::InvalidParameter(format!(
                "row {bad} has {} values, expected {width}",
                rows[bad].len()
            )));
        }
        let data = rows.into_iter().flatten().collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A matrix with every cell set to `value`.
    ///
    /// Panics when `width * height` overflows `usize`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        let cells = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("{height}x{width} matrix overflows usize"));
        Self {
            data: vec![value; cells],
            width,
            height,
        }
    }

    /// Convert an RGB image with `I = 0.2989 R + 0.5870 G + 0.1140 B`.
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        let [wr, wg, wb] = LUMA_WEIGHTS;
        let data = rgb
            .pixels()
            .map(|pixel| {
                let [r, g, b] = pixel.0;
                wr * f64::from(r) + wg * f64::from(g) + wb * f64::from(b)
            })
            .collect();
        Self {
            data,
            width: width as usize,
            height: height as usize,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at row `y`, column `x`. Panics when out of bounds.
    pub fn get(&self, y: usize, x: usize) -> f64 {
        assert!(y < self.height && x < self.width, "({y}, {x}) out of bounds");
        self.data[y * self.width + x]
    }

    /// Borrow row `y`.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Iterate over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `chunks_exact(0)` panics, and an empty-width matrix still has rows.
        (0..self.height).map(move |y| self.row(y))
    }

    /// Copy out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Row-major view of all values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    // -- Encoding -------------------------------------------------------------

    /// Map every value onto an 8-bit grayscale pixel.
    pub fn to_gray_image(&self, mode: EncodeMode) -> Result<GrayImage> {
        let width = u32::try_from(self.width).map_err(|_| {
            PolybotError::InvalidParameter(format!("width {} too large", self.width))
        })?;
        let height = u32::try_from(self.height).map_err(|_| {
            PolybotError::InvalidParameter(format!("height {} too large", self.height))
        })?;

        let to_pixel: Box<dyn Fn(f64) -> u8> = match mode {
            EncodeMode::Clamp => Box::new(|v: f64| v.clamp(0.0, 255.0).round() as u8),
            EncodeMode::Normalize => {
                let (min, max) = self.value_range();
                let span = max - min;
                if span > 0.0 && span.is_finite() {
                    Box::new(move |v: f64| ((v - min) / span * 255.0).round() as u8)
                } else {
                    Box::new(|_| 0)
                }
            }
        };

        Ok(GrayImage::from_fn(width, height, |x, y| {
            Luma([to_pixel(self.data[y as usize * self.width + x as usize])])
        }))
    }

    /// Smallest and largest value, or `(0, 0)` for an empty matrix.
    fn value_range(&self) -> (f64, f64) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Number of cells in a `height x width` matrix, rejecting overflow.
fn cell_count(width: usize, height: usize) -> Result<usize> {
    width.checked_mul(height).ok_or_else(|| {
        PolybotError::InvalidParameter(format!("{height}x{width} matrix overflows usize"))
    })
}
