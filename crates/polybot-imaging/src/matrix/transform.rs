// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric and filtering transforms on an intensity matrix. Every transform
// returns a new matrix; the processor swaps it in.

use polybot_core::Direction;
use polybot_core::error::{PolybotError, Result};

use super::IntensityMatrix;

impl IntensityMatrix {
    /// Box blur over every position where a `kernel x kernel` window fits.
    ///
    /// The output shrinks to `(height - kernel + 1) x (width - kernel + 1)`.
    /// Each output value is the window sum floor-divided by `kernel²`. Window
    /// rows are summed left to right and the row sums top to bottom; that
    /// order is part of the contract since it fixes the floating-point result.
    pub fn box_blur(&self, kernel: usize) -> Result<Self> {
        if kernel == 0 || kernel > self.height() || kernel > self.width() {
            return Err(PolybotError::InvalidKernelSize {
                filter: "blur",
                size: kernel,
                height: self.height(),
                width: self.width(),
            });
        }

        let out_h = self.height() - kernel + 1;
        let out_w = self.width() - kernel + 1;
        let divisor = (kernel * kernel) as f64;

        let mut data = Vec::with_capacity(out_h * out_w);
        for i in 0..out_h {
            for j in 0..out_w {
                let total = (i..i + kernel)
                    .map(|y| self.row(y)[j..j + kernel].iter().sum::<f64>())
                    .sum::<f64>();
                data.push(floor_div(total, divisor));
            }
        }
        Self::from_vec(out_w, out_h, data)
    }

    /// Absolute horizontal forward difference: `|row[j - 1] - row[j]|`.
    ///
    /// Height is unchanged and width shrinks by one.
    pub fn contour(&self) -> Result<Self> {
        if self.width() < 2 {
            return Err(PolybotError::DimensionTooSmall {
                width: self.width(),
                required: 2,
            });
        }

        let data = self
            .rows()
            .flat_map(|row| row.windows(2).map(|pair| (pair[0] - pair[1]).abs()))
            .collect();
        Self::from_vec(self.width() - 1, self.height(), data)
    }

    /// Rotate 90 degrees clockwise: `out[x][y] = in[height - y - 1][x]`.
    ///
    /// Values are moved, never recomputed, so four rotations give back the
    /// original matrix bit for bit.
    pub fn rotate_clockwise(&self) -> Self {
        let (h, w) = (self.height(), self.width());
        let mut data = Vec::with_capacity(h * w);
        for x in 0..w {
            for y in 0..h {
                data.push(self.get(h - y - 1, x));
            }
        }
        // The new matrix is `w` rows of `h` values.
        Self {
            data,
            width: h,
            height: w,
        }
    }

    /// Join `other` onto this matrix.
    ///
    /// Sizes need not match: both matrices are first cropped to the shared
    /// minimum height and minimum width, so rows or columns beyond the smaller
    /// matrix are dropped. Nothing is padded and a size mismatch is never an
    /// error.
    ///
    /// - `Horizontal`: `min_h x (2 * min_w)`, left half from `self`.
    /// - `Vertical`: `(2 * min_h) x min_w`, top half from `self`.
    pub fn concat(&self, other: &Self, direction: Direction) -> Self {
        let height = self.height().min(other.height());
        let width = self.width().min(other.width());

        let mut data = Vec::with_capacity(2 * height * width);
        let (width_out, height_out) = match direction {
            Direction::Horizontal => {
                for y in 0..height {
                    data.extend_from_slice(&self.row(y)[..width]);
                    data.extend_from_slice(&other.row(y)[..width]);
                }
                (2 * width, height)
            }
            Direction::Vertical => {
                for source in [self, other] {
                    for y in 0..height {
                        data.extend_from_slice(&source.row(y)[..width]);
                    }
                }
                (width, 2 * height)
            }
        };
        Self {
            data,
            width: width_out,
            height: height_out,
        }
    }

    /// Split rows into `count` contiguous blocks of `height / count` rows; the
    /// last block also takes the remaining `height % count` rows.
    ///
    /// `count` must be between 1 and `height`, so no block is ever empty.
    pub fn split_rows(&self, count: usize) -> Result<Vec<Self>> {
        if count == 0 || count > self.height() {
            return Err(PolybotError::InvalidKernelSize {
                filter: "segment",
                size: count,
                height: self.height(),
                width: self.width(),
            });
        }

        let block = self.height() / count;
        let width = self.width();
        (0..count)
            .map(|i| {
                let start = i * block;
                let end = if i == count - 1 {
                    self.height()
                } else {
                    start + block
                };
                let data = self.as_slice()[start * width..end * width].to_vec();
                Self::from_vec(width, end - start, data)
            })
            .collect()
    }
}

/// Floor division derived from the remainder, as `(a - a mod b) / b` with a
/// sign fix-up and rounding of the quotient. This differs from
/// `(a / b).floor()` when `a / b` rounds up across an integer.
pub(crate) fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && ((b < 0.0) != (rem < 0.0)) {
        div -= 1.0;
    }
    if div != 0.0 {
        let floored = div.floor();
        if div - floored > 0.5 { floored + 1.0 } else { floored }
    } else {
        0.0_f64.copysign(a / b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> IntensityMatrix {
        let data = (0..width * height).map(|v| v as f64).collect();
        IntensityMatrix::from_vec(width, height, data).unwrap()
    }

    // -- Blur -----------------------------------------------------------------

    #[test]
    fn blur_uniform_block_keeps_value() {
        let m = IntensityMatrix::filled(4, 4, 100.0);
        let out = m.box_blur(2).unwrap();
        assert_eq!((out.height(), out.width()), (3, 3));
        assert!(out.as_slice().iter().all(|&v| v == 100.0));
    }

    #[test]
    fn blur_shrinks_to_valid_region() {
        let m = ramp(7, 5);
        for k in 1..=5 {
            let out = m.box_blur(k).unwrap();
            assert_eq!((out.height(), out.width()), (5 - k + 1, 7 - k + 1));
        }
    }

    #[test]
    fn blur_truncates_instead_of_rounding() {
        // Window sum 0 + 1 + 1 + 1 = 3, 3 / 4 = 0.75 -> 0.
        let m = IntensityMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
        assert_eq!(m.box_blur(2).unwrap().as_slice(), &[0.0]);

        // 1 + 2 + 3 + 4 + 5 + 6 + 7 + 8 + 9 = 45, 45 / 9 = 5 exactly.
        let m = IntensityMatrix::from_vec(3, 3, (1..=9u8).map(f64::from).collect()).unwrap();
        assert_eq!(m.box_blur(3).unwrap().as_slice(), &[5.0]);
    }

    #[test]
    fn blur_of_fractional_values_floors() {
        let m = IntensityMatrix::from_rows(vec![vec![10.9, 10.9], vec![10.9, 10.9]]).unwrap();
        assert_eq!(m.box_blur(2).unwrap().get(0, 0), 10.0);
    }

    #[test]
    fn blur_kernel_one_floors_every_value() {
        let m = IntensityMatrix::from_rows(vec![vec![1.5, 2.9], vec![3.0, 254.97]]).unwrap();
        let out = m.box_blur(1).unwrap();
        assert_eq!(out.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 254.0]]);
    }

    #[test]
    fn blur_rejects_oversized_kernel() {
        let m = ramp(4, 3);
        let err = m.box_blur(4).unwrap_err();
        assert!(matches!(
            err,
            PolybotError::InvalidKernelSize {
                filter: "blur",
                size: 4,
                height: 3,
                width: 4
            }
        ));
        assert!(m.box_blur(5).is_err());
        assert!(m.box_blur(0).is_err());
    }

    #[test]
    fn floor_div_matches_floor_for_ordinary_values() {
        assert_eq!(floor_div(7.0, 2.0), 3.0);
        assert_eq!(floor_div(-7.0, 2.0), -4.0);
        assert_eq!(floor_div(8.0, 4.0), 2.0);
        assert_eq!(floor_div(0.5, 4.0), 0.0);
    }

    // -- Contour --------------------------------------------------------------

    #[test]
    fn contour_takes_absolute_differences() {
        let m =
            IntensityMatrix::from_rows(vec![vec![10.0, 4.0, 9.0], vec![0.0, 0.0, 255.0]]).unwrap();
        let out = m.contour().unwrap();
        assert_eq!(out.to_rows(), vec![vec![6.0, 5.0], vec![0.0, 255.0]]);
    }

    #[test]
    fn contour_shrinks_width_by_one() {
        let out = ramp(6, 4).contour().unwrap();
        assert_eq!((out.height(), out.width()), (4, 5));
    }

    #[test]
    fn contour_rejects_narrow_matrix() {
        let m = IntensityMatrix::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        assert!(matches!(
            m.contour().unwrap_err(),
            PolybotError::DimensionTooSmall { width: 1, required: 2 }
        ));
    }

    // -- Rotate ---------------------------------------------------------------

    #[test]
    fn rotate_checkerboard() {
        let m = IntensityMatrix::from_rows(vec![vec![0.0, 255.0], vec![255.0, 0.0]]).unwrap();
        assert_eq!(
            m.rotate_clockwise().to_rows(),
            vec![vec![255.0, 0.0], vec![0.0, 255.0]]
        );
    }

    #[test]
    fn rotate_is_clockwise() {
        // 1 2 3        4 1
        // 4 5 6   ->   5 2
        //              6 3
        let m = IntensityMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let out = m.rotate_clockwise();
        assert_eq!((out.height(), out.width()), (3, 2));
        assert_eq!(
            out.to_rows(),
            vec![vec![4.0, 1.0], vec![5.0, 2.0], vec![6.0, 3.0]]
        );
    }

    #[test]
    fn four_rotations_are_identity() {
        let m =
            IntensityMatrix::from_vec(5, 3, (0..15).map(|v| v as f64 * 1.37).collect()).unwrap();
        let back = m
            .rotate_clockwise()
            .rotate_clockwise()
            .rotate_clockwise()
            .rotate_clockwise();
        assert_eq!(back, m);
    }

    #[test]
    fn rotate_empty_matrix() {
        let m = IntensityMatrix::from_rows(Vec::new()).unwrap();
        let out = m.rotate_clockwise();
        assert!(out.is_empty());
    }

    // -- Concat ---------------------------------------------------------------

    #[test]
    fn horizontal_concat_truncates_to_shared_size() {
        let a = ramp(4, 3);
        let b = IntensityMatrix::filled(6, 2, -1.0);
        let out = a.concat(&b, Direction::Horizontal);
        assert_eq!((out.height(), out.width()), (2, 8));
        assert_eq!(out.row(0), &[0.0, 1.0, 2.0, 3.0, -1.0, -1.0, -1.0, -1.0]);
        assert_eq!(out.row(1), &[4.0, 5.0, 6.0, 7.0, -1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn horizontal_concat_drops_extra_columns_of_wider_first() {
        let a = ramp(5, 2);
        let b = IntensityMatrix::filled(3, 4, 9.0);
        let out = a.concat(&b, Direction::Horizontal);
        assert_eq!((out.height(), out.width()), (2, 6));
        assert_eq!(out.row(1), &[5.0, 6.0, 7.0, 9.0, 9.0, 9.0]);
    }

    #[test]
    fn vertical_concat_stacks_cropped_rows() {
        let a = ramp(3, 2);
        let b = IntensityMatrix::filled(2, 5, 7.0);
        let out = a.concat(&b, Direction::Vertical);
        assert_eq!((out.height(), out.width()), (4, 2));
        assert_eq!(
            out.to_rows(),
            vec![vec![0.0, 1.0], vec![3.0, 4.0], vec![7.0, 7.0], vec![7.0, 7.0]]
        );
    }

    #[test]
    fn concat_with_own_copy_doubles_width() {
        let a = ramp(3, 3);
        let out = a.concat(&a.clone(), Direction::Horizontal);
        assert_eq!((out.height(), out.width()), (3, 6));
        assert_eq!(&out.row(2)[..3], &out.row(2)[3..]);
    }

    // -- Segment --------------------------------------------------------------

    #[test]
    fn last_segment_absorbs_remainder() {
        let m = ramp(2, 10);
        let parts = m.split_rows(4).unwrap();
        let heights: Vec<usize> = parts.iter().map(IntensityMatrix::height).collect();
        assert_eq!(heights, vec![2, 2, 2, 4]);
        assert!(parts.iter().all(|p| p.width() == 2));
    }

    #[test]
    fn segments_reassemble_original() {
        let m = ramp(3, 9);
        let parts = m.split_rows(4).unwrap();
        let rows: Vec<Vec<f64>> = parts.iter().flat_map(IntensityMatrix::to_rows).collect();
        assert_eq!(rows, m.to_rows());
    }

    #[test]
    fn segment_count_equals_height() {
        let parts = ramp(2, 3).split_rows(3).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.height() == 1));
    }

    #[test]
    fn segment_rejects_zero_or_too_many() {
        let m = ramp(2, 3);
        assert!(matches!(
            m.split_rows(0).unwrap_err(),
            PolybotError::InvalidKernelSize { size: 0, .. }
        ));
        assert!(matches!(
            m.split_rows(4).unwrap_err(),
            PolybotError::InvalidKernelSize { filter: "segment", size: 4, height: 3, .. }
        ));
    }
}
