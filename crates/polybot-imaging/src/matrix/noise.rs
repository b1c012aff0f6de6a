// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Salt-and-pepper noise generator.

use polybot_core::error::{PolybotError, Result};
use rand::Rng;

use super::IntensityMatrix;

/// Intensity written for "pepper" pixels.
pub const PEPPER: f64 = 0.0;
/// Intensity written for "salt" pixels.
pub const SALT: f64 = 255.0;

impl IntensityMatrix {
    /// Inject salt-and-pepper noise in place.
    ///
    /// Each pixel gets two independent uniform draws. If the first is below
    /// `amount` the pixel becomes [`PEPPER`]; then, regardless of the first
    /// outcome, if the second is below `amount` it becomes [`SALT`]. A pixel
    /// hit by both ends up as salt, so salt is slightly more frequent than
    /// pepper (`amount` vs `amount * (1 - amount)`).
    ///
    /// Pixels are visited column by column. `amount` must lie in `[0, 1]`.
    pub fn salt_and_pepper<R: Rng + ?Sized>(&mut self, rng: &mut R, amount: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&amount) {
            return Err(PolybotError::InvalidParameter(format!(
                "noise amount {amount} is outside [0, 1]"
            )));
        }

        let (width, height) = (self.width(), self.height());
        let cells = self.as_mut_slice();
        for x in 0..width {
            for y in 0..height {
                let cell = &mut cells[y * width + x];
                if rng.r#gen::<f64>() < amount {
                    *cell = PEPPER;
                }
                if rng.r#gen::<f64>() < amount {
                    *cell = SALT;
                }
            }
        }
        Ok(())
    }
}
