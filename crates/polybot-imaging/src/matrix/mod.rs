// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Matrix module — intensity storage, grayscale conversion, and the transforms.

pub mod intensity;
pub mod noise;
pub mod transform;

pub use intensity::IntensityMatrix;
