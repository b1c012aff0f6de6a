// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// polybot-detect — Client for the external object-detection service.
//
// The service runs inference on an uploaded image and answers with a
// prediction summary (detected objects with normalised boxes). This crate
// only talks to it; no inference happens here.

pub mod client;
pub mod summary;

pub use client::DetectionClient;
pub use summary::{
    DetectedObject, PredictionSummary, parse_label_line, parse_labels, summarize_objects,
};
