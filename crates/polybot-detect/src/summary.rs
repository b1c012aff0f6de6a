// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Prediction summaries and YOLO label-file parsing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use polybot_core::error::{PolybotError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One detected object. Box coordinates are normalised to `[0, 1]` relative
/// to the image size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    #[serde(rename = "class")]
    pub class_name: String,
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
}

/// Result of one prediction request, as returned by the detection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub prediction_id: Uuid,
    pub original_img_path: String,
    pub predicted_img_path: String,
    pub labels: Vec<DetectedObject>,
    /// Unix time in seconds, with fraction.
    pub time: f64,
}

impl PredictionSummary {
    /// `time` as a UTC timestamp, or `None` if it is out of range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if !self.time.is_finite() {
            return None;
        }
        let secs = self.time.floor();
        let nanos = ((self.time - secs) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }
}

/// Parse one label line: `<class index> <cx> <cy> <width> <height>`.
pub fn parse_label_line(line: &str, class_names: &[String]) -> Result<DetectedObject> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[class_idx, cx, cy, width, height] = fields.as_slice() else {
        return Err(PolybotError::InvalidParameter(format!(
            "label line needs 5 fields, got {}: {line:?}",
            fields.len()
        )));
    };

    let index: usize = class_idx
        .parse()
        .map_err(|_| PolybotError::InvalidParameter(format!("bad class index {class_idx:?}")))?;
    let class_name = class_names
        .get(index)
        .ok_or_else(|| PolybotError::InvalidParameter(format!("unknown class index {index}")))?
        .clone();

    let number = |field: &str| -> Result<f64> {
        field
            .parse()
            .map_err(|_| PolybotError::InvalidParameter(format!("bad coordinate {field:?}")))
    };

    Ok(DetectedObject {
        class_name,
        cx: number(cx)?,
        cy: number(cy)?,
        width: number(width)?,
        height: number(height)?,
    })
}

/// Parse a whole label file. Blank lines are skipped.
pub fn parse_labels(text: &str, class_names: &[String]) -> Result<Vec<DetectedObject>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_label_line(line, class_names))
        .collect()
}

/// Chat-friendly count of objects per class, most frequent first:
/// `"Detected objects: 2 person, 1 dog"`.
pub fn summarize_objects(labels: &[DetectedObject]) -> String {
    if labels.is_empty() {
        return "No objects detected.".to_owned();
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.class_name.as_str()).or_default() += 1;
    }
    let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort keeps the alphabetical order from the map for equal counts.
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    let parts: Vec<String> = ordered
        .iter()
        .map(|(name, count)| format!("{count} {name}"))
        .collect();
    format!("Detected objects: {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        ["person", "bicycle", "car", "dog"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn object(class_name: &str) -> DetectedObject {
        DetectedObject {
            class_name: class_name.into(),
            cx: 0.5,
            cy: 0.5,
            width: 0.1,
            height: 0.1,
        }
    }

    #[test]
    fn parses_label_line() {
        let obj = parse_label_line("3 0.5 0.25 0.1 0.2", &names()).unwrap();
        assert_eq!(obj.class_name, "dog");
        assert_eq!((obj.cx, obj.cy, obj.width, obj.height), (0.5, 0.25, 0.1, 0.2));
    }

    #[test]
    fn rejects_unknown_class_and_bad_numbers() {
        assert!(parse_label_line("9 0.5 0.5 0.1 0.1", &names()).is_err());
        assert!(parse_label_line("0 x 0.5 0.1 0.1", &names()).is_err());
        assert!(parse_label_line("0 0.5 0.5 0.1", &names()).is_err());
    }

    #[test]
    fn parses_label_file_skipping_blanks() {
        let text = "0 0.1 0.1 0.2 0.2\n\n2 0.9 0.9 0.1 0.1\n";
        let labels = parse_labels(text, &names()).unwrap();
        let classes: Vec<&str> = labels.iter().map(|l| l.class_name.as_str()).collect();
        assert_eq!(classes, vec!["person", "car"]);
    }

    #[test]
    fn summary_orders_by_count_then_name() {
        let labels = vec![object("dog"), object("person"), object("cat"), object("person")];
        assert_eq!(
            summarize_objects(&labels),
            "Detected objects: 2 person, 1 cat, 1 dog"
        );
        assert_eq!(summarize_objects(&[]), "No objects detected.");
    }

    #[test]
    fn summary_deserializes_from_service_json() {
        let json = r#"{
            "prediction_id": "5b0e4f8e-3c1b-4c8e-9f3a-2d6b1f0a7c11",
            "original_img_path": "photos/street.jpg",
            "predicted_img_path": "static/data/5b0e4f8e/street.jpg",
            "labels": [{"class": "car", "cx": 0.4, "cy": 0.6, "width": 0.2, "height": 0.1}],
            "time": 1700000000.5
        }"#;
        let summary: PredictionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.labels[0].class_name, "car");
        let ts = summary.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }
}
