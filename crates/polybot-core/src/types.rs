// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Polybot image filters.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::PolybotError;

/// Which way two matrices are joined by a concatenation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Side by side: rows of the second matrix are appended to rows of the first.
    #[default]
    Horizontal,
    /// Stacked: rows of the second matrix follow the rows of the first.
    Vertical,
}

impl FromStr for Direction {
    type Err = PolybotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(PolybotError::InvalidParameter(format!(
                "unknown concat direction {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// A single transform request, with its parameters resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Blur { kernel: usize },
    Contour,
    Rotate,
    Segment { count: usize },
    SaltAndPepper { amount: f64 },
    Concat { direction: Direction },
}

/// Caption keywords in match priority order. The first keyword found in the
/// lower-cased caption wins.
const CAPTION_KEYWORDS: &[(&str, FilterKind)] = &[
    ("blur", FilterKind::Blur),
    ("contour", FilterKind::Contour),
    ("rotate", FilterKind::Rotate),
    ("segment", FilterKind::Segment),
    ("salt and pepper", FilterKind::SaltAndPepper),
    ("salt_n_pepper", FilterKind::SaltAndPepper),
    ("concat", FilterKind::Concat),
];

#[derive(Debug, Clone, Copy)]
enum FilterKind {
    Blur,
    Contour,
    Rotate,
    Segment,
    SaltAndPepper,
    Concat,
}

impl Filter {
    /// Pick a filter from a free-text instruction such as a photo caption.
    ///
    /// Matching is a case-insensitive substring search, so "please blur this"
    /// selects [`Filter::Blur`]. Parameters are taken from `config`.
    pub fn from_caption(caption: &str, config: &AppConfig) -> Result<Self, PolybotError> {
        let lower = caption.to_lowercase();
        let kind = CAPTION_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| PolybotError::UnknownFilter(caption.to_owned()))?;

        Ok(match kind {
            FilterKind::Blur => Self::Blur {
                kernel: config.blur_kernel,
            },
            FilterKind::Contour => Self::Contour,
            FilterKind::Rotate => Self::Rotate,
            FilterKind::Segment => Self::Segment {
                count: config.segment_count,
            },
            FilterKind::SaltAndPepper => Self::SaltAndPepper {
                amount: config.noise_amount,
            },
            FilterKind::Concat => Self::Concat {
                direction: config.concat_direction,
            },
        })
    }

    /// Short lower-case name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blur { .. } => "blur",
            Self::Contour => "contour",
            Self::Rotate => "rotate",
            Self::Segment { .. } => "segment",
            Self::SaltAndPepper { .. } => "salt_n_pepper",
            Self::Concat { .. } => "concat",
        }
    }
}

/// Files produced by one processing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessedOutput {
    /// A single filtered image.
    Single(PathBuf),
    /// One image per segment, in row order.
    Segments(Vec<PathBuf>),
}

impl ProcessedOutput {
    /// All written paths, in order.
    pub fn paths(&self) -> Vec<&PathBuf> {
        match self {
            Self::Single(path) => vec![path],
            Self::Segments(paths) => paths.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_selects_filter_case_insensitively() {
        let config = AppConfig::default();
        assert_eq!(
            Filter::from_caption("Please BLUR this", &config).unwrap(),
            Filter::Blur { kernel: 16 }
        );
        assert_eq!(
            Filter::from_caption("rotate", &config).unwrap(),
            Filter::Rotate
        );
        assert_eq!(
            Filter::from_caption("Salt and Pepper", &config).unwrap(),
            Filter::SaltAndPepper { amount: 0.05 }
        );
        assert_eq!(
            Filter::from_caption("segment", &config).unwrap(),
            Filter::Segment { count: 4 }
        );
        assert_eq!(
            Filter::from_caption("concat", &config).unwrap(),
            Filter::Concat {
                direction: Direction::Horizontal
            }
        );
    }

    #[test]
    fn earlier_keyword_wins() {
        let config = AppConfig::default();
        // "blur" is checked before "rotate".
        assert_eq!(
            Filter::from_caption("rotate then blur", &config).unwrap(),
            Filter::Blur { kernel: 16 }
        );
    }

    #[test]
    fn unknown_caption_is_rejected() {
        let err = Filter::from_caption("sharpen", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, PolybotError::UnknownFilter(c) if c == "sharpen"));
    }

    #[test]
    fn caption_parameters_follow_config() {
        let config = AppConfig {
            blur_kernel: 3,
            concat_direction: Direction::Vertical,
            ..AppConfig::default()
        };
        assert_eq!(
            Filter::from_caption("blur", &config).unwrap(),
            Filter::Blur { kernel: 3 }
        );
        assert_eq!(
            Filter::from_caption("concat", &config).unwrap(),
            Filter::Concat {
                direction: Direction::Vertical
            }
        );
    }

    #[test]
    fn direction_parses() {
        assert_eq!("Vertical".parse::<Direction>().unwrap(), Direction::Vertical);
        assert_eq!("h".parse::<Direction>().unwrap(), Direction::Horizontal);
        assert!("diagonal".parse::<Direction>().is_err());
    }
}
