// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people sending photos to the bot.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives whether the caller offers a retry.

use crate::error::PolybotError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Busy or slow service; trying again later may work.
    Transient,
    /// The user must change something (caption, photo, parameters).
    ActionRequired,
    /// Cannot be fixed by retrying or by the user.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether resubmitting the same request may succeed.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `PolybotError` into a `HumanError` suitable for a chat reply.
pub fn humanize_error(err: &PolybotError) -> HumanError {
    match err {
        // -- Matrix processor --
        PolybotError::UnreadableImage { .. } => HumanError {
            message: "We couldn't open that picture.".into(),
            suggestion: "It may be damaged or in an unusual format. Try sending it as a JPEG or PNG.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PolybotError::InvalidKernelSize {
            filter: "segment",
            size,
            height,
            ..
        } => HumanError {
            message: "The picture can't be cut into that many strips.".into(),
            suggestion: if *size == 0 {
                "Ask for at least one strip.".into()
            } else {
                format!(
                    "Cutting into {size} strips needs at least {size} rows but the picture is only {height} pixels tall. Try a taller picture."
                )
            },
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PolybotError::InvalidKernelSize {
            size, height, width, ..
        } => HumanError {
            message: "The picture is too small for that filter.".into(),
            suggestion: format!(
                "The filter needs at least {size} pixels each way but the picture is {width}x{height}. Try a larger picture."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PolybotError::DimensionTooSmall { required, .. } => HumanError {
            message: "The picture is too narrow for that filter.".into(),
            suggestion: format!("Send a picture at least {required} pixels wide."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PolybotError::EncodeFailure { .. } => HumanError {
            message: "We couldn't save the result.".into(),
            suggestion: "Try again. If this keeps happening, the server's storage may be full.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PolybotError::InvalidParameter(detail) => HumanError {
            message: "One of the filter settings isn't valid.".into(),
            suggestion: format!("Check the settings and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Dispatch --
        PolybotError::UnknownFilter(_) => HumanError {
            message: "Unknown processing method.".into(),
            suggestion: "Please provide a valid method in the caption: blur, contour, rotate, segment, salt and pepper, or concat.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PolybotError::MissingInstruction => HumanError {
            message: "Your photo had no caption.".into(),
            suggestion: "Send the photo again with a caption naming the filter, for example \"blur\".".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PolybotError::Busy => HumanError {
            message: "We're still working on your previous picture.".into(),
            suggestion: "Wait for the result, then send the next one.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Detection --
        PolybotError::DetectionTimeout(_) => HumanError {
            message: "Object detection took too long.".into(),
            suggestion: "The detection service may be busy. Try again in a minute.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PolybotError::DetectionNotFound(_) => HumanError {
            message: "No objects were detected.".into(),
            suggestion: "Try a clearer photo where the objects are easy to see.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PolybotError::Detection(_) => HumanError {
            message: "Object detection service error.".into(),
            suggestion: "Try again later.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        PolybotError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try sending it again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the server's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        PolybotError::Serialization(_) => HumanError {
            message: "The bot had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
