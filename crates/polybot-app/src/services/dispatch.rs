// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caption dispatch — turns "photo + caption" into a filtered image on disk.

use std::path::PathBuf;

use polybot_core::error::{PolybotError, Result};
use polybot_core::{AppConfig, Filter, ProcessedOutput};
use polybot_imaging::{EncodeOptions, IntensityProcessor};
use tracing::{info, instrument};

use super::gate::ProcessingGate;

/// One incoming photo with its instruction.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// The photo to filter.
    pub image: PathBuf,
    /// Free-text instruction naming the filter.
    pub caption: Option<String>,
    /// Second photo for `concat`. Without one, the photo is joined to itself.
    pub companion: Option<PathBuf>,
}

/// Routes requests to filters, one request at a time.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: AppConfig,
    gate: ProcessingGate,
}

impl Dispatcher {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            gate: ProcessingGate::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn gate(&self) -> &ProcessingGate {
        &self.gate
    }

    /// Handle one request end to end and return the written file(s).
    ///
    /// Fails with `Busy` while another request on this dispatcher is running.
    #[instrument(skip(self, request), fields(image = %request.image.display()))]
    pub fn handle(&self, request: &ProcessRequest) -> Result<ProcessedOutput> {
        let _ticket = self.gate.try_acquire()?;

        let Some(caption) = request.caption.as_deref() else {
            info!("Received photo without a caption");
            return Err(PolybotError::MissingInstruction);
        };
        let filter = Filter::from_caption(caption, &self.config)?;
        info!(filter = filter.name(), "Dispatching");

        self.apply(filter, request)
    }

    /// Run an already-chosen filter. The caller is responsible for holding
    /// the gate.
    fn apply(&self, filter: Filter, request: &ProcessRequest) -> Result<ProcessedOutput> {
        let options = EncodeOptions::from(&self.config);
        let mut processor = IntensityProcessor::open(&request.image)?;

        match filter {
            Filter::Blur { kernel } => {
                processor.blur(kernel)?;
            }
            Filter::Contour => {
                processor.contour()?;
            }
            Filter::Rotate => {
                processor.rotate();
            }
            Filter::SaltAndPepper { amount } => {
                processor.salt_and_pepper(amount)?;
            }
            Filter::Concat { direction } => {
                let other = match &request.companion {
                    Some(path) => IntensityProcessor::open(path)?.into_matrix(),
                    None => processor.matrix().clone(),
                };
                processor.concat(&other, direction);
            }
            Filter::Segment { count } => {
                let paths = processor.segment(count)?.save(&options)?;
                info!(files = paths.len(), "Segments written");
                return Ok(ProcessedOutput::Segments(paths));
            }
        }

        let path = processor.save(&options)?;
        info!(path = %path.display(), "Filtered image written");
        Ok(ProcessedOutput::Single(path))
    }
}
