// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intensity processor — decodes an image into a grayscale matrix, applies
// filters in place, and writes the result next to the source file.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use polybot_core::error::{PolybotError, Result};
use polybot_core::{AppConfig, Direction, EncodeMode};
use tracing::{debug, info, instrument};

use crate::matrix::IntensityMatrix;

/// How a matrix is turned back into an image file.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    /// Inserted between the source file stem and its extension.
    pub suffix: String,
    /// Value-to-pixel mapping.
    pub mode: EncodeMode,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            suffix: "_filtered".into(),
            mode: EncodeMode::Clamp,
        }
    }
}

impl From<&AppConfig> for EncodeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            suffix: config.output_suffix.clone(),
            mode: config.encode_mode,
        }
    }
}

/// Grayscale filter pipeline over one decoded image.
///
/// The processor exclusively owns its matrix. Filters replace the matrix in
/// place and return `&mut Self` so calls can be chained; nothing here locks,
/// so callers must not share one processor between threads.
///
/// ```ignore
/// let mut processor = IntensityProcessor::open("photos/cat.jpg")?;
/// processor.blur(16)?.rotate();
/// let written = processor.save(&EncodeOptions::default())?;
/// // written == "photos/cat_filtered.jpg"
/// ```
#[derive(Debug, Clone)]
pub struct IntensityProcessor {
    /// The current working matrix.
    matrix: IntensityMatrix,
    /// File the matrix was decoded from; only used to name outputs.
    source_path: PathBuf,
}

impl IntensityProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file and convert it to grayscale intensities.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| PolybotError::UnreadableImage {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self::from_dynamic(img, path))
    }

    /// Decode raw encoded bytes (JPEG, PNG, etc.). `source_path` names the
    /// outputs.
    #[instrument(skip_all, fields(data_len = data.len(), source = %source_path.as_ref().display()))]
    pub fn from_bytes(data: &[u8], source_path: impl AsRef<Path>) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| PolybotError::UnreadableImage {
            path: source_path.as_ref().to_path_buf(),
            reason: err.to_string(),
        })?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self::from_dynamic(img, source_path))
    }

    /// Convert an already-decoded image. Alpha is dropped and single-channel
    /// images are widened to RGB before the luminosity conversion.
    pub fn from_dynamic(image: DynamicImage, source_path: impl AsRef<Path>) -> Self {
        Self {
            matrix: IntensityMatrix::from_rgb(&image.to_rgb8()),
            source_path: source_path.as_ref().to_path_buf(),
        }
    }

    /// Wrap an existing matrix.
    pub fn from_matrix(matrix: IntensityMatrix, source_path: impl AsRef<Path>) -> Self {
        Self {
            matrix,
            source_path: source_path.as_ref().to_path_buf(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    pub fn height(&self) -> usize {
        self.matrix.height()
    }

    /// Borrow the working matrix, e.g. to concatenate it onto another processor.
    pub fn matrix(&self) -> &IntensityMatrix {
        &self.matrix
    }

    /// Consume the processor and return the working matrix.
    pub fn into_matrix(self) -> IntensityMatrix {
        self.matrix
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    // -- Filters --------------------------------------------------------------

    /// Box blur with a `kernel x kernel` window (valid region only).
    #[instrument(skip(self), fields(height = self.height(), width = self.width()))]
    pub fn blur(&mut self, kernel: usize) -> Result<&mut Self> {
        info!(kernel, "Blurring");
        self.matrix = self.matrix.box_blur(kernel)?;
        debug!(new_h = self.height(), new_w = self.width(), "Blur complete");
        Ok(self)
    }

    /// Horizontal edge strength; width shrinks by one.
    #[instrument(skip(self), fields(height = self.height(), width = self.width()))]
    pub fn contour(&mut self) -> Result<&mut Self> {
        info!("Extracting contour");
        self.matrix = self.matrix.contour()?;
        Ok(self)
    }

    /// Rotate 90 degrees clockwise.
    #[instrument(skip(self), fields(height = self.height(), width = self.width()))]
    pub fn rotate(&mut self) -> &mut Self {
        info!("Rotating 90 degrees clockwise");
        self.matrix = self.matrix.rotate_clockwise();
        self
    }

    /// Salt-and-pepper noise using the thread-local RNG.
    pub fn salt_and_pepper(&mut self, amount: f64) -> Result<&mut Self> {
        self.salt_and_pepper_with(&mut rand::thread_rng(), amount)
    }

    /// Salt-and-pepper noise drawing from `rng`; see
    /// [`IntensityMatrix::salt_and_pepper`] for the exact draw rule.
    #[instrument(skip(self, rng), fields(height = self.height(), width = self.width()))]
    pub fn salt_and_pepper_with<R: rand::Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        amount: f64,
    ) -> Result<&mut Self> {
        info!(amount, "Adding salt-and-pepper noise");
        self.matrix.salt_and_pepper(rng, amount)?;
        Ok(self)
    }

    /// Join `other` onto the working matrix, cropping both to their shared
    /// minimum size first. `other` is only read.
    #[instrument(skip(self, other), fields(
        height = self.height(),
        width = self.width(),
        other_h = other.height(),
        other_w = other.width(),
    ))]
    pub fn concat(&mut self, other: &IntensityMatrix, direction: Direction) -> &mut Self {
        info!(%direction, "Concatenating");
        self.matrix = self.matrix.concat(other, direction);
        debug!(new_h = self.height(), new_w = self.width(), "Concat complete");
        self
    }

    /// Split into `count` row bands. The processor is consumed: afterwards the
    /// result is a [`SegmentSet`], not a single matrix.
    #[instrument(skip(self), fields(height = self.height(), width = self.width()))]
    pub fn segment(self, count: usize) -> Result<SegmentSet> {
        info!(count, "Segmenting rows");
        let segments = self.matrix.split_rows(count)?;
        Ok(SegmentSet {
            segments,
            source_path: self.source_path,
        })
    }

    // -- Output ---------------------------------------------------------------

    /// Where [`save`](Self::save) will write: `<stem><suffix>.<ext>` beside
    /// the source file.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        derive_output_path(&self.source_path, suffix)
    }

    /// Write the matrix as a grayscale image and return the new path. The
    /// format follows the source file's extension.
    #[instrument(skip(self, options), fields(source = %self.source_path.display()))]
    pub fn save(&self, options: &EncodeOptions) -> Result<PathBuf> {
        let path = self.output_path(&options.suffix);
        write_matrix(&self.matrix, &path, options.mode)?;
        Ok(path)
    }
}

/// Ordered row bands produced by [`IntensityProcessor::segment`].
#[derive(Debug, Clone)]
pub struct SegmentSet {
    segments: Vec<IntensityMatrix>,
    source_path: PathBuf,
}

impl SegmentSet {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from top to bottom.
    pub fn segments(&self) -> &[IntensityMatrix] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<IntensityMatrix> {
        self.segments
    }

    /// Write segment `i` (counting from 1) to `<stem><suffix>_<i>.<ext>` and
    /// return the paths in order.
    #[instrument(
        skip(self, options),
        fields(source = %self.source_path.display(), count = self.len())
    )]
    pub fn save(&self, options: &EncodeOptions) -> Result<Vec<PathBuf>> {
        self.segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                let suffix = format!("{}_{}", options.suffix, index + 1);
                let path = derive_output_path(&self.source_path, &suffix);
                write_matrix(segment, &path, options.mode)?;
                Ok(path)
            })
            .collect()
    }
}

/// `dir/name.ext` -> `dir/name<suffix>.ext`.
fn derive_output_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match source.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    source.with_file_name(file_name)
}

/// Encode `matrix` and write it to `path`.
fn write_matrix(matrix: &IntensityMatrix, path: &Path, mode: EncodeMode) -> Result<()> {
    let encode_failure = |reason: String| PolybotError::EncodeFailure {
        path: path.to_path_buf(),
        reason,
    };

    if matrix.is_empty() {
        return Err(encode_failure(format!(
            "cannot encode an empty {}x{} matrix",
            matrix.height(),
            matrix.width()
        )));
    }

    let gray = matrix
        .to_gray_image(mode)
        .map_err(|err| encode_failure(err.to_string()))?;
    gray.save(path).map_err(|err| encode_failure(err.to_string()))?;

    info!(
        path = %path.display(),
        width = gray.width(),
        height = gray.height(),
        "Image written"
    );
    Ok(())
}

// -- Tests --------------------------------------------------------------------
