// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source image loading and rendered image output. Filters work on normalised
// floating-point RGBA so chained adjustments do not lose precision between
// steps; conversion back to 8-bit happens only for display and export.

use image::{DynamicImage, ImageFormat, Rgba, Rgba32FImage, RgbaImage};
use pocketfx_core::error::PocketError;
use tracing::{debug, info, instrument};

/// Working image type: RGBA with `f32` channels nominally in `0.0..=1.0`.
pub type FloatImage = Rgba32FImage;

/// Load a source image from a file path, downscaling it to fit
/// `max_dimension` (0 keeps the original size).
#[instrument(skip_all, fields(path = %path.as_ref().display(), max_dimension))]
pub fn load_source(
    path: impl AsRef<std::path::Path>,
    max_dimension: u32,
) -> Result<FloatImage, PocketError> {
    let img = image::open(path.as_ref()).map_err(|err| {
        PocketError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(width = img.width(), height = img.height(), "Source image loaded");
    Ok(prepare_source(img, max_dimension))
}

/// Decode a source image from encoded bytes (JPEG, PNG, etc.).
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_source(data: &[u8], max_dimension: u32) -> Result<FloatImage, PocketError> {
    let img = image::load_from_memory(data)
        .map_err(|err| PocketError::ImageError(format!("failed to decode image: {}", err)))?;
    debug!(width = img.width(), height = img.height(), "Source image decoded from bytes");
    Ok(prepare_source(img, max_dimension))
}

/// Convert a decoded image into the working format, downscaling with
/// Lanczos3 when either side exceeds `max_dimension`.
pub fn prepare_source(img: DynamicImage, max_dimension: u32) -> FloatImage {
    let img = if max_dimension > 0 && (img.width() > max_dimension || img.height() > max_dimension)
    {
        let resized = img.resize(
            max_dimension,
            max_dimension,
            image::imageops::FilterType::Lanczos3,
        );
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Source downscaled for preview"
        );
        resized
    } else {
        img
    };
    img.to_rgba32f()
}

/// Placeholder source used when no photo is configured: a diagonal
/// hue gradient with a soft vertical falloff.
pub fn sample_source(width: u32, height: u32) -> FloatImage {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    FloatImage::from_fn(width, height, |x, y| {
        let u = x as f32 / w;
        let v = y as f32 / h;
        Rgba([
            0.15 + 0.8 * u,
            0.25 + 0.6 * (1.0 - (u - v).abs()),
            0.9 - 0.7 * v,
            1.0,
        ])
    })
}

/// Quantise the working image to 8-bit RGBA.
pub fn to_rgba8(image: &FloatImage) -> RgbaImage {
    DynamicImage::ImageRgba32F(image.clone()).to_rgba8()
}

/// Encode the working image as PNG bytes.
pub fn encode_png(image: &FloatImage) -> Result<Vec<u8>, PocketError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageRgba8(to_rgba8(image))
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| PocketError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Write the working image to a file. The format is inferred from the file
/// extension.
pub fn save_rendered(image: &FloatImage, path: impl AsRef<std::path::Path>) -> Result<(), PocketError> {
    to_rgba8(image).save(path.as_ref()).map_err(|err| {
        PocketError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}
