// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kernels that depend on pixel position: gaussian blur and vignette.

use image::Rgba;
use pocketfx_core::types::ParamValues;
use serde_json::{Value, json};
use tracing::debug;

use super::{bool_param, float_param};
use crate::catalog::ImageFilter;
use crate::error::ApplyError;
use crate::image_io::FloatImage;

/// Gaussian blur with standard deviation `radius` pixels.
pub struct GaussianBlur;

impl GaussianBlur {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Gaussian Blur",
            "categories": ["blur", "still_image"],
            "input_image": { "class": "image" },
            "radius": {
                "class": "number", "type": "distance", "display_name": "Radius",
                "min": 0.0, "slider_min": 0.0, "slider_max": 20.0, "default": 4.0
            },
            "preserve_alpha": {
                "class": "number", "type": "boolean", "display_name": "Preserve Alpha",
                "default": 1
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for GaussianBlur {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let radius = float_param(params, "radius")?;
        let preserve_alpha = bool_param(params, "preserve_alpha")?;
        if radius < 0.0 {
            return Err(ApplyError::invalid("radius", "must not be negative"));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(ApplyError::EmptyImage);
        }
        if radius == 0.0 {
            return Ok(image.clone());
        }

        debug!(radius, preserve_alpha, "Blurring");
        let mut blurred = image::imageops::blur(image, radius);
        if preserve_alpha {
            for (out, src) in blurred.pixels_mut().zip(image.pixels()) {
                out.0[3] = src.0[3];
            }
        }
        Ok(blurred)
    }
}

/// Darken (or, with negative intensity, brighten) towards the corners.
///
/// `radius` is measured in half-diagonals: 1.0 reaches the corners exactly.
pub struct Vignette;

impl Vignette {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Vignette",
            "categories": ["color_effect", "still_image"],
            "input_image": { "class": "image" },
            "radius": {
                "class": "number", "type": "distance", "display_name": "Radius",
                "min": 0.0, "slider_min": 0.0, "slider_max": 2.0, "default": 1.0
            },
            "intensity": {
                "class": "number", "type": "scalar", "display_name": "Intensity",
                "slider_min": -1.0, "slider_max": 1.0, "default": 0.5
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for Vignette {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let radius = float_param(params, "radius")?;
        let intensity = float_param(params, "intensity")?;
        if radius < 0.0 {
            return Err(ApplyError::invalid("radius", "must not be negative"));
        }

        let cx = image.width() as f32 / 2.0;
        let cy = image.height() as f32 / 2.0;
        let half_diagonal = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);

        Ok(FloatImage::from_fn(image.width(), image.height(), |x, y| {
            let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
            let dx = (x as f32 + 0.5 - cx) / half_diagonal;
            let dy = (y as f32 + 0.5 - cy) / half_diagonal;
            let distance = (dx * dx + dy * dy).sqrt();
            let t = if radius > 0.0 {
                (distance / radius).min(1.0)
            } else {
                1.0
            };
            let shade = 1.0 - intensity * t * t;
            Rgba([r * shade, g * shade, b * shade, a])
        }))
    }
}
