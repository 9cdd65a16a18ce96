// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in filter kernels and the attribute metadata that registers them.

pub mod color;
pub mod cube;
pub mod spatial;

use image::Rgba;
use imageproc::map::map_colors;
use pocketfx_core::types::ParamValues;

use crate::catalog::FilterCatalog;
use crate::error::ApplyError;
use crate::image_io::FloatImage;

pub use color::{ColorControls, ColorInvert, GammaAdjust, HueAdjust, Monochrome, Posterize, Sepia};
pub use cube::ColorCube;
pub use spatial::{GaussianBlur, Vignette};

/// Rec. 709 luma weights.
pub(crate) const LUMA: [f32; 3] = [0.2125, 0.7154, 0.0721];

pub(crate) fn luma([r, g, b]: [f32; 3]) -> f32 {
    LUMA[0] * r + LUMA[1] * g + LUMA[2] * b
}

/// Register every built-in kernel, stock four first.
pub(crate) fn register_builtins(catalog: &mut FilterCatalog) {
    catalog.register("ColorInvert", ColorInvert::attributes(), ColorInvert);
    catalog.register("ColorControls", ColorControls::attributes(), ColorControls);
    catalog.register("GammaAdjust", GammaAdjust::attributes(), GammaAdjust);
    catalog.register("HueAdjust", HueAdjust::attributes(), HueAdjust);
    catalog.register("Sepia", Sepia::attributes(), Sepia);
    catalog.register("Monochrome", Monochrome::attributes(), Monochrome);
    catalog.register("Posterize", Posterize::attributes(), Posterize);
    catalog.register("GaussianBlur", GaussianBlur::attributes(), GaussianBlur);
    catalog.register("Vignette", Vignette::attributes(), Vignette);
    catalog.register("ColorCube", ColorCube::attributes(), ColorCube);
}

// -- Parameter access ---------------------------------------------------------

pub(crate) fn float_param(params: &ParamValues, name: &str) -> Result<f32, ApplyError> {
    let value = params
        .float(name)
        .ok_or_else(|| ApplyError::MissingParameter(name.to_string()))?;
    if !value.is_finite() {
        return Err(ApplyError::invalid(name, "must be finite"));
    }
    Ok(value)
}

pub(crate) fn integer_param(params: &ParamValues, name: &str) -> Result<i64, ApplyError> {
    params
        .integer(name)
        .ok_or_else(|| ApplyError::MissingParameter(name.to_string()))
}

pub(crate) fn bool_param(params: &ParamValues, name: &str) -> Result<bool, ApplyError> {
    params
        .boolean(name)
        .ok_or_else(|| ApplyError::MissingParameter(name.to_string()))
}

pub(crate) fn color_param(params: &ParamValues, name: &str) -> Result<[f32; 4], ApplyError> {
    params
        .color(name)
        .ok_or_else(|| ApplyError::MissingParameter(name.to_string()))
}

// -- Pixel helpers ------------------------------------------------------------

/// Apply `f` to the colour channels of every pixel, leaving alpha untouched.
pub(crate) fn map_rgb(image: &FloatImage, f: impl Fn([f32; 3]) -> [f32; 3]) -> FloatImage {
    map_colors(image, |Rgba([r, g, b, a]): Rgba<f32>| {
        let [r, g, b] = f([r, g, b]);
        Rgba([r, g, b, a])
    })
}

pub(crate) fn mix(from: [f32; 3], to: [f32; 3], amount: f32) -> [f32; 3] {
    [
        from[0] + (to[0] - from[0]) * amount,
        from[1] + (to[1] - from[1]) * amount,
        from[2] + (to[2] - from[2]) * amount,
    ]
}
