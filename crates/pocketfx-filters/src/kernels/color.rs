// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel colour kernels: invert, brightness/contrast/saturation, gamma,
// hue rotation, sepia, monochrome tint and posterisation. Alpha passes
// through every kernel unchanged.

use std::f32::consts::PI;

use pocketfx_core::types::ParamValues;
use serde_json::{Value, json};

use super::{color_param, float_param, integer_param, luma, map_rgb, mix};
use crate::catalog::ImageFilter;
use crate::error::ApplyError;
use crate::image_io::FloatImage;

/// `1 - c` on every colour channel.
pub struct ColorInvert;

impl ColorInvert {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Color Invert",
            "categories": ["color_effect", "still_image"],
            "input_image": { "class": "image" },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for ColorInvert {
    fn apply(&self, image: &FloatImage, _params: &ParamValues) -> Result<FloatImage, ApplyError> {
        Ok(map_rgb(image, |[r, g, b]| [1.0 - r, 1.0 - g, 1.0 - b]))
    }
}

/// Saturation, then brightness offset, then contrast about mid-grey.
pub struct ColorControls;

impl ColorControls {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Color Controls",
            "categories": ["color_adjustment", "still_image"],
            "input_image": { "class": "image" },
            "saturation": {
                "class": "number", "type": "scalar", "display_name": "Saturation",
                "min": 0.0, "slider_min": 0.0, "slider_max": 2.0, "default": 1.0
            },
            "brightness": {
                "class": "number", "type": "scalar", "display_name": "Brightness",
                "min": -1.0, "slider_min": -1.0, "slider_max": 1.0, "default": 0.0
            },
            "contrast": {
                "class": "number", "type": "scalar", "display_name": "Contrast",
                "min": 0.25, "slider_min": 0.25, "slider_max": 4.0, "default": 1.0
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for ColorControls {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let saturation = float_param(params, "saturation")?;
        let brightness = float_param(params, "brightness")?;
        let contrast = float_param(params, "contrast")?;
        if saturation < 0.0 {
            return Err(ApplyError::invalid("saturation", "must not be negative"));
        }

        Ok(map_rgb(image, |rgb| {
            let l = luma(rgb);
            rgb.map(|c| {
                let c = l + (c - l) * saturation + brightness;
                (c - 0.5) * contrast + 0.5
            })
        }))
    }
}

/// Raise every channel to `power`.
pub struct GammaAdjust;

impl GammaAdjust {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Gamma Adjust",
            "categories": ["color_adjustment", "still_image"],
            "input_image": { "class": "image" },
            "power": {
                "class": "number", "type": "scalar", "display_name": "Power",
                "slider_min": 0.25, "slider_max": 4.0, "default": 0.75
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for GammaAdjust {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let power = float_param(params, "power")?;
        if power <= 0.0 {
            return Err(ApplyError::invalid("power", "must be positive"));
        }
        Ok(map_rgb(image, |rgb| rgb.map(|c| c.max(0.0).powf(power))))
    }
}

/// Rotate hue by `angle` radians in YIQ space.
pub struct HueAdjust;

impl HueAdjust {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Hue Adjust",
            "categories": ["color_adjustment", "still_image"],
            "input_image": { "class": "image" },
            "angle": {
                "class": "number", "type": "angle", "display_name": "Angle",
                "slider_min": -PI, "slider_max": PI, "default": 0.0
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for HueAdjust {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let angle = float_param(params, "angle")?;
        let (sin, cos) = angle.sin_cos();

        Ok(map_rgb(image, |[r, g, b]| {
            let y = 0.299 * r + 0.587 * g + 0.114 * b;
            let i = 0.596 * r - 0.274 * g - 0.322 * b;
            let q = 0.211 * r - 0.523 * g + 0.312 * b;

            let i2 = i * cos - q * sin;
            let q2 = i * sin + q * cos;

            [
                y + 0.956 * i2 + 0.621 * q2,
                y - 0.272 * i2 - 0.647 * q2,
                y - 1.106 * i2 + 1.703 * q2,
            ]
        }))
    }
}

/// Classic sepia tone matrix blended by `intensity`.
pub struct Sepia;

impl Sepia {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Sepia Tone",
            "categories": ["color_effect", "still_image"],
            "input_image": { "class": "image" },
            "intensity": {
                "class": "number", "type": "scalar", "display_name": "Intensity",
                "min": 0.0, "max": 1.0, "slider_min": 0.0, "slider_max": 1.0, "default": 1.0
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for Sepia {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let intensity = float_param(params, "intensity")?;
        Ok(map_rgb(image, |rgb @ [r, g, b]| {
            let toned = [
                0.393 * r + 0.769 * g + 0.189 * b,
                0.349 * r + 0.686 * g + 0.168 * b,
                0.272 * r + 0.534 * g + 0.131 * b,
            ];
            mix(rgb, toned, intensity)
        }))
    }
}

/// Luma multiplied by a tint colour, blended by `intensity`.
pub struct Monochrome;

impl Monochrome {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Color Monochrome",
            "categories": ["color_effect", "still_image"],
            "input_image": { "class": "image" },
            "color": {
                "class": "color", "display_name": "Color",
                "default": [0.6, 0.45, 0.3, 1.0]
            },
            "intensity": {
                "class": "number", "type": "scalar", "display_name": "Intensity",
                "slider_min": 0.0, "slider_max": 1.0, "default": 1.0
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for Monochrome {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let [tr, tg, tb, _] = color_param(params, "color")?;
        let intensity = float_param(params, "intensity")?;
        Ok(map_rgb(image, |rgb| {
            let l = luma(rgb);
            mix(rgb, [l * tr, l * tg, l * tb], intensity)
        }))
    }
}

/// Quantise each channel to `levels` evenly spaced values.
pub struct Posterize;

impl Posterize {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Color Posterize",
            "categories": ["color_effect", "still_image"],
            "input_image": { "class": "image" },
            "levels": {
                "class": "number", "type": "integer", "display_name": "Levels",
                "min": 2, "max": 30, "default": 6
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for Posterize {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let levels = integer_param(params, "levels")?;
        if levels < 2 {
            return Err(ApplyError::invalid("levels", format!("need at least 2, got {levels}")));
        }
        let steps = (levels - 1) as f32;
        Ok(map_rgb(image, |rgb| {
            rgb.map(|c| (c.clamp(0.0, 1.0) * steps).round() / steps)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::sample_source;
    use crate::kernels::test_support::{max_channel_diff, params};
    use image::Rgba;
    use pocketfx_core::types::ParamValue;

    /// Straightforward reference inversion used to check the kernel exactly.
    fn reference_invert(image: &FloatImage) -> FloatImage {
        let mut out = image.clone();
        for pixel in out.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            *pixel = Rgba([1.0 - r, 1.0 - g, 1.0 - b, a]);
        }
        out
    }

    #[test]
    fn invert_matches_reference_bit_for_bit() {
        let source = sample_source(32, 24);
        let inverted = ColorInvert.apply(&source, &ParamValues::new()).unwrap();
        assert_eq!(inverted, reference_invert(&source));
    }

    #[test]
    fn invert_keeps_alpha() {
        let source = FloatImage::from_pixel(2, 2, Rgba([0.25, 0.5, 1.0, 0.4]));
        let inverted = ColorInvert.apply(&source, &ParamValues::new()).unwrap();
        assert_eq!(*inverted.get_pixel(1, 1), Rgba([0.75, 0.5, 0.0, 0.4]));
    }

    #[test]
    fn gamma_two_then_half_round_trips() {
        let source = sample_source(32, 32);
        let squared = GammaAdjust
            .apply(&source, &params(&[("power", ParamValue::Float(2.0))]))
            .unwrap();
        let restored = GammaAdjust
            .apply(&squared, &params(&[("power", ParamValue::Float(0.5))]))
            .unwrap();
        assert!(max_channel_diff(&source, &restored) < 1e-5);
    }

    #[test]
    fn gamma_rejects_non_positive_power() {
        let source = sample_source(4, 4);
        let err = GammaAdjust
            .apply(&source, &params(&[("power", ParamValue::Float(0.0))]))
            .unwrap_err();
        assert!(matches!(err, ApplyError::InvalidParameter { .. }));
    }

    #[test]
    fn missing_parameter_is_reported() {
        let err = GammaAdjust.apply(&sample_source(4, 4), &ParamValues::new()).unwrap_err();
        assert_eq!(err, ApplyError::MissingParameter("power".into()));
    }

    #[test]
    fn neutral_color_controls_are_identity() {
        let source = sample_source(16, 16);
        let out = ColorControls
            .apply(
                &source,
                &params(&[
                    ("saturation", ParamValue::Float(1.0)),
                    ("brightness", ParamValue::Float(0.0)),
                    ("contrast", ParamValue::Float(1.0)),
                ]),
            )
            .unwrap();
        assert!(max_channel_diff(&source, &out) < 1e-6);
    }

    #[test]
    fn zero_saturation_yields_grey() {
        let source = FloatImage::from_pixel(1, 1, Rgba([0.9, 0.2, 0.1, 1.0]));
        let out = ColorControls
            .apply(
                &source,
                &params(&[
                    ("saturation", ParamValue::Float(0.0)),
                    ("brightness", ParamValue::Float(0.0)),
                    ("contrast", ParamValue::Float(1.0)),
                ]),
            )
            .unwrap();
        let Rgba([r, g, b, _]) = *out.get_pixel(0, 0);
        assert!((r - g).abs() < 1e-6 && (g - b).abs() < 1e-6);
    }

    #[test]
    fn zero_hue_rotation_is_close_to_identity() {
        let source = sample_source(16, 16);
        let out = HueAdjust
            .apply(&source, &params(&[("angle", ParamValue::Float(0.0))]))
            .unwrap();
        assert!(max_channel_diff(&source, &out) < 1e-2);
    }

    #[test]
    fn zero_intensity_sepia_and_monochrome_are_identity() {
        let source = sample_source(8, 8);
        let sepia = Sepia
            .apply(&source, &params(&[("intensity", ParamValue::Float(0.0))]))
            .unwrap();
        assert!(max_channel_diff(&source, &sepia) < 1e-6);

        let mono = Monochrome
            .apply(
                &source,
                &params(&[
                    ("color", ParamValue::Color([1.0, 0.0, 0.0, 1.0])),
                    ("intensity", ParamValue::Float(0.0)),
                ]),
            )
            .unwrap();
        assert!(max_channel_diff(&source, &mono) < 1e-6);
    }

    #[test]
    fn two_level_posterize_is_binary() {
        let source = sample_source(16, 16);
        let out = Posterize
            .apply(&source, &params(&[("levels", ParamValue::Integer(2))]))
            .unwrap();
        for Rgba([r, g, b, _]) in out.pixels() {
            for c in [*r, *g, *b] {
                assert!(c == 0.0 || c == 1.0, "unexpected channel {c}");
            }
        }
    }

    #[test]
    fn single_level_posterize_is_rejected() {
        let err = Posterize
            .apply(&sample_source(4, 4), &params(&[("levels", ParamValue::Integer(1))]))
            .unwrap_err();
        assert!(matches!(err, ApplyError::InvalidParameter { .. }));
    }
}
