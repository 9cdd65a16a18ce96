// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// 3D colour lookup table kernel. The table holds a fixed cross-processed
// grade sampled on an N×N×N lattice and is read back with trilinear
// interpolation.

use pocketfx_core::types::ParamValues;
use serde_json::{Value, json};

use super::{integer_param, map_rgb};
use crate::catalog::ImageFilter;
use crate::error::ApplyError;
use crate::image_io::FloatImage;

const MAX_DIMENSION: i64 = 64;

/// Colour cube lookup. `cube_dimension` must be a power of two.
pub struct ColorCube;

impl ColorCube {
    pub fn attributes() -> Value {
        json!({
            "display_name": "Color Cube",
            "categories": ["color_effect", "still_image"],
            "input_image": { "class": "image" },
            "cube_dimension": {
                "class": "number", "type": "count", "display_name": "Cube Dimension",
                "min": 2, "max": MAX_DIMENSION, "default": 16
            },
            "output_image": { "class": "image" }
        })
    }
}

impl ImageFilter for ColorCube {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        let dimension = integer_param(params, "cube_dimension")?;
        if !(2..=MAX_DIMENSION).contains(&dimension) {
            return Err(ApplyError::invalid(
                "cube_dimension",
                format!("must be between 2 and {MAX_DIMENSION}, got {dimension}"),
            ));
        }
        if !(dimension as u64).is_power_of_two() {
            return Err(ApplyError::invalid(
                "cube_dimension",
                format!("must be a power of two, got {dimension}"),
            ));
        }

        let cube = Cube::build(dimension as usize, grade);
        Ok(map_rgb(image, |rgb| cube.sample(rgb)))
    }
}

/// The look baked into the cube: lifted blacks, warm highlights, muted blues.
fn grade([r, g, b]: [f32; 3]) -> [f32; 3] {
    let smooth = |c: f32| c * c * (3.0 - 2.0 * c);
    [smooth(r), g.powf(0.9), 0.1 + 0.8 * b]
}

struct Cube {
    n: usize,
    /// Indexed `[b][g][r]`.
    data: Vec<[f32; 3]>,
}

impl Cube {
    fn build(n: usize, f: impl Fn([f32; 3]) -> [f32; 3]) -> Self {
        let scale = (n - 1) as f32;
        let mut data = Vec::with_capacity(n * n * n);
        for b in 0..n {
            for g in 0..n {
                for r in 0..n {
                    data.push(f([r as f32 / scale, g as f32 / scale, b as f32 / scale]));
                }
            }
        }
        Self { n, data }
    }

    fn at(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[(b * self.n + g) * self.n + r]
    }

    fn sample(&self, rgb: [f32; 3]) -> [f32; 3] {
        let scale = (self.n - 1) as f32;
        let pos = rgb.map(|c| c.clamp(0.0, 1.0) * scale);
        let base = pos.map(|p| (p.floor() as usize).min(self.n - 2));
        let frac = [
            pos[0] - base[0] as f32,
            pos[1] - base[1] as f32,
            pos[2] - base[2] as f32,
        ];

        let mut out = [0.0f32; 3];
        for corner in 0..8 {
            let dr = corner & 1;
            let dg = (corner >> 1) & 1;
            let db = (corner >> 2) & 1;
            let weight = axis_weight(frac[0], dr) * axis_weight(frac[1], dg) * axis_weight(frac[2], db);
            let value = self.at(base[0] + dr, base[1] + dg, base[2] + db);
            for (o, v) in out.iter_mut().zip(value) {
                *o += weight * v;
            }
        }
        out
    }
}

fn axis_weight(frac: f32, upper: usize) -> f32 {
    if upper == 1 { frac } else { 1.0 - frac }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::sample_source;
    use crate::kernels::test_support::{max_channel_diff, params};
    use pocketfx_core::types::ParamValue;

    fn cube_params(dimension: i64) -> ParamValues {
        params(&[("cube_dimension", ParamValue::Integer(dimension))])
    }

    #[test]
    fn non_power_of_two_dimension_is_rejected() {
        let err = ColorCube.apply(&sample_source(4, 4), &cube_params(12)).unwrap_err();
        match err {
            ApplyError::InvalidParameter { param, reason } => {
                assert_eq!(param, "cube_dimension");
                assert!(reason.contains("power of two"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn out_of_range_dimension_is_rejected() {
        assert!(ColorCube.apply(&sample_source(4, 4), &cube_params(128)).is_err());
        assert!(ColorCube.apply(&sample_source(4, 4), &cube_params(1)).is_err());
    }

    #[test]
    fn identity_cube_reproduces_input() {
        let cube = Cube::build(8, |rgb| rgb);
        for rgb in [[0.0, 0.0, 0.0], [0.3, 0.6, 0.9], [1.0, 1.0, 1.0], [0.51, 0.02, 0.77]] {
            let out = cube.sample(rgb);
            for (a, b) in out.iter().zip(rgb) {
                assert!((a - b).abs() < 1e-5, "{out:?} vs {rgb:?}");
            }
        }
    }

    #[test]
    fn larger_cubes_track_the_grade_closely() {
        let source = sample_source(16, 16);
        let coarse = ColorCube.apply(&source, &cube_params(4)).unwrap();
        let fine = ColorCube.apply(&source, &cube_params(64)).unwrap();
        let exact = map_rgb(&source, grade);
        assert!(max_channel_diff(&fine, &exact) <= max_channel_diff(&coarse, &exact));
        assert!(max_channel_diff(&fine, &exact) < 0.01);
    }
}
