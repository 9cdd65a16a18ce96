// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter configurator — assigns random values to a filter's numeric
// parameters.
//
// Booleans are drawn from {0, 1}, floats uniformly from the inclusive slider
// range (skipped when it is inverted or wider than f32 can represent), integers uniformly from the inclusive [min, max] range. Fixed
// parameters (colours, vectors, numbers without a usable range) are never
// touched and keep their defaults.

use pocketfx_core::types::{ParamKind, ParamValue, ParamValues};
use rand::Rng;
use rand::distr::Uniform;
use tracing::{debug, instrument, warn};

use crate::catalog::FilterDescriptor;
use crate::chain::FilterInstance;

/// Draw a random value for every numeric parameter of `descriptor`.
///
/// The returned assignment contains only the sampled parameters.
#[instrument(skip_all, fields(filter = descriptor.name()))]
pub fn configure<R: Rng>(descriptor: &FilterDescriptor, rng: &mut R) -> ParamValues {
    let mut values = ParamValues::new();
    for spec in descriptor.params() {
        let Some(value) = sample(&spec.kind, rng) else {
            continue;
        };
        debug!(param = %spec.name, kind = kind_label(&spec.kind), %value, "Parameter randomised");
        values.insert(spec.name.clone(), value);
    }
    values
}

/// Bind `descriptor` to its defaults overlaid with a fresh random assignment.
pub fn instantiate<R: Rng>(descriptor: FilterDescriptor, rng: &mut R) -> FilterInstance {
    let mut values = descriptor.default_values();
    values.overlay(configure(&descriptor, rng));
    FilterInstance::new(descriptor, values)
}

/// Sample a single value for `kind`. Returns `None` for [`ParamKind::Fixed`],
/// for inverted ranges and for float ranges with non-finite bounds or width.
pub fn sample<R: Rng>(kind: &ParamKind, rng: &mut R) -> Option<ParamValue> {
    match *kind {
        ParamKind::Boolean => Some(ParamValue::Boolean(rng.random_bool(0.5))),
        ParamKind::Float { min, max, .. } => match Uniform::new_inclusive(min, max) {
            Ok(range) => Some(ParamValue::Float(rng.sample(range))),
            Err(err) => {
                warn!(min, max, error = %err, "Unusable float range; leaving parameter at default");
                None
            }
        },
        ParamKind::Integer { min, max } => {
            if min > max {
                warn!(min, max, "Inverted integer range; leaving parameter at default");
                return None;
            }
            Some(ParamValue::Integer(rng.random_range(min..=max)))
        }
        ParamKind::Fixed => None,
    }
}

fn kind_label(kind: &ParamKind) -> &'static str {
    match kind {
        ParamKind::Boolean => "boolean",
        ParamKind::Float { subtype, .. } => subtype.as_str(),
        ParamKind::Integer { .. } => "integer",
        ParamKind::Fixed => "fixed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FilterCatalog;
    use crate::error::ApplyError;
    use crate::image_io::FloatImage;
    use pocketfx_core::types::FloatSubtype;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    const SAMPLES: usize = 1000;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn catalog_with_probe() -> FilterCatalog {
        let mut catalog = FilterCatalog::builtin();
        catalog.register(
            "Probe",
            json!({
                "flag":  { "class": "number", "type": "boolean" },
                "level": { "class": "number", "type": "integer", "min": -3, "max": 4 },
                "angle": { "class": "number", "type": "angle", "slider_min": -1.5, "slider_max": 1.5 },
                "tint":  { "class": "color", "default": [0.1, 0.2, 0.3, 1.0] }
            }),
            |image: &FloatImage, _: &ParamValues| -> Result<FloatImage, ApplyError> { Ok(image.clone()) },
        );
        catalog
    }

    #[test]
    fn booleans_are_zero_or_one_and_roughly_uniform() {
        let mut rng = rng();
        let mut ones = 0usize;
        for _ in 0..SAMPLES {
            let value = sample(&ParamKind::Boolean, &mut rng).unwrap();
            let as_number = value.as_i64().unwrap();
            assert!(as_number == 0 || as_number == 1);
            ones += as_number as usize;
        }
        // Chi-square with one degree of freedom; 10.83 is the 0.1% critical value.
        let expected = SAMPLES as f64 / 2.0;
        let zeros = SAMPLES - ones;
        let chi_square = [ones, zeros]
            .iter()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum::<f64>();
        assert!(chi_square < 10.83, "chi-square {chi_square} ({ones} ones)");
    }

    #[test]
    fn floats_stay_within_inclusive_slider_range() {
        let kind = ParamKind::Float { min: -0.5, max: 2.5, subtype: FloatSubtype::Distance };
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let v = sample(&kind, &mut rng).and_then(|v| v.as_f32()).unwrap();
            assert!((-0.5..=2.5).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn integers_stay_within_inclusive_range_and_hit_both_ends() {
        let kind = ParamKind::Integer { min: 2, max: 5 };
        let mut rng = rng();
        let mut seen = [false; 4];
        for _ in 0..SAMPLES {
            let v = sample(&kind, &mut rng).and_then(|v| v.as_i64()).unwrap();
            assert!((2..=5).contains(&v), "{v} out of range");
            seen[(v - 2) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "not every value drawn: {seen:?}");
    }

    #[test]
    fn degenerate_and_inverted_ranges() {
        let mut rng = rng();
        assert_eq!(
            sample(&ParamKind::Integer { min: 7, max: 7 }, &mut rng),
            Some(ParamValue::Integer(7))
        );
        assert_eq!(sample(&ParamKind::Integer { min: 3, max: 1 }, &mut rng), None);
        assert_eq!(
            sample(
                &ParamKind::Float { min: 1.0, max: 0.0, subtype: FloatSubtype::Scalar },
                &mut rng
            ),
            None
        );
        assert_eq!(sample(&ParamKind::Fixed, &mut rng), None);
    }

    #[test]
    fn equal_float_bounds_yield_that_value() {
        let kind = ParamKind::Float { min: 1.5, max: 1.5, subtype: FloatSubtype::Scalar };
        let mut rng = rng();
        for _ in 0..10 {
            assert_eq!(sample(&kind, &mut rng), Some(ParamValue::Float(1.5)));
        }
    }

    #[test]
    fn float_ranges_beyond_f32_are_left_at_default() {
        let mut rng = rng();
        let float = |min, max| ParamKind::Float { min, max, subtype: FloatSubtype::Distance };
        assert_eq!(sample(&float(-3e38, 3e38), &mut rng), None);
        assert_eq!(sample(&float(0.0, f32::INFINITY), &mut rng), None);
        assert_eq!(sample(&float(f32::NAN, 1.0), &mut rng), None);
    }

    #[test]
    fn configure_survives_oversized_slider_metadata() {
        let mut catalog = FilterCatalog::new();
        catalog.register(
            "Wide",
            json!({
                "wide": { "class": "number", "type": "scalar", "slider_min": -3e38, "slider_max": 3e38, "default": 0.5 },
                "huge": { "class": "number", "type": "scalar", "slider_min": 0.0, "slider_max": 1e40 }
            }),
            |image: &FloatImage, _: &ParamValues| -> Result<FloatImage, ApplyError> { Ok(image.clone()) },
        );
        let descriptor = catalog.lookup("Wide").unwrap();
        assert!(configure(&descriptor, &mut rng()).is_empty());

        let instance = instantiate(descriptor, &mut rng());
        assert_eq!(instance.values().float("wide"), Some(0.5));
    }

    #[test]
    fn configure_skips_fixed_parameters() {
        let descriptor = catalog_with_probe().lookup("Probe").unwrap();
        let values = configure(&descriptor, &mut rng());
        assert_eq!(values.len(), 3);
        assert!(!values.contains("tint"));
        assert!((-3..=4).contains(&values.integer("level").unwrap()));
        assert!((-1.5..=1.5).contains(&values.float("angle").unwrap()));
    }

    #[test]
    fn instantiate_keeps_defaults_for_fixed_parameters() {
        let descriptor = catalog_with_probe().lookup("Probe").unwrap();
        let instance = instantiate(descriptor, &mut rng());
        assert_eq!(instance.values().color("tint"), Some([0.1, 0.2, 0.3, 1.0]));
        assert_eq!(instance.values().len(), 4);
    }

    #[test]
    fn parameterless_filter_gets_empty_assignment() {
        let invert = FilterCatalog::builtin().lookup("ColorInvert").unwrap();
        assert!(configure(&invert, &mut rng()).is_empty());
    }

    #[test]
    fn same_seed_gives_same_assignment() {
        let descriptor = FilterCatalog::builtin().lookup("ColorControls").unwrap();
        let a = configure(&descriptor, &mut StdRng::seed_from_u64(9));
        let b = configure(&descriptor, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
