// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Attribute metadata adapter — translates a filter's untyped attribute bag
// (a JSON object) into typed parameter specs.
//
// Top-level shape:
//
//   {
//     "display_name": "Gamma Adjust",
//     "categories":   ["color_adjustment"],
//     "input_image":  { "class": "image" },
//     "output_image": { "class": "image" },
//     "power": { "class": "number", "type": "scalar",
//                "slider_min": 0.25, "slider_max": 4.0, "default": 0.75 }
//   }
//
// Every other key whose value is an object describes one parameter.

use pocketfx_core::error::PocketError;
use pocketfx_core::types::{FloatSubtype, ParamKind, ParamSpec, ParamValue};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Keys that describe the filter itself rather than a parameter.
const RESERVED_KEYS: [&str; 4] = ["display_name", "categories", "input_image", "output_image"];

/// Typed view of a filter's attribute bag.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterMetadata {
    pub display_name: String,
    pub categories: Vec<String>,
    pub params: Vec<ParamSpec>,
}

/// Classify every parameter declared in `attributes`.
///
/// Parameters are returned in key order. Image-valued inputs are dropped;
/// numeric parameters whose range metadata is missing or inverted degrade to
/// [`ParamKind::Fixed`] so they keep their default instead of being sampled.
pub fn describe(filter: &str, attributes: &Value) -> Result<FilterMetadata, PocketError> {
    let object = attributes
        .as_object()
        .ok_or_else(|| PocketError::InvalidMetadata {
            filter: filter.to_string(),
            detail: "attributes must be a JSON object".into(),
        })?;

    let display_name = object
        .get("display_name")
        .and_then(Value::as_str)
        .unwrap_or(filter)
        .to_string();
    let categories = object
        .get("categories")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut params = Vec::new();
    for (key, value) in object {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let Some(param) = value.as_object() else {
            continue;
        };
        if let Some(spec) = describe_param(filter, key, param) {
            params.push(spec);
        }
    }

    Ok(FilterMetadata {
        display_name,
        categories,
        params,
    })
}

fn describe_param(filter: &str, name: &str, param: &Map<String, Value>) -> Option<ParamSpec> {
    let display_name = param
        .get("display_name")
        .and_then(Value::as_str)
        .unwrap_or(name)
        .to_string();
    let class = param.get("class").and_then(Value::as_str).unwrap_or("");

    let (kind, default) = match class {
        "number" => classify_number(filter, name, param),
        "color" => (ParamKind::Fixed, color_default(param)),
        "vector" => (ParamKind::Fixed, vector_default(param)),
        "image" => {
            debug!(filter, param = name, "Skipping image-valued parameter");
            return None;
        }
        other => {
            debug!(filter, param = name, class = other, "Skipping parameter of unknown class");
            return None;
        }
    };

    Some(ParamSpec {
        name: name.to_string(),
        display_name,
        kind,
        default,
    })
}

fn classify_number(filter: &str, name: &str, param: &Map<String, Value>) -> (ParamKind, ParamValue) {
    let type_name = param.get("type").and_then(Value::as_str).unwrap_or("");

    if type_name == "boolean" {
        let default = param
            .get("default")
            .and_then(|v| v.as_bool().or_else(|| v.as_f64().map(|n| n != 0.0)))
            .unwrap_or(false);
        return (ParamKind::Boolean, ParamValue::Boolean(default));
    }

    if let Some(subtype) = FloatSubtype::from_type_name(type_name) {
        let default = number(param, "default");
        let range = number(param, "slider_min")
            .zip(number(param, "slider_max"))
            .map(|(min, max)| (min as f32, max as f32));
        return match range {
            // The width must fit in f32 too, or uniform sampling cannot scale.
            Some((min, max)) if min <= max && (max - min).is_finite() => {
                let default = default.map_or(min, |d| d as f32);
                (ParamKind::Float { min, max, subtype }, ParamValue::Float(default))
            }
            _ => {
                warn!(filter, param = name, "Slider range missing or invalid; parameter left at default");
                (ParamKind::Fixed, ParamValue::Float(default.unwrap_or(0.0) as f32))
            }
        };
    }

    // Any other numeric type falls back to an integer range.
    let default = number(param, "default").map(|d| d.round() as i64);
    let range = number(param, "min").zip(number(param, "max"));
    match range {
        Some((min, max)) if min <= max && min.is_finite() && max.is_finite() => {
            let (min, max) = (min.round() as i64, max.round() as i64);
            (ParamKind::Integer { min, max }, ParamValue::Integer(default.unwrap_or(min)))
        }
        _ => {
            warn!(filter, param = name, "Min/max range missing or invalid; parameter left at default");
            (ParamKind::Fixed, ParamValue::Integer(default.unwrap_or(0)))
        }
    }
}

fn number(param: &Map<String, Value>, key: &str) -> Option<f64> {
    param.get(key).and_then(Value::as_f64)
}

fn floats(param: &Map<String, Value>) -> Vec<f32> {
    param
        .get("default")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_f64).map(|v| v as f32).collect())
        .unwrap_or_default()
}

fn color_default(param: &Map<String, Value>) -> ParamValue {
    let channels = floats(param);
    let mut color = [0.0, 0.0, 0.0, 1.0];
    for (slot, value) in color.iter_mut().zip(channels) {
        *slot = value;
    }
    ParamValue::Color(color)
}

fn vector_default(param: &Map<String, Value>) -> ParamValue {
    ParamValue::Vector(floats(param))
}
