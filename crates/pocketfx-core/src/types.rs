// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: parameter kinds, parameter values, and value assignments.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flavour of a continuous numeric parameter.
///
/// The subtype never changes how values are sampled; it is kept so the UI can
/// format angles and distances differently from plain scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatSubtype {
    Scalar,
    Distance,
    Angle,
}

impl FloatSubtype {
    /// Parse the `type` tag used in filter attribute metadata.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "scalar" => Some(Self::Scalar),
            "distance" => Some(Self::Distance),
            "angle" => Some(Self::Angle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Distance => "distance",
            Self::Angle => "angle",
        }
    }
}

/// Typed classification of a filter parameter.
///
/// Produced once by the catalog's metadata adapter; consumers never look at
/// the untyped attribute bag again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamKind {
    /// Two-valued switch, sampled from {0, 1}.
    Boolean,
    /// Continuous value in the inclusive range `[min, max]`.
    Float {
        min: f32,
        max: f32,
        subtype: FloatSubtype,
    },
    /// Whole number in the inclusive range `[min, max]`.
    Integer { min: i64, max: i64 },
    /// Not randomised: colors, vectors, images, or numbers without usable
    /// range metadata. The parameter keeps its default.
    Fixed,
}

impl ParamKind {
    /// Whether the configurator assigns random values to this kind.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

/// A concrete parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Boolean(bool),
    Float(f32),
    Integer(i64),
    /// Normalised RGBA, channels nominally in `0.0..=1.0`.
    Color([f32; 4]),
    Vector(Vec<f32>),
}

impl ParamValue {
    /// Numeric view of the value. Booleans map to 0/1.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f32),
            Self::Color(_) | Self::Vector(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Boolean(b) => Some(i64::from(*b)),
            Self::Integer(v) => Some(*v),
            Self::Float(v) => Some(v.round() as i64),
            Self::Color(_) | Self::Vector(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Integer(v) => Some(*v != 0),
            Self::Float(v) => Some(*v != 0.0),
            Self::Color(_) | Self::Vector(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", u8::from(*b)),
            Self::Float(v) => write!(f, "{v:.3}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Color([r, g, b, a]) => write!(f, "rgba({r:.2}, {g:.2}, {b:.2}, {a:.2})"),
            Self::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item:.2}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Declared parameter of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Key used in [`ParamValues`].
    pub name: String,
    /// Label for the UI.
    pub display_name: String,
    pub kind: ParamKind,
    /// Value used until the configurator (or a caller) overrides it.
    pub default: ParamValue,
}

/// A concrete assignment of values to parameter names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamValues(BTreeMap<String, ParamValue>);

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Overwrite entries in `self` with every entry in `other`.
    pub fn overlay(&mut self, other: ParamValues) {
        self.0.extend(other.0);
    }

    // -- Typed lookups --------------------------------------------------------

    pub fn float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(ParamValue::as_f32)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_i64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    pub fn color(&self, name: &str) -> Option<[f32; 4]> {
        self.get(name).and_then(ParamValue::as_color)
    }
}

impl FromIterator<(String, ParamValue)> for ParamValues {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
