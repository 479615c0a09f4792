//! Typed access to parameter values
//!
//!     Values are strings until a behavior asks for something else. Every accessor takes a
//!     list of aliases and reads the first one present, so `<wave up=1>` and
//!     `<wave uptime=1>` mean the same thing.

use super::map::ParameterMap;
use crate::textfx::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Declared type of a parameter, used by registry validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Float,
    Int,
    Bool,
    String,
    Any,
}

impl ParamKind {
    /// Whether `value` can be read as this kind.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            ParamKind::Float => parse_f32(value).is_some(),
            ParamKind::Int => value.trim().parse::<i32>().is_ok(),
            ParamKind::Bool => parse_bool(value).is_some(),
            ParamKind::String => !value.is_empty(),
            ParamKind::Any => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamKind::Float => "float",
            ParamKind::Int => "int",
            ParamKind::Bool => "bool",
            ParamKind::String => "string",
            ParamKind::Any => "any",
        }
    }
}

/// `true/false`, `1/0`, `yes/no`, `on/off`, ignoring ASCII case.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Finite floats only; a trailing `f` is allowed (`0.5f`).
pub fn parse_f32(value: &str) -> Option<f32> {
    let value = value.trim();
    let value = value.strip_suffix(['f', 'F']).unwrap_or(value);
    value.parse::<f32>().ok().filter(|v| v.is_finite())
}

impl ParameterMap {
    pub fn f32_of(&self, aliases: &[&str]) -> Result<Option<f32>, ParameterError> {
        self.typed_of(aliases, ParamKind::Float, parse_f32)
    }

    pub fn i32_of(&self, aliases: &[&str]) -> Result<Option<i32>, ParameterError> {
        self.typed_of(aliases, ParamKind::Int, |v| v.trim().parse().ok())
    }

    pub fn bool_of(&self, aliases: &[&str]) -> Result<Option<bool>, ParameterError> {
        self.typed_of(aliases, ParamKind::Bool, parse_bool)
    }

    /// Like [ParameterMap::f32_of], but a missing value is an error.
    pub fn require_f32(&self, aliases: &[&str]) -> Result<f32, ParameterError> {
        self.f32_of(aliases)?.ok_or_else(|| ParameterError::Missing {
            key: aliases.first().copied().unwrap_or_default().to_string(),
        })
    }

    fn typed_of<T>(
        &self,
        aliases: &[&str],
        kind: ParamKind,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, ParameterError> {
        match self.get_any(aliases) {
            None => Ok(None),
            Some((key, value)) => parse(value).map(Some).ok_or_else(|| ParameterError::Invalid {
                key: key.to_string(),
                value: value.to_string(),
                expected: kind.name(),
            }),
        }
    }
}
