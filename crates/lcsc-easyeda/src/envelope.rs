//! Typed views of the EasyEDA component payload.
//!
//! Symbol drawings live at `dataStr.{head,shape}`, footprints at
//! `packageDetail.dataStr.{head,shape}`. The payload may be the bare
//! `result` object or the full API response wrapping it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::decoder::decode;
use crate::error::DecodeError;
use crate::shape::ShapeRecord;
use crate::units::{DrawingOrigin, Scale};

/// `dataStr.head` of a drawing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataHead {
    #[serde(default, deserialize_with = "number_or_string")]
    pub x: f64,
    #[serde(default, deserialize_with = "number_or_string")]
    pub y: f64,
    /// Component parameters (`pre`, `package`, `Manufacturer`, ...).
    #[serde(default, deserialize_with = "string_map")]
    pub c_para: BTreeMap<String, String>,
}

impl DataHead {
    pub fn origin(&self) -> DrawingOrigin {
        DrawingOrigin::new(self.x, self.y)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.c_para
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// One drawing: header plus raw shape-language lines.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShapeDocument {
    #[serde(default)]
    pub head: DataHead,
    pub shape: Vec<String>,
}

impl ShapeDocument {
    pub fn from_symbol_json(text: &str) -> Result<Self, DecodeError> {
        Self::from_symbol_value(&serde_json::from_str(text)?)
    }

    pub fn from_footprint_json(text: &str) -> Result<Self, DecodeError> {
        Self::from_footprint_value(&serde_json::from_str(text)?)
    }

    pub fn from_symbol_value(payload: &Value) -> Result<Self, DecodeError> {
        let data_str = unwrap_result(payload)
            .get("dataStr")
            .ok_or(DecodeError::MissingStructure("dataStr"))?;
        Self::from_data_str(data_str, "dataStr.shape")
    }

    pub fn from_footprint_value(payload: &Value) -> Result<Self, DecodeError> {
        let data_str = unwrap_result(payload)
            .get("packageDetail")
            .ok_or(DecodeError::MissingStructure("packageDetail"))?
            .get("dataStr")
            .ok_or(DecodeError::MissingStructure("packageDetail.dataStr"))?;
        Self::from_data_str(data_str, "packageDetail.dataStr.shape")
    }

    fn from_data_str(data_str: &Value, shape_path: &'static str) -> Result<Self, DecodeError> {
        match data_str.get("shape") {
            Some(Value::Array(_)) => Ok(Self::deserialize(data_str)?),
            _ => Err(DecodeError::MissingStructure(shape_path)),
        }
    }

    pub fn origin(&self) -> DrawingOrigin {
        self.head.origin()
    }

    /// Decode every shape line relative to this drawing's origin.
    pub fn decode(&self, scale: Scale) -> Vec<ShapeRecord> {
        decode(self.shape.as_slice(), self.origin(), scale)
    }
}

fn unwrap_result(payload: &Value) -> &Value {
    match payload.get("result") {
        Some(result @ Value::Object(_)) => result,
        _ => payload,
    }
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate {s:?}"))),
        other => Err(serde::de::Error::custom(format!(
            "expected number or string, found {other}"
        ))),
    }
}

/// Keep scalar parameters as text, drop nested objects and arrays.
fn string_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, text))
        })
        .collect())
}
