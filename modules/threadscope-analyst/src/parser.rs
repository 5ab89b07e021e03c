// Model reply → ExtractionResult. Decoding is strict; coercion of the
// decoded values is permissive and sentinel-filled.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use ai_client::strip_code_blocks;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result};
use crate::schema::{ExtractionSchema, FieldType, UNKNOWN};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn sentinel(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Text | FieldType::Enum(_) => FieldValue::Text(UNKNOWN.to_string()),
            FieldType::Number => FieldValue::Number(0.0),
            FieldType::TextList => FieldValue::List(Vec::new()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) if n.fract() == 0.0 => write!(f, "{n:.0}"),
            FieldValue::Number(n) => write!(f, "{n:.2}"),
            FieldValue::List(items) => write!(f, "{}", items.join("; ")),
        }
    }
}

/// One extracted record. Holds every schema field.
pub type Entry = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub entries: Vec<Entry>,
    pub summary_fields: BTreeMap<String, String>,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode a raw model reply against `schema`.
///
/// Code fences are stripped wherever they appear. Text that is not valid
/// JSON is an error; valid JSON without the expected list is an empty
/// result.
pub fn parse_response(raw: &str, schema: &ExtractionSchema) -> Result<ExtractionResult> {
    let cleaned = strip_code_blocks(raw);
    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| ExtractionError::InvalidOutput {
            reason: e.to_string(),
        })?;

    let Some(root) = value.as_object() else {
        warn!("Model reply is not a JSON object, treating as empty");
        return Ok(ExtractionResult::default());
    };

    let entries: Vec<Entry> = match root.get(&schema.list_key).and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| {
                schema
                    .fields
                    .iter()
                    .map(|field| {
                        let value = item
                            .get(&field.name)
                            .map(|v| coerce(v, &field.field_type))
                            .unwrap_or_else(|| FieldValue::sentinel(&field.field_type));
                        (field.name.clone(), value)
                    })
                    .collect()
            })
            .collect(),
        None => {
            debug!(list_key = schema.list_key.as_str(), "List key missing or not an array");
            Vec::new()
        }
    };

    let summary_fields = schema
        .summary_keys
        .iter()
        .filter_map(|key| {
            let text = match root.get(&key.name)? {
                Value::String(s) => s.trim().to_string(),
                Value::Null => return None,
                other => other.to_string(),
            };
            Some((key.name.clone(), text))
        })
        .collect();

    Ok(ExtractionResult {
        entries,
        summary_fields,
    })
}

fn coerce(value: &Value, field_type: &FieldType) -> FieldValue {
    match field_type {
        FieldType::Number => FieldValue::Number(coerce_number(value)),
        FieldType::Text => match value {
            Value::String(s) if !s.trim().is_empty() => FieldValue::Text(s.trim().to_string()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            _ => FieldValue::sentinel(field_type),
        },
        FieldType::Enum(variants) => {
            let matched = value.as_str().and_then(|s| {
                variants
                    .iter()
                    .find(|v| v.eq_ignore_ascii_case(s.trim()))
            });
            match matched {
                Some(v) => FieldValue::Text(v.clone()),
                None => FieldValue::sentinel(field_type),
            }
        }
        FieldType::TextList => match value {
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            Value::String(s) if !s.trim().is_empty() => FieldValue::List(vec![s.trim().to_string()]),
            _ => FieldValue::sentinel(field_type),
        },
    }
}

/// Numbers pass through; strings like `"$1,200/mo"` yield their first
/// number; anything else is 0.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_price(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"));

fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    RE_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|f| f.is_finite())
}
