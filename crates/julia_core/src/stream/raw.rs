use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered key/value structure of raw values.
pub type RawMap = IndexMap<String, RawValue>;

/// Untyped value produced by decoding, before schema-directed coercion.
///
/// Decoded payloads only ever contain `Text`, `Sequence`, and `Structure`.
/// The numeric and boolean scalars come from schema defaults, mapping labels,
/// and programmatic callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
	/// Text scalar.
	Text(String),
	/// Integer scalar.
	Int(i64),
	/// Floating-point scalar.
	Float(f64),
	/// Boolean scalar.
	Bool(bool),
	/// Ordered sequence.
	Sequence(Vec<RawValue>),
	/// Ordered key/value structure.
	Structure(RawMap),
}

impl RawValue {
	/// Return `true` for text, numeric, and boolean values.
	pub fn is_scalar(&self) -> bool {
		!matches!(self, Self::Sequence(_) | Self::Structure(_))
	}

	/// Borrow the text of a `Text` value.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Borrow the items of a `Sequence` value.
	pub fn as_sequence(&self) -> Option<&[RawValue]> {
		match self {
			Self::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow the entries of a `Structure` value.
	pub fn as_structure(&self) -> Option<&RawMap> {
		match self {
			Self::Structure(map) => Some(map),
			_ => None,
		}
	}

	/// Look up a key of a `Structure` value.
	pub fn get(&self, key: &str) -> Option<&RawValue> {
		self.as_structure().and_then(|map| map.get(key))
	}

	/// Short label of the value kind, used in diagnostics.
	pub fn kind_label(&self) -> &'static str {
		match self {
			Self::Text(_) => "text",
			Self::Int(_) => "integer",
			Self::Float(_) => "float",
			Self::Bool(_) => "boolean",
			Self::Sequence(_) => "sequence",
			Self::Structure(_) => "structure",
		}
	}

	/// Convert a JSON value, returning `None` if it contains a `null` anywhere.
	pub fn from_json(value: &serde_json::Value) -> Option<Self> {
		match value {
			serde_json::Value::Null => None,
			serde_json::Value::Bool(value) => Some(Self::Bool(*value)),
			serde_json::Value::Number(number) => match number.as_i64() {
				Some(value) => Some(Self::Int(value)),
				None => number.as_f64().map(Self::Float),
			},
			serde_json::Value::String(text) => Some(Self::Text(text.clone())),
			serde_json::Value::Array(items) => items.iter().map(Self::from_json).collect::<Option<Vec<_>>>().map(Self::Sequence),
			serde_json::Value::Object(entries) => entries
				.iter()
				.map(|(key, value)| Self::from_json(value).map(|value| (key.clone(), value)))
				.collect::<Option<RawMap>>()
				.map(Self::Structure),
		}
	}

	/// Render as JSON; non-finite floats become `null`.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Self::Text(text) => serde_json::Value::String(text.clone()),
			Self::Int(value) => serde_json::Value::from(*value),
			Self::Float(value) => serde_json::Number::from_f64(*value).map_or(serde_json::Value::Null, serde_json::Value::Number),
			Self::Bool(value) => serde_json::Value::Bool(*value),
			Self::Sequence(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
			Self::Structure(map) => serde_json::Value::Object(map.iter().map(|(key, value)| (key.clone(), value.to_json())).collect()),
		}
	}
}

impl fmt::Display for RawValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
			Self::Bool(value) => write!(f, "{value}"),
			Self::Sequence(items) => {
				f.write_str("[")?;
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Self::Structure(map) => {
				f.write_str("{")?;
				for (idx, (key, value)) in map.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{key}: {value}")?;
				}
				f.write_str("}")
			}
		}
	}
}

impl From<&str> for RawValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for RawValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for RawValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for RawValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for RawValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Vec<RawValue>> for RawValue {
	fn from(value: Vec<RawValue>) -> Self {
		Self::Sequence(value)
	}
}

impl From<RawMap> for RawValue {
	fn from(value: RawMap) -> Self {
		Self::Structure(value)
	}
}
