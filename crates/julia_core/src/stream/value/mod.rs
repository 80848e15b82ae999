use std::fmt;

use indexmap::IndexMap;
use log::trace;

use crate::stream::{Fields, NodeKind, RawMap, RawValue, SchemaNode, ValueNodeError, ValueResult};

/// Numeric payload of a number node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
	/// Integer value.
	Int(i64),
	/// Floating-point value.
	Float(f64),
}

impl Number {
	/// Widen to `f64`.
	pub fn as_f64(self) -> f64 {
		match self {
			Self::Int(value) => value as f64,
			Self::Float(value) => value,
		}
	}

	/// Integer value, if this is an integer.
	pub fn as_i64(self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(value),
			Self::Float(_) => None,
		}
	}

	fn to_json(self) -> serde_json::Value {
		match self {
			Self::Int(value) => value.into(),
			Self::Float(value) => RawValue::Float(value).to_json(),
		}
	}
}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
		}
	}
}

/// Cleaned payload of a value node, shaped by the node kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<'s> {
	/// String node result.
	Text(String),
	/// Number node result.
	Number(Number),
	/// Boolean node result.
	Boolean(bool),
	/// Mapping node result: the label found for the wire code.
	Label(RawValue),
	/// Sequence node result: one value per item, in input order.
	Sequence(Vec<ValueNode<'s>>),
	/// Structure node result: external name to child, `None` when absent.
	Structure(IndexMap<String, Option<ValueNode<'s>>>),
}

/// Result of parsing one raw value against one schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode<'s> {
	pattern: &'s SchemaNode,
	raw: RawValue,
	value: Parsed<'s>,
}

impl<'s> ValueNode<'s> {
	/// Schema node this value was parsed against.
	pub fn pattern(&self) -> &'s SchemaNode {
		self.pattern
	}

	/// Raw input as received, or the substituted default.
	pub fn raw(&self) -> &RawValue {
		&self.raw
	}

	/// Cleaned payload.
	pub fn value(&self) -> &Parsed<'s> {
		&self.value
	}

	/// Consume the node, keeping the cleaned payload.
	pub fn into_value(self) -> Parsed<'s> {
		self.value
	}

	/// Present child of a structure value by external name.
	pub fn get(&self, name: &str) -> Option<&ValueNode<'s>> {
		match &self.value {
			Parsed::Structure(children) => children.get(name).and_then(Option::as_ref),
			_ => None,
		}
	}

	/// Whether a structure value declares `name`, present or not.
	pub fn contains(&self, name: &str) -> bool {
		matches!(&self.value, Parsed::Structure(children) if children.contains_key(name))
	}

	/// Items of a sequence value.
	pub fn items(&self) -> Option<&[ValueNode<'s>]> {
		match &self.value {
			Parsed::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Text of a string value.
	pub fn as_text(&self) -> Option<&str> {
		match &self.value {
			Parsed::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Number of a number value.
	pub fn as_number(&self) -> Option<Number> {
		match self.value {
			Parsed::Number(number) => Some(number),
			_ => None,
		}
	}

	/// Flag of a boolean value.
	pub fn as_bool(&self) -> Option<bool> {
		match self.value {
			Parsed::Boolean(flag) => Some(flag),
			_ => None,
		}
	}

	/// Label of a mapping value.
	pub fn as_label(&self) -> Option<&RawValue> {
		match &self.value {
			Parsed::Label(label) => Some(label),
			_ => None,
		}
	}

	/// Render the cleaned tree as JSON; absent optional fields become `null`.
	pub fn to_json(&self) -> serde_json::Value {
		match &self.value {
			Parsed::Text(text) => serde_json::Value::String(text.clone()),
			Parsed::Number(number) => number.to_json(),
			Parsed::Boolean(flag) => serde_json::Value::Bool(*flag),
			Parsed::Label(label) => label.to_json(),
			Parsed::Sequence(items) => serde_json::Value::Array(items.iter().map(ValueNode::to_json).collect()),
			Parsed::Structure(children) => serde_json::Value::Object(
				children
					.iter()
					.map(|(name, child)| (name.clone(), child.as_ref().map_or(serde_json::Value::Null, ValueNode::to_json)))
					.collect(),
			),
		}
	}
}

impl SchemaNode {
	/// Parse a raw value, or its absence, against this node.
	///
	/// Absent values follow the node policy: required fails, a default is
	/// parsed in place of the value, otherwise the result is `None`.
	pub fn parse(&self, raw: Option<RawValue>) -> ValueResult<Option<ValueNode<'_>>> {
		match self.resolve_absent(raw)? {
			Some(raw) => self.parse_present(raw).map(Some),
			None => Ok(None),
		}
	}

	fn parse_present(&self, raw: RawValue) -> ValueResult<ValueNode<'_>> {
		let value = match self.kind() {
			NodeKind::String => Parsed::Text(clean_text(&raw)?),
			NodeKind::Number => Parsed::Number(clean_number(&raw)?),
			NodeKind::Boolean => Parsed::Boolean(clean_bool(&raw)?),
			NodeKind::Mapping(table) => match table.forward(&raw) {
				Some(label) => Parsed::Label(label.clone()),
				None => return Err(ValueNodeError::Unmapped { value: raw.to_string() }),
			},
			NodeKind::Sequence(item) => Parsed::Sequence(parse_items(item, &raw)?),
			NodeKind::Structure(fields) => Parsed::Structure(parse_fields(fields, &raw)?),
		};
		trace!("parsed {} as {}", raw, self.display_name());
		Ok(ValueNode { pattern: self, raw, value })
	}
}

fn bad_value(raw: &RawValue, expected: &'static str) -> ValueNodeError {
	ValueNodeError::BadValue {
		value: raw.to_string(),
		expected,
	}
}

fn clean_text(raw: &RawValue) -> ValueResult<String> {
	match raw {
		RawValue::Text(text) => Ok(text.clone()),
		RawValue::Int(_) | RawValue::Float(_) | RawValue::Bool(_) => Ok(raw.to_string()),
		RawValue::Sequence(_) | RawValue::Structure(_) => Err(bad_value(raw, "string")),
	}
}

fn clean_number(raw: &RawValue) -> ValueResult<Number> {
	match raw {
		RawValue::Int(value) => Ok(Number::Int(*value)),
		RawValue::Float(value) => Ok(Number::Float(*value)),
		RawValue::Bool(flag) => Ok(Number::Int(i64::from(*flag))),
		RawValue::Text(text) => {
			let text = text.trim();
			if is_int_literal(text) {
				if let Ok(value) = strip_separators(text).parse::<i64>() {
					return Ok(Number::Int(value));
				}
			}
			text.parse::<f64>().map(Number::Float).map_err(|_| bad_value(raw, "number"))
		}
		RawValue::Sequence(_) | RawValue::Structure(_) => Err(bad_value(raw, "number")),
	}
}

fn clean_bool(raw: &RawValue) -> ValueResult<bool> {
	match raw {
		RawValue::Bool(flag) => Ok(*flag),
		RawValue::Int(value) => Ok(*value != 0),
		RawValue::Float(value) if value.is_finite() => Ok(value.trunc() != 0.0),
		RawValue::Text(text) => {
			let text = text.trim();
			if is_int_literal(text) {
				Ok(text.bytes().any(|byte| matches!(byte, b'1'..=b'9')))
			} else {
				Err(bad_value(raw, "boolean value"))
			}
		}
		_ => Err(bad_value(raw, "boolean value")),
	}
}

/// Optional sign followed by ASCII digits, with single `_` allowed between digits.
pub(crate) fn is_int_literal(text: &str) -> bool {
	let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
	!digits.is_empty()
		&& !digits.starts_with('_')
		&& !digits.ends_with('_')
		&& !digits.contains("__")
		&& digits.bytes().all(|byte| byte.is_ascii_digit() || byte == b'_')
}

fn strip_separators(text: &str) -> String {
	text.chars().filter(|ch| *ch != '_').collect()
}

fn parse_items<'s>(item: &'s SchemaNode, raw: &RawValue) -> ValueResult<Vec<ValueNode<'s>>> {
	let values: Vec<&RawValue> = match raw {
		RawValue::Sequence(items) => items.iter().collect(),
		RawValue::Structure(map) => map.values().collect(),
		_ => return Err(ValueNodeError::NotASequence { value: raw.to_string() }),
	};

	values
		.into_iter()
		.enumerate()
		.map(|(idx, value)| item.parse_present(value.clone()).map_err(|err| ValueNodeError::nested(idx.to_string(), err)))
		.collect()
}

fn parse_fields<'s>(fields: &'s Fields, raw: &RawValue) -> ValueResult<IndexMap<String, Option<ValueNode<'s>>>> {
	let mut rest = structure_entries(raw)?;
	let mut out = IndexMap::with_capacity(fields.len());

	for (key, child) in fields.iter() {
		let name = child.display_name();
		let value = child.parse(rest.shift_remove(key)).map_err(|err| ValueNodeError::nested(name, err))?;
		out.insert(name.to_owned(), value);
	}

	if !rest.is_empty() {
		return Err(ValueNodeError::UnexpectedKeys {
			keys: rest.into_keys().collect(),
		});
	}
	Ok(out)
}

/// Working copy of a structure payload; a sequence of `[key, value]` pairs also qualifies.
fn structure_entries(raw: &RawValue) -> ValueResult<RawMap> {
	match raw {
		RawValue::Structure(map) => Ok(map.clone()),
		RawValue::Sequence(items) => items
			.iter()
			.map(|pair| match pair.as_sequence() {
				Some([RawValue::Text(key), value]) => Ok((key.clone(), value.clone())),
				_ => Err(ValueNodeError::NotAStructure { value: raw.to_string() }),
			})
			.collect(),
		_ => Err(ValueNodeError::NotAStructure { value: raw.to_string() }),
	}
}

#[cfg(test)]
mod tests;
