//! Ready-made [`Coerce`](super::Coerce) hooks.

use crate::stream::value::is_int_literal;
use crate::stream::{RawValue, ValueNodeError, ValueResult};

/// Convert a translated scalar to an integer.
pub fn to_int(value: RawValue) -> ValueResult<RawValue> {
	let int = match &value {
		RawValue::Int(int) => Some(*int),
		RawValue::Bool(flag) => Some(i64::from(*flag)),
		RawValue::Float(float) if float.is_finite() && float.fract() == 0.0 => Some(*float as i64),
		RawValue::Text(text) => {
			let text = text.trim();
			if is_int_literal(text) { text.replace('_', "").parse().ok() } else { None }
		}
		_ => None,
	};
	int.map(RawValue::Int).ok_or_else(|| ValueNodeError::BadValue {
		value: value.to_string(),
		expected: "integer",
	})
}

/// Render a translated scalar as text.
pub fn to_text(value: RawValue) -> ValueResult<RawValue> {
	match value {
		RawValue::Text(_) => Ok(value),
		RawValue::Int(_) | RawValue::Float(_) | RawValue::Bool(_) => Ok(RawValue::Text(value.to_string())),
		RawValue::Sequence(_) | RawValue::Structure(_) => Err(ValueNodeError::BadValue {
			value: value.to_string(),
			expected: "string",
		}),
	}
}
