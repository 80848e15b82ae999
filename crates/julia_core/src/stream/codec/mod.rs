pub mod coerce;

use std::borrow::Cow;

use log::debug;

use crate::stream::{CodecError, EnumTable, PatternResult, RawValue, SchemaNode, SchemaSpec, ValueNodeError, ValueResult, build_schema};

/// Post-translation hook applied to every translated scalar.
pub type Coerce<'a> = &'a dyn Fn(RawValue) -> ValueResult<RawValue>;

/// Anything that yields a schema tree for codec lookups.
pub trait SchemaSource {
	/// Borrow the tree, building it first when needed.
	fn schema(&self) -> PatternResult<Cow<'_, SchemaNode>>;
}

impl SchemaSource for SchemaNode {
	fn schema(&self) -> PatternResult<Cow<'_, SchemaNode>> {
		Ok(Cow::Borrowed(self))
	}
}

impl SchemaSource for SchemaSpec {
	fn schema(&self) -> PatternResult<Cow<'_, SchemaNode>> {
		build_schema(self).map(Cow::Owned)
	}
}

#[derive(Debug, Clone, Copy)]
enum Direction {
	Forward,
	Reverse,
}

/// Translate wire codes to labels through the mapping node at `path`.
///
/// A sequence input is translated element by element into a sequence.
pub fn map(schema: &impl SchemaSource, path: &str, value: RawValue, coerce: Option<Coerce<'_>>) -> Result<RawValue, CodecError> {
	translate(schema, path, value, coerce, Direction::Forward)
}

/// Translate labels back to wire codes through the mapping node at `path`.
///
/// A label shared by several codes yields the sequence of all of them, which
/// is flattened into the output when the input is itself a sequence.
pub fn unmap(schema: &impl SchemaSource, path: &str, value: RawValue, coerce: Option<Coerce<'_>>) -> Result<RawValue, CodecError> {
	translate(schema, path, value, coerce, Direction::Reverse)
}

fn translate(schema: &impl SchemaSource, path: &str, value: RawValue, coerce: Option<Coerce<'_>>, direction: Direction) -> Result<RawValue, CodecError> {
	let root = schema.schema()?;
	let node = root.resolve(path)?;
	let Some(table) = node.table() else {
		return Err(ValueNodeError::NotAMapping { path: path.to_owned() }.into());
	};
	debug!("{direction:?} translating {value} through {path}");
	Ok(translate_value(table, value, coerce, direction)?)
}

fn translate_value(table: &EnumTable, value: RawValue, coerce: Option<Coerce<'_>>, direction: Direction) -> ValueResult<RawValue> {
	if let RawValue::Sequence(items) = value {
		let mut out = Vec::with_capacity(items.len());
		for item in items {
			match translate_value(table, item, coerce, direction)? {
				RawValue::Sequence(many) => out.extend(many),
				single => out.push(single),
			}
		}
		return Ok(RawValue::Sequence(out));
	}

	let translated = match direction {
		Direction::Forward => table.forward(&value).cloned().ok_or_else(|| ValueNodeError::Unmapped { value: value.to_string() })?,
		Direction::Reverse => match table.reverse(&value).as_slice() {
			[] => return Err(ValueNodeError::Irreversible { value: value.to_string() }),
			[code] => RawValue::from(*code),
			codes => RawValue::Sequence(codes.iter().map(|code| RawValue::from(*code)).collect()),
		},
	};

	let Some(coerce) = coerce else {
		return Ok(translated);
	};
	match translated {
		RawValue::Sequence(items) => items.into_iter().map(coerce).collect::<ValueResult<Vec<_>>>().map(RawValue::Sequence),
		single => coerce(single),
	}
}

#[cfg(test)]
mod tests;
