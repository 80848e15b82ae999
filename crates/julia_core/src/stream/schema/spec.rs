use std::io::Read;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::stream::{EnumTable, Fields, PatternNodeError, PatternResult, RawValue, SchemaNode};

const ROOT: &str = "<root>";
const COMMON_PARAMS: [&str; 4] = ["kind", "name", "required", "default"];

/// Declarative schema description: wire key to node spec, as JSON.
///
/// ```json
/// {"0": {"kind": "string", "name": "tag", "required": true},
///  "1": {"kind": "boolean", "name": "ok"}}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaSpec {
	entries: Map<String, Value>,
}

/// Limits applied while building a schema tree.
#[derive(Debug, Clone)]
pub struct BuildOptions {
	/// Maximum structure/sequence nesting, counting the root structure.
	pub max_depth: usize,
}

impl Default for BuildOptions {
	fn default() -> Self {
		Self { max_depth: 32 }
	}
}

impl SchemaSpec {
	/// Wrap an already parsed JSON value; it must be an object.
	pub fn from_value(value: Value) -> PatternResult<Self> {
		match value {
			Value::Object(entries) => Ok(Self { entries }),
			_ => Err(PatternNodeError::NotAnObject { at: ROOT.to_owned() }),
		}
	}

	/// Parse a schema from JSON text.
	pub fn from_json_str(text: &str) -> PatternResult<Self> {
		let value: Value = serde_json::from_str(text).map_err(json_error)?;
		Self::from_value(value)
	}

	/// Parse a schema from a JSON reader.
	pub fn from_reader(reader: impl Read) -> PatternResult<Self> {
		let value: Value = serde_json::from_reader(reader).map_err(json_error)?;
		Self::from_value(value)
	}

	/// Build the schema tree with default options.
	pub fn build(&self) -> PatternResult<SchemaNode> {
		build_schema(self)
	}

	/// Iterate top-level `(wire key, node spec)` entries in declaration order.
	pub fn items(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(key, spec)| (key.as_str(), spec))
	}

	/// Number of top-level fields.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the schema declares no fields.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

fn json_error(err: serde_json::Error) -> PatternNodeError {
	PatternNodeError::Json { message: err.to_string() }
}

/// Build a schema tree with default options.
pub fn build_schema(spec: &SchemaSpec) -> PatternResult<SchemaNode> {
	build_schema_with(spec, &BuildOptions::default())
}

/// Build a schema tree, validating every node spec eagerly.
///
/// The result is the unnamed root structure: never required, no default.
pub fn build_schema_with(spec: &SchemaSpec, options: &BuildOptions) -> PatternResult<SchemaNode> {
	let builder = Builder { options };
	let fields = builder.fields(&spec.entries, ROOT, 1)?;
	let root = SchemaNode::structure(fields);
	debug!("built schema with {} top-level fields, depth {}", spec.len(), root.depth());
	Ok(root)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
	Field,
	Item,
}

struct Builder<'a> {
	options: &'a BuildOptions,
}

impl Builder<'_> {
	fn fields(&self, entries: &Map<String, Value>, at: &str, depth: usize) -> PatternResult<Fields> {
		self.check_depth(at, depth)?;

		let mut fields = Fields::new();
		for (key, spec) in entries {
			let child_at = child_location(at, key);
			let node = self.node(spec, &child_at, depth + 1, Role::Field)?;
			let name = spec
				.get("name")
				.and_then(Value::as_str)
				.filter(|name| !name.is_empty())
				.ok_or_else(|| PatternNodeError::InvalidName { at: child_at.clone() })?;
			fields.insert(key.as_str(), name, node).map_err(|err| match err {
				PatternNodeError::DuplicateName { name, .. } => PatternNodeError::DuplicateName { at: child_at, name },
				other => other,
			})?;
		}
		Ok(fields)
	}

	fn node(&self, spec: &Value, at: &str, depth: usize, role: Role) -> PatternResult<SchemaNode> {
		self.check_depth(at, depth)?;
		let Some(obj) = spec.as_object() else {
			return Err(PatternNodeError::NotAnObject { at: at.to_owned() });
		};
		let kind = match obj.get("kind") {
			None => return Err(PatternNodeError::MissingKind { at: at.to_owned() }),
			Some(Value::String(kind)) => kind.as_str(),
			Some(other) => {
				return Err(PatternNodeError::UnknownKind {
					at: at.to_owned(),
					kind: other.to_string(),
				});
			}
		};

		let (node, param) = match kind {
			"string" => (SchemaNode::string(), None),
			"number" | "numeric" => (SchemaNode::number(), None),
			"boolean" | "bool" => (SchemaNode::boolean(), None),
			"mapping" | "enum" => (SchemaNode::mapping(table(obj.get("table"), at)?), Some("table")),
			"sequence" | "list" => {
				let Some(item) = obj.get("item") else {
					return Err(PatternNodeError::MissingItem { at: at.to_owned() });
				};
				let item = self.node(item, &format!("{at}.item"), depth + 1, Role::Item)?;
				(SchemaNode::sequence(item), Some("item"))
			}
			"structure" | "dict" => {
				let Some(items) = obj.get("items").and_then(Value::as_object) else {
					return Err(PatternNodeError::InvalidItems { at: at.to_owned() });
				};
				(SchemaNode::structure(self.fields(items, at, depth)?), Some("items"))
			}
			other => {
				return Err(PatternNodeError::UnknownKind {
					at: at.to_owned(),
					kind: other.to_owned(),
				});
			}
		};

		let mut unexpected: Vec<&str> = obj
			.keys()
			.map(String::as_str)
			.filter(|key| !COMMON_PARAMS.contains(key) && Some(*key) != param)
			.collect();
		// sequence items are unnamed
		if role == Role::Item && obj.contains_key("name") {
			unexpected.push("name");
		}
		if !unexpected.is_empty() {
			return Err(PatternNodeError::UnexpectedParams {
				at: at.to_owned(),
				kind: node.kind().label(),
				params: unexpected.join(", "),
			});
		}

		let mut node = match obj.get("required") {
			None => node,
			Some(Value::Bool(required)) => node.required(*required),
			Some(_) => return Err(PatternNodeError::InvalidRequired { at: at.to_owned() }),
		};
		if let Some(default) = obj.get("default") {
			let default = RawValue::from_json(default).ok_or_else(|| PatternNodeError::InvalidDefault { at: at.to_owned() })?;
			node = node.with_default(default);
		}
		Ok(node)
	}

	fn check_depth(&self, at: &str, depth: usize) -> PatternResult<()> {
		if depth > self.options.max_depth {
			return Err(PatternNodeError::DepthExceeded {
				at: at.to_owned(),
				max_depth: self.options.max_depth,
			});
		}
		Ok(())
	}
}

fn child_location(parent: &str, key: &str) -> String {
	if parent == ROOT { key.to_owned() } else { format!("{parent}.items.{key}") }
}

fn table(spec: Option<&Value>, at: &str) -> PatternResult<EnumTable> {
	let invalid = |reason: String| PatternNodeError::InvalidTable { at: at.to_owned(), reason };

	let pairs: Vec<(&str, &Value)> = match spec {
		None => return Err(invalid("missing table".to_owned())),
		Some(Value::Object(entries)) => entries.iter().map(|(code, label)| (code.as_str(), label)).collect(),
		Some(Value::Array(items)) => items
			.iter()
			.map(|pair| match pair.as_array().map(Vec::as_slice) {
				Some([Value::String(code), label]) => Ok((code.as_str(), label)),
				_ => Err(invalid(format!("{pair} is not a [code, label] pair with a text code"))),
			})
			.collect::<PatternResult<_>>()?,
		Some(other) => return Err(invalid(format!("{other} is not a table"))),
	};

	let mut table = EnumTable::new();
	for (code, label) in pairs {
		let label = RawValue::from_json(label)
			.filter(RawValue::is_scalar)
			.ok_or_else(|| invalid(format!("label of {code:?} is not a scalar")))?;
		table.insert(code, label)?;
	}
	Ok(table)
}
