mod spec;

use indexmap::IndexMap;

use crate::stream::{PatternNodeError, PatternResult, RawValue, ValueNodeError, ValueResult};

pub use spec::{BuildOptions, SchemaSpec, build_schema, build_schema_with};

/// One position in a schema tree: expected kind plus absent-value policy.
///
/// Trees are immutable once built and can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
	name: Option<Box<str>>,
	required: bool,
	default: Option<RawValue>,
	kind: NodeKind,
}

/// Closed set of schema node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
	/// Any scalar, coerced to text.
	String,
	/// Integer or floating-point number.
	Number,
	/// Integer literal interpreted as non-zero/zero.
	Boolean,
	/// Wire code translated to a label through a finite table.
	Mapping(EnumTable),
	/// Ordered items sharing one item schema.
	Sequence(Box<SchemaNode>),
	/// Closed set of named fields keyed by wire key.
	Structure(Fields),
}

impl NodeKind {
	/// Kind label as used by schema specs and diagnostics.
	pub fn label(&self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Number => "number",
			Self::Boolean => "boolean",
			Self::Mapping(_) => "mapping",
			Self::Sequence(_) => "sequence",
			Self::Structure(_) => "structure",
		}
	}
}

impl SchemaNode {
	fn with_kind(kind: NodeKind) -> Self {
		Self {
			name: None,
			required: false,
			default: None,
			kind,
		}
	}

	/// Text node.
	pub fn string() -> Self {
		Self::with_kind(NodeKind::String)
	}

	/// Numeric node.
	pub fn number() -> Self {
		Self::with_kind(NodeKind::Number)
	}

	/// Boolean node.
	pub fn boolean() -> Self {
		Self::with_kind(NodeKind::Boolean)
	}

	/// Enumerated mapping node.
	pub fn mapping(table: EnumTable) -> Self {
		Self::with_kind(NodeKind::Mapping(table))
	}

	/// Sequence node with a fixed item schema.
	pub fn sequence(item: SchemaNode) -> Self {
		Self::with_kind(NodeKind::Sequence(Box::new(item)))
	}

	/// Structure node.
	pub fn structure(fields: Fields) -> Self {
		Self::with_kind(NodeKind::Structure(fields))
	}

	/// Set whether an absent value is an error.
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// Set the raw value substituted for an absent optional value.
	pub fn with_default(mut self, default: impl Into<RawValue>) -> Self {
		self.default = Some(default.into());
		self
	}

	/// External name assigned by the parent structure.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Whether an absent value fails regardless of any default.
	pub fn is_required(&self) -> bool {
		self.required
	}

	/// Default raw value, if any.
	pub fn default_value(&self) -> Option<&RawValue> {
		self.default.as_ref()
	}

	/// Node kind and its parameters.
	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	/// Item schema of a sequence node.
	pub fn item(&self) -> Option<&SchemaNode> {
		match &self.kind {
			NodeKind::Sequence(item) => Some(item),
			_ => None,
		}
	}

	/// Fields of a structure node.
	pub fn fields(&self) -> Option<&Fields> {
		match &self.kind {
			NodeKind::Structure(fields) => Some(fields),
			_ => None,
		}
	}

	/// Table of a mapping node.
	pub fn table(&self) -> Option<&EnumTable> {
		match &self.kind {
			NodeKind::Mapping(table) => Some(table),
			_ => None,
		}
	}

	/// Nesting depth of this subtree; leaves count as one.
	pub fn depth(&self) -> usize {
		match &self.kind {
			NodeKind::Sequence(item) => 1 + item.depth(),
			NodeKind::Structure(fields) => 1 + fields.iter().map(|(_, child)| child.depth()).max().unwrap_or(0),
			_ => 1,
		}
	}

	/// Name used in diagnostics: the external name, or the kind label.
	pub(crate) fn display_name(&self) -> &str {
		self.name.as_deref().unwrap_or(self.kind.label())
	}

	/// Apply the absent-value policy: required fails, then default, then nothing.
	pub(crate) fn resolve_absent(&self, raw: Option<RawValue>) -> ValueResult<Option<RawValue>> {
		match raw {
			Some(raw) => Ok(Some(raw)),
			None if self.required => Err(ValueNodeError::MissingRequired {
				name: self.display_name().to_owned(),
			}),
			None => Ok(self.default.clone()),
		}
	}
}

/// Finite wire code to label table of a mapping node.
///
/// Codes are unique; labels may repeat, making reverse lookup one-to-many.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumTable {
	entries: IndexMap<String, RawValue>,
}

impl EnumTable {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from code/label pairs; a repeated code keeps its last label.
	pub fn from_pairs<I, K, V>(pairs: I) -> PatternResult<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<RawValue>,
	{
		let mut table = Self::new();
		for (code, label) in pairs {
			table.insert(code, label)?;
		}
		Ok(table)
	}

	/// Insert one entry; labels must be scalars.
	pub fn insert(&mut self, code: impl Into<String>, label: impl Into<RawValue>) -> PatternResult<()> {
		let code = code.into();
		let label = label.into();
		if !label.is_scalar() {
			return Err(PatternNodeError::InvalidTable {
				at: code,
				reason: format!("label {label} is not a scalar"),
			});
		}
		self.entries.insert(code, label);
		Ok(())
	}

	/// Label for a wire code; only text values can match a code.
	pub fn forward(&self, code: &RawValue) -> Option<&RawValue> {
		code.as_text().and_then(|code| self.entries.get(code))
	}

	/// Every code carrying `label`, in table order.
	pub fn reverse(&self, label: &RawValue) -> Vec<&str> {
		self.entries
			.iter()
			.filter(|(_, candidate)| *candidate == label)
			.map(|(code, _)| code.as_str())
			.collect()
	}

	/// Iterate entries in table order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
		self.entries.iter().map(|(code, label)| (code.as_str(), label))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the table is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Fields of a structure node, keyed by wire key in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
	items: IndexMap<String, SchemaNode>,
}

impl Fields {
	/// Create an empty field set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`Fields::insert`].
	pub fn field(mut self, key: impl Into<String>, name: impl Into<String>, node: SchemaNode) -> PatternResult<Self> {
		self.insert(key, name, node)?;
		Ok(self)
	}

	/// Declare `node` under wire `key` with external `name`.
	///
	/// Fails on an empty name, a repeated wire key, or a repeated name.
	pub fn insert(&mut self, key: impl Into<String>, name: impl Into<String>, mut node: SchemaNode) -> PatternResult<()> {
		let key = key.into();
		let name = name.into();
		if name.is_empty() {
			return Err(PatternNodeError::InvalidName { at: key });
		}
		if self.items.contains_key(&key) {
			return Err(PatternNodeError::DuplicateKey { at: key.clone(), key });
		}
		if self.by_name(&name).is_some() {
			return Err(PatternNodeError::DuplicateName { at: key, name });
		}
		node.name = Some(name.into_boxed_str());
		self.items.insert(key, node);
		Ok(())
	}

	/// Child declared under a wire key.
	pub fn get(&self, key: &str) -> Option<&SchemaNode> {
		self.items.get(key)
	}

	/// Child carrying an external name.
	pub fn by_name(&self, name: &str) -> Option<&SchemaNode> {
		self.items.values().find(|node| node.name() == Some(name))
	}

	/// Iterate `(wire key, child)` pairs in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
		self.items.iter().map(|(key, node)| (key.as_str(), node))
	}

	/// Number of declared fields.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether no fields are declared.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}
