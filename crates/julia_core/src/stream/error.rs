use thiserror::Error;

/// Result type for schema construction and path resolution.
pub type PatternResult<T> = std::result::Result<T, PatternNodeError>;

/// Result type for parsing payloads against a schema.
pub type ValueResult<T> = std::result::Result<T, ValueNodeError>;

/// Errors raised while constructing a schema tree or addressing it by path.
///
/// These always point at a broken schema, never at a bad payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternNodeError {
	/// Schema JSON could not be read or parsed.
	#[error("invalid schema json: {message}")]
	Json {
		/// Underlying parser message.
		message: String,
	},
	/// Node spec (or the schema root) is not a JSON object.
	#[error("node spec at {at} is not an object")]
	NotAnObject {
		/// Location of the offending spec.
		at: String,
	},
	/// Node spec has no `kind` tag.
	#[error("node spec at {at} has no kind")]
	MissingKind {
		/// Location of the offending spec.
		at: String,
	},
	/// Node spec carries a `kind` tag outside the known set.
	#[error("node spec at {at} has unknown kind {kind}")]
	UnknownKind {
		/// Location of the offending spec.
		at: String,
		/// Offending tag as written.
		kind: String,
	},
	/// Structure field has a missing, empty, or non-string name.
	#[error("field {at} has no valid name")]
	InvalidName {
		/// Location of the offending field.
		at: String,
	},
	/// Two sibling fields share one external name.
	#[error("duplicate field name {name:?} at {at}")]
	DuplicateName {
		/// Location of the second field.
		at: String,
		/// Shared external name.
		name: String,
	},
	/// Two sibling fields share one wire key.
	#[error("duplicate wire key {key:?} at {at}")]
	DuplicateKey {
		/// Location of the structure.
		at: String,
		/// Shared wire key.
		key: String,
	},
	/// Mapping table is missing or is not a finite code/label table.
	#[error("mapping at {at} has an invalid table ({reason})")]
	InvalidTable {
		/// Location of the mapping node.
		at: String,
		/// What is wrong with the table.
		reason: String,
	},
	/// Sequence declared without an item schema.
	#[error("sequence at {at} requires an item")]
	MissingItem {
		/// Location of the sequence node.
		at: String,
	},
	/// Structure declared without an `items` object.
	#[error("structure at {at} requires an items object")]
	InvalidItems {
		/// Location of the structure node.
		at: String,
	},
	/// Node spec carries parameters its kind does not accept.
	#[error("{kind} node at {at} does not accept {params}")]
	UnexpectedParams {
		/// Location of the node.
		at: String,
		/// Node kind label.
		kind: &'static str,
		/// Comma separated rejected parameter names.
		params: String,
	},
	/// `required` is not a boolean.
	#[error("node at {at} has a non-boolean required flag")]
	InvalidRequired {
		/// Location of the node.
		at: String,
	},
	/// `default` contains a value that has no raw representation.
	#[error("node at {at} has an invalid default")]
	InvalidDefault {
		/// Location of the node.
		at: String,
	},
	/// Schema nests deeper than the configured limit.
	#[error("schema nesting at {at} exceeds max depth {max_depth}")]
	DepthExceeded {
		/// Location where the limit was hit.
		at: String,
		/// Configured depth ceiling.
		max_depth: usize,
	},
	/// Path expression is empty or has empty components.
	#[error("{path:?} is not a valid item name")]
	InvalidPath {
		/// Original path string.
		path: String,
	},
	/// Path component matched no child of the current structure.
	#[error("failed to retrieve {path}: no field named {component:?}")]
	NoSuchField {
		/// Original path string.
		path: String,
		/// Component that failed to match.
		component: String,
	},
	/// Path tried to descend through a node that has no children.
	#[error("failed to retrieve {path}: {component:?} is not a structure")]
	NotAStructure {
		/// Original path string.
		path: String,
		/// Component naming the childless node.
		component: String,
	},
}

/// Errors raised while parsing a concrete payload against a valid schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueNodeError {
	/// Required node received no value.
	#[error("{name} requires a value")]
	MissingRequired {
		/// External name of the node, or its kind label when unnamed.
		name: String,
	},
	/// Scalar could not be coerced to the expected kind.
	#[error("{value} is not a valid {expected}")]
	BadValue {
		/// Rendered offending value.
		value: String,
		/// Expected kind label.
		expected: &'static str,
	},
	/// Wire code has no entry in the mapping table.
	#[error("failed to map {value}")]
	Unmapped {
		/// Rendered offending code.
		value: String,
	},
	/// Label has no code in the mapping table.
	#[error("failed to reverse {value}")]
	Irreversible {
		/// Rendered offending label.
		value: String,
	},
	/// Sequence node received something other than a sequence or structure.
	#[error("{value} is not a valid list")]
	NotASequence {
		/// Rendered offending value.
		value: String,
	},
	/// Structure node received something that is not a key/value mapping.
	#[error("failed to parse {value} as a dict")]
	NotAStructure {
		/// Rendered offending value.
		value: String,
	},
	/// Structure payload carried undeclared wire keys.
	#[error("the dict keys {} are not expected", .keys.join(", "))]
	UnexpectedKeys {
		/// Leftover wire keys in payload order.
		keys: Vec<String>,
	},
	/// Codec path resolved to a node that is not a mapping.
	#[error("{path} is not a mapping node")]
	NotAMapping {
		/// Resolved path.
		path: String,
	},
	/// Failure inside a named child, prefixed with the child's name.
	#[error("{field}: {source}")]
	Nested {
		/// External name (or sequence index) of the failing child.
		field: String,
		/// Failure reported by the child.
		source: Box<ValueNodeError>,
	},
}

impl ValueNodeError {
	/// Wrap `source` as a failure of the child called `field`.
	pub fn nested(field: impl Into<String>, source: ValueNodeError) -> Self {
		Self::Nested {
			field: field.into(),
			source: Box::new(source),
		}
	}

	/// Field names from the outermost failing child down to the innermost.
	pub fn field_path(&self) -> Vec<&str> {
		let mut out = Vec::new();
		let mut current = self;
		while let Self::Nested { field, source } = current {
			out.push(field.as_str());
			current = source;
		}
		out
	}

	/// Innermost error with all field prefixes stripped.
	pub fn root_cause(&self) -> &ValueNodeError {
		let mut current = self;
		while let Self::Nested { source, .. } = current {
			current = source;
		}
		current
	}
}

/// Errors raised by the `map`/`unmap` shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
	/// Schema could not be built or the path did not resolve.
	#[error(transparent)]
	Pattern(#[from] PatternNodeError),
	/// Value could not be translated.
	#[error(transparent)]
	Value(#[from] ValueNodeError),
}
