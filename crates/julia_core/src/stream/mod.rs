mod codec;
mod decode;
mod error;
mod path;
mod raw;
mod schema;
mod value;

/// Label/code translation entry points and ready-made coercions.
pub use codec::{Coerce, SchemaSource, coerce, map, unmap};
/// Flat decoding and nested key expansion.
pub use decode::{DecodeOptions, Decoder, decode_bracketed, decode_dotted, decode_flat, decode_flat_with};
/// Error and result aliases.
pub use error::{CodecError, PatternNodeError, PatternResult, ValueNodeError, ValueResult};
/// Dotted external-name path separator.
pub use path::PATH_SEPARATOR;
/// Untyped decoded values.
pub use raw::{RawMap, RawValue};
/// Schema tree types, builders, and the declarative spec interpreter.
pub use schema::{BuildOptions, EnumTable, Fields, NodeKind, SchemaNode, SchemaSpec, build_schema, build_schema_with};
/// Parsed value tree types.
pub use value::{Number, Parsed, ValueNode};
