use std::{fmt, io};
use std::path::PathBuf;

use julia::stream::{CodecError, PatternNodeError, ValueNodeError};
use thiserror::Error;

/// Result type used by CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Payload could not be read from stdin.
	#[error("failed to read payload from stdin: {0}")]
	Stdin(#[source] io::Error),
	/// Schema file could not be opened.
	#[error("failed to open schema {}: {source}", .path.display())]
	SchemaFile {
		/// Schema path as given.
		path: PathBuf,
		/// Underlying IO failure.
		source: io::Error,
	},
	/// Schema could not be built or the path did not resolve.
	#[error(transparent)]
	Pattern(#[from] PatternNodeError),
	/// Payload did not match the schema.
	#[error(transparent)]
	Value(#[from] ValueNodeError),
	/// Translation failed.
	#[error(transparent)]
	Codec(#[from] CodecError),
	/// JSON output could not be rendered.
	#[error("failed to render json: {0}")]
	Json(#[from] serde_json::Error),
	/// Text output could not be rendered.
	#[error("failed to render output")]
	Render(#[from] fmt::Error),
	/// `--item` addressed a node that is not a sequence.
	#[error("{path} is not a sequence node")]
	NotASequence {
		/// Item path as given.
		path: String,
	},
}
